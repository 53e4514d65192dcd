pub mod artifact;
pub mod conversion;
mod definition;
pub mod step;
pub mod table;

pub use artifact::*;
pub use conversion::*;
pub use step::*;
pub use table::*;
