pub mod document;
pub mod widget;

pub use document::*;
pub use widget::*;
