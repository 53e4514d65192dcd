use std::fmt;

/// Backend status shown by the UI status indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BackendStatus {
    /// Not connected, or nothing has happened yet. Red.
    #[default]
    Idle,
    /// A request is running. Amber.
    InProgress,
    /// The last request completed. Green.
    Complete,
}

impl BackendStatus {
    /// Indicator colour as RGB.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Idle => (255, 51, 0),
            Self::InProgress => (255, 153, 0),
            Self::Complete => (102, 153, 0),
        }
    }

    pub fn colour_name(self) -> &'static str {
        match self {
            Self::Idle => "red",
            Self::InProgress => "amber",
            Self::Complete => "green",
        }
    }
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::InProgress => "in-progress",
            Self::Complete => "complete",
        };
        write!(f, "{} ({})", name, self.colour_name())
    }
}
