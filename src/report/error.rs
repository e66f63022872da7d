use thiserror::Error;

/// Errors surfaced by the report engine. Missing numeric fields never end up
/// here; they are zero-filled where they are read.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("malformed battle report: missing `{section}`")]
    MalformedReport { section: &'static str },

    #[error("invalid battle report json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown report format '{0}' (expected text or oneline)")]
    UnknownFormat(String),

    #[error("unknown actor type '{0}' (expected user or bot)")]
    UnknownActor(String),

    #[error("guild config store: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    pub fn missing(section: &'static str) -> Self {
        Self::MalformedReport { section }
    }

    /// True for errors caused by the shape of the caller's input.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Self::MalformedReport { .. } | Self::Parse(_))
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
