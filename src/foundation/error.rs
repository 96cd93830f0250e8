/// Result alias used at lumina's IO and device boundaries.
pub type LuminaResult<T> = Result<T, LuminaError>;

/// Boundary error type.
///
/// The compile pipeline itself (parse, solve, clarify, lower, encode) never produces one of
/// these: sparse or malformed instructions fall back to defaults and surface as ambiguities,
/// unsatisfied constraints and a lower confidence instead.
#[derive(thiserror::Error, Debug)]
pub enum LuminaError {
    /// A roofline configuration or other input failed structural validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Engine options could not be loaded.
    #[error("config error: {0}")]
    Config(String),

    /// The device transport or design store reported a failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LuminaError {
    /// Build a [`LuminaError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LuminaError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`LuminaError::Transport`].
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Build a [`LuminaError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for LuminaError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
