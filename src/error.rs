use thiserror::Error;

/// Fatal construction-time failures. Per-tick simulation code has no error
/// paths; anything that would fail must be rejected here instead.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

impl SimError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        SimError::Configuration(msg.into())
    }

    pub fn degenerate(msg: impl Into<String>) -> Self {
        SimError::DegenerateGeometry(msg.into())
    }
}
