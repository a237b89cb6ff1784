/// Convenience result type used across the editor.
pub type CutoutResult<T> = Result<T, CutoutError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum CutoutError {
    /// Invalid host-provided data (dimensions, configuration, scripts).
    #[error("validation error: {0}")]
    Validation(String),

    /// The source image could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A raster could not be encoded into an artifact.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CutoutError {
    /// Build a [`CutoutError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CutoutError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`CutoutError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
