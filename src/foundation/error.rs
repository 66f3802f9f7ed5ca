/// Convenience result type used across kfx.
pub type KfxResult<T> = Result<T, KfxError>;

/// Top-level error taxonomy used by tokenizer, resolver and rasterizer APIs.
#[derive(thiserror::Error, Debug)]
pub enum KfxError {
    /// Raw line text cannot be split into well-formed tag/plain alternation.
    #[error("tokenize error at byte {offset}: {message}")]
    Tokenize {
        /// Byte offset of the offending delimiter in the raw text.
        offset: usize,
        /// Human readable description.
        message: String,
    },

    /// Layout requested without a positive document resolution.
    #[error("resolution error: {0}")]
    Resolution(String),

    /// The glyph oracle could not shape a non-blank text run.
    #[error("shaping error: {0}")]
    Shaping(String),

    /// Outline data violates its own structural contract.
    #[error("rasterization error: {0}")]
    Rasterization(String),

    /// Invalid caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing documents and options.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KfxError {
    /// Build a [`KfxError::Tokenize`] value.
    pub fn tokenize(offset: usize, msg: impl Into<String>) -> Self {
        Self::Tokenize {
            offset,
            message: msg.into(),
        }
    }

    /// Build a [`KfxError::Resolution`] value.
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Build a [`KfxError::Shaping`] value.
    pub fn shaping(msg: impl Into<String>) -> Self {
        Self::Shaping(msg.into())
    }

    /// Build a [`KfxError::Rasterization`] value.
    pub fn rasterization(msg: impl Into<String>) -> Self {
        Self::Rasterization(msg.into())
    }

    /// Build a [`KfxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`KfxError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
