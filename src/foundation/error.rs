/// Convenience result type used across screenforge.
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Decode errors are recovered locally by the device layer (the subject is
/// silently skipped); export errors surface to the caller. Stale renders are
/// not errors at all — they are discarded by the sequence protocol.
#[derive(thiserror::Error, Debug)]
pub enum ForgeError {
    /// Invalid user-provided configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// An image source could not be decoded (corrupt or empty data).
    #[error("decode error: {0}")]
    Decode(String),

    /// PNG or ZIP serialization produced no usable output.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ForgeError {
    /// Build a [`ForgeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ForgeError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ForgeError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`ForgeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
