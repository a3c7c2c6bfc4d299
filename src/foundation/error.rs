/// Convenience result type used across Wishly.
pub type WishlyResult<T> = Result<T, WishlyError>;

/// Top-level error taxonomy used by engine APIs.
///
/// None of these are fatal to an editing session: decode failures leave the previous image in
/// place, storage failures are logged by the persistence layer, and share failures fall back to
/// export.
#[derive(thiserror::Error, Debug)]
pub enum WishlyError {
    /// Image bytes could not be decoded as a raster image.
    #[error("decode error: {0}")]
    Decode(String),

    /// Durable storage could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// The native share collaborator is missing or rejected the request.
    #[error("share unavailable: {0}")]
    ShareUnavailable(String),

    /// Invalid user-provided or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WishlyError {
    /// Build a [`WishlyError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`WishlyError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`WishlyError::ShareUnavailable`] value.
    pub fn share_unavailable(msg: impl Into<String>) -> Self {
        Self::ShareUnavailable(msg.into())
    }

    /// Build a [`WishlyError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WishlyError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for WishlyError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
