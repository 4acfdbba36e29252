/// Error returned by every registry, serializer and config operation.
///
/// Each operation category surfaces exactly one variant: registry calls fail
/// with `Unavailable`, serialize/deserialize calls with `SerializationFailed`,
/// record construction with `InvalidRecord`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Registry call failed (network, auth, not found). Not retried.
    #[error("registry unavailable: {0}")]
    Unavailable(String),

    /// Schema parse, encode or decode failure. Carries the underlying cause.
    #[error("serialization failed: {0}")]
    SerializationFailed(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("config error: {0}")]
    Config(String),
}

impl RegistryError {
    pub fn serialization(cause: impl std::fmt::Display) -> Self {
        RegistryError::SerializationFailed(cause.to_string())
    }

    pub fn unavailable(cause: impl std::fmt::Display) -> Self {
        RegistryError::Unavailable(cause.to_string())
    }

    /// Add context to the error, preserving the variant.
    ///
    /// Produces: `"context: original message"`.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            RegistryError::Unavailable(msg) => RegistryError::Unavailable(format!("{ctx}: {msg}")),
            RegistryError::SerializationFailed(msg) => {
                RegistryError::SerializationFailed(format!("{ctx}: {msg}"))
            }
            RegistryError::InvalidRecord(msg) => RegistryError::InvalidRecord(format!("{ctx}: {msg}")),
            RegistryError::Config(msg) => RegistryError::Config(format!("{ctx}: {msg}")),
        }
    }

    /// Fold any failure into `SerializationFailed`, keeping the cause text.
    ///
    /// Serializers use this so a registry miss or an invalid decoded record
    /// still reaches the caller as a single serialization failure.
    pub fn into_serialization(self) -> Self {
        match self {
            RegistryError::SerializationFailed(_) => self,
            other => RegistryError::SerializationFailed(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(e: serde_json::Error) -> Self {
        Self::serialization(e)
    }
}

impl From<std::str::Utf8Error> for RegistryError {
    fn from(e: std::str::Utf8Error) -> Self {
        Self::serialization(e)
    }
}

impl From<toml::de::Error> for RegistryError {
    fn from(e: toml::de::Error) -> Self {
        RegistryError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_context_keeps_variant() {
        let err = RegistryError::Unavailable("timeout".into()).with_context("get schema 'A'");
        assert_eq!(err, RegistryError::Unavailable("get schema 'A': timeout".into()));
    }

    #[test]
    fn into_serialization_wraps_cause_text() {
        let err = RegistryError::Unavailable("not found".into()).into_serialization();
        match err {
            RegistryError::SerializationFailed(msg) => {
                assert!(msg.contains("registry unavailable"));
                assert!(msg.contains("not found"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn into_serialization_is_identity_for_serialization_errors() {
        let err = RegistryError::SerializationFailed("eof".into());
        assert_eq!(err.clone().into_serialization(), err);
    }

    #[test]
    fn utf8_error_is_serialization_failure() {
        let bytes: Vec<u8> = vec![0xff, 0xfe];
        let err: RegistryError = std::str::from_utf8(&bytes).unwrap_err().into();
        assert!(matches!(err, RegistryError::SerializationFailed(_)));
    }
}
