//! Error types for EasyEngine

use thiserror::Error;

/// The main error type for EasyEngine operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// A programming-contract violation, such as re-entering a scheduler pass
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A controller was asked to invoke a handler with no target bound
    #[error("Invalid target: no target object is bound to the controller")]
    InvalidTarget,

    #[error("Device creation failed: {0}")]
    DeviceCreation(String),

    #[error("Window creation failed: {0}")]
    WindowCreation(String),

    #[error("Graphics creation failed: {0}")]
    GraphicsCreation(String),

    #[error("Graphics error: {0}")]
    Graphics(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    /// A scheduled task panicked while the frame was being updated
    #[error("Task panicked: {0}")]
    TaskPanicked(String),
}

/// Result type alias for EasyEngine operations
pub type Result<T> = std::result::Result<T, EngineError>;

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::TomlParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::InvalidOperation("reentrant run".into());
        assert_eq!(err.to_string(), "Invalid operation: reentrant run");

        let err = EngineError::InvalidTarget;
        assert!(err.to_string().starts_with("Invalid target"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let parse: std::result::Result<toml::Table, _> = toml::from_str("not = = valid");
        let err: EngineError = parse.unwrap_err().into();
        assert!(matches!(err, EngineError::TomlParseError(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: EngineError = io.into();
        assert!(matches!(err, EngineError::IoError(_)));
    }
}
