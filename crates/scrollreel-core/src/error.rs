/// Core error types for the scrollreel engine.
use std::path::PathBuf;

/// A specialized Result type for scrollreel operations.
pub type ScrollreelResult<T> = Result<T, ScrollreelError>;

/// Top-level error type encompassing all scrollreel subsystems.
#[derive(Debug, thiserror::Error)]
pub enum ScrollreelError {
    #[error("asset error: {message} ({path:?})")]
    Asset { message: String, path: PathBuf },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("config write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Other(String),
}

impl ScrollreelError {
    /// Create an asset error.
    pub fn asset(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        ScrollreelError::Asset {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create a render error.
    pub fn render(message: impl Into<String>) -> Self {
        ScrollreelError::Render(message.into())
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        ScrollreelError::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_error_display() {
        let err = ScrollreelError::asset("file not found", "/frames/frame_0001.jpg");
        assert!(err.to_string().contains("file not found"));
        assert!(err.to_string().contains("frame_0001.jpg"));
    }

    #[test]
    fn test_render_error_display() {
        let err = ScrollreelError::render("surface lost");
        assert_eq!(err.to_string(), "render error: surface lost");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ScrollreelError = io.into();
        assert!(matches!(err, ScrollreelError::Io(_)));
    }
}
