//! Custom error types for mnist-ort.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the mnist-ort library.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to decode an image file.
    #[error("failed to decode image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Image dimensions do not match the model input.
    #[error("unsupported image dimensions {width}x{height}: {reason}")]
    UnsupportedDimensions {
        width: u32,
        height: u32,
        reason: String,
    },

    /// No model file could be located.
    #[error("model not found: {path}")]
    ModelNotFound { path: PathBuf },

    /// Failed to download a model.
    #[error("failed to download model {name}: {source}")]
    ModelDownload {
        name: String,
        #[source]
        source: reqwest::Error,
    },

    /// Failed to load an ONNX model.
    #[error("failed to load ONNX model {path}: {source}")]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: ort::Error,
    },

    /// Failed to initialize the ONNX Runtime environment.
    #[error("failed to initialize ONNX Runtime environment {name}: {source}")]
    Environment {
        name: String,
        #[source]
        source: ort::Error,
    },

    /// Model inference failed.
    #[error("model inference failed during {stage}: {source}")]
    Inference {
        stage: &'static str,
        #[source]
        source: ort::Error,
    },

    /// Failed to create cache directory.
    #[error("failed to create cache directory {path}: {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Model inputs or outputs do not have the expected shape.
    #[error("tensor shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
}

/// Result type alias for mnist-ort operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message() {
        let err = Error::ShapeMismatch {
            expected: "10 scores".to_string(),
            actual: "4 values".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "tensor shape mismatch: expected 10 scores, got 4 values"
        );
    }

    #[test]
    fn test_dimensions_message() {
        let err = Error::UnsupportedDimensions {
            width: 32,
            height: 30,
            reason: "expected 28x28".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unsupported image dimensions 32x30: expected 28x28"
        );
    }

    #[test]
    fn test_environment_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::Environment {
            name: "mnist-ort".to_string(),
            source: ort::Error::new("no runtime library"),
        };
        assert!(err.to_string().starts_with("failed to initialize ONNX Runtime environment mnist-ort"));
        assert!(err.source().is_some());
    }
}
