//! Run configuration.

use std::path::PathBuf;

use crate::error::Result;
use crate::model::SessionOptions;

/// Configuration for a classification run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit model path. `None` falls back to `model.onnx` or the cached model.
    pub model: Option<PathBuf>,

    /// Whether a missing model may be downloaded into the cache.
    pub allow_download: bool,

    /// Resize images that are not 28x28 instead of rejecting them.
    pub resize: bool,

    /// Print raw scores and softmax confidence after the prediction.
    pub show_scores: bool,

    /// Session build options.
    pub session: SessionOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: None,
            allow_download: true,
            resize: false,
            show_scores: false,
            session: SessionOptions::default(),
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        self.session.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.allow_download);
        assert!(!config.resize);
    }

    #[test]
    fn test_zero_threads_invalid() {
        let mut config = Config::default();
        config.session.intra_threads = Some(0);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidParameter { .. })
        ));
    }
}
