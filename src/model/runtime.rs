//! Process-wide ONNX Runtime context.

use crate::error::{Error, Result};

/// Handle to the initialized ONNX Runtime environment.
///
/// Construct one before creating any [`crate::Classifier`]. Classifiers borrow
/// the runtime, so it cannot be dropped while one is still alive. Log messages
/// emitted by ONNX Runtime are forwarded to `tracing` under the `ort` target.
#[derive(Debug)]
pub struct Runtime {
    name: String,
}

impl Runtime {
    /// Initialize the ONNX Runtime environment under `name`.
    ///
    /// Only the first initialization in a process configures the environment;
    /// later calls reuse it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Environment`] if ONNX Runtime cannot create its environment.
    pub fn init(name: &str) -> Result<Self> {
        let created = ort::init()
            .with_name(name)
            .commit()
            .map_err(|source| Error::Environment {
                name: name.to_string(),
                source,
            })?;

        if created {
            tracing::debug!("Created ONNX Runtime environment {name:?}");
        } else {
            tracing::debug!("ONNX Runtime environment already initialized, reusing it for {name:?}");
        }

        Ok(Self {
            name: name.to_string(),
        })
    }

    /// Name the environment was registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
