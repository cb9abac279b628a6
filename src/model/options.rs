//! ONNX Runtime session options.

use std::fmt;
use std::str::FromStr;

use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};

use crate::error::{Error, Result};

/// Graph optimization levels applied when the session is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptimizationLevel {
    /// Disable all optimizations.
    Disable,
    /// Constant folding and redundant node elimination.
    Basic,
    /// Basic plus complex node fusions.
    Extended,
    /// Every optimization, including layout transformations.
    #[default]
    All,
}

impl OptimizationLevel {
    const fn to_ort(self) -> GraphOptimizationLevel {
        match self {
            Self::Disable => GraphOptimizationLevel::Disable,
            Self::Basic => GraphOptimizationLevel::Level1,
            Self::Extended => GraphOptimizationLevel::Level2,
            Self::All => GraphOptimizationLevel::Level3,
        }
    }
}

impl FromStr for OptimizationLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "disable" | "none" => Ok(Self::Disable),
            "basic" => Ok(Self::Basic),
            "extended" => Ok(Self::Extended),
            "all" => Ok(Self::All),
            other => Err(Error::InvalidParameter {
                name: "optimization_level".to_string(),
                reason: format!("unknown level {other:?}, expected disable, basic, extended or all"),
            }),
        }
    }
}

impl fmt::Display for OptimizationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disable => "disable",
            Self::Basic => "basic",
            Self::Extended => "extended",
            Self::All => "all",
        };
        f.write_str(name)
    }
}

/// Options used to build an inference session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Graph optimization level.
    pub optimization_level: OptimizationLevel,

    /// Size of the runtime's intra-op thread pool. `None` lets ONNX Runtime decide.
    pub intra_threads: Option<usize>,
}

impl SessionOptions {
    /// Validate the options.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread count is zero.
    pub fn validate(&self) -> Result<()> {
        if self.intra_threads == Some(0) {
            return Err(Error::InvalidParameter {
                name: "intra_threads".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Apply the options to a session builder.
    pub(crate) fn apply(
        &self,
        builder: SessionBuilder,
    ) -> std::result::Result<SessionBuilder, ort::Error> {
        let mut builder = builder.with_optimization_level(self.optimization_level.to_ort())?;
        if let Some(threads) = self.intra_threads {
            builder = builder.with_intra_threads(threads)?;
        }
        Ok(builder)
    }
}
