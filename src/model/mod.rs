//! Model resolution, session configuration and runtime context.

mod loader;
mod options;
mod runtime;

pub use loader::{load_session, ModelCache, ModelSource, DEFAULT_MODEL_FILE};
pub use options::{OptimizationLevel, SessionOptions};
pub use runtime::Runtime;
