//! # `mnist-ort`
//!
//! Classify handwritten digit images with a pre-trained MNIST model running on
//! ONNX Runtime.
//!
//! An image is decoded to 28x28 grayscale, normalized to `[0, 1]`, passed
//! through the model, and the highest of the ten class scores is reported.
//!
//! ## Example
//!
//! ```no_run
//! use mnist_ort::{Classifier, Config, ModelSource, Runtime};
//!
//! # fn main() -> mnist_ort::Result<()> {
//! let config = Config::default();
//! let runtime = Runtime::init("mnist-ort")?;
//! let model = ModelSource::resolve(config.model.as_deref(), config.allow_download)?;
//! let mut classifier = Classifier::new(&runtime, model.path(), &config.session)?;
//!
//! let prediction = classifier.classify_path("seven.png", &config)?;
//! println!("seven.png : {prediction}");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod image;
pub mod model;
pub mod pipeline;

pub use error::{Error, Result};
pub use model::{ModelSource, OptimizationLevel, Runtime, SessionOptions};
pub use pipeline::{Classifier, Config, Prediction, Scores};
