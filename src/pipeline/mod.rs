//! Digit classification pipeline: inference and class selection.

mod classifier;
mod config;
#[cfg(test)]
mod fixtures;
pub mod select;

pub use classifier::Classifier;
pub use config::Config;
pub use select::{argmax, softmax, Prediction, Scores, NUM_CLASSES};
