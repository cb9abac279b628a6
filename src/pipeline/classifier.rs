//! Digit classifier backed by an ONNX Runtime session.

use std::path::Path;

use ndarray::Array4;
use ort::session::Session;
use ort::value::{TensorRef, ValueType};

use crate::error::{Error, Result};
use crate::image::{self, DigitTensor, DIGIT_SIZE};
use crate::model::{self, Runtime, SessionOptions};

use super::select::{Prediction, Scores, NUM_CLASSES};
use super::Config;

/// Expected model input shape (batch, channels, height, width).
#[allow(clippy::cast_lossless)]
const INPUT_SHAPE: [i64; 4] = [1, 1, DIGIT_SIZE as i64, DIGIT_SIZE as i64];

/// Runs the MNIST model on normalized digit tensors.
///
/// The classifier owns one input buffer and one score buffer, reused for every
/// call. `classify` takes `&mut self`, so at most one inference is in flight per
/// classifier; concurrent callers each need their own instance.
///
/// The classifier borrows the [`Runtime`] it was created with, which keeps the
/// environment alive for as long as the session exists.
pub struct Classifier<'rt> {
    runtime: &'rt Runtime,
    session: Session,
    input_name: String,
    output_name: String,
    input: DigitTensor,
    scores: [f32; NUM_CLASSES],
}

impl<'rt> Classifier<'rt> {
    /// Load the model at `model_path` and bind the input and output buffers.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded or does not take a
    /// single 1x1x28x28 input and produce a single 10-score output.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn new(
        runtime: &'rt Runtime,
        model_path: &Path,
        options: &SessionOptions,
    ) -> Result<Self> {
        options.validate()?;

        tracing::info!(
            "Loading model {} ({} runtime)",
            model_path.display(),
            runtime.name()
        );
        let session = model::load_session(model_path, options)?;

        let (input_name, output_name) = check_signature(&session)?;
        tracing::debug!("Model input {input_name:?}, output {output_name:?}");

        Ok(Self {
            runtime,
            session,
            input_name,
            output_name,
            input: Array4::zeros(INPUT_SHAPE.map(|d| d as usize)),
            scores: [0.0; NUM_CLASSES],
        })
    }

    /// Name of the model input node.
    #[must_use]
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Name of the model output node.
    #[must_use]
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Run one forward pass and select the predicted digit.
    ///
    /// # Errors
    ///
    /// Returns an error if the tensor has the wrong shape, or if the forward
    /// pass or output extraction fails.
    pub fn classify(&mut self, tensor: &DigitTensor) -> Result<Prediction> {
        if tensor.shape() != self.input.shape() {
            return Err(Error::ShapeMismatch {
                expected: format!("{:?}", self.input.shape()),
                actual: format!("{:?}", tensor.shape()),
            });
        }
        self.input.assign(tensor);

        let data = self.input.as_slice().ok_or_else(|| Error::ShapeMismatch {
            expected: "contiguous input buffer".to_string(),
            actual: "non-contiguous layout".to_string(),
        })?;
        let input_value = TensorRef::from_array_view((INPUT_SHAPE.to_vec(), data)).map_err(
            |source| Error::Inference {
                stage: "input binding",
                source,
            },
        )?;

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input_value])
            .map_err(|source| Error::Inference {
                stage: "forward pass",
                source,
            })?;

        let (_, values) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|source| Error::Inference {
                stage: "output extraction",
                source,
            })?;

        if values.len() != NUM_CLASSES {
            return Err(Error::ShapeMismatch {
                expected: format!("{NUM_CLASSES} scores"),
                actual: format!("{} values", values.len()),
            });
        }
        self.scores.copy_from_slice(values);

        let prediction = Prediction::from_scores(Scores(self.scores));
        tracing::debug!(
            "Scores {:?} -> {} ({} runtime)",
            self.scores,
            prediction.label,
            self.runtime.name()
        );

        Ok(prediction)
    }

    /// Load an image file and classify it.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding or inference fails.
    pub fn classify_path<P: AsRef<Path>>(
        &mut self,
        path: P,
        config: &Config,
    ) -> Result<Prediction> {
        let path = path.as_ref();
        tracing::info!("Classifying {}", path.display());

        let tensor = image::load_digit(path, config.resize)?;
        self.classify(&tensor)
    }
}

/// Check that the model has one digit input and one 10-class output.
///
/// Returns the input and output names.
fn check_signature(session: &Session) -> Result<(String, String)> {
    let [input] = session.inputs.as_slice() else {
        return Err(Error::ShapeMismatch {
            expected: "1 model input".to_string(),
            actual: format!("{} inputs", session.inputs.len()),
        });
    };
    let [output] = session.outputs.as_slice() else {
        return Err(Error::ShapeMismatch {
            expected: "1 model output".to_string(),
            actual: format!("{} outputs", session.outputs.len()),
        });
    };

    if let ValueType::Tensor { shape, .. } = &input.input_type {
        let dims: Vec<i64> = shape.iter().copied().collect();
        check_input_dims(&dims)?;
    }
    if let ValueType::Tensor { shape, .. } = &output.output_type {
        let dims: Vec<i64> = shape.iter().copied().collect();
        check_output_dims(&dims)?;
    }

    Ok((input.name.clone(), output.name.clone()))
}

/// Input must be rank 4 and match 1x1x28x28, with -1 accepted for dynamic axes.
fn check_input_dims(dims: &[i64]) -> Result<()> {
    let compatible = dims.len() == INPUT_SHAPE.len()
        && dims
            .iter()
            .zip(INPUT_SHAPE)
            .all(|(&actual, expected)| actual < 0 || actual == expected);

    if compatible {
        Ok(())
    } else {
        Err(Error::ShapeMismatch {
            expected: format!("input {INPUT_SHAPE:?}"),
            actual: format!("input {dims:?}"),
        })
    }
}

/// Output must end in a 10-wide (or dynamic) class axis.
#[allow(clippy::cast_possible_wrap)]
fn check_output_dims(dims: &[i64]) -> Result<()> {
    match dims.last() {
        Some(&last) if last < 0 || last == NUM_CLASSES as i64 => Ok(()),
        _ => Err(Error::ShapeMismatch {
            expected: format!("output [1, {NUM_CLASSES}]"),
            actual: format!("output {dims:?}"),
        }),
    }
}
