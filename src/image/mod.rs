//! Digit image loading and normalization.

mod load;

pub use load::{image_to_tensor, load_digit};

use ndarray::Array4;

/// Digit tensor in NCHW format (1, 1, 28, 28).
/// Values are byte intensities divided by 255, so they lie in [0, 1].
pub type DigitTensor = Array4<f32>;

/// Width and height of an MNIST digit.
pub const DIGIT_SIZE: u32 = 28;

/// Number of pixels in one digit.
pub const DIGIT_PIXELS: usize = (DIGIT_SIZE * DIGIT_SIZE) as usize;
