//! Image loading utilities.

use std::path::Path;

use image::{imageops::FilterType, GrayImage};
use ndarray::Array4;

use crate::error::{Error, Result};

use super::{DigitTensor, DIGIT_SIZE};

/// Load a digit image from disk and convert it to a normalized tensor.
///
/// The image is:
/// 1. Decoded from the specified path (any format supported by `image`)
/// 2. Converted to single-channel grayscale
/// 3. Resized to 28x28 if `resize` is set, rejected otherwise
/// 4. Normalized to [0, 1] by dividing each byte by 255
/// 5. Returned as NCHW tensor (1, 1, 28, 28)
///
/// # Errors
///
/// Returns [`Error::ImageLoad`] if the file cannot be read or decoded, and
/// [`Error::UnsupportedDimensions`] if the image is not 28x28 and `resize` is off.
pub fn load_digit<P: AsRef<Path>>(path: P, resize: bool) -> Result<DigitTensor> {
    let path = path.as_ref();

    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let mut gray = img.to_luma8();
    let (width, height) = gray.dimensions();
    tracing::debug!("Decoded {} ({width}x{height})", path.display());

    if (width, height) != (DIGIT_SIZE, DIGIT_SIZE) {
        if !resize {
            return Err(Error::UnsupportedDimensions {
                width,
                height,
                reason: format!("expected {DIGIT_SIZE}x{DIGIT_SIZE} (use --resize to scale)"),
            });
        }
        gray = image::imageops::resize(&gray, DIGIT_SIZE, DIGIT_SIZE, FilterType::Triangle);
    }

    Ok(image_to_tensor(&gray))
}

/// Convert a grayscale image to a normalized NCHW tensor, row-major.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn image_to_tensor(gray: &GrayImage) -> DigitTensor {
    let (width, height) = (gray.width() as usize, gray.height() as usize);

    Array4::from_shape_fn((1, 1, height, width), |(_, _, y, x)| {
        // Safe: x and y are bounded by the image dimensions, which came from u32
        f32::from(gray.get_pixel(x as u32, y as u32)[0]) / 255.0
    })
}
