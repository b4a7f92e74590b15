use image::DynamicImage;
use image::imageops::FilterType;
use ndarray::Array4;
use std::path::Path;

use crate::error::AnalysisError;

/// Decodes an image file and prepares it for a classifier trained at
/// `target` (width, height).
pub fn load_input_tensor(path: &Path, target: (u32, u32)) -> Result<Array4<f32>, AnalysisError> {
    let img = image::open(path).map_err(|source| AnalysisError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(normalize(&img, target))
}

/// Resizes to exactly `target` (no aspect-ratio preservation), scales u8
/// channels to [0,1] and wraps the result in a singleton batch of shape
/// `(1, height, width, 3)`.
pub fn normalize(img: &DynamicImage, target: (u32, u32)) -> Array4<f32> {
    let (width, height) = target;
    // Nearest-neighbour, matching the interpolation the models saw in training.
    let resized = img.resize_exact(width, height, FilterType::Nearest).to_rgb8();

    let mut tensor = Array4::<f32>::zeros((1, height as usize, width as usize, 3));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for channel in 0..3 {
            tensor[[0, y as usize, x as usize, channel]] = pixel[channel] as f32 / 255.0;
        }
    }
    tensor
}
