//! Image-to-tensor preprocessing.
//!
//! Both classifiers consume the same 224×224 NCHW float tensor with ImageNet
//! channel statistics. The numeric contract here is load-bearing: a change in
//! normalization order or channel layout shifts every downstream confidence.

use crate::error::LivenessError;
use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array4;

/// Input edge length expected by both the occlusion and liveness models.
pub const INPUT_SIZE: u32 = 224;

/// ImageNet per-channel mean (RGB).
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// ImageNet per-channel standard deviation (RGB).
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Convert an image into a normalized `(1, 3, H, W)` channel-major tensor.
///
/// The image is resized to exactly `target_w × target_h` (skipped when the
/// source already matches), each 8-bit sample is scaled to `[0, 1]` and then
/// shifted by `(value - mean[c]) / std[c]`.
///
/// A zero-sized source or target is a data-validity failure, not a model
/// failure.
pub fn preprocess(
    image: &DynamicImage,
    target_w: u32,
    target_h: u32,
    mean: [f32; 3],
    std: [f32; 3],
) -> Result<Array4<f32>, LivenessError> {
    if target_w == 0 || target_h == 0 || image.width() == 0 || image.height() == 0 {
        return Err(LivenessError::InvalidInput);
    }

    let rgb = if image.width() == target_w && image.height() == target_h {
        image.to_rgb8()
    } else {
        image
            .resize_exact(target_w, target_h, FilterType::Triangle)
            .to_rgb8()
    };

    let mut tensor = Array4::<f32>::zeros((1, 3, target_h as usize, target_w as usize));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            let scaled = f32::from(pixel[c]) / 255.0;
            tensor[[0, c, y as usize, x as usize]] = (scaled - mean[c]) / std[c];
        }
    }

    Ok(tensor)
}
