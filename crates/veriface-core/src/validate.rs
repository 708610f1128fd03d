//! Image usability gate.

use image::DynamicImage;

/// Smallest accepted pixel dimension (exclusive).
pub const MIN_DIMENSION: u32 = 64;

/// Largest accepted pixel dimension (exclusive).
pub const MAX_DIMENSION: u32 = 4096;

/// Check that an image is usable for classification.
///
/// Both dimensions must be strictly greater than [`MIN_DIMENSION`] and
/// strictly less than [`MAX_DIMENSION`]. Decoded images carry physical pixel
/// dimensions, so no separate scale factor applies. This runs once at the
/// top of the pipeline; a failure short-circuits before any classifier.
pub fn validate(image: &DynamicImage) -> bool {
    let (width, height) = (image.width(), image.height());
    width > MIN_DIMENSION
        && width < MAX_DIMENSION
        && height > MIN_DIMENSION
        && height < MAX_DIMENSION
}
