use image::DynamicImage;

/// Convert to a single-channel 8-bit luminance image of the same size.
///
/// Alpha is dropped, so the result can always be written as JPEG.
pub fn grayscale(img: DynamicImage) -> DynamicImage {
    if matches!(img, DynamicImage::ImageLuma8(_)) {
        return img;
    }
    DynamicImage::ImageLuma8(img.to_luma8())
}
