//! Resize math and the crop/resize/encode pipeline for oversized images.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};

use crate::error::{AttachError, AttachResult};
use crate::mime::extension_for_mime;
use crate::model::{quality_for, CompressionGuidance, Dimensions};

/// Whether an image exceeds the console's declared maximum on either axis.
pub fn needs_resize(width: u32, height: u32, max: Option<Dimensions>) -> bool {
    match max {
        Some(max) => width > max.width || height > max.height,
        None => false,
    }
}

/// Largest dimensions fitting within `max` at the source aspect ratio.
///
/// Never upscales: a source already inside the bounds is returned unchanged.
/// When shrinking, the axis needing the larger shrink binds; one scale factor
/// applies to both axes, rounded to integer pixels.
pub fn calculate_resized_dimensions(width: u32, height: u32, max: Dimensions) -> Dimensions {
    if width <= max.width && height <= max.height {
        return Dimensions { width, height };
    }
    let scale = (max.width as f64 / width as f64).min(max.height as f64 / height as f64);
    Dimensions {
        width: ((width as f64 * scale).round() as u32).min(max.width),
        height: ((height as f64 * scale).round() as u32).min(max.height),
    }
}

/// Whether a file must (over the size cap) or should (server-declared
/// guidance other than `none`) go through compression.
pub fn should_compress(
    file_size: u64,
    max_file_size: Option<u64>,
    guidance: Option<CompressionGuidance>,
) -> bool {
    if max_file_size.is_some_and(|max| file_size > max) {
        return true;
    }
    matches!(
        guidance,
        Some(g) if g != CompressionGuidance::None
    )
}

/// Crop region in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// The "skip crop" rectangle: origin at zero, full natural dimensions.
    pub fn full_frame(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// Output of the crop/resize/encode pipeline.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// Original base filename with the target type's extension.
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub dimensions: Dimensions,
}

/// Read an image's natural dimensions without decoding the pixel data.
pub fn probe_dimensions(bytes: &[u8]) -> AttachResult<Dimensions> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(Dimensions { width, height })
}

/// Render a crop region to its final dimensions and encode it.
///
/// The final dimensions come from [`calculate_resized_dimensions`] applied to
/// the crop rectangle, not the full image. Resampling uses Lanczos3;
/// nearest-neighbor output is not acceptable for user-visible previews.
pub fn crop_resize_encode(
    source: &DynamicImage,
    original_name: &str,
    crop: CropRect,
    max: Option<Dimensions>,
    target_mime: &str,
    guidance: Option<CompressionGuidance>,
) -> AttachResult<EncodedImage> {
    // Clamp the rectangle to the source bounds before cropping.
    let x = crop.x.min(source.width());
    let y = crop.y.min(source.height());
    let width = crop.width.min(source.width() - x);
    let height = crop.height.min(source.height() - y);
    if width == 0 || height == 0 {
        return Err(AttachError::EmptyCropRegion);
    }

    let cropped = source.crop_imm(x, y, width, height);

    let target = match max {
        Some(max) => calculate_resized_dimensions(width, height, max),
        None => Dimensions { width, height },
    };
    let rendered = if target.width == width && target.height == height {
        cropped
    } else {
        cropped.resize_exact(target.width, target.height, FilterType::Lanczos3)
    };

    let bytes = encode_image(&rendered, target_mime, guidance)?;

    let base = match original_name.rsplit_once('.') {
        Some((base, _)) if !base.is_empty() => base,
        _ => original_name,
    };
    let extension = extension_for_mime(target_mime)
        .ok_or_else(|| AttachError::UnsupportedTargetType(target_mime.to_string()))?;

    Ok(EncodedImage {
        name: format!("{}.{}", base, extension),
        mime_type: target_mime.to_string(),
        bytes,
        dimensions: target,
    })
}

fn encode_image(
    image: &DynamicImage,
    target_mime: &str,
    guidance: Option<CompressionGuidance>,
) -> AttachResult<Vec<u8>> {
    let mut bytes = Vec::new();
    match target_mime {
        "image/jpeg" => {
            let quality = (quality_for(guidance) * 100.0).round() as u8;
            let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
            // JPEG has no alpha channel.
            encoder.encode_image(&image.to_rgb8())?;
        }
        "image/png" => {
            image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        }
        "image/webp" => {
            image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::WebP)?;
        }
        other => return Err(AttachError::UnsupportedTargetType(other.to_string())),
    }
    Ok(bytes)
}
