// src/client/image_encoder.rs
// DOCUMENTATION: Client-side image encoding
// PURPOSE: Shrink attached photos into JPEG data URLs before upload

use crate::errors::BookingError;
use crate::models::ImagePayload;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Longest side and JPEG quality for one encoding pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub max_size: u32,
    pub quality: u8,
}

pub const ISSUE_PHOTO: EncodeOptions = EncodeOptions { max_size: 800, quality: 60 };
pub const REDUCED_PHOTO: EncodeOptions = EncodeOptions { max_size: 400, quality: 40 };
pub const PAYMENT_SCREENSHOT: EncodeOptions = EncodeOptions { max_size: 1200, quality: 70 };

/// Most issue photos one booking may carry
pub const MAX_IMAGES: usize = 6;

/// Roughly what a browser session store holds
pub const DEFAULT_PAYLOAD_BUDGET: usize = 5 * 1024 * 1024;

/// Encode an image file as a JPEG data URL, downscaling to `max_size`
pub fn compress_to_data_url(bytes: &[u8], options: EncodeOptions) -> Result<String, BookingError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| BookingError::Validation(format!("Unreadable image: {}", e)))?;

    let (width, height) = img.dimensions();
    let scale = (options.max_size as f64 / width.max(height) as f64).min(1.0);
    let img = if scale < 1.0 {
        let w = ((width as f64 * scale).round() as u32).max(1);
        let h = ((height as f64 * scale).round() as u32).max(1);
        img.resize_exact(w, h, FilterType::Triangle)
    } else {
        img
    };

    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, options.quality))
        .map_err(|e| BookingError::Validation(format!("Image encoding failed: {}", e)))?;

    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(&buf)))
}

/// Encode issue photos, retrying once smaller when the batch exceeds `budget`
pub fn encode_issue_photos(
    files: &[(String, Vec<u8>)],
    budget: usize,
) -> Result<Vec<ImagePayload>, BookingError> {
    check_photo_count(files.len())?;

    let encode = |options: EncodeOptions| -> Result<Vec<ImagePayload>, BookingError> {
        files
            .iter()
            .map(|(name, bytes)| {
                Ok(ImagePayload {
                    name: name.clone(),
                    data: Some(compress_to_data_url(bytes, options)?),
                })
            })
            .collect()
    };

    let images = encode(ISSUE_PHOTO)?;
    if payload_size(&images) <= budget {
        return Ok(images);
    }

    log::warn!("Encoded photos exceed {} bytes, retrying with smaller images", budget);
    let images = encode(REDUCED_PHOTO)?;
    if payload_size(&images) <= budget {
        return Ok(images);
    }

    Err(BookingError::Validation(
        "Photos are too large to upload, please attach fewer images".to_string(),
    ))
}

/// Reject more than `MAX_IMAGES` issue photos
pub fn check_photo_count(count: usize) -> Result<(), BookingError> {
    if count > MAX_IMAGES {
        return Err(BookingError::Validation(format!(
            "You can attach at most {} photos",
            MAX_IMAGES
        )));
    }
    Ok(())
}

fn payload_size(images: &[ImagePayload]) -> usize {
    images
        .iter()
        .map(|i| i.data.as_ref().map(String::len).unwrap_or(0))
        .sum()
}
