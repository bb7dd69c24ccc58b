// SPDX-License-Identifier: GPL-3.0-only

//! Image encoding shared by capture and effects

use crate::constants::jpeg_quality;
use crate::services::{EncodeOptions, SaveFormat};
use image::{DynamicImage, RgbImage};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Encode `image` according to `options`
pub fn encode(image: &DynamicImage, options: EncodeOptions) -> Result<Vec<u8>, String> {
    let data = match options.format {
        SaveFormat::Jpeg => encode_jpeg(&image.to_rgb8(), jpeg_quality(options.quality))?,
        SaveFormat::Png => encode_png(image)?,
    };
    debug!(size = data.len(), format = ?options.format, "Encoding complete");
    Ok(data)
}

/// Encode an RGB image as JPEG with quality 1 - 100
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, String> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);

    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality);
    encoder
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| format!("JPEG encoding failed: {}", e))?;

    Ok(buffer)
}

fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, String> {
    let mut buffer = Vec::new();
    image
        .write_to(
            &mut std::io::Cursor::new(&mut buffer),
            image::ImageFormat::Png,
        )
        .map_err(|e| format!("PNG encoding failed: {}", e))?;
    Ok(buffer)
}

/// Write `data` to `dir/file_name`, creating `dir` first
pub async fn write_file(dir: &Path, file_name: &str, data: Vec<u8>) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, data).await?;
    info!(path = %path.display(), "Image written");
    Ok(path)
}
