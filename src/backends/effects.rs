// SPDX-License-Identifier: GPL-3.0-only

//! Image effects with the `image` crate
//!
//! Operations run in order on the decoded photo; the result is re-encoded
//! into a new file in the effects cache directory. The source is untouched.

use super::encoding;
use crate::constants::effect;
use crate::errors::TransformError;
use crate::services::{EffectOp, EncodeOptions, ImageEffectService, PhotoReference, ServiceFuture};
use crate::storage;
use futures::FutureExt;
use image::DynamicImage;
use image::imageops::FilterType;
use std::path::PathBuf;
use tracing::{debug, info};

/// [`ImageEffectService`] running on a blocking worker thread
#[derive(Debug, Clone)]
pub struct ImageEffects {
    output_dir: PathBuf,
}

impl ImageEffects {
    pub fn new() -> Self {
        Self::with_output_dir(storage::get_effect_directory())
    }

    pub fn with_output_dir(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    async fn run(
        self,
        photo: PhotoReference,
        ops: Vec<EffectOp>,
        encode: EncodeOptions,
    ) -> Result<PhotoReference, TransformError> {
        validate(&ops)?;

        let source = photo.as_path().to_path_buf();
        let data = tokio::task::spawn_blocking(move || {
            let image = image::open(&source)?;
            debug!(
                width = image.width(),
                height = image.height(),
                "Decoded photo for effect"
            );
            let image = apply_ops(image, &ops)?;
            encoding::encode(&image, encode).map_err(TransformError::EncodeFailed)
        })
        .await
        .map_err(|e| TransformError::EncodeFailed(format!("Effect task error: {}", e)))??;

        let file_name =
            storage::derived_file_name(photo.as_path(), effect::FILE_SUFFIX, encode.format.extension());
        let path = encoding::write_file(&self.output_dir, &file_name, data)
            .await
            .map_err(|e| TransformError::EncodeFailed(e.to_string()))?;

        info!(from = %photo, to = %path.display(), "Effect written");
        Ok(PhotoReference::from(path))
    }
}

impl Default for ImageEffects {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageEffectService for ImageEffects {
    fn transform(
        &self,
        photo: PhotoReference,
        ops: Vec<EffectOp>,
        encode: EncodeOptions,
    ) -> ServiceFuture<PhotoReference, TransformError> {
        self.clone().run(photo, ops, encode).boxed()
    }
}

fn validate(ops: &[EffectOp]) -> Result<(), TransformError> {
    for op in ops {
        match *op {
            EffectOp::Resize { width: 0 } => return Err(TransformError::InvalidWidth(0)),
            EffectOp::Rotate { degrees } if degrees.rem_euclid(90) != 0 => {
                return Err(TransformError::UnsupportedRotation(degrees));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Apply `ops` in order
pub fn apply_ops(mut image: DynamicImage, ops: &[EffectOp]) -> Result<DynamicImage, TransformError> {
    for op in ops {
        image = match *op {
            EffectOp::Resize { width } => resize_to_width(&image, width)?,
            EffectOp::Rotate { degrees } => rotate(image, degrees)?,
        };
    }
    Ok(image)
}

fn resize_to_width(image: &DynamicImage, width: u32) -> Result<DynamicImage, TransformError> {
    if width == 0 {
        return Err(TransformError::InvalidWidth(width));
    }
    let height = (u64::from(image.height()) * u64::from(width))
        .checked_div(u64::from(image.width()))
        .unwrap_or(0)
        .max(1) as u32;
    Ok(image.resize_exact(width, height, FilterType::Triangle))
}

fn rotate(image: DynamicImage, degrees: i32) -> Result<DynamicImage, TransformError> {
    Ok(match degrees.rem_euclid(360) {
        0 => image,
        90 => image.rotate90(),
        180 => image.rotate180(),
        270 => image.rotate270(),
        _ => return Err(TransformError::UnsupportedRotation(degrees)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::SaveFormat;
    use image::{Rgb, RgbImage};

    fn sample(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([0, 128, 255])))
    }

    #[test]
    fn test_resize_keeps_aspect_ratio() {
        let out = apply_ops(sample(1600, 1200), &[EffectOp::Resize { width: 800 }]).unwrap();
        assert_eq!((out.width(), out.height()), (800, 600));
    }

    #[test]
    fn test_resize_then_rotate_swaps_dimensions() {
        let ops = [EffectOp::Resize { width: 800 }, EffectOp::Rotate { degrees: 90 }];
        let out = apply_ops(sample(1600, 1200), &ops).unwrap();
        assert_eq!((out.width(), out.height()), (600, 800));
    }

    #[test]
    fn test_negative_rotation_normalized() {
        let out = apply_ops(sample(4, 2), &[EffectOp::Rotate { degrees: -90 }]).unwrap();
        assert_eq!((out.width(), out.height()), (2, 4));
    }

    #[test]
    fn test_invalid_ops_rejected() {
        assert_eq!(
            validate(&[EffectOp::Rotate { degrees: 45 }]),
            Err(TransformError::UnsupportedRotation(45))
        );
        assert_eq!(
            validate(&[EffectOp::Resize { width: 0 }]),
            Err(TransformError::InvalidWidth(0))
        );
    }

    #[tokio::test]
    async fn test_transform_writes_new_file() {
        let dir = std::env::temp_dir().join(format!("snapcam-effects-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let source = dir.join("IMG_1.png");
        sample(1000, 500).save(&source).unwrap();

        let effects = ImageEffects::with_output_dir(dir.join("out"));
        let edited = effects
            .transform(
                PhotoReference::from(source.clone()),
                vec![EffectOp::Resize { width: 800 }, EffectOp::Rotate { degrees: 90 }],
                EncodeOptions {
                    quality: 0.8,
                    format: SaveFormat::Jpeg,
                },
            )
            .await
            .unwrap();

        assert_ne!(edited.as_path(), source.as_path());
        assert!(edited.as_str().contains("IMG_1-edited-"));
        let decoded = image::open(edited.as_path()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (400, 800));
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_undecodable_source_fails() {
        let effects = ImageEffects::with_output_dir(std::env::temp_dir());
        let result = effects
            .transform(
                PhotoReference::new("/nonexistent/IMG.jpg"),
                vec![EffectOp::Rotate { degrees: 90 }],
                crate::constants::effect_encoding(),
            )
            .await;
        assert!(matches!(result, Err(TransformError::DecodeFailed(_))));
    }

    #[tokio::test]
    async fn test_corrupt_source_fails_to_decode() {
        let dir = std::env::temp_dir().join(format!("snapcam-effects-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let source = dir.join("IMG_1.jpg");
        std::fs::write(&source, [0xFF, 0xD8, 0x00, 0x01, 0x02]).unwrap();

        let result = ImageEffects::with_output_dir(dir.join("out"))
            .transform(
                PhotoReference::from(source),
                vec![EffectOp::Resize { width: 800 }],
                crate::constants::effect_encoding(),
            )
            .await;
        assert!(matches!(result, Err(TransformError::DecodeFailed(_))));
        assert!(!dir.join("out").exists());
        std::fs::remove_dir_all(dir).ok();
    }
}
