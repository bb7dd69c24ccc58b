// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! - Listing available cameras
//! - Taking a photo without the UI
//! - Running the effect pipeline on an existing image

use snapcam::backends::camera::{LiveCamera, PreviewPipeline, camera_at, enumerate_cameras};
use snapcam::backends::{FolderGallery, FrameCapture, ImageEffects};
use snapcam::config::Config;
use snapcam::constants;
use snapcam::errors::AppResult;
use snapcam::services::{CaptureService, GalleryService, ImageEffectService, PhotoReference};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// List all available cameras
pub fn list_cameras() -> AppResult<()> {
    let cameras = enumerate_cameras();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {}", index, camera.name);
        println!("      Device: {}", camera.path);
    }

    Ok(())
}

/// Take a photo with the camera at `camera_index`, optionally adding it to the gallery
pub fn take_photo(
    config: &Config,
    camera_index: usize,
    save: bool,
) -> AppResult<()> {
    gstreamer::init()?;

    let cameras = enumerate_cameras();
    let camera = camera_at(&cameras, camera_index)?;
    println!("Using camera: {}", camera.name);

    let live = LiveCamera::new();
    let _pipeline = PreviewPipeline::new(Some(camera), live.clone())?;

    // Let auto-exposure settle before grabbing a frame
    let start = Instant::now();
    let timeout = Duration::from_secs(5);
    let warmup = Duration::from_millis(500);
    while !live.is_live() || start.elapsed() < warmup {
        if start.elapsed() > timeout {
            return Err("Timed out waiting for camera frames".into());
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let photo = runtime.block_on(FrameCapture::new(live).capture(constants::capture_options()))?;
    println!("Captured: {}", photo);

    if save {
        let gallery = FolderGallery::new(&config.save_folder_name);
        runtime.block_on(gallery.persist(photo))?;
        println!("Saved to: {}", gallery.folder().display());
    }

    Ok(())
}

/// Run the resize + rotate effect on `input`
pub fn apply_effect(input: PathBuf) -> AppResult<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let edited = runtime.block_on(ImageEffects::new().transform(
        PhotoReference::from(input),
        constants::effect_ops(),
        constants::effect_encoding(),
    ))?;
    println!("Edited: {}", edited);
    Ok(())
}
