// SPDX-License-Identifier: MPL-2.0

//! Storage locations for captured, edited and saved photos
//!
//! Captures and effect results are scratch files kept in the cache
//! directory. Only photos the user saves end up in the Pictures folder.

use std::path::{Path, PathBuf};
use tracing::info;

/// Application directory name under the cache dir
const CACHE_DIR_NAME: &str = "snapcam";

/// Get the gallery directory (~/Pictures/<folder_name>)
pub fn get_photo_directory(folder_name: &str) -> PathBuf {
    dirs::picture_dir()
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            Path::new(&home).join("Pictures")
        })
        .join(folder_name)
}

fn cache_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(CACHE_DIR_NAME)
}

/// Directory for freshly captured photos
pub fn get_capture_directory() -> PathBuf {
    cache_root().join("captures")
}

/// Directory for effect results
pub fn get_effect_directory() -> PathBuf {
    cache_root().join("effects")
}

/// Build a timestamped file name, e.g. `IMG_20250101_120000_1a2b3c4d.jpg`
///
/// The random suffix keeps names unique when several photos are taken
/// within the same second.
pub fn timestamped_file_name(prefix: &str, extension: &str) -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}.{}", prefix, timestamp, &suffix[..8], extension)
}

/// Name for a derived file next to `source`'s stem, e.g. `IMG_x-edited-1a2b3c4d.jpg`
pub fn derived_file_name(source: &Path, tag: &str, extension: &str) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}.{}", stem, tag, &suffix[..8], extension)
}

/// Remove scratch files older than `max_age` from the cache directories
///
/// Returns the number of files removed.
pub fn prune_scratch_files(max_age: std::time::Duration) -> usize {
    let mut removed = 0;
    for dir in [get_capture_directory(), get_effect_directory()] {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let expired = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .and_then(|t| t.elapsed().ok())
                .is_some_and(|age| age > max_age);
            if expired && std::fs::remove_file(entry.path()).is_ok() {
                removed += 1;
            }
        }
    }
    if removed > 0 {
        info!(removed, "Pruned old scratch photos");
    }
    removed
}
