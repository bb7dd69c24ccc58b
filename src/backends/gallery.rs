// SPDX-License-Identifier: GPL-3.0-only

//! Gallery backed by a folder under the user's Pictures directory
//!
//! Clones share the target folder, so the app can retarget the gallery the
//! screen already holds when the configured folder changes.

use crate::constants::capture;
use crate::errors::PersistError;
use crate::services::{GalleryService, PhotoReference, ServiceFuture};
use crate::storage;
use futures::FutureExt;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::info;

/// [`GalleryService`] that copies photos into a folder
#[derive(Debug, Clone)]
pub struct FolderGallery {
    folder: Arc<RwLock<PathBuf>>,
}

impl FolderGallery {
    /// Gallery at `~/Pictures/<folder_name>`
    pub fn new(folder_name: &str) -> Self {
        Self::at(storage::get_photo_directory(folder_name))
    }

    pub fn at(folder: PathBuf) -> Self {
        Self {
            folder: Arc::new(RwLock::new(folder)),
        }
    }

    /// Current target folder
    pub fn folder(&self) -> PathBuf {
        match self.folder.read() {
            Ok(folder) => folder.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Send later photos to `folder`; affects every clone
    pub fn set_folder(&self, folder: PathBuf) {
        info!(folder = %folder.display(), "Gallery folder changed");
        match self.folder.write() {
            Ok(mut current) => *current = folder,
            Err(poisoned) => *poisoned.into_inner() = folder,
        }
    }

    /// Retarget to `~/Pictures/<folder_name>`
    pub fn set_folder_name(&self, folder_name: &str) {
        self.set_folder(storage::get_photo_directory(folder_name));
    }

    async fn copy_in(folder: PathBuf, photo: PhotoReference) -> Result<(), PersistError> {
        let source = photo.as_path();
        let exists = tokio::fs::try_exists(source)
            .await
            .map_err(|e| PersistError::Storage(e.to_string()))?;
        if !exists {
            return Err(PersistError::SourceMissing(photo.to_string()));
        }

        tokio::fs::create_dir_all(&folder)
            .await
            .map_err(|e| PersistError::Storage(e.to_string()))?;

        let extension = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("jpg");
        let target = folder.join(storage::timestamped_file_name(capture::FILE_PREFIX, extension));
        tokio::fs::copy(source, &target)
            .await
            .map_err(|e| PersistError::Storage(e.to_string()))?;

        info!(from = %photo, to = %target.display(), "Photo added to gallery");
        Ok(())
    }
}

impl GalleryService for FolderGallery {
    fn persist(&self, photo: PhotoReference) -> ServiceFuture<(), PersistError> {
        Self::copy_in(self.folder(), photo).boxed()
    }
}
