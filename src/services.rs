// SPDX-License-Identifier: GPL-3.0-only

//! Capability interfaces the camera screen talks to
//!
//! The screen never touches the camera, the gallery or the image codec
//! directly. Each concern sits behind one of these traits so the platform
//! implementations in [`crate::backends`] can be swapped for stubs in tests.
//!
//! Every call returns a `'static` boxed future: the screen hands it to its
//! event loop as a task and gets the result back as a message.

use crate::errors::{CaptureError, PermissionError, PersistError, TransformError};
use futures::future::BoxFuture;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Future returned by every service call
pub type ServiceFuture<T, E> = BoxFuture<'static, Result<T, E>>;

/// Opaque handle to an image on local storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhotoReference(String);

impl PhotoReference {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The reference interpreted as a filesystem path
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for PhotoReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhotoReference {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

impl From<PathBuf> for PhotoReference {
    fn from(path: PathBuf) -> Self {
        Self(path.to_string_lossy().into_owned())
    }
}

/// Outcome of a permission query or request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionStatus {
    pub granted: bool,
}

impl PermissionStatus {
    pub const GRANTED: Self = Self { granted: true };
    pub const DENIED: Self = Self { granted: false };
}

/// Parameters for a still capture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    /// Encoder quality in `[0, 1]`
    pub quality: f32,
    /// Take the current frame as-is instead of waiting for a processed one
    pub skip_processing: bool,
}

/// One step of an image effect pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectOp {
    /// Scale to `width`, keeping the aspect ratio
    Resize { width: u32 },
    /// Rotate clockwise by `degrees`
    Rotate { degrees: i32 },
}

/// Output format of an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveFormat {
    #[default]
    Jpeg,
    Png,
}

impl SaveFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            SaveFormat::Jpeg => "jpg",
            SaveFormat::Png => "png",
        }
    }
}

/// Encoder settings for an effect result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeOptions {
    /// Lossy quality in `[0, 1]`, ignored for PNG
    pub quality: f32,
    pub format: SaveFormat,
}

/// Camera access permission
pub trait PermissionService: Send + Sync {
    /// Current permission without prompting the user
    fn query(&self) -> ServiceFuture<PermissionStatus, PermissionError>;
    /// Ask the user for access; resolves once they answer
    fn request(&self) -> ServiceFuture<PermissionStatus, PermissionError>;
}

/// Still photo capture from the live camera
pub trait CaptureService: Send + Sync {
    fn capture(&self, options: CaptureOptions) -> ServiceFuture<PhotoReference, CaptureError>;
}

/// Device photo gallery
pub trait GalleryService: Send + Sync {
    fn persist(&self, photo: PhotoReference) -> ServiceFuture<(), PersistError>;
}

/// Image manipulation engine
pub trait ImageEffectService: Send + Sync {
    fn transform(
        &self,
        photo: PhotoReference,
        ops: Vec<EffectOp>,
        encode: EncodeOptions,
    ) -> ServiceFuture<PhotoReference, TransformError>;
}

/// The four services the screen depends on
#[derive(Clone)]
pub struct Services {
    pub permission: Arc<dyn PermissionService>,
    pub capture: Arc<dyn CaptureService>,
    pub gallery: Arc<dyn GalleryService>,
    pub effects: Arc<dyn ImageEffectService>,
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
