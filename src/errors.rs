// SPDX-License-Identifier: MPL-2.0

//! Error types for the camera screen and its platform services

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera device or pipeline errors
    Camera(String),
    /// Permission backend errors
    Permission(PermissionError),
    /// Photo capture errors
    Capture(CaptureError),
    /// Gallery persistence errors
    Persist(PersistError),
    /// Image effect errors
    Transform(TransformError),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Errors raised while checking or requesting camera access
///
/// A denied permission is not an error; it is reported as a status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// D-Bus or portal communication failed
    Portal(String),
    /// Device node inspection failed
    Device(String),
}

/// Photo capture errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The live camera has not produced a frame yet
    DeviceUnavailable,
    /// Timed out waiting for a fresh frame
    NoFrameAvailable,
    /// Frame could not be encoded
    EncodingFailed(String),
    /// Encoded photo could not be written
    SaveFailed(String),
}

/// Gallery persistence errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    /// Source photo does not exist anymore
    SourceMissing(String),
    /// Gallery directory could not be created or written
    Storage(String),
}

/// Image effect errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// Source photo could not be decoded
    DecodeFailed(String),
    /// Result could not be encoded or written
    EncodeFailed(String),
    /// Rotation is not a multiple of 90 degrees
    UnsupportedRotation(i32),
    /// Resize to a zero width
    InvalidWidth(u32),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(msg) => write!(f, "Camera error: {}", msg),
            AppError::Permission(e) => write!(f, "Permission error: {}", e),
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Persist(e) => write!(f, "Gallery error: {}", e),
            AppError::Transform(e) => write!(f, "Effect error: {}", e),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for PermissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionError::Portal(msg) => write!(f, "Camera portal failed: {}", msg),
            PermissionError::Device(msg) => write!(f, "Device check failed: {}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::DeviceUnavailable => write!(f, "Camera is not streaming"),
            CaptureError::NoFrameAvailable => write!(f, "No frame available for capture"),
            CaptureError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            CaptureError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::SourceMissing(path) => write!(f, "Photo not found: {}", path),
            PersistError::Storage(msg) => write!(f, "Could not write to gallery: {}", msg),
        }
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::DecodeFailed(msg) => write!(f, "Decoding failed: {}", msg),
            TransformError::EncodeFailed(msg) => write!(f, "Encoding failed: {}", msg),
            TransformError::UnsupportedRotation(deg) => {
                write!(f, "Unsupported rotation: {} degrees", deg)
            }
            TransformError::InvalidWidth(w) => write!(f, "Invalid resize width: {}", w),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for PermissionError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for PersistError {}
impl std::error::Error for TransformError {}

impl From<PermissionError> for AppError {
    fn from(err: PermissionError) -> Self {
        AppError::Permission(err)
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<PersistError> for AppError {
    fn from(err: PersistError) -> Self {
        AppError::Persist(err)
    }
}

impl From<TransformError> for AppError {
    fn from(err: TransformError) -> Self {
        AppError::Transform(err)
    }
}

impl From<crate::backends::camera::BackendError> for AppError {
    fn from(err: crate::backends::camera::BackendError) -> Self {
        AppError::Camera(err.to_string())
    }
}

impl From<gstreamer::glib::Error> for AppError {
    fn from(err: gstreamer::glib::Error) -> Self {
        AppError::Camera(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<zbus::Error> for PermissionError {
    fn from(err: zbus::Error) -> Self {
        PermissionError::Portal(err.to_string())
    }
}

impl From<image::ImageError> for TransformError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Encoding(e) => TransformError::EncodeFailed(e.to_string()),
            other => TransformError::DecodeFailed(other.to_string()),
        }
    }
}
