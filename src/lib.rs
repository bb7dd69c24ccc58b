// SPDX-License-Identifier: MPL-2.0

//! Snapcam - a minimal camera screen for the COSMIC desktop
//!
//! Take a photo, then go back, save it to the gallery or apply a quick
//! resize-and-rotate effect.
//!
//! # Architecture
//!
//! - [`screen`]: the UI-agnostic camera screen controller and its state machine
//! - [`services`]: capability traits the controller depends on
//! - [`backends`]: platform implementations (GStreamer, XDG portal, `image`)
//! - [`app`]: COSMIC front end
//! - [`terminal`]: terminal front end
//! - [`config`]: user configuration handling
//! - [`storage`]: file locations and naming

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod i18n;
pub mod screen;
pub mod services;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use app::{AppModel, Message};
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use screen::CameraScreen;
