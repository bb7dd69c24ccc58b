// SPDX-License-Identifier: GPL-3.0-only

//! Camera permission via the XDG desktop portal
//!
//! Querying never prompts: it checks whether a video device node is readable
//! and writable by this process. Requesting goes through
//! `org.freedesktop.portal.Camera.AccessCamera`, which shows the desktop's
//! consent dialog inside a sandbox. Outside a portal session the request
//! falls back to the device check.

use super::camera::enumerate_cameras;
use crate::errors::PermissionError;
use crate::services::{PermissionService, PermissionStatus, ServiceFuture};
use futures::{FutureExt, StreamExt};
use std::collections::HashMap;
use std::ffi::CString;
use tracing::{debug, info, warn};
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

const PORTAL_DESTINATION: &str = "org.freedesktop.portal.Desktop";
const PORTAL_PATH: &str = "/org/freedesktop/portal/desktop";
const CAMERA_INTERFACE: &str = "org.freedesktop.portal.Camera";
const REQUEST_INTERFACE: &str = "org.freedesktop.portal.Request";

/// [`PermissionService`] backed by the camera portal and device access checks
#[derive(Debug, Clone, Default)]
pub struct PortalPermission;

impl PortalPermission {
    pub fn new() -> Self {
        Self
    }

    fn device_status() -> PermissionStatus {
        let paths: Vec<String> = enumerate_cameras().into_iter().map(|c| c.path).collect();
        if any_device_accessible(&paths) {
            PermissionStatus::GRANTED
        } else {
            PermissionStatus::DENIED
        }
    }

    async fn request_access() -> Result<PermissionStatus, PermissionError> {
        match access_camera().await {
            Ok(status) => Ok(status),
            Err(e) => {
                warn!(error = %e, "Camera portal unavailable, checking device access");
                let status = tokio::task::spawn_blocking(Self::device_status)
                    .await
                    .map_err(|e| PermissionError::Device(e.to_string()))?;
                Ok(status)
            }
        }
    }
}

impl PermissionService for PortalPermission {
    fn query(&self) -> ServiceFuture<PermissionStatus, PermissionError> {
        async {
            let status = tokio::task::spawn_blocking(Self::device_status)
                .await
                .map_err(|e| PermissionError::Device(e.to_string()))?;
            debug!(granted = status.granted, "Camera permission queried");
            Ok(status)
        }
        .boxed()
    }

    fn request(&self) -> ServiceFuture<PermissionStatus, PermissionError> {
        Self::request_access().boxed()
    }
}

/// True when at least one of `paths` can be opened for reading and writing
pub(crate) fn any_device_accessible(paths: &[String]) -> bool {
    paths.iter().any(|path| {
        let Ok(c_path) = CString::new(path.as_str()) else {
            return false;
        };
        let result = unsafe { libc::access(c_path.as_ptr(), libc::R_OK | libc::W_OK) };
        result == 0
    })
}

/// Object path the portal will use for the request with `token`
pub(crate) fn request_path(unique_name: &str, token: &str) -> String {
    let sender = unique_name.trim_start_matches(':').replace('.', "_");
    format!("{}/request/{}/{}", PORTAL_PATH, sender, token)
}

async fn access_camera() -> Result<PermissionStatus, PermissionError> {
    let connection = zbus::Connection::session().await?;

    let camera = zbus::Proxy::new(
        &connection,
        PORTAL_DESTINATION,
        PORTAL_PATH,
        CAMERA_INTERFACE,
    )
    .await?;

    let present: bool = camera.get_property("IsCameraPresent").await?;
    if !present {
        info!("Portal reports no camera present");
        return Ok(PermissionStatus::DENIED);
    }

    let unique_name = connection
        .unique_name()
        .map(|name| name.to_string())
        .ok_or_else(|| PermissionError::Portal("Connection has no unique name".into()))?;
    let token = format!("snapcam_{}", uuid::Uuid::new_v4().simple());
    let path = request_path(&unique_name, &token);

    // Subscribe before calling so a fast response is not missed
    let request = zbus::Proxy::new(
        &connection,
        PORTAL_DESTINATION,
        path.as_str(),
        REQUEST_INTERFACE,
    )
    .await?;
    let mut responses = request.receive_signal("Response").await?;

    let mut options: HashMap<&str, Value<'_>> = HashMap::new();
    options.insert("handle_token", Value::from(token.as_str()));
    let handle: OwnedObjectPath = camera.call("AccessCamera", &(options,)).await?;
    debug!(handle = %handle, "Camera access requested");

    let message = responses
        .next()
        .await
        .ok_or_else(|| PermissionError::Portal("Request closed without a response".into()))?;
    let (response, _results): (u32, HashMap<String, OwnedValue>) =
        message.body().deserialize()?;

    let granted = response == 0;
    info!(response, granted, "Camera portal answered");
    Ok(PermissionStatus { granted })
}
