// SPDX-License-Identifier: GPL-3.0-only

//! Permission handlers
//!
//! Unknown resolves to Granted or Denied once the query answers. Denied may
//! become Granted after the user is asked. Granted is final for the session.

use crate::errors::PermissionError;
use crate::screen::state::PermissionState;
use crate::screen::{CameraScreen, Message, Task};
use crate::services::PermissionStatus;
use tracing::{debug, info, warn};

impl CameraScreen {
    pub(crate) fn query_permission(&self) -> Task<Message> {
        debug!("Querying camera permission");
        Task::perform(
            self.services.permission.query(),
            Message::PermissionQueried,
        )
    }

    pub(crate) fn handle_permission_queried(
        &mut self,
        result: Result<PermissionStatus, PermissionError>,
    ) -> Task<Message> {
        if self.state.permission == PermissionState::Granted {
            debug!("Permission already granted, ignoring query result");
            return Task::none();
        }

        self.state.permission = match result {
            Ok(status) if status.granted => {
                info!("Camera permission granted");
                PermissionState::Granted
            }
            Ok(_) => {
                info!("Camera permission denied");
                PermissionState::Denied
            }
            Err(e) => {
                warn!(error = %e, "Permission query failed, treating as denied");
                PermissionState::Denied
            }
        };
        Task::none()
    }

    /// Ask the user for camera access
    pub fn request_permission(&mut self) -> Task<Message> {
        if self.state.permission == PermissionState::Granted {
            debug!("Permission already granted, not prompting");
            return Task::none();
        }

        info!("Requesting camera permission");
        Task::perform(
            self.services.permission.request(),
            Message::PermissionRequested,
        )
    }

    pub(crate) fn handle_permission_requested(
        &mut self,
        result: Result<PermissionStatus, PermissionError>,
    ) -> Task<Message> {
        match result {
            Ok(status) if status.granted => {
                info!("Camera permission granted by user");
                self.state.permission = PermissionState::Granted;
            }
            Ok(_) => {
                info!("Camera permission request denied");
                if self.state.permission != PermissionState::Granted {
                    self.state.permission = PermissionState::Denied;
                }
            }
            Err(e) => {
                warn!(error = %e, "Permission request failed");
                if self.state.permission == PermissionState::Unknown {
                    self.state.permission = PermissionState::Denied;
                }
            }
        }
        Task::none()
    }
}
