// SPDX-License-Identifier: GPL-3.0-only

//! Preview handlers
//!
//! Save and effect each hold the processing flag for the whole service call
//! and release it when the result arrives, success or not. Only one of them
//! may run at a time. Results carry the generation of the photo they were
//! started on; an effect result for a photo that is no longer held is
//! dropped instead of resurrecting it.

use crate::errors::{PersistError, TransformError};
use crate::screen::state::{InFlight, Operation};
use crate::screen::{CameraScreen, Message, Notification, Task};
use crate::services::PhotoReference;
use tracing::{debug, error, info, warn};

impl CameraScreen {
    /// Drop the held photo and return to the live view
    pub fn back(&mut self) -> Task<Message> {
        let Some(photo) = self.state.release() else {
            debug!("Back ignored, no photo held");
            return Task::none();
        };

        if let Some(in_flight) = self.state.processing {
            warn!(
                operation = ?in_flight.operation,
                "Leaving preview while an operation is running; its result will not be shown"
            );
        }
        info!(photo = %photo, "Returned to live view");
        Task::none()
    }

    /// Save the held photo to the gallery
    pub fn save(&mut self) -> Task<Message> {
        let Some((photo, generation)) = self.begin(Operation::Save) else {
            return Task::none();
        };

        info!(photo = %photo, "Saving photo to gallery");
        let result_photo = photo.clone();
        Task::perform(self.services.gallery.persist(photo), move |result| {
            Message::Saved {
                generation,
                photo: result_photo,
                result,
            }
        })
    }

    pub(crate) fn handle_saved(
        &mut self,
        generation: u64,
        photo: PhotoReference,
        result: Result<(), PersistError>,
    ) -> Task<Message> {
        self.finish(Operation::Save, generation);

        // Reported even when the photo is no longer on screen
        match result {
            Ok(()) => {
                info!(photo = %photo, "Photo saved to gallery");
                self.notifier.notify(Notification::PhotoSaved(photo));
            }
            Err(error) => {
                error!(photo = %photo, error = %error, "Failed to save photo");
                self.notifier
                    .notify(Notification::SaveFailed { photo, error });
            }
        }
        Task::none()
    }

    /// Run the fixed effect pipeline on the held photo
    pub fn apply_effect(&mut self) -> Task<Message> {
        let Some((photo, generation)) = self.begin(Operation::Effect) else {
            return Task::none();
        };

        info!(photo = %photo, ops = ?self.effect_ops, "Applying effect");
        let result_photo = photo.clone();
        Task::perform(
            self.services
                .effects
                .transform(photo, self.effect_ops.clone(), self.effect_encoding),
            move |result| Message::EffectApplied {
                generation,
                photo: result_photo,
                result,
            },
        )
    }

    pub(crate) fn handle_effect_applied(
        &mut self,
        generation: u64,
        photo: PhotoReference,
        result: Result<PhotoReference, TransformError>,
    ) -> Task<Message> {
        self.finish(Operation::Effect, generation);

        if !self.state.is_current(generation) {
            debug!(photo = %photo, ok = result.is_ok(), "Dropping effect result for a photo no longer held");
            return Task::none();
        }

        match result {
            Ok(edited) => {
                info!(from = %photo, to = %edited, "Effect applied");
                self.state.hold(edited.clone());
                self.notifier.notify(Notification::EffectApplied(edited));
            }
            Err(error) => {
                error!(photo = %photo, error = %error, "Failed to apply effect");
                self.notifier
                    .notify(Notification::EffectFailed { photo, error });
            }
        }
        Task::none()
    }

    /// Take the processing flag for `operation` on the held photo
    fn begin(&mut self, operation: Operation) -> Option<(PhotoReference, u64)> {
        let Some(held) = &self.state.photo else {
            debug!(?operation, "Ignored, no photo held");
            return None;
        };
        if let Some(in_flight) = self.state.processing {
            debug!(
                ?operation,
                running = ?in_flight.operation,
                "Ignored, another operation is running"
            );
            return None;
        }

        let started = (held.reference.clone(), held.generation);
        self.state.processing = Some(InFlight {
            operation,
            generation: held.generation,
        });
        Some(started)
    }

    /// Release the processing flag taken by `begin`
    fn finish(&mut self, operation: Operation, generation: u64) {
        match self.state.processing {
            Some(in_flight)
                if in_flight.operation == operation && in_flight.generation == generation =>
            {
                self.state.processing = None;
            }
            other => {
                warn!(?operation, generation, in_flight = ?other, "Result does not match the running operation");
            }
        }
    }
}
