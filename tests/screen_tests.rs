// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the camera screen controller
//!
//! Services are replaced by stubs that record their calls. Tasks returned by
//! `update` are run to completion and their messages fed back, the same way
//! the COSMIC and terminal front ends drive the screen.

use futures::FutureExt;
use snapcam::errors::{CaptureError, PermissionError, PersistError, TransformError};
use snapcam::screen::{
    CameraScreen, Message, NoticeKind, Notification, Operation, PermissionState, Screen, Task,
    UiMode,
};
use snapcam::services::{
    CaptureOptions, CaptureService, EffectOp, EncodeOptions, GalleryService, ImageEffectService,
    PermissionService, PermissionStatus, PhotoReference, SaveFormat, ServiceFuture, Services,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

// ===== Stubs =====

struct StubPermission {
    query: Result<PermissionStatus, PermissionError>,
    request: Result<PermissionStatus, PermissionError>,
    requests: Mutex<usize>,
}

impl PermissionService for StubPermission {
    fn query(&self) -> ServiceFuture<PermissionStatus, PermissionError> {
        futures::future::ready(self.query.clone()).boxed()
    }

    fn request(&self) -> ServiceFuture<PermissionStatus, PermissionError> {
        *self.requests.lock().unwrap() += 1;
        futures::future::ready(self.request.clone()).boxed()
    }
}

/// Hands out queued results, then numbered photos
#[derive(Default)]
struct StubCapture {
    queued: Mutex<VecDeque<Result<PhotoReference, CaptureError>>>,
    calls: Mutex<Vec<CaptureOptions>>,
}

impl CaptureService for StubCapture {
    fn capture(&self, options: CaptureOptions) -> ServiceFuture<PhotoReference, CaptureError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(options);
        let result = self
            .queued
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(PhotoReference::new(format!("photo-{}", calls.len()))));
        futures::future::ready(result).boxed()
    }
}

#[derive(Default)]
struct StubGallery {
    failure: Mutex<Option<PersistError>>,
    calls: Mutex<Vec<PhotoReference>>,
}

impl GalleryService for StubGallery {
    fn persist(&self, photo: PhotoReference) -> ServiceFuture<(), PersistError> {
        self.calls.lock().unwrap().push(photo);
        let result = match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        };
        futures::future::ready(result).boxed()
    }
}

/// Appends `-edited` to the input reference
#[derive(Default)]
struct StubEffects {
    failure: Mutex<Option<TransformError>>,
    calls: Mutex<Vec<(PhotoReference, Vec<EffectOp>, EncodeOptions)>>,
}

impl ImageEffectService for StubEffects {
    fn transform(
        &self,
        photo: PhotoReference,
        ops: Vec<EffectOp>,
        encode: EncodeOptions,
    ) -> ServiceFuture<PhotoReference, TransformError> {
        let edited = PhotoReference::new(format!("{}-edited", photo));
        self.calls.lock().unwrap().push((photo, ops, encode));
        let result = match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(edited),
        };
        futures::future::ready(result).boxed()
    }
}

struct Harness {
    screen: CameraScreen,
    notifications: broadcast::Receiver<Notification>,
    permission: Arc<StubPermission>,
    capture: Arc<StubCapture>,
    gallery: Arc<StubGallery>,
    effects: Arc<StubEffects>,
}

impl Harness {
    async fn new(granted: bool) -> Self {
        let status = if granted {
            PermissionStatus::GRANTED
        } else {
            PermissionStatus::DENIED
        };
        Self::with_permission(StubPermission {
            query: Ok(status),
            request: Ok(PermissionStatus::GRANTED),
            requests: Mutex::new(0),
        })
        .await
    }

    async fn with_permission(permission: StubPermission) -> Self {
        let permission = Arc::new(permission);
        let capture = Arc::new(StubCapture::default());
        let gallery = Arc::new(StubGallery::default());
        let effects = Arc::new(StubEffects::default());
        let services = Services {
            permission: permission.clone(),
            capture: capture.clone(),
            gallery: gallery.clone(),
            effects: effects.clone(),
        };

        let (screen, task) = CameraScreen::new(services);
        let notifications = screen.subscribe();
        let mut harness = Self {
            screen,
            notifications,
            permission,
            capture,
            gallery,
            effects,
        };
        harness.drive(task).await;
        harness
    }

    /// Granted screen with a live camera
    async fn live() -> Self {
        let mut harness = Self::new(true).await;
        harness.send(Message::CameraReady).await;
        harness
    }

    /// Run `task` and every task its messages produce
    async fn drive(&mut self, task: Task<Message>) {
        let mut pending = task.run().await;
        while !pending.is_empty() {
            let mut next = Vec::new();
            for message in pending {
                next.extend(self.screen.update(message).run().await);
            }
            pending = next;
        }
    }

    async fn send(&mut self, message: Message) {
        let task = self.screen.update(message);
        self.drive(task).await;
    }

    fn photo(&self) -> Option<&str> {
        self.screen.photo().map(PhotoReference::as_str)
    }

    fn drain_notifications(&mut self) -> Vec<Notification> {
        let mut received = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            received.push(notification);
        }
        received
    }
}

// ===== Permission =====

#[tokio::test]
async fn test_initial_query_granted_shows_live_view() {
    let harness = Harness::new(true).await;
    assert_eq!(harness.screen.permission(), PermissionState::Granted);
    assert_eq!(harness.screen.screen(), Screen::Capturing);
    assert_eq!(harness.screen.mode(), UiMode::Capture);
}

#[tokio::test]
async fn test_denied_then_request_grants() {
    let mut harness = Harness::new(false).await;
    assert_eq!(harness.screen.screen(), Screen::PermissionDenied);

    harness.send(Message::RequestPermission).await;

    assert_eq!(*harness.permission.requests.lock().unwrap(), 1);
    assert_eq!(harness.screen.permission(), PermissionState::Granted);
    assert_eq!(harness.screen.screen(), Screen::Capturing);
}

#[tokio::test]
async fn test_request_refused_stays_denied() {
    let mut harness = Harness::with_permission(StubPermission {
        query: Ok(PermissionStatus::DENIED),
        request: Ok(PermissionStatus::DENIED),
        requests: Mutex::new(0),
    })
    .await;

    harness.send(Message::RequestPermission).await;
    assert_eq!(harness.screen.screen(), Screen::PermissionDenied);
}

#[tokio::test]
async fn test_query_error_is_treated_as_denied() {
    let harness = Harness::with_permission(StubPermission {
        query: Err(PermissionError::Portal("no portal".into())),
        request: Ok(PermissionStatus::GRANTED),
        requests: Mutex::new(0),
    })
    .await;

    assert_eq!(harness.screen.permission(), PermissionState::Denied);
}

#[tokio::test]
async fn test_granted_is_final() {
    let mut harness = Harness::new(true).await;

    harness
        .send(Message::PermissionRequested(Ok(PermissionStatus::DENIED)))
        .await;
    harness
        .send(Message::PermissionQueried(Ok(PermissionStatus::DENIED)))
        .await;
    harness.send(Message::RequestPermission).await;

    assert_eq!(harness.screen.permission(), PermissionState::Granted);
    assert_eq!(*harness.permission.requests.lock().unwrap(), 0);
}

// ===== Capture =====

#[tokio::test]
async fn test_capture_before_camera_ready_is_ignored() {
    let mut harness = Harness::new(true).await;

    harness.send(Message::Capture).await;

    assert!(harness.capture.calls.lock().unwrap().is_empty());
    assert_eq!(harness.screen.mode(), UiMode::Capture);
}

#[tokio::test]
async fn test_capture_without_permission_is_ignored() {
    let mut harness = Harness::new(false).await;
    harness.send(Message::CameraReady).await;

    harness.send(Message::Capture).await;

    assert!(harness.capture.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_capture_enters_preview() {
    let mut harness = Harness::live().await;

    harness.send(Message::Capture).await;

    assert_eq!(harness.photo(), Some("photo-1"));
    assert_eq!(harness.screen.screen(), Screen::Previewing);

    let calls = harness.capture.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].quality, 0.8);
    assert!(!calls[0].skip_processing);
}

#[tokio::test]
async fn test_second_capture_while_pending_is_ignored() {
    let mut harness = Harness::live().await;

    let pending = harness.screen.update(Message::Capture);
    assert!(harness.screen.state().capturing);
    let ignored = harness.screen.update(Message::Capture);
    assert!(ignored.is_none());

    harness.drive(pending).await;
    assert!(!harness.screen.state().capturing);
    assert_eq!(harness.capture.calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_capture_failure_is_notified() {
    let mut harness = Harness::live().await;
    harness
        .capture
        .queued
        .lock()
        .unwrap()
        .push_back(Err(CaptureError::NoFrameAvailable));

    harness.send(Message::Capture).await;

    assert_eq!(harness.screen.mode(), UiMode::Capture);
    assert!(!harness.screen.state().capturing);
    assert_eq!(
        harness.drain_notifications(),
        vec![Notification::CaptureFailed(CaptureError::NoFrameAvailable)]
    );
}

#[tokio::test]
async fn test_camera_lost_blocks_capture() {
    let mut harness = Harness::live().await;
    harness.send(Message::CameraLost).await;

    harness.send(Message::Capture).await;

    assert!(harness.capture.calls.lock().unwrap().is_empty());
}

// ===== Preview =====

#[tokio::test]
async fn test_back_returns_to_live_view() {
    let mut harness = Harness::live().await;
    harness.send(Message::Capture).await;

    harness.send(Message::Back).await;

    assert_eq!(harness.photo(), None);
    assert_eq!(harness.screen.screen(), Screen::Capturing);
}

#[tokio::test]
async fn test_back_without_photo_is_noop() {
    let mut harness = Harness::live().await;

    let task = harness.screen.update(Message::Back);

    assert!(task.is_none());
    assert_eq!(harness.screen.screen(), Screen::Capturing);
    assert!(!harness.screen.is_processing());
}

#[tokio::test]
async fn test_save_and_effect_without_photo_are_noops() {
    let mut harness = Harness::live().await;

    assert!(harness.screen.update(Message::Save).is_none());
    assert!(harness.screen.update(Message::ApplyEffect).is_none());

    assert!(!harness.screen.is_processing());
    assert!(harness.gallery.calls.lock().unwrap().is_empty());
    assert!(harness.effects.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_save_holds_processing_flag_until_result() {
    let mut harness = Harness::live().await;
    harness.send(Message::Capture).await;

    let task = harness.screen.update(Message::Save);
    assert!(harness.screen.is_processing());
    assert_eq!(harness.screen.processing_operation(), Some(Operation::Save));

    harness.drive(task).await;

    assert!(!harness.screen.is_processing());
    assert_eq!(harness.photo(), Some("photo-1"));
    assert_eq!(
        *harness.gallery.calls.lock().unwrap(),
        vec![PhotoReference::new("photo-1")]
    );
    assert_eq!(
        harness.drain_notifications(),
        vec![Notification::PhotoSaved("photo-1".into())]
    );
}

#[tokio::test]
async fn test_save_failure_keeps_photo() {
    let mut harness = Harness::live().await;
    harness.send(Message::Capture).await;
    *harness.gallery.failure.lock().unwrap() = Some(PersistError::Storage("disk full".into()));

    let task = harness.screen.update(Message::Save);
    assert!(harness.screen.is_processing());
    harness.drive(task).await;

    assert_eq!(harness.photo(), Some("photo-1"));
    assert!(!harness.screen.is_processing());

    let notifications = harness.drain_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind(), NoticeKind::Failure);
    assert_eq!(
        notifications[0],
        Notification::SaveFailed {
            photo: "photo-1".into(),
            error: PersistError::Storage("disk full".into()),
        }
    );
}

#[tokio::test]
async fn test_effect_replaces_photo() {
    let mut harness = Harness::live().await;
    harness.send(Message::Capture).await;

    let task = harness.screen.update(Message::ApplyEffect);
    assert_eq!(
        harness.screen.processing_operation(),
        Some(Operation::Effect)
    );
    harness.drive(task).await;

    assert_eq!(harness.photo(), Some("photo-1-edited"));
    assert!(!harness.screen.is_processing());

    let calls = harness.effects.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (input, ops, encode) = &calls[0];
    assert_eq!(input.as_str(), "photo-1");
    assert_eq!(
        *ops,
        vec![
            EffectOp::Resize { width: 800 },
            EffectOp::Rotate { degrees: 90 }
        ]
    );
    assert_eq!(encode.quality, 0.8);
    assert_eq!(encode.format, SaveFormat::Jpeg);
}

#[tokio::test]
async fn test_effect_failure_keeps_photo() {
    let mut harness = Harness::live().await;
    harness.send(Message::Capture).await;
    *harness.effects.failure.lock().unwrap() =
        Some(TransformError::DecodeFailed("truncated".into()));

    harness.send(Message::ApplyEffect).await;

    assert_eq!(harness.photo(), Some("photo-1"));
    assert!(!harness.screen.is_processing());
    assert!(matches!(
        harness.drain_notifications().as_slice(),
        [Notification::EffectFailed { .. }]
    ));
}

#[tokio::test]
async fn test_one_operation_at_a_time() {
    let mut harness = Harness::live().await;
    harness.send(Message::Capture).await;

    let save = harness.screen.update(Message::Save);
    assert!(harness.screen.update(Message::ApplyEffect).is_none());
    assert!(harness.screen.update(Message::Save).is_none());
    harness.drive(save).await;

    assert_eq!(harness.gallery.calls.lock().unwrap().len(), 1);
    assert!(harness.effects.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_effect_result_after_back_is_dropped() {
    let mut harness = Harness::live().await;
    harness.send(Message::Capture).await;

    let effect = harness.screen.update(Message::ApplyEffect);
    harness.send(Message::Back).await;
    harness.drive(effect).await;

    assert_eq!(harness.photo(), None);
    assert_eq!(harness.screen.screen(), Screen::Capturing);
    assert!(!harness.screen.is_processing());
    assert!(harness.drain_notifications().is_empty());
}

#[tokio::test]
async fn test_effect_result_for_replaced_photo_is_dropped() {
    let mut harness = Harness::live().await;
    harness.send(Message::Capture).await;

    let effect = harness.screen.update(Message::ApplyEffect);
    harness.send(Message::Back).await;
    harness.send(Message::Capture).await;
    assert_eq!(harness.photo(), Some("photo-2"));

    harness.drive(effect).await;

    assert_eq!(harness.photo(), Some("photo-2"));
    assert_eq!(harness.screen.screen(), Screen::Previewing);
    assert!(!harness.screen.is_processing());
    assert!(
        !harness
            .drain_notifications()
            .iter()
            .any(|n| matches!(n, Notification::EffectApplied(_)))
    );

    // The new photo is free for its own operations
    harness.send(Message::ApplyEffect).await;
    assert_eq!(harness.photo(), Some("photo-2-edited"));
}

#[tokio::test]
async fn test_running_operation_not_shown_on_next_photo() {
    let mut harness = Harness::live().await;
    harness.send(Message::Capture).await;

    let save = harness.screen.update(Message::Save);
    assert_eq!(harness.screen.operation_on_photo(), Some(Operation::Save));

    harness.send(Message::Back).await;
    harness.send(Message::Capture).await;
    assert_eq!(harness.screen.operation_on_photo(), None);
    assert!(harness.screen.is_processing());
    assert!(harness.screen.update(Message::ApplyEffect).is_none());

    harness.drive(save).await;
    assert!(!harness.screen.is_processing());
    assert_eq!(harness.photo(), Some("photo-2"));
}

#[tokio::test]
async fn test_save_result_after_back_is_still_reported() {
    let mut harness = Harness::live().await;
    harness.send(Message::Capture).await;

    let save = harness.screen.update(Message::Save);
    harness.send(Message::Back).await;
    harness.drive(save).await;

    assert_eq!(harness.photo(), None);
    assert!(!harness.screen.is_processing());
    assert_eq!(
        harness.drain_notifications(),
        vec![Notification::PhotoSaved("photo-1".into())]
    );
}

#[tokio::test]
async fn test_photo_tracks_latest_capture_or_effect() {
    let mut harness = Harness::live().await;

    harness.send(Message::Capture).await;
    assert_eq!(harness.photo(), Some("photo-1"));

    harness.send(Message::Save).await;
    assert_eq!(harness.photo(), Some("photo-1"));

    harness.send(Message::ApplyEffect).await;
    assert_eq!(harness.photo(), Some("photo-1-edited"));

    harness.send(Message::Save).await;
    assert_eq!(harness.photo(), Some("photo-1-edited"));

    harness.send(Message::Back).await;
    harness.send(Message::Capture).await;
    assert_eq!(harness.photo(), Some("photo-2"));

    assert_eq!(
        *harness.gallery.calls.lock().unwrap(),
        vec![
            PhotoReference::new("photo-1"),
            PhotoReference::new("photo-1-edited")
        ]
    );
}

#[tokio::test]
async fn test_capture_ignored_while_previewing() {
    let mut harness = Harness::live().await;
    harness.send(Message::Capture).await;

    assert!(harness.screen.update(Message::Capture).is_none());
    assert_eq!(harness.capture.calls.lock().unwrap().len(), 1);
}
