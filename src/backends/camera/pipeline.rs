// SPDX-License-Identifier: MPL-2.0

//! GStreamer live preview pipeline
//!
//! `<source> ! decodebin ! videoconvert ! video/x-raw,format=RGBA ! appsink`
//!
//! Every decoded frame is published to a [`LiveCamera`]; the pipeline runs
//! until it is dropped.

use super::LiveCamera;
use super::types::{BackendError, BackendResult, CameraDevice, CameraFrame};
use crate::constants::{preview, timing};
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error, info, warn};

/// Running preview pipeline
pub struct PreviewPipeline {
    pipeline: gstreamer::Pipeline,
}

impl PreviewPipeline {
    /// Build and start the pipeline for `device` (or the system default)
    pub fn new(device: Option<&CameraDevice>, live: LiveCamera) -> BackendResult<Self> {
        gstreamer::init().map_err(|e| BackendError::NotAvailable(e.to_string()))?;

        let description = pipeline_description(device);
        info!(pipeline = %description, "Creating preview pipeline");

        let pipeline = gstreamer::parse::launch(&description)
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?
            .downcast::<gstreamer::Pipeline>()
            .map_err(|_| {
                BackendError::InitializationFailed("Failed to downcast to Pipeline".into())
            })?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| BackendError::InitializationFailed("Failed to get appsink".into()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| BackendError::InitializationFailed("Failed to cast appsink".into()))?;

        appsink.set_property("emit-signals", true);
        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", preview::MAX_BUFFERS);
        appsink.set_property("drop", true);
        appsink.set_property("enable-last-sample", false);

        let frame_counter = Arc::new(AtomicU64::new(0));
        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_num = frame_counter.fetch_add(1, Ordering::Relaxed);
                    let sample = appsink.pull_sample().map_err(|_| gstreamer::FlowError::Eos)?;
                    let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;
                    let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;
                    let video_info =
                        VideoInfo::from_caps(caps).map_err(|_| gstreamer::FlowError::Error)?;
                    let map = buffer
                        .map_readable()
                        .map_err(|_| gstreamer::FlowError::Error)?;

                    let stride = video_info.stride()[0] as usize;
                    let Some(frame) = CameraFrame::from_rgba_strided(
                        video_info.width(),
                        video_info.height(),
                        stride,
                        map.as_slice(),
                    ) else {
                        if frame_num % preview::FRAME_LOG_INTERVAL == 0 {
                            warn!(frame = frame_num, "Dropping malformed frame");
                        }
                        return Ok(gstreamer::FlowSuccess::Ok);
                    };

                    if frame_num % preview::FRAME_LOG_INTERVAL == 0 {
                        debug!(
                            frame = frame_num,
                            width = frame.width,
                            height = frame.height,
                            "Preview frame"
                        );
                    }

                    live.publish(Arc::new(frame));
                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        pipeline.set_state(gstreamer::State::Playing).map_err(|e| {
            BackendError::InitializationFailed(format!("Failed to start pipeline: {}", e))
        })?;

        let (result, state, _pending) = pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::START_TIMEOUT_SECS,
        ));
        debug!(?result, ?state, "Pipeline state");
        if result.is_err() {
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(BackendError::InitializationFailed(
                "Pipeline failed to reach PLAYING".into(),
            ));
        }

        info!("Preview pipeline running");
        Ok(Self { pipeline })
    }

    /// Pop the next error posted on the bus, if any
    pub fn poll_error(&self) -> Option<String> {
        let bus = self.pipeline.bus()?;
        while let Some(msg) = bus.pop() {
            if let gstreamer::MessageView::Error(err) = msg.view() {
                return Some(err.error().to_string());
            }
        }
        None
    }
}

impl Drop for PreviewPipeline {
    fn drop(&mut self) {
        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            error!(error = %e, "Failed to stop preview pipeline");
        } else {
            info!("Preview pipeline stopped");
        }
    }
}

fn pipeline_description(device: Option<&CameraDevice>) -> String {
    let source = match device {
        Some(d) if !d.path.is_empty() => format!("v4l2src device={}", d.path),
        _ => "autovideosrc".to_string(),
    };
    format!(
        "{} ! decodebin ! videoconvert ! video/x-raw,format=RGBA ! appsink name=sink",
        source
    )
}
