// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use snapcam::constants::{self, jpeg_quality, timing};
use snapcam::services::EffectOp;

#[test]
fn test_capture_options() {
    let options = constants::capture_options();
    assert_eq!(options.quality, 0.8);
    assert!(
        !options.skip_processing,
        "Captures should wait for a processed frame"
    );
}

#[test]
fn test_effect_resizes_before_rotating() {
    let ops = constants::effect_ops();
    assert!(matches!(ops.first(), Some(EffectOp::Resize { width: 800 })));
    assert!(matches!(ops.last(), Some(EffectOp::Rotate { degrees: 90 })));
}

#[test]
fn test_jpeg_quality_is_monotonic() {
    let mut previous = 0u8;
    for step in 0..=10 {
        let quality = jpeg_quality(step as f32 / 10.0);
        assert!(quality >= previous, "Quality should never decrease");
        previous = quality;
    }
    assert_eq!(jpeg_quality(constants::effect_encoding().quality), 80);
}

#[test]
fn test_fresh_frame_wait_is_shorter_than_start_timeout() {
    assert!(timing::FRESH_FRAME_TIMEOUT.as_secs() < timing::START_TIMEOUT_SECS);
}
