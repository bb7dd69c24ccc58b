// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use snapcam::Config;
use snapcam::constants::DEFAULT_SAVE_FOLDER;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert!(
        config.mirror_preview,
        "Mirror preview should be enabled by default"
    );
    assert_eq!(config.camera_path, None, "No camera should be pinned");
}

#[test]
fn test_config_default_save_folder() {
    let config = Config::default();
    assert_eq!(config.save_folder_name, DEFAULT_SAVE_FOLDER);
    assert!(!config.save_folder_name.contains('/'));
}
