// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera enumeration
//!
//! Lists `/dev/video*` capture nodes. Names come from sysfs; metadata nodes
//! (sysfs `index` other than 0) are skipped so each camera appears once.

use super::types::{BackendError, BackendResult, CameraDevice};
use std::path::Path;
use tracing::{debug, info};

const DEV_DIR: &str = "/dev";
const SYSFS_V4L_DIR: &str = "/sys/class/video4linux";

/// Enumerate cameras, sorted by device node
pub fn enumerate_cameras() -> Vec<CameraDevice> {
    let cameras = enumerate_in(Path::new(DEV_DIR), Path::new(SYSFS_V4L_DIR));
    info!(count = cameras.len(), "Found cameras");
    cameras
}

pub(crate) fn enumerate_in(dev_dir: &Path, sysfs_dir: &Path) -> Vec<CameraDevice> {
    let Ok(entries) = std::fs::read_dir(dev_dir) else {
        debug!(dir = %dev_dir.display(), "Device directory not readable");
        return Vec::new();
    };

    let mut cameras: Vec<CameraDevice> = entries
        .flatten()
        .filter_map(|entry| {
            let node = entry.file_name().to_string_lossy().into_owned();
            if !is_video_node(&node) {
                return None;
            }

            let sysfs = sysfs_dir.join(&node);
            let index = read_trimmed(&sysfs.join("index"));
            if index.as_deref().is_some_and(|i| i != "0") {
                debug!(node, ?index, "Skipping secondary video node");
                return None;
            }

            let name = read_trimmed(&sysfs.join("name")).unwrap_or_else(|| node.clone());
            Some(CameraDevice {
                name,
                path: entry.path().to_string_lossy().into_owned(),
            })
        })
        .collect();

    cameras.sort_by_key(|c| node_number(&c.path));
    cameras
}

/// Pick the configured camera, or the first one
pub fn select_camera(cameras: &[CameraDevice], preferred: Option<&str>) -> Option<CameraDevice> {
    preferred
        .and_then(|path| cameras.iter().find(|c| c.path == path))
        .or_else(|| cameras.first())
        .cloned()
}

/// Camera at `index` as printed by `snapcam list`
pub fn camera_at(cameras: &[CameraDevice], index: usize) -> BackendResult<&CameraDevice> {
    match cameras.len() {
        0 => Err(BackendError::DeviceNotFound("No cameras found".into())),
        count => cameras.get(index).ok_or_else(|| {
            BackendError::DeviceNotFound(format!(
                "Camera index {} out of range (0-{})",
                index,
                count - 1
            ))
        }),
    }
}

fn is_video_node(name: &str) -> bool {
    name.strip_prefix("video")
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

fn node_number(path: &str) -> u32 {
    path.rsplit("video")
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(u32::MAX)
}

fn read_trimmed(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("snapcam-enum-{}-{}", tag, uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_enumerates_primary_nodes_in_order() {
        let dev = scratch_dir("dev");
        let sys = scratch_dir("sys");
        for (node, index, name) in [
            ("video10", "0", "USB Cam"),
            ("video2", "0", "Integrated Camera"),
            ("video3", "1", "Integrated Camera"),
        ] {
            fs::write(dev.join(node), b"").unwrap();
            fs::create_dir_all(sys.join(node)).unwrap();
            fs::write(sys.join(node).join("index"), format!("{index}\n")).unwrap();
            fs::write(sys.join(node).join("name"), format!("{name}\n")).unwrap();
        }
        fs::write(dev.join("video"), b"").unwrap();
        fs::write(dev.join("null"), b"").unwrap();

        let cameras = enumerate_in(&dev, &sys);
        let names: Vec<_> = cameras.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Integrated Camera", "USB Cam"]);
        assert!(cameras[0].path.ends_with("video2"));

        fs::remove_dir_all(dev).ok();
        fs::remove_dir_all(sys).ok();
    }

    #[test]
    fn test_select_prefers_configured_path() {
        let cameras = vec![
            CameraDevice {
                name: "A".into(),
                path: "/dev/video0".into(),
            },
            CameraDevice {
                name: "B".into(),
                path: "/dev/video2".into(),
            },
        ];
        assert_eq!(select_camera(&cameras, Some("/dev/video2")).unwrap().name, "B");
        assert_eq!(select_camera(&cameras, Some("/dev/video9")).unwrap().name, "A");
        assert!(select_camera(&[], None).is_none());
    }

    #[test]
    fn test_camera_index_out_of_range() {
        let cameras = vec![CameraDevice {
            name: "A".into(),
            path: "/dev/video0".into(),
        }];
        assert_eq!(camera_at(&cameras, 0).unwrap().name, "A");
        assert!(matches!(
            camera_at(&cameras, 3),
            Err(BackendError::DeviceNotFound(msg)) if msg.contains("(0-0)")
        ));
        assert!(matches!(
            camera_at(&[], 0),
            Err(BackendError::DeviceNotFound(_))
        ));
    }
}
