// SPDX-License-Identifier: MIT OR Apache-2.0
//! View configuration: layout metrics, colors and resource location.

use crate::error::Result;
use egui::Color32;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the resource directory next to the executable
pub const RESOURCE_DIR_NAME: &str = "Resources";

/// Colors used by the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Outlines, ticks and the time bar
    pub black: [u8; 3],
    /// Running play button
    pub red: [u8; 3],
    /// Idle play button
    pub light_gray: [u8; 3],
    /// Track background
    pub track: [u8; 3],
    /// Unselected keyframe
    pub keyframe: [u8; 3],
    /// Selected keyframe
    pub selected: [u8; 3],
    /// Loop region fill
    pub loop_region: [u8; 3],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            black: [0, 0, 0],
            red: [255, 0, 0],
            light_gray: [211, 211, 211],
            track: [230, 230, 230],
            keyframe: [90, 90, 90],
            selected: [255, 200, 100],
            loop_region: [100, 150, 255],
        }
    }
}

impl Palette {
    /// Convert a palette entry
    pub fn color(rgb: [u8; 3]) -> Color32 {
        Color32::from_rgb(rgb[0], rgb[1], rgb[2])
    }
}

/// Layout and resources of a timeline view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Drawing width in pixels
    pub width: f32,
    /// Height of one track
    pub track_height: f32,
    /// Size of the play and stop buttons
    pub button_size: f32,
    /// Height of the ruler strip
    pub ruler_height: f32,
    /// Width of popup menus
    pub menu_width: f32,
    /// Height of one menu entry
    pub menu_item_height: f32,
    /// Initial horizontal zoom
    pub pixels_per_second: f32,
    /// Icon directory; defaults to `Resources` next to the executable
    pub resource_dir: Option<PathBuf>,
    /// Colors
    pub colors: Palette,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            track_height: 50.0,
            button_size: 24.0,
            ruler_height: 18.0,
            menu_width: 100.0,
            menu_item_height: 18.0,
            pixels_per_second: 100.0,
            resource_dir: None,
            colors: Palette::default(),
        }
    }
}

impl ViewConfig {
    /// Parse from RON text
    pub fn from_ron(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Load from a RON file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_ron(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No view config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Vertical offset of the ruler group
    pub fn ruler_offset(&self) -> f32 {
        self.button_size + 9.0
    }

    /// Vertical offset of the track and overlay groups
    pub fn tracks_offset(&self) -> f32 {
        self.button_size + 30.0
    }

    /// Directory icons are loaded from
    pub fn resource_dir(&self) -> PathBuf {
        if let Some(dir) = &self.resource_dir {
            return dir.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(RESOURCE_DIR_NAME)))
            .unwrap_or_else(|| PathBuf::from(RESOURCE_DIR_NAME))
    }

    /// Full path of a resource file
    pub fn resource_path(&self, name: &str) -> PathBuf {
        self.resource_dir().join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = ViewConfig::from_ron("(track_height: 30.0, resource_dir: Some(\"icons\"))").unwrap();
        assert_eq!(config.track_height, 30.0);
        assert_eq!(config.width, 1000.0);
        assert_eq!(config.resource_path("PlayButton.svg"), PathBuf::from("icons/PlayButton.svg"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = ViewConfig::load(Path::new("/nonexistent/timeliner.ron")).unwrap();
        assert_eq!(config, ViewConfig::default());
    }

    #[test]
    fn test_bad_ron_is_error() {
        assert!(ViewConfig::from_ron("(track_height: \"tall\")").is_err());
    }

    #[test]
    fn test_default_resource_dir_name() {
        let dir = ViewConfig::default().resource_dir();
        assert!(dir.ends_with(RESOURCE_DIR_NAME));
    }

    #[test]
    fn test_offsets() {
        let config = ViewConfig::default();
        assert_eq!(config.ruler_offset(), 33.0);
        assert_eq!(config.tracks_offset(), 54.0);
    }
}
