//! Shared types used across uishots modules
//!
//! The fixture shapes the UI under test expects from its backend, plus the
//! theme variants every state is captured in. Field names serialize in the
//! camelCase the UI reads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Snapshot returned by `getSettings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Selected output application name
    pub output: String,
    pub selected_tab: u32,
    pub allow_overlapping: bool,
    pub dark_theme: bool,
    pub stop_hotkey: Vec<u32>,
    pub push_to_talk_keys: Vec<u32>,
    pub sort_mode: u32,
    pub tab_hotkeys_only: bool,
    pub launch_pad_mode: bool,
    pub grid_view: bool,
    pub minimize_to_tray: bool,
    pub local_volume: f64,
    pub remote_volume: f64,
    pub use_as_default_device: bool,
    pub mute_during_playback: bool,
}

/// A synthetic sound entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sound {
    pub id: u64,
    pub name: String,
    /// Always empty; there is no file behind a fixture sound
    pub path: String,
    pub modified_date: u64,
    pub hotkeys: Vec<u32>,
    pub hotkey_sequence: String,
}

/// A tab of sounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: u64,
    pub name: String,
    pub sounds: Vec<Sound>,
}

/// An external application producing audio, as listed by `getPlayback` and
/// `getOutputs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSource {
    pub name: String,
    pub application: String,
    /// Base64 PNG icon, passed through to the page untouched
    pub app_icon: String,
}

/// A currently-playing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayingSound {
    pub id: u64,
    pub length_in_ms: u64,
    pub read_in_ms: u64,
    pub paused: bool,
    pub repeat: bool,
    pub sound: Sound,
}

/// Visual theme of the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    /// File name suffix for captures taken in this theme
    pub fn suffix(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// The other theme
    pub fn opposite(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Dark
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_opposite() {
        assert_eq!(Theme::Dark.opposite(), Theme::Light);
        assert_eq!(Theme::Light.opposite().opposite(), Theme::Light);
        assert!(Theme::default().is_dark());
    }

    #[test]
    fn test_sound_serializes_camel_case() {
        let sound = Sound {
            id: 3,
            name: "Example Sound 3".to_string(),
            path: String::new(),
            modified_date: 0,
            hotkeys: vec![],
            hotkey_sequence: String::new(),
        };
        let value = serde_json::to_value(&sound).unwrap();
        assert_eq!(value["modifiedDate"], 0);
        assert_eq!(value["hotkeySequence"], "");
        assert!(value.get("modified_date").is_none());
    }
}
