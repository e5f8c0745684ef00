//! Fixture generators
//!
//! Pure functions building the canned backend data. Nothing is cached: every
//! call rebuilds the same values from its arguments.

use crate::core::types::{PlaybackSource, PlayingSound, Settings, Sound, Tab};

/// Length reported by `playSound`
pub const PLAY_LENGTH_MS: u64 = 500;
/// Progress reported by `playSound`
pub const PLAY_READ_MS: u64 = 250;

/// 32x32 application icon shared by every simulated application
pub const ICON_PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAACAAAAAgCAYAAABzenr0AAAABHNCSVQICAgIfAhkiAAABRhJREFUWIXll0mIXEUYx39fvdevu2emJzOTzKommURioiBOTIyiiPEgGkPigqDgyVvwoggiHjwGQXJzJ3hwkGDEJS6gQRRFXAKiCAnjlsk2E2OI9KTT4/RS9Xl4r7vfe90ZJYoeLCi6urb/v/7fUvXg/17kAscupOhfAvng6fsLG9f27/CNuwa1GdSBOlSthm1Lo6/xX8/T3xrXWl3NgQOHef72xz4unZfA27vuKty8fuwTT9xEcoP4pjYFFo279v5wzIIqqMXif/3RFJvvfOKLJgkTJ7Bp3dIHQ3AXLqJRSbVTgmpa3Y5q42nl6mvH7Y54nx9Xw2A3oSbasCG9RifQiIO2yKmG4x1BtWPbaPU6QuU1rYCos1nUJcGJyCR+06DaoXYgoYpzGhAzfUKBpk2JnzKyqcnC0quwfi/VXw6Qq51EYoC2exwzcj1ybhpOfQ71chO0qV4HpeIEUHWhQ4V/ohMLXLKFemEt1eJRVB2Zyx5AeoYhKIT71ebwyrPM/3YE0ztBsPJezMn9cPjVaI+4SsmSImBBvRZzFF2+HR25EaPQNbCO5HwNxcwug+wyugauBMDNn0LH78NJHvn+xZhS7QokokASoeZQ8WD0JkzQi8n2toOfp5iuYcTPIcu3Uq4HLUfuoEKCQDLGLQxchWR62gAWA4/PkUw3ZvRGypWYX6WWmuSiVMIZ3HhB4PESXHwTzikLVReSWNwEEbBzKAb6Lk+C2xq/T+9n4finCSLq6ixMv0/12IeRI7fG/KEJjOfjVKnVGqZolZQTRmEH0LMS8fOJU5cO7eHs1JuA0l8r07XqNgB+n9pD+dArGBw9lSLBpXe3NvVy+P1r0DPfoTjq1sUh23xAQwUsdC9HE5kOKsUjOOdQZ6kVp5v99bmjoQPjqBd/Jl38vkvxBAyKWdwJXSShRXNDbRv1rL4NYzy8IE/X+C3N/vyqLRg/wPh5gvGtbetM9xgiDiOKSd2/CROEp49mBIVWtzpEDLnRDYxun0SMh3jZ5nhmeD39W19DAfFz0RqLiAeABL14oql80EEBbV6vNjmvMkflyAfYczOYTFcCPFyn4OcQP4fOn8ROvwFzP6HOhhNcrQmuJH0gpYADjRT46WW0dzXSsxyCAsHStVSO7Wd+7hh+4WK83hWYXH+4rHoWPTuNlqYxQQHvos2QGwSto8UfYeoFWvfKIlEgEQFB0YXT6JcPU7noDjIrbsF0jZIZ2kD5h31UT3yGiGLEISgGh4ji+Xn8DY+jhXGk8hv8PAmH94JdIPnGOA+BuPSCInaezJFXKB6aRLID4OpotYRII55DYGl4d72E/WZn2K4VEWJPNBrX/CIEwsmJDjyBvrxSLJ8O02sT0EVhRagALnS0ahGJlBHVVvZr5JhFUrFaWy9p5IQavfXUWQyOJXnFNw5Ri8FiGmGFRcThoQiuaZaz8+6oph+qfxIF+uNM+T1V1eTrNqyeOArZkETj9BIR8XDNOJfI2Q6esLvPlOpfJUwQz7SdCGx+/OBbU8fPPeectW03Y3Ty7kDxjEOwIXADPGo3AK+4xLvsnl2z9/06V/skCZ4kkP4uEKDw0LbhiRvW9UwYEb/93QfOKXWrzROHfkHL1igZ38xse3Jm75pRf+SdRwd3j/WZW1FHqaLvje34ZVsbk1QxQAYI/kZtOLgZXmJGDj419HrppWGdfXb4XdJXwL9QpDvL4Lc7ByZnnxn8TwgAiAgD+x7pu5N//rvzr5MglXv+ANNZT+AVaZNqAAAAAElFTkSuQmCC";

/// The settings snapshot handed to the UI
pub fn settings(output_name: &str) -> Settings {
    Settings {
        output: output_name.to_string(),
        selected_tab: 0,
        allow_overlapping: true,
        dark_theme: true,
        stop_hotkey: Vec::new(),
        push_to_talk_keys: Vec::new(),
        sort_mode: 1,
        tab_hotkeys_only: false,
        launch_pad_mode: false,
        grid_view: false,
        minimize_to_tray: false,
        local_volume: 0.5,
        remote_volume: 1.0,
        use_as_default_device: false,
        mute_during_playback: false,
    }
}

pub fn sound(id: u64) -> Sound {
    Sound {
        id,
        name: format!("Example Sound {}", id),
        path: String::new(),
        modified_date: 0,
        hotkeys: Vec::new(),
        hotkey_sequence: String::new(),
    }
}

/// `tab_count` tabs of `sounds_per_tab` sounds each. Tab ids and sound ids
/// are dense from 1; sound ids restart in every tab.
pub fn tabs(tab_count: u64, sounds_per_tab: u64) -> Vec<Tab> {
    (1..=tab_count)
        .map(|id| Tab {
            id,
            name: format!("Tab {}", id),
            sounds: (1..=sounds_per_tab).map(sound).collect(),
        })
        .collect()
}

/// A playing entry for sound `id`
pub fn playing(id: u64, length_in_ms: u64, read_in_ms: u64) -> PlayingSound {
    PlayingSound {
        id,
        length_in_ms,
        read_in_ms,
        paused: false,
        repeat: false,
        sound: sound(id),
    }
}

/// What `playSound(id)` answers
pub fn play_sound(id: u64) -> PlayingSound {
    playing(id, PLAY_LENGTH_MS, PLAY_READ_MS)
}

fn application(name: &str) -> PlaybackSource {
    PlaybackSource {
        name: name.to_string(),
        application: name.to_string(),
        app_icon: ICON_PNG_BASE64.to_string(),
    }
}

/// Applications that can be mixed into the output
pub fn playback_sources() -> Vec<PlaybackSource> {
    vec![application("Firefox"), application("Spotify")]
}

/// The single simulated output target
pub fn outputs(output_name: &str) -> Vec<PlaybackSource> {
    vec![application(output_name)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabs_shape() {
        let tabs = tabs(5, 19);
        assert_eq!(tabs.len(), 5);
        for (i, tab) in tabs.iter().enumerate() {
            assert_eq!(tab.id, i as u64 + 1);
            assert_eq!(tab.name, format!("Tab {}", i + 1));
            assert_eq!(tab.sounds.len(), 19);
            let ids: Vec<u64> = tab.sounds.iter().map(|s| s.id).collect();
            assert_eq!(ids, (1..=19).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_tabs_are_regenerated_identically() {
        assert_eq!(tabs(3, 4), tabs(3, 4));
        assert!(tabs(0, 4).is_empty());
        assert!(tabs(2, 0).iter().all(|t| t.sounds.is_empty()));
    }

    #[test]
    fn test_sound_fixture() {
        let s = sound(7);
        assert_eq!(s.name, "Example Sound 7");
        assert!(s.path.is_empty());
        assert_eq!(s.modified_date, 0);
        assert!(s.hotkeys.is_empty());
        assert!(s.hotkey_sequence.is_empty());
    }

    #[test]
    fn test_play_sound_is_pure() {
        let first = play_sound(4);
        let second = play_sound(4);
        assert_eq!(first, second);
        assert_eq!(first.sound.id, 4);
        assert_eq!(first.sound.name, "Example Sound 4");
        assert_eq!(first.length_in_ms, 500);
        assert_eq!(first.read_in_ms, 250);
        assert!(!first.paused);
        assert!(!first.repeat);
    }

    #[test]
    fn test_settings_golden() {
        let value = serde_json::to_value(settings("Discord")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "output": "Discord",
                "selectedTab": 0,
                "allowOverlapping": true,
                "darkTheme": true,
                "stopHotkey": [],
                "pushToTalkKeys": [],
                "sortMode": 1,
                "tabHotkeysOnly": false,
                "launchPadMode": false,
                "gridView": false,
                "minimizeToTray": false,
                "localVolume": 0.5,
                "remoteVolume": 1.0,
                "useAsDefaultDevice": false,
                "muteDuringPlayback": false
            })
        );
    }

    #[test]
    fn test_applications() {
        let sources = playback_sources();
        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Firefox", "Spotify"]);
        assert!(sources.iter().all(|s| s.app_icon.starts_with("iVBORw0KGgo")));

        let outs = outputs("Discord");
        assert_eq!(outs.len(), 1);
        assert_eq!(outs[0].application, "Discord");
    }
}
