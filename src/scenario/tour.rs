//! Built-in walkthrough
//!
//! The states documented for the stock UI: home, the settings, help and
//! search panels, then one and several sounds playing.

use crate::scenario::step::{Scenario, Step};

/// Selector of the search input opened by the Search button
pub const SEARCH_FIELD: &str = "#searchField";

pub fn default_tour() -> Scenario {
    Scenario::new(vec![
        Step::capture("home"),
        Step::panel("Settings", "settings"),
        Step::panel("Help", "help"),
        Step::Panel {
            button: "Search".to_string(),
            name: "search".to_string(),
            steps: vec![Step::Type {
                selector: SEARCH_FIELD.to_string(),
                text: "Example".to_string(),
            }],
            region: None,
            dismiss_key: None,
            settle_ms: Some(500),
        },
        Step::play(1),
        Step::capture("playing"),
        Step::Play {
            id: 2,
            length_in_ms: 8000,
            read_in_ms: 1000,
        },
        Step::Play {
            id: 3,
            length_in_ms: 3000,
            read_in_ms: 2700,
        },
        Step::capture("playing-multiple"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tour_is_valid() {
        let tour = default_tour();
        tour.validate().unwrap();
        assert_eq!(
            tour.state_names(),
            ["home", "settings", "help", "search", "playing", "playing-multiple"]
        );
    }

    #[test]
    fn test_shipped_default_scenario_matches() {
        let shipped = Scenario::from_toml(include_str!("../../scenarios/default.toml")).unwrap();
        assert_eq!(shipped, default_tour());
    }

    #[test]
    fn test_shipped_extended_scenario_is_valid() {
        let extended = Scenario::from_toml(include_str!("../../scenarios/extended.toml")).unwrap();
        assert!(extended.state_names().contains(&"launchpad"));
    }
}
