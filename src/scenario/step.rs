//! Scenario model
//!
//! A scenario is a flat, ordered list of steps. It can be written as TOML,
//! one `[[step]]` table per step tagged by `action`:
//!
//! ```toml
//! [[step]]
//! action = "capture"
//! name = "home"
//!
//! [[step]]
//! action = "panel"
//! button = "Settings"
//! name = "settings"
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{Result, ShotError, Theme};

/// Length of a playing entry injected by a `play` step
pub const INJECTED_LENGTH_MS: u64 = 5000;
/// Progress of a playing entry injected by a `play` step
pub const INJECTED_READ_MS: u64 = 2500;

fn default_region_label() -> String {
    "region".to_string()
}

fn default_length() -> u64 {
    INJECTED_LENGTH_MS
}

fn default_read() -> u64 {
    INJECTED_READ_MS
}

/// Element captured in addition to the full viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// CSS selector of the element
    pub selector: String,
    /// Inserted between state name and theme in the file name
    #[serde(default = "default_region_label")]
    pub label: String,
}

/// One step of a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Capture the current state in both themes
    Capture {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        region: Option<Region>,
    },
    /// Click a button by its visible label
    Click { text: String },
    /// Type literal text into an input
    Type { selector: String, text: String },
    /// Press and release a key
    PressKey { key: String },
    /// Fixed pause
    Wait { ms: u64 },
    /// Apply a state-store mutation
    Commit {
        mutation: String,
        #[serde(default)]
        args: Vec<Value>,
    },
    /// Inject a playing entry straight into the store
    Play {
        id: u64,
        #[serde(default = "default_length")]
        length_in_ms: u64,
        #[serde(default = "default_read")]
        read_in_ms: u64,
    },
    /// Open a panel, run `steps`, capture it as `name`, then dismiss it
    Panel {
        button: String,
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        steps: Vec<Step>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        region: Option<Region>,
        /// Overrides the configured dismiss key
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dismiss_key: Option<String>,
        /// Pause after dismissing, in ms
        #[serde(default, skip_serializing_if = "Option::is_none")]
        settle_ms: Option<u64>,
    },
}

impl Step {
    pub fn capture(name: impl Into<String>) -> Self {
        Step::Capture {
            name: name.into(),
            region: None,
        }
    }

    /// A panel with no extra steps and default dismissal
    pub fn panel(button: impl Into<String>, name: impl Into<String>) -> Self {
        Step::Panel {
            button: button.into(),
            name: name.into(),
            steps: Vec::new(),
            region: None,
            dismiss_key: None,
            settle_ms: None,
        }
    }

    pub fn play(id: u64) -> Self {
        Step::Play {
            id,
            length_in_ms: INJECTED_LENGTH_MS,
            read_in_ms: INJECTED_READ_MS,
        }
    }

    /// State captured by this step, if any
    pub fn state_name(&self) -> Option<&str> {
        match self {
            Step::Capture { name, .. } | Step::Panel { name, .. } => Some(name),
            _ => None,
        }
    }

    fn region(&self) -> Option<&Region> {
        match self {
            Step::Capture { region, .. } | Step::Panel { region, .. } => region.as_ref(),
            _ => None,
        }
    }
}

/// Ordered list of steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

fn is_file_safe(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl Scenario {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Load and validate a scenario file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ShotError::scenario(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content)
            .map_err(|e| ShotError::scenario(format!("Failed to parse scenario: {}", e)))?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ShotError::scenario(format!("Failed to serialize scenario: {}", e)))
    }

    /// Every step in execution order, panel steps inlined before their panel
    fn flattened(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().flat_map(|step| {
            let nested: &[Step] = match step {
                Step::Panel { steps, .. } => steps,
                _ => &[],
            };
            nested.iter().chain(std::iter::once(step))
        })
    }

    /// Captured state names in capture order
    pub fn state_names(&self) -> Vec<&str> {
        self.flattened().filter_map(Step::state_name).collect()
    }

    /// File stems (without `.png`) a complete run produces, in order
    pub fn expected_files(&self, start: Theme) -> Vec<String> {
        let mut files = Vec::new();
        for step in self.flattened() {
            let Some(name) = step.state_name() else {
                continue;
            };
            for theme in [start, start.opposite()] {
                files.push(format!("{}-{}", name, theme));
                if let Some(region) = step.region() {
                    files.push(format!("{}-{}-{}", name, region.label, theme));
                }
            }
        }
        files
    }

    /// Check the scenario can run and produces distinct files
    pub fn validate(&self) -> Result<()> {
        if self.state_names().is_empty() {
            return Err(ShotError::scenario("Scenario captures no state"));
        }

        for step in &self.steps {
            check_step(step)?;
            if let Step::Panel { steps, .. } = step {
                for nested in steps {
                    if matches!(nested, Step::Panel { .. }) {
                        return Err(ShotError::scenario(
                            "A panel cannot open another panel; dismiss it first",
                        ));
                    }
                    check_step(nested)?;
                }
            }
        }

        let mut seen = HashSet::new();
        for file in self.expected_files(Theme::Dark) {
            if !seen.insert(file.clone()) {
                return Err(ShotError::scenario(format!(
                    "Two captures would both write {}.png",
                    file
                )));
            }
        }

        Ok(())
    }

    /// Keep only the captures of `states`; every other step stays. Fails on
    /// names the scenario does not capture.
    pub fn retain_states(&self, states: &[String]) -> Result<Self> {
        let known: HashSet<&str> = self.state_names().into_iter().collect();
        if let Some(unknown) = states.iter().find(|s| !known.contains(s.as_str())) {
            return Err(ShotError::scenario(format!(
                "Scenario has no state named '{}'",
                unknown
            )));
        }

        let wanted = |name: &str| states.iter().any(|s| s == name);
        let mut steps = Vec::new();

        for step in &self.steps {
            match step {
                Step::Capture { name, .. } if !wanted(name) => {}
                Step::Panel {
                    name, steps: nested, ..
                } if !wanted(name) => {
                    let keeps_nested = nested
                        .iter()
                        .filter_map(Step::state_name)
                        .any(|n| wanted(n));
                    if keeps_nested {
                        return Err(ShotError::scenario(format!(
                            "State '{}' lives inside panel '{}'; keep the panel too",
                            nested
                                .iter()
                                .filter_map(Step::state_name)
                                .find(|n| wanted(n))
                                .unwrap_or_default(),
                            name
                        )));
                    }
                }
                Step::Panel {
                    button,
                    name,
                    steps: nested,
                    region,
                    dismiss_key,
                    settle_ms,
                } => steps.push(Step::Panel {
                    button: button.clone(),
                    name: name.clone(),
                    steps: nested
                        .iter()
                        .filter(|s| s.state_name().map_or(true, |n| wanted(n)))
                        .cloned()
                        .collect(),
                    region: region.clone(),
                    dismiss_key: dismiss_key.clone(),
                    settle_ms: *settle_ms,
                }),
                other => steps.push(other.clone()),
            }
        }

        let filtered = Self { steps };
        filtered.validate()?;
        Ok(filtered)
    }
}

fn check_step(step: &Step) -> Result<()> {
    if let Some(name) = step.state_name() {
        if !is_file_safe(name) {
            return Err(ShotError::scenario(format!(
                "State name '{}' must be non-empty and use only letters, digits, '-' or '_'",
                name
            )));
        }
    }
    if let Some(region) = step.region() {
        if !is_file_safe(&region.label) {
            return Err(ShotError::scenario(format!(
                "Region label '{}' must be non-empty and use only letters, digits, '-' or '_'",
                region.label
            )));
        }
        if region.selector.trim().is_empty() {
            return Err(ShotError::scenario("Region selector must not be empty"));
        }
    }
    match step {
        Step::Click { text } | Step::Panel { button: text, .. } if text.trim().is_empty() => {
            Err(ShotError::scenario("Button label must not be empty"))
        }
        Step::Type { selector, .. } if selector.trim().is_empty() => {
            Err(ShotError::scenario("Input selector must not be empty"))
        }
        Step::PressKey { key } if key.is_empty() => {
            Err(ShotError::scenario("Key must not be empty"))
        }
        Step::Commit { mutation, .. } if mutation.trim().is_empty() => {
            Err(ShotError::scenario("Mutation name must not be empty"))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_panels() -> Scenario {
        Scenario::new(vec![
            Step::capture("home"),
            Step::panel("Settings", "settings"),
            Step::panel("Help", "help"),
        ])
    }

    #[test]
    fn test_parse_toml() {
        let scenario = Scenario::from_toml(
            r##"
            [[step]]
            action = "capture"
            name = "home"

            [[step]]
            action = "panel"
            button = "Search"
            name = "search"
            settle_ms = 500

            [[step.steps]]
            action = "type"
            selector = "#searchField"
            text = "Example"

            [[step]]
            action = "commit"
            mutation = "setDarkTheme"
            args = [false]

            [[step]]
            action = "play"
            id = 1

            [[step]]
            action = "capture"
            name = "playing"
            region = { selector = "#drawer", label = "drawer" }
            "##,
        )
        .unwrap();

        assert_eq!(scenario.steps.len(), 5);
        assert_eq!(
            scenario.steps[1],
            Step::Panel {
                button: "Search".into(),
                name: "search".into(),
                steps: vec![Step::Type {
                    selector: "#searchField".into(),
                    text: "Example".into(),
                }],
                region: None,
                dismiss_key: None,
                settle_ms: Some(500),
            }
        );
        assert_eq!(
            scenario.steps[2],
            Step::Commit {
                mutation: "setDarkTheme".into(),
                args: vec![json!(false)],
            }
        );
        assert_eq!(scenario.steps[3], Step::play(1));
        assert_eq!(scenario.state_names(), ["home", "search", "playing"]);
    }

    #[test]
    fn test_expected_files_pairs_themes() {
        let files = two_panels().expected_files(Theme::Dark);
        assert_eq!(
            files,
            [
                "home-dark",
                "home-light",
                "settings-dark",
                "settings-light",
                "help-dark",
                "help-light",
            ]
        );
        assert_eq!(two_panels().expected_files(Theme::Light)[0], "home-light");
    }

    #[test]
    fn test_region_doubles_files() {
        let scenario = Scenario::new(vec![Step::Capture {
            name: "playing".into(),
            region: Some(Region {
                selector: "#drawer".into(),
                label: "drawer".into(),
            }),
        }]);
        assert_eq!(
            scenario.expected_files(Theme::Dark),
            [
                "playing-dark",
                "playing-drawer-dark",
                "playing-light",
                "playing-drawer-light",
            ]
        );
    }

    #[test]
    fn test_rejects_duplicate_files() {
        let scenario = Scenario::new(vec![Step::capture("home"), Step::panel("Home", "home")]);
        assert!(matches!(scenario.validate(), Err(ShotError::Scenario(_))));

        let colliding = Scenario::new(vec![
            Step::capture("playing-drawer"),
            Step::Capture {
                name: "playing".into(),
                region: Some(Region {
                    selector: "#drawer".into(),
                    label: "drawer".into(),
                }),
            },
        ]);
        assert!(colliding.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_names_and_nesting() {
        assert!(Scenario::new(vec![Step::capture("../home")]).validate().is_err());
        assert!(Scenario::new(vec![Step::capture("")]).validate().is_err());
        assert!(Scenario::new(vec![Step::Click { text: "Go".into() }])
            .validate()
            .is_err());

        let nested = Scenario::new(vec![Step::Panel {
            button: "Settings".into(),
            name: "settings".into(),
            steps: vec![Step::panel("Help", "help")],
            region: None,
            dismiss_key: None,
            settle_ms: None,
        }]);
        assert!(nested.validate().is_err());
    }

    #[test]
    fn test_retain_states() {
        let scenario = Scenario::new(vec![
            Step::capture("home"),
            Step::panel("Settings", "settings"),
            Step::panel("Help", "help"),
            Step::play(1),
            Step::capture("playing"),
        ]);

        let filtered = scenario
            .retain_states(&["home".to_string(), "settings".to_string()])
            .unwrap();
        assert_eq!(filtered.state_names(), ["home", "settings"]);
        assert!(filtered.steps.contains(&Step::play(1)));
        assert!(!filtered
            .steps
            .iter()
            .any(|s| matches!(s, Step::Panel { name, .. } if name == "help")));

        assert!(matches!(
            scenario.retain_states(&["missing".to_string()]),
            Err(ShotError::Scenario(_))
        ));
    }

    #[test]
    fn test_toml_round_trip_of_panels() {
        let scenario = Scenario::new(vec![
            Step::capture("home"),
            Step::Panel {
                button: "Search".into(),
                name: "search".into(),
                steps: vec![Step::Type {
                    selector: "#searchField".into(),
                    text: "Example".into(),
                }],
                region: None,
                dismiss_key: None,
                settle_ms: Some(500),
            },
        ]);
        let text = scenario.to_toml().unwrap();
        assert_eq!(Scenario::from_toml(&text).unwrap(), scenario);
    }
}
