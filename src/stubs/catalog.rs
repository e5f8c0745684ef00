//! Stub catalog - named backend stand-ins
//!
//! Maps every backend function name the UI calls to a deterministic answer.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::core::config::FixtureConfig;
use crate::core::{Result, ShotError};
use crate::stubs::fixtures;

/// How a stub produces its answer
#[derive(Debug, Clone, PartialEq)]
pub enum StubKind {
    /// Always the same value
    Constant(Value),
    /// Discards its arguments and answers null
    NoOp,
    /// The settings snapshot with configured overrides applied
    Settings,
    /// The procedurally generated tab catalog
    Tabs,
    /// Applications available for mixing
    PlaybackSources,
    /// The single output target
    Outputs,
    /// Playing descriptor for the sound id given as first argument
    PlaySound,
}

/// Registry of stubs, keyed by the name the page calls
#[derive(Debug, Clone)]
pub struct StubCatalog {
    stubs: BTreeMap<String, StubKind>,
    fixtures: FixtureConfig,
}

impl StubCatalog {
    /// Create the catalog with the built-in stubs plus configured constants
    pub fn new(fixtures: FixtureConfig) -> Self {
        let mut catalog = Self {
            stubs: BTreeMap::new(),
            fixtures,
        };

        catalog.register_feature_checks();
        catalog.register_data();
        catalog.register_neutral();

        // Configured constants win over built-ins
        let constants = catalog.fixtures.constants.clone();
        for (name, value) in constants {
            catalog.register(name, StubKind::Constant(value));
        }

        catalog
    }

    /// Feature-availability checks
    fn register_feature_checks(&mut self) {
        let linux = self.fixtures.linux;
        let youtube_dl = self.fixtures.youtube_dl;
        self.register("isYoutubeDLAvailable", StubKind::Constant(Value::Bool(youtube_dl)));
        self.register("isLinux", StubKind::Constant(Value::Bool(linux)));
        self.register("isSwitchOnConnectLoaded", StubKind::Constant(Value::Bool(false)));
    }

    fn register_data(&mut self) {
        self.register("getSettings", StubKind::Settings);
        self.register("getTabs", StubKind::Tabs);
        self.register("getPlayback", StubKind::PlaybackSources);
        self.register("getOutputs", StubKind::Outputs);
        self.register("playSound", StubKind::PlaySound);
    }

    /// Setters and getters with nothing interesting to say
    fn register_neutral(&mut self) {
        self.register("changeSettings", StubKind::NoOp);
        self.register("unloadSwitchOnConnect", StubKind::NoOp);
        self.register("stopSounds", StubKind::NoOp);
        self.register("updateCheck", StubKind::Constant(Value::Null));
        self.register("getHotkeySequence", StubKind::Constant(Value::String(String::new())));
        self.register("getFavorites", StubKind::Constant(Value::Array(Vec::new())));
    }

    /// Register or replace a stub
    pub fn register(&mut self, name: impl Into<String>, kind: StubKind) {
        self.stubs.insert(name.into(), kind);
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.stubs.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stubs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.stubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stubs.is_empty()
    }

    pub fn kind(&self, name: &str) -> Option<&StubKind> {
        self.stubs.get(name)
    }

    /// Answer a call from the page
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let kind = self
            .stubs
            .get(name)
            .ok_or_else(|| ShotError::UnknownStub(name.to_string()))?;

        match kind {
            StubKind::Constant(value) => Ok(value.clone()),
            StubKind::NoOp => Ok(Value::Null),
            StubKind::Settings => self.settings(),
            StubKind::Tabs => Ok(serde_json::to_value(fixtures::tabs(
                self.fixtures.tab_count,
                self.fixtures.sounds_per_tab,
            ))?),
            StubKind::PlaybackSources => Ok(serde_json::to_value(fixtures::playback_sources())?),
            StubKind::Outputs => Ok(serde_json::to_value(fixtures::outputs(
                &self.fixtures.output_name,
            ))?),
            StubKind::PlaySound => {
                let id = args.first().and_then(Value::as_u64).ok_or_else(|| {
                    ShotError::stub(format!(
                        "{} expects a sound id as first argument, got {:?}",
                        name, args
                    ))
                })?;
                Ok(serde_json::to_value(fixtures::play_sound(id))?)
            }
        }
    }

    /// Settings snapshot with overrides merged in
    fn settings(&self) -> Result<Value> {
        let mut value = serde_json::to_value(fixtures::settings(&self.fixtures.output_name))?;
        if let Value::Object(fields) = &mut value {
            for (key, override_value) in &self.fixtures.settings_overrides {
                fields.insert(key.clone(), override_value.clone());
            }
        }
        Ok(value)
    }
}

impl Default for StubCatalog {
    fn default() -> Self {
        Self::new(FixtureConfig::default())
    }
}
