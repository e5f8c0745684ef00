//! Scenario driver
//!
//! Executes a scenario step by step against a `Session`. Each themed capture
//! takes the start theme, flips the store to the other theme, captures again,
//! and flips back, so every state ends as a dark/light pair.

use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use crate::browser::bridge::DISABLE_ANIMATIONS_CSS;
use crate::browser::Session;
use crate::core::config::UiConfig;
use crate::core::{Result, ShotError, Theme};
use crate::scenario::step::{Region, Scenario, Step};
use crate::stubs::fixtures;

/// Driver over one session
pub struct ScenarioDriver<'a, S: Session + ?Sized> {
    session: &'a mut S,
    ui: &'a UiConfig,
    captures: Vec<PathBuf>,
}

impl<'a, S: Session + ?Sized> ScenarioDriver<'a, S> {
    pub fn new(session: &'a mut S, ui: &'a UiConfig) -> Self {
        Self {
            session,
            ui,
            captures: Vec::new(),
        }
    }

    /// Freeze animations, let the first render settle, then put the store in
    /// the start theme. The page seeds its theme from the settings stub, which
    /// need not agree with `start_theme`.
    pub async fn prepare(&mut self) -> Result<()> {
        self.session.add_style(DISABLE_ANIMATIONS_CSS).await?;
        self.session
            .pause(Duration::from_millis(self.ui.settle_ms))
            .await?;
        self.set_theme(self.ui.start_theme).await
    }

    /// Run every step in order; the first failure ends the run
    pub async fn run(mut self, scenario: &Scenario) -> Result<Vec<PathBuf>> {
        for step in &scenario.steps {
            match step {
                Step::Panel {
                    button,
                    name,
                    steps,
                    region,
                    dismiss_key,
                    settle_ms,
                } => {
                    self.session.click_button(button).await?;
                    for nested in steps {
                        self.step(nested).await?;
                    }
                    self.capture_themed(name, region.as_ref()).await?;

                    let key = dismiss_key.as_deref().unwrap_or(&self.ui.dismiss_key);
                    self.session.press_key(key).await?;
                    if let Some(ms) = settle_ms {
                        self.session.pause(Duration::from_millis(*ms)).await?;
                    }
                }
                other => self.step(other).await?,
            }
        }
        Ok(self.captures)
    }

    /// Any step except a panel
    async fn step(&mut self, step: &Step) -> Result<()> {
        match step {
            Step::Capture { name, region } => self.capture_themed(name, region.as_ref()).await,
            Step::Click { text } => self.session.click_button(text).await,
            Step::Type { selector, text } => self.session.type_into(selector, text).await,
            Step::PressKey { key } => self.session.press_key(key).await,
            Step::Wait { ms } => self.session.pause(Duration::from_millis(*ms)).await,
            Step::Commit { mutation, args } => self.session.dispatch(mutation, args).await,
            Step::Play {
                id,
                length_in_ms,
                read_in_ms,
            } => {
                debug!("Injecting sound {} as playing", id);
                let entry = serde_json::to_value(fixtures::playing(*id, *length_in_ms, *read_in_ms))?;
                self.session
                    .dispatch(&self.ui.playing_mutation, &[entry])
                    .await
            }
            Step::Panel { name, .. } => Err(ShotError::scenario(format!(
                "Panel '{}' opened while another panel is open",
                name
            ))),
        }
    }

    async fn capture_themed(&mut self, name: &str, region: Option<&Region>) -> Result<()> {
        let start = self.ui.start_theme;

        for theme in [start, start.opposite()] {
            if theme != start {
                self.set_theme(theme).await?;
            }
            self.capture(&format!("{}-{}", name, theme), None).await?;
            if let Some(region) = region {
                self.capture(
                    &format!("{}-{}-{}", name, region.label, theme),
                    Some(&region.selector),
                )
                .await?;
            }
        }

        self.set_theme(start).await
    }

    async fn capture(&mut self, file_stem: &str, region: Option<&str>) -> Result<()> {
        info!("Taking screenshot {}...", file_stem);
        let path = self.session.capture(file_stem, region).await?;
        self.captures.push(path);
        Ok(())
    }

    async fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.session
            .dispatch(&self.ui.theme_mutation, &[Value::Bool(theme.is_dark())])
            .await
    }
}
