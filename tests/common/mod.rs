//! Recording session shared by the run tests
//!
//! Stands in for a browser: records every call, seeds the store's theme from
//! the settings stub on load the way the UI does, and writes a placeholder PNG
//! tagged with the theme it was taken in.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use uishots::browser::Session;
use uishots::stubs::StubCatalog;
use uishots::{Config, Result, ShotError};

pub const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    InstallStubs(usize),
    Navigate(PathBuf),
    Style,
    Click(String),
    Type(String, String),
    Key(String),
    Pause(u64),
    Capture(String, Option<String>),
    Dispatch(String, Vec<Value>),
    Shutdown,
}

pub struct RecordingSession {
    pub output_dir: PathBuf,
    /// Labels of the buttons present on the page
    pub buttons: Vec<String>,
    pub ops: Vec<Op>,
    pub dark: bool,
    pub stubs: Option<Arc<StubCatalog>>,
    /// Make `shutdown` fail after recording it
    pub fail_shutdown: bool,
    loaded: bool,
}

impl RecordingSession {
    pub fn new(output_dir: &Path, buttons: &[&str]) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            buttons: buttons.iter().map(|b| b.to_string()).collect(),
            ops: Vec::new(),
            dark: true,
            stubs: None,
            fail_shutdown: false,
            loaded: false,
        }
    }

    pub fn shutdowns(&self) -> usize {
        self.ops.iter().filter(|op| **op == Op::Shutdown).count()
    }

    pub fn position(&self, op: &Op) -> Option<usize> {
        self.ops.iter().position(|o| o == op)
    }
}

#[async_trait]
impl Session for RecordingSession {
    async fn install_stubs(&mut self, catalog: Arc<StubCatalog>) -> Result<()> {
        self.ops.push(Op::InstallStubs(catalog.len()));
        self.stubs = Some(catalog);
        Ok(())
    }

    async fn navigate(&mut self, entry: &Path) -> Result<()> {
        let Some(stubs) = &self.stubs else {
            return Err(ShotError::browser("navigated before stubs were installed"));
        };
        let settings = stubs.call("getSettings", &[])?;
        self.dark = settings["darkTheme"].as_bool().unwrap_or(true);
        self.ops.push(Op::Navigate(entry.to_path_buf()));
        self.loaded = true;
        Ok(())
    }

    async fn add_style(&mut self, _css: &str) -> Result<()> {
        self.ops.push(Op::Style);
        Ok(())
    }

    async fn click_button(&mut self, text: &str) -> Result<()> {
        if !self.buttons.iter().any(|b| b == text) {
            return Err(ShotError::not_found(format!("button '{}'", text), 30000));
        }
        self.ops.push(Op::Click(text.to_string()));
        Ok(())
    }

    async fn type_into(&mut self, selector: &str, text: &str) -> Result<()> {
        self.ops
            .push(Op::Type(selector.to_string(), text.to_string()));
        Ok(())
    }

    async fn press_key(&mut self, key: &str) -> Result<()> {
        self.ops.push(Op::Key(key.to_string()));
        Ok(())
    }

    async fn pause(&mut self, duration: Duration) -> Result<()> {
        self.ops.push(Op::Pause(duration.as_millis() as u64));
        Ok(())
    }

    async fn capture(&mut self, name: &str, region: Option<&str>) -> Result<PathBuf> {
        if !self.loaded {
            return Err(ShotError::browser("captured before the bundle loaded"));
        }
        self.ops
            .push(Op::Capture(name.to_string(), region.map(str::to_string)));

        let mut bytes = PNG_MAGIC.to_vec();
        let theme: &[u8] = if self.dark { b"dark" } else { b"light" };
        bytes.extend_from_slice(theme);
        let path = self.output_dir.join(format!("{}.png", name));
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    async fn dispatch(&mut self, action: &str, args: &[Value]) -> Result<()> {
        if action == "setDarkTheme" {
            self.dark = args.first().and_then(Value::as_bool).unwrap_or(self.dark);
        }
        self.ops.push(Op::Dispatch(action.to_string(), args.to_vec()));
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.ops.push(Op::Shutdown);
        if self.fail_shutdown {
            return Err(ShotError::browser("browser already gone"));
        }
        Ok(())
    }
}

/// Default config writing into `output_dir`
pub fn config_for(output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.capture.output_dir = output_dir.to_path_buf();
    config.capture.bundle = PathBuf::from("dist/index.html");
    config.capture.link_template = "https://raw.example.com/screenshots/{file}".to_string();
    config
}

/// Sorted file names in `dir`
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
