//! uishots - reproducible documentation screenshots
//!
//! Drives a headless browser through a fixed walkthrough of a built web UI,
//! answering its backend calls with canned data, and captures every state in
//! both dark and light themes.
//!
//! # Architecture
//!
//! - **Core**: Data model, configuration, logging, and error handling
//! - **Stubs**: Deterministic stand-ins for the UI's backend calls
//! - **Browser**: The session controller (Chrome over DevTools)
//! - **Scenario**: The walkthrough and the driver executing it
//! - **Report**: The markdown listing of captured images
//! - **CLI**: Run orchestration
//!
//! # Usage
//!
//! ```rust,no_run
//! use uishots::scenario::default_tour;
//! use uishots::Config;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load();
//!     let summary = uishots::cli::run(&config, &default_tour()).await.unwrap();
//!     println!("{} screenshots", summary.captures.len());
//! }
//! ```

pub mod browser;
pub mod cli;
pub mod core;
pub mod report;
pub mod scenario;
pub mod stubs;

// Re-export commonly used items
pub use core::{Config, Result, ShotError};
