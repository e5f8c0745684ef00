//! Core module - shared infrastructure for uishots
//!
//! This module contains the fixture data model, configuration, logging and
//! error handling used throughout the application.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::Config;
pub use error::{Result, ShotError};
pub use types::*;
