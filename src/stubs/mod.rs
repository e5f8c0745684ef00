//! Backend stub layer
//!
//! Deterministic stand-ins for every backend call the UI makes, so a run
//! needs no real audio devices, sound files, or hotkey registration.

pub mod catalog;
pub mod fixtures;

pub use catalog::{StubCatalog, StubKind};
