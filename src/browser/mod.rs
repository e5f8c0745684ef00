//! Browser session controller
//!
//! Owns the headless browser and its single page: stubs, navigation,
//! input, captures, and state-store dispatch.

pub mod bridge;
mod chrome;
mod observers;
mod session;
mod wait;

pub use chrome::ChromeSession;
pub use session::{release, Session};
pub use wait::WaitPolicy;
