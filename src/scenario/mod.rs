//! Scenario driver
//!
//! The ordered walkthrough of UI states and the code that executes it.

mod driver;
mod step;
mod tour;

pub use driver::ScenarioDriver;
pub use step::{Region, Scenario, Step, INJECTED_LENGTH_MS, INJECTED_READ_MS};
pub use tour::{default_tour, SEARCH_FIELD};
