//! CLI module
//!
//! Run orchestration behind the `uishots` binary.

mod run;

pub use run::{execute, prepare_output, run, RunSummary};
