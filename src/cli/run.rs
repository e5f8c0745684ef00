//! Run orchestration
//!
//! Acquire the browser, attach stubs, load the bundle, drive the scenario,
//! write the listing, release the browser. Release happens on every path.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::browser::{release, ChromeSession, Session};
use crate::core::config::CaptureConfig;
use crate::core::{Config, Result, ShotError};
use crate::report::{collect_images, write_listing, Listing};
use crate::scenario::{Scenario, ScenarioDriver};
use crate::stubs::StubCatalog;

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Every file written, in capture order
    pub captures: Vec<PathBuf>,
    pub listing: Listing,
}

/// Create the output directory, removing stale images when configured
pub async fn prepare_output(capture: &CaptureConfig) -> Result<()> {
    tokio::fs::create_dir_all(&capture.output_dir)
        .await
        .map_err(|e| {
            ShotError::with_context(
                format!("Failed to create {}", capture.output_dir.display()),
                e,
            )
        })?;

    if capture.clean {
        for image in collect_images(&capture.output_dir).await? {
            tokio::fs::remove_file(capture.output_dir.join(&image)).await?;
        }
        info!("Cleared old screenshots from {}", capture.output_dir.display());
    }

    Ok(())
}

/// Launch Chrome and run `scenario` against the configured bundle
pub async fn run(config: &Config, scenario: &Scenario) -> Result<RunSummary> {
    if !config.capture.bundle.is_file() {
        return Err(ShotError::BundleNotFound(config.capture.bundle.clone()));
    }
    prepare_output(&config.capture).await?;

    let mut session = ChromeSession::launch(config).await?;
    execute(&mut session, config, scenario).await
}

/// Run `scenario` on an already launched session, then shut it down
pub async fn execute<S: Session + ?Sized>(
    session: &mut S,
    config: &Config,
    scenario: &Scenario,
) -> Result<RunSummary> {
    let outcome = drive_and_report(session, config, scenario).await;

    release(session).await;

    outcome
}

async fn drive_and_report<S: Session + ?Sized>(
    session: &mut S,
    config: &Config,
    scenario: &Scenario,
) -> Result<RunSummary> {
    let catalog = Arc::new(StubCatalog::new(config.fixtures.clone()));
    session.install_stubs(catalog).await?;
    session.navigate(&config.capture.bundle).await?;

    let mut driver = ScenarioDriver::new(session, &config.ui);
    driver.prepare().await?;
    let captures = driver.run(scenario).await?;

    let listing = write_listing(
        &config.capture.output_dir,
        &config.capture.listing_file,
        &config.capture.link_template,
    )
    .await?;

    Ok(RunSummary { captures, listing })
}
