//! uishots - documentation screenshots of a built web UI
//!
//! Main entry point for the CLI application.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use uishots::core::logging::init_logging;
use uishots::scenario::{default_tour, Scenario};
use uishots::stubs::StubCatalog;
use uishots::Config;

/// Capture light and dark screenshots of every state in a UI walkthrough
#[derive(Parser, Debug)]
#[command(name = "uishots")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (default: ~/.config/uishots/config.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// HTML entry point of the built UI
    #[arg(long, short = 'b')]
    bundle: Option<PathBuf>,

    /// Output directory for screenshots and the listing
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Scenario file (default: built-in walkthrough)
    #[arg(long, short = 's')]
    scenario: Option<PathBuf>,

    /// Only capture these states (comma separated)
    #[arg(long, value_delimiter = ',')]
    states: Vec<String>,

    /// Run in headed browser mode (visible window)
    #[arg(long)]
    headed: bool,

    /// Chrome/Chromium binary
    #[arg(long)]
    chrome: Option<PathBuf>,

    /// Launch Chrome without its sandbox
    #[arg(long)]
    no_sandbox: bool,

    /// Remove existing screenshots before capturing
    #[arg(long)]
    clean: bool,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Print the scenario that would run and exit
    #[arg(long)]
    print_scenario: bool,

    /// Print every stub and its answer, then exit
    #[arg(long)]
    list_stubs: bool,
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    // Apply CLI overrides
    if let Some(bundle) = &args.bundle {
        config.capture.bundle = bundle.clone();
    }
    if let Some(output) = &args.output {
        config.capture.output_dir = output.clone();
    }
    if let Some(chrome) = &args.chrome {
        config.browser.executable = Some(chrome.clone());
    }
    if args.headed {
        config.browser.headed = true;
    }
    if args.no_sandbox {
        config.browser.no_sandbox = true;
    }
    if args.clean {
        config.capture.clean = true;
    }

    Ok(config)
}

fn load_scenario(args: &Args) -> anyhow::Result<Scenario> {
    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => default_tour(),
    };

    if args.states.is_empty() {
        Ok(scenario)
    } else {
        Ok(scenario.retain_states(&args.states)?)
    }
}

fn list_stubs(config: &Config) -> anyhow::Result<()> {
    let catalog = StubCatalog::new(config.fixtures.clone());
    for name in catalog.names() {
        let sample = if name == "playSound" {
            catalog.call(name, &[serde_json::json!(1)])?
        } else {
            catalog.call(name, &[])?
        };
        println!("{}: {}", name, sample);
    }
    Ok(())
}

async fn start(args: Args) -> anyhow::Result<()> {
    if args.print_config {
        print!("{}", Config::default_config_toml());
        return Ok(());
    }

    let config = load_config(&args)?;
    if args.list_stubs {
        return list_stubs(&config);
    }

    let scenario = load_scenario(&args)?;
    if args.print_scenario {
        print!("{}", scenario.to_toml()?);
        return Ok(());
    }

    let summary = uishots::cli::run(&config, &scenario).await?;
    info!(
        "Wrote {} screenshots and {}",
        summary.captures.len(),
        summary.listing.path.display()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(if args.debug { "debug" } else { "info" }, args.log_json);

    match start(args).await {
        Ok(()) => {
            info!("Successfully generated screenshots");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
