//! leadform - Main entry point
//!
//! Parses the command line, sets up logging and either runs the wizard or
//! one of the non-interactive checks.

use anyhow::{Context, Result};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::OpenOptions;
use std::io::stdout;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use leadform::app::App;
use leadform::cli::{self, Cli, Commands, RunArgs};
use leadform::config::LeadFormConfig;
use leadform::submission::SimulatedSubmitter;

/// Initialize tracing. `RUST_LOG` overrides the default `info` level.
fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        // The alternate screen would be garbled by log lines
        None if interactive => builder.with_writer(std::io::sink).init(),
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

/// Main application entry point
fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.log_file.as_deref(), cli.is_interactive())?;
    info!("leadform starting up");

    match cli.command {
        Some(Commands::Validate { lead }) => {
            info!("Validating lead file: {:?}", lead);
            let session = cli::load_lead(&lead)?;
            let report = session.validate_all();
            for (field, message) in report.iter() {
                println!("✗ {}: {}", field, message);
            }
            match report.ensure_valid() {
                Ok(()) => println!("✓ Lead is valid"),
                Err(e) => {
                    error!("{}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::CheckConfig { config }) => {
            info!("Checking configuration file: {:?}", config);
            match LeadFormConfig::load_from_file(&config).and_then(|c| c.validate().map(|_| c)) {
                Ok(config) => {
                    println!("✓ Configuration file is valid: {:?}", config);
                }
                Err(e) => {
                    error!("Configuration check failed: {:#}", e);
                    eprintln!("✗ Configuration check failed: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Run(args)) => run_wizard(&args)?,
        None => {
            info!("No command specified, launching the wizard");
            run_wizard(&RunArgs::default())?;
        }
    }

    Ok(())
}

/// Run the interactive wizard
fn run_wizard(args: &RunArgs) -> Result<()> {
    let config = args.resolve_config()?;
    debug!("Resolved configuration: {:?}", config);

    enable_raw_mode().context("Failed to enable raw mode")?;
    crossterm::execute!(stdout(), crossterm::terminal::EnterAlternateScreen)
        .context("Failed to enter alternate screen")?;

    let result = Terminal::new(CrosstermBackend::new(stdout()))
        .context("Failed to create terminal")
        .and_then(|mut terminal| {
            let submitter = Arc::new(SimulatedSubmitter::new(config.submit_delay()));
            let mut app = App::new(&config, submitter);
            app.run(&mut terminal)?;
            Ok(app.session().is_complete())
        });

    // Cleanup terminal (always attempt cleanup, even if the app failed)
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(stdout(), crossterm::terminal::LeaveAlternateScreen);

    let completed = result?;
    info!("Wizard closed (completed: {})", completed);
    if completed {
        println!("✓ Application submitted. A credit specialist will contact you shortly.");
    }
    Ok(())
}
