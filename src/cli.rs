use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::LeadFormConfig;
use crate::session::FormSession;

/// leadform - vehicle financing lead capture in the terminal
#[derive(Parser)]
#[command(name = "leadform")]
#[command(about = "A step-by-step vehicle financing application wizard")]
#[command(version)]
pub struct Cli {
    /// Write logs to this file (the wizard owns the screen, so interactive
    /// runs discard logs unless this is set)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive wizard (the default)
    Run(RunArgs),
    /// Validate a saved lead (a serialized form session)
    Validate {
        /// Path to the lead JSON file
        lead: PathBuf,
    },
    /// Check a configuration file
    CheckConfig {
        /// Path to configuration file to check
        config: PathBuf,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Configuration file to start from
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Skip the offer-details step (four steps instead of five)
    #[arg(long)]
    pub no_offer_details: bool,

    /// Simulated submission delay in milliseconds
    #[arg(long)]
    pub submit_delay_ms: Option<u64>,
}

impl RunArgs {
    /// Configuration for this run: the file (or defaults) with flags applied.
    pub fn resolve_config(&self) -> Result<LeadFormConfig> {
        let mut config = match &self.config {
            Some(path) => LeadFormConfig::load_from_file(path)?,
            None => LeadFormConfig::default(),
        };
        if self.no_offer_details {
            config.collect_offer_details = false;
        }
        if let Some(delay) = self.submit_delay_ms {
            config.submit_delay_ms = delay;
        }
        config.validate()?;
        Ok(config)
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// Whether this invocation takes over the terminal
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Run(_)))
    }
}

/// Load a serialized session from disk
pub fn load_lead<P: AsRef<Path>>(path: P) -> Result<FormSession> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read lead from {:?}", path.as_ref()))?;
    FormSession::from_json(&content).context("Failed to parse lead JSON")
}
