//! Configuration file handling.
//!
//! The wizard reads an optional JSON file; command-line flags override the
//! values it contains. Everything has a default, so an empty object `{}` is a
//! valid configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::session::{BUDGET_STEP, DEFAULT_BUDGET, MAX_BUDGET, MIN_BUDGET};
use crate::step::StepPlan;

/// Default artificial delay of the simulated submission.
pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 1500;

/// Longest delay accepted; anything beyond this looks like a typo.
pub const MAX_SUBMIT_DELAY_MS: u64 = 60_000;

/// Wizard configuration that can be saved/loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadFormConfig {
    /// Include the offer-details step (five steps instead of four)
    pub collect_offer_details: bool,
    /// Simulated submission delay in milliseconds
    pub submit_delay_ms: u64,
    /// Initial budget slider position
    pub default_budget: u32,
}

impl Default for LeadFormConfig {
    fn default() -> Self {
        Self {
            collect_offer_details: true,
            submit_delay_ms: DEFAULT_SUBMIT_DELAY_MS,
            default_budget: DEFAULT_BUDGET,
        }
    }
}

impl LeadFormConfig {
    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(MIN_BUDGET..=MAX_BUDGET).contains(&self.default_budget) {
            anyhow::bail!(
                "Default budget must be between {} and {}",
                MIN_BUDGET,
                MAX_BUDGET
            );
        }
        if self.default_budget % BUDGET_STEP != 0 {
            anyhow::bail!("Default budget must be a multiple of {}", BUDGET_STEP);
        }
        if self.submit_delay_ms > MAX_SUBMIT_DELAY_MS {
            anyhow::bail!(
                "Submit delay must be at most {} ms",
                MAX_SUBMIT_DELAY_MS
            );
        }
        Ok(())
    }

    /// Step plan implied by `collect_offer_details`
    pub fn step_plan(&self) -> StepPlan {
        StepPlan::from_offer_details(self.collect_offer_details)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}
