use std::{fs, path::Path};

use anyhow::{Context, Result};
use ops_core::planner::RawPlanInput;

/// Three flavours competing for ingredients (`bahan`) and machine hours (`jam`).
pub const DEFAULT_SCENARIO: &str = include_str!("../scenarios/ice_cream.json");

/// Reads a planner scenario from `path`, or the built-in one when `None`.
pub fn load_scenario(path: Option<&Path>) -> Result<RawPlanInput> {
    match path {
        Some(path) => {
            log::info!("Loading scenario from {}", path.display());
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read scenario {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse scenario {}", path.display()))
        }
        None => serde_json::from_str(DEFAULT_SCENARIO).context("built-in scenario is malformed"),
    }
}
