use std::path::Path;

use eyre::{Result, eyre};

use super::{Project, foundry, hardhat};

/// Detect the project type based on configuration files present in the directory
///
/// A Hardhat config wins over a foundry.toml next to it: such hybrid projects
/// build and deploy through Hardhat and only borrow compiler settings from
/// foundry.toml.
pub fn detect(path: &Path) -> Result<Project> {
    if hardhat::has_config(path) {
        tracing::info!("Detected Hardhat project at {:?}", path);
        return hardhat::load_project(path);
    }

    if path.join("foundry.toml").exists() {
        tracing::info!("Detected Foundry project at {:?}", path);
        return foundry::load_project(path);
    }

    Err(eyre!(
        "No Foundry or Hardhat project detected at {:?}\n\
         Expected: foundry.toml, hardhat.config.js, or hardhat.config.ts",
        path
    ))
}
