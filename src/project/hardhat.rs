use std::path::Path;

use eyre::{Result, eyre};

use super::{FoundryConfig, Project, ProjectType};

const CONFIG_FILES: [&str; 2] = ["hardhat.config.js", "hardhat.config.ts"];

pub fn has_config(path: &Path) -> bool {
    CONFIG_FILES.iter().any(|f| path.join(f).exists())
}

/// Load a Hardhat project from the given path
///
/// The Hardhat config is executable JS/TS, so only the conventional layout is
/// used. A foundry.toml next to it still provides compiler settings.
pub fn load_project(path: &Path) -> Result<Project> {
    if !has_config(path) {
        return Err(eyre!(
            "hardhat.config.js or hardhat.config.ts not found at {:?}",
            path
        ));
    }

    Ok(Project {
        project_type: ProjectType::Hardhat,
        root: path.to_path_buf(),
        name: super::dir_name(path),
        src_dir: path.join("contracts"),
        out_dir: path.join("artifacts"),
        foundry: FoundryConfig::load(path)?,
    })
}
