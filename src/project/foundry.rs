use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use eyre::{Result, WrapErr, eyre};
use serde::Deserialize;

use super::{Project, ProjectType};

pub const SOLC_DEFAULT: &str = "0.8.16";
pub const OPTIMIZER_RUNS_DEFAULT: u32 = 200;

static EMPTY_PROFILE: LazyLock<ProfileConfig> = LazyLock::new(ProfileConfig::default);

/// Foundry configuration parsed from foundry.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FoundryConfig {
    #[serde(default)]
    pub profile: HashMap<String, ProfileConfig>,

    /// Pre-profile layout where settings live under a top-level `[default]` table
    #[serde(default, rename = "default")]
    pub legacy_default: Option<ProfileConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileConfig {
    pub src: Option<String>,
    pub out: Option<String>,
    #[serde(alias = "solc_version", alias = "solc-version")]
    pub solc: Option<String>,
    pub optimizer: Option<bool>,
    pub optimizer_runs: Option<u32>,
}

impl FoundryConfig {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).wrap_err("Failed to parse foundry.toml")
    }

    /// Read foundry.toml from a project root, if there is one
    pub fn load(root: &Path) -> Result<Option<Self>> {
        let config_path = root.join("foundry.toml");
        if !config_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&config_path)
            .wrap_err_with(|| format!("Failed to read {:?}", config_path))?;

        Self::parse(&content).map(Some)
    }

    pub fn default_profile(&self) -> &ProfileConfig {
        self.profile
            .get("default")
            .or(self.legacy_default.as_ref())
            .unwrap_or(&EMPTY_PROFILE)
    }

    pub fn src_dir(&self) -> &str {
        self.default_profile().src.as_deref().unwrap_or("src")
    }

    pub fn out_dir(&self) -> &str {
        self.default_profile().out.as_deref().unwrap_or("out")
    }

    pub fn solc_version(&self) -> &str {
        self.default_profile().solc.as_deref().unwrap_or(SOLC_DEFAULT)
    }

    pub fn optimizer(&self) -> bool {
        self.default_profile().optimizer.unwrap_or(true)
    }

    pub fn optimizer_runs(&self) -> u32 {
        self.default_profile()
            .optimizer_runs
            .unwrap_or(OPTIMIZER_RUNS_DEFAULT)
    }
}

/// Load a Foundry project from the given path
pub fn load_project(path: &Path) -> Result<Project> {
    let config = FoundryConfig::load(path)?
        .ok_or_else(|| eyre!("foundry.toml not found at {:?}", path))?;

    Ok(Project {
        project_type: ProjectType::Foundry,
        root: path.to_path_buf(),
        name: super::dir_name(path),
        src_dir: path.join(config.src_dir()),
        out_dir: path.join(config.out_dir()),
        foundry: Some(config),
    })
}
