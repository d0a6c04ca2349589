mod detector;
mod foundry;
mod hardhat;

pub use detector::detect;
pub use foundry::FoundryConfig;

use std::path::{Path, PathBuf};

use eyre::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    Foundry,
    Hardhat,
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectType::Foundry => write!(f, "Foundry"),
            ProjectType::Hardhat => write!(f, "Hardhat"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Project {
    pub project_type: ProjectType,
    pub root: PathBuf,
    pub name: String,
    pub src_dir: PathBuf,
    pub out_dir: PathBuf,
    /// Parsed foundry.toml, also present for Hardhat projects that keep one
    /// alongside their Hardhat config
    pub foundry: Option<FoundryConfig>,
}

impl Project {
    pub fn new_foundry(path: &Path) -> Result<Self> {
        foundry::load_project(path)
    }

    pub fn new_hardhat(path: &Path) -> Result<Self> {
        hardhat::load_project(path)
    }
}

/// Project name taken from the directory name
fn dir_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}
