use std::collections::HashMap;
use std::path::Path;

use eyre::{Result, WrapErr};

/// Snapshot of environment variables taken once at startup.
///
/// Values from a project `.env` file fill in variables that the process
/// environment does not already define. The process environment itself is
/// never modified.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    pub fn capture(project_root: &Path) -> Result<Self> {
        let mut vars: HashMap<String, String> = std::env::vars().collect();

        let dotenv_path = project_root.join(".env");
        if dotenv_path.exists() {
            let entries = dotenvy::from_path_iter(&dotenv_path)
                .wrap_err_with(|| format!("Failed to read {:?}", dotenv_path))?;

            let mut loaded = 0;
            for entry in entries {
                let (key, value) =
                    entry.wrap_err_with(|| format!("Failed to parse {:?}", dotenv_path))?;
                vars.entry(key).or_insert_with(|| {
                    loaded += 1;
                    value
                });
            }
            tracing::debug!("Loaded {} variables from {:?}", loaded, dotenv_path);
        }

        Ok(Self { vars })
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            vars: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Look up a variable, treating empty values as unset
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|v| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }
}
