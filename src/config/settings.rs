use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use serde::Deserialize;
use zeroize::Zeroizing;

use super::{Environment, KeychainManager};

const CONFIG_DIR: &str = "mover-deploy";
const CONFIG_FILE: &str = "config.toml";

/// User settings shared across projects
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub networks: HashMap<String, NetworkConfig>,

    #[serde(default)]
    pub wallets: HashMap<String, WalletConfig>,

    #[serde(default)]
    pub defaults: Option<Defaults>,

    #[serde(default)]
    pub gas_reporter: Option<GasReporterConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub chain_id: Option<u64>,
    pub explorer_url: Option<String>,
    pub confirmations: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletConfig {
    /// Keychain reference, `service:key` or a bare key in the default service
    pub keychain: Option<String>,
    /// Environment variable containing private key
    pub env_var: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Defaults {
    pub network: Option<String>,
    pub wallet: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GasReporterConfig {
    pub enabled: Option<bool>,
    /// Reference gas price in gwei
    pub gas_price: Option<u64>,
}

impl UserSettings {
    /// Load settings from the default location, or empty settings if there are none
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load settings from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {:?}", path))?;

        toml::from_str(&content).wrap_err("Failed to parse config file")
    }

    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn default_network(&self) -> Option<&str> {
        self.defaults.as_ref()?.network.as_deref()
    }

    pub fn default_wallet(&self) -> Option<&str> {
        self.defaults.as_ref()?.wallet.as_deref()
    }

    /// Resolve a wallet private key
    pub fn resolve_wallet_key(
        &self,
        name: &str,
        env: &Environment,
    ) -> Result<Option<Zeroizing<String>>> {
        let wallet = match self.wallets.get(name) {
            Some(w) => w,
            None => return Err(eyre::eyre!("Wallet '{}' is not configured", name)),
        };

        if let Some(keychain_ref) = &wallet.keychain {
            let (km, key) = KeychainManager::from_reference(keychain_ref);
            km.get_zeroizing(&key)
        } else if let Some(env_var) = &wallet.env_var {
            Ok(env.get(env_var).map(|v| Zeroizing::new(v.to_string())))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settings() {
        let content = r#"
[networks.sepolia]
rpc_url = "https://sepolia.drpc.org"
chain_id = 11155111
explorer_url = "https://sepolia.etherscan.io"

[wallets.deployer]
env_var = "DEPLOYER_KEY"

[defaults]
network = "sepolia"
wallet = "deployer"

[gas_reporter]
gas_price = 30
"#;

        let settings: UserSettings = toml::from_str(content).unwrap();
        assert_eq!(settings.networks.len(), 1);
        assert_eq!(settings.default_network(), Some("sepolia"));
        assert_eq!(settings.default_wallet(), Some("deployer"));
        assert_eq!(
            settings.gas_reporter.as_ref().and_then(|g| g.gas_price),
            Some(30)
        );
    }

    #[test]
    fn test_resolve_wallet_from_env() {
        let content = r#"
[wallets.deployer]
env_var = "DEPLOYER_KEY"
"#;
        let settings: UserSettings = toml::from_str(content).unwrap();
        let env = Environment::from_pairs(&[("DEPLOYER_KEY", "0xabc")]);

        let key = settings.resolve_wallet_key("deployer", &env).unwrap();
        assert_eq!(key.as_deref().map(|k| k.as_str()), Some("0xabc"));

        assert!(settings.resolve_wallet_key("missing", &env).is_err());
    }

    #[test]
    fn test_load_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(UserSettings::load_from(&dir.path().join("nope.toml")).is_err());
    }
}
