//! Validated configuration for a single deployment, built once at startup.

use alloy::signers::local::PrivateKeySigner;
use eyre::{Result, WrapErr, eyre};
use zeroize::Zeroizing;

use super::keychain::validate_private_key;
use super::settings::{NetworkConfig, UserSettings};
use super::Environment;
use crate::chain::default_explorer;
use crate::project::{FoundryConfig, Project};

pub const DEFAULT_CONTRACT: &str = "Mover";
pub const DEFAULT_NETWORK: &str = "hardhat";

const HARDHAT_RPC: &str = "http://127.0.0.1:8545";
/// Hardhat configured with `chainId: 1337`, and anvil or a stock `hardhat node`
const LOCAL_CHAIN_IDS: [u64; 2] = [1337, 31337];
/// Account #0 of the Hardhat/Anvil development mnemonic. Publicly known, only
/// ever funded on local development chains.
const HARDHAT_DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

const RINKEBY_CHAIN_ID: u64 = 4;

const DEFAULT_GAS_PRICE_GWEI: u64 = 77;

/// Values taken from the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub network: Option<String>,
    pub contract: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkTarget {
    pub name: String,
    pub rpc_url: String,
    /// Chain ids the RPC endpoint may report; empty skips the check
    pub chain_ids: Vec<u64>,
    pub confirmations: u64,
    pub explorer_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerSettings {
    pub solc_version: String,
    pub optimizer: bool,
    pub optimizer_runs: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasReporterSettings {
    pub enabled: bool,
    pub gas_price_gwei: u64,
}

#[derive(Clone)]
pub struct DeployConfig {
    pub contract: String,
    pub network: NetworkTarget,
    pub compiler: CompilerSettings,
    pub gas_reporter: GasReporterSettings,
    signer_key: Zeroizing<String>,
}

impl DeployConfig {
    pub fn resolve(
        project: &Project,
        settings: &UserSettings,
        env: &Environment,
        overrides: &Overrides,
    ) -> Result<Self> {
        let contract = overrides
            .contract
            .clone()
            .unwrap_or_else(|| DEFAULT_CONTRACT.to_string());
        if contract.trim().is_empty() {
            return Err(eyre!("Contract name cannot be empty"));
        }

        let network_name = overrides
            .network
            .as_deref()
            .or(settings.default_network())
            .unwrap_or(DEFAULT_NETWORK);

        let (network, signer_key) = resolve_network(network_name, settings, env)?;
        validate_rpc_url(&network.rpc_url)
            .wrap_err_with(|| format!("Invalid RPC URL for network '{}'", network.name))?;
        validate_private_key(&signer_key)
            .wrap_err_with(|| format!("Invalid signing key for network '{}'", network.name))?;

        let compiler = compiler_settings(project.foundry.as_ref());
        let gas_reporter = gas_reporter_settings(settings);

        tracing::debug!(
            "Resolved network '{}' at {} (chain ids {:?})",
            network.name,
            network.rpc_url,
            network.chain_ids
        );

        Ok(Self {
            contract,
            network,
            compiler,
            gas_reporter,
            signer_key,
        })
    }

    /// Build the local signer for the configured key
    pub fn signer(&self) -> Result<PrivateKeySigner> {
        let key = self.signer_key.trim();
        let clean_key = key.strip_prefix("0x").unwrap_or(key);
        clean_key.parse().wrap_err("Failed to parse private key")
    }
}

impl std::fmt::Debug for DeployConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeployConfig")
            .field("contract", &self.contract)
            .field("network", &self.network)
            .field("compiler", &self.compiler)
            .field("gas_reporter", &self.gas_reporter)
            .field("signer_key", &"<redacted>")
            .finish()
    }
}

fn resolve_network(
    name: &str,
    settings: &UserSettings,
    env: &Environment,
) -> Result<(NetworkTarget, Zeroizing<String>)> {
    if let Some(network) = settings.networks.get(name) {
        let key = match settings.default_wallet() {
            Some(wallet) => settings
                .resolve_wallet_key(wallet, env)?
                .ok_or_else(|| eyre!("No private key found for wallet '{}'", wallet))?,
            None => env_key(env)?,
        };
        return Ok((from_settings(name, network), key));
    }

    match name {
        "hardhat" | "localhost" => {
            let key = env
                .get("PRIVATE_KEY")
                .unwrap_or(HARDHAT_DEV_KEY)
                .to_string();
            Ok((
                NetworkTarget {
                    name: name.to_string(),
                    rpc_url: HARDHAT_RPC.to_string(),
                    chain_ids: LOCAL_CHAIN_IDS.to_vec(),
                    confirmations: 1,
                    explorer_url: None,
                },
                Zeroizing::new(key),
            ))
        }
        "rinkeby" => {
            let rpc_url = env
                .get("RINKEBY_RPC")
                .ok_or_else(|| eyre!("RINKEBY_RPC is not set"))?;
            Ok((
                NetworkTarget {
                    name: name.to_string(),
                    rpc_url: rpc_url.to_string(),
                    chain_ids: vec![RINKEBY_CHAIN_ID],
                    confirmations: 1,
                    explorer_url: default_explorer(RINKEBY_CHAIN_ID).map(str::to_string),
                },
                env_key(env)?,
            ))
        }
        _ => Err(eyre!(
            "Unknown network '{}'. Built-in networks: hardhat, localhost, rinkeby",
            name
        )),
    }
}

fn from_settings(name: &str, network: &NetworkConfig) -> NetworkTarget {
    NetworkTarget {
        name: name.to_string(),
        rpc_url: network.rpc_url.clone(),
        chain_ids: network.chain_id.into_iter().collect(),
        confirmations: network.confirmations.unwrap_or(1).max(1),
        explorer_url: network
            .explorer_url
            .clone()
            .or_else(|| network.chain_id.and_then(default_explorer).map(str::to_string)),
    }
}

fn env_key(env: &Environment) -> Result<Zeroizing<String>> {
    env.get("PRIVATE_KEY")
        .map(|k| Zeroizing::new(k.to_string()))
        .ok_or_else(|| eyre!("PRIVATE_KEY is not set"))
}

fn validate_rpc_url(url: &str) -> Result<()> {
    const SCHEMES: [&str; 4] = ["http://", "https://", "ws://", "wss://"];

    let rest = SCHEMES
        .iter()
        .find_map(|scheme| url.strip_prefix(scheme))
        .ok_or_else(|| eyre!("expected an http(s) or ws(s) URL, got '{}'", url))?;

    if rest.is_empty() || rest.starts_with('/') {
        return Err(eyre!("URL '{}' has no host", url));
    }
    Ok(())
}

fn compiler_settings(foundry: Option<&FoundryConfig>) -> CompilerSettings {
    let foundry = foundry.cloned().unwrap_or_default();
    CompilerSettings {
        solc_version: foundry.solc_version().to_string(),
        optimizer: foundry.optimizer(),
        optimizer_runs: foundry.optimizer_runs(),
    }
}

fn gas_reporter_settings(settings: &UserSettings) -> GasReporterSettings {
    let config = settings.gas_reporter.clone().unwrap_or_default();
    GasReporterSettings {
        enabled: config.enabled.unwrap_or(true),
        gas_price_gwei: config.gas_price.unwrap_or(DEFAULT_GAS_PRICE_GWEI),
    }
}
