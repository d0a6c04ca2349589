use alloy::primitives::{Address, TxHash, U256, utils::format_units};

use crate::chain::DeploymentReceipt;
use crate::config::{DeployConfig, GasReporterSettings};

const GWEI: u128 = 1_000_000_000;

/// Outcome of a confirmed deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentResult {
    pub contract: String,
    pub address: Address,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub effective_gas_price: u128,
}

impl DeploymentResult {
    pub fn new(contract: &str, receipt: DeploymentReceipt) -> Self {
        Self {
            contract: contract.to_string(),
            address: receipt.address,
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            effective_gas_price: receipt.effective_gas_price,
        }
    }

    /// Link to the contract page on a block explorer
    pub fn explorer_link(&self, explorer_url: &str) -> String {
        format!(
            "{}/address/{}",
            explorer_url.trim_end_matches('/'),
            self.address
        )
    }
}

/// Deployment cost, both as paid and at the reference gas price
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasReport {
    pub gas_used: u64,
    pub cost_wei: U256,
    pub reference_gas_price_gwei: u64,
    pub reference_cost_wei: U256,
}

impl GasReport {
    pub fn new(result: &DeploymentResult, settings: &GasReporterSettings) -> Self {
        let gas_used = U256::from(result.gas_used);
        Self {
            gas_used: result.gas_used,
            cost_wei: gas_used * U256::from(result.effective_gas_price),
            reference_gas_price_gwei: settings.gas_price_gwei,
            reference_cost_wei: gas_used * U256::from(settings.gas_price_gwei as u128 * GWEI),
        }
    }
}

impl std::fmt::Display for GasReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "gas used {}, cost {} ETH ({} ETH at {} gwei)",
            self.gas_used,
            ether(self.cost_wei),
            ether(self.reference_cost_wei),
            self.reference_gas_price_gwei
        )
    }
}

/// Log cost and explorer details of a finished deployment
pub fn log_summary(result: &DeploymentResult, config: &DeployConfig) {
    tracing::info!(
        "Deployed {} to {} on '{}' in tx {} (block {:?})",
        result.contract,
        result.address,
        config.network.name,
        result.tx_hash,
        result.block_number
    );

    if config.gas_reporter.enabled {
        tracing::info!("{}", GasReport::new(result, &config.gas_reporter));
    }

    if let Some(explorer_url) = &config.network.explorer_url {
        tracing::info!("View on explorer: {}", result.explorer_link(explorer_url));
    }
}

fn ether(wei: U256) -> String {
    format_units(wei, "ether").unwrap_or_else(|_| format!("{} wei", wei))
}
