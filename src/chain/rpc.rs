use alloy::{
    network::{Ethereum, EthereumWallet, ReceiptResponse},
    primitives::TxHash,
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use eyre::{Result, WrapErr, eyre};
use tokio::sync::OnceCell;

use super::{Chain, DeploymentReceipt, chain_id_to_network};
use crate::config::NetworkTarget;

/// Submits transactions through a JSON-RPC endpoint via Alloy
pub struct RpcChain {
    target: NetworkTarget,
    signer: PrivateKeySigner,
    provider: OnceCell<DynProvider>,
}

impl RpcChain {
    pub fn new(target: NetworkTarget, signer: PrivateKeySigner) -> Self {
        Self {
            target,
            signer,
            provider: OnceCell::new(),
        }
    }

    /// Connect on first use so that connection problems surface while submitting
    async fn provider(&self) -> Result<&DynProvider> {
        self.provider
            .get_or_try_init(|| async {
                let wallet = EthereumWallet::from(self.signer.clone());

                let provider = ProviderBuilder::new()
                    .wallet(wallet)
                    .connect(&self.target.rpc_url)
                    .await
                    .wrap_err("Failed to connect to RPC")?;

                tracing::debug!(
                    "Connected to {} as {}",
                    self.target.rpc_url,
                    self.signer.address()
                );
                Ok::<_, eyre::Report>(provider.erased())
            })
            .await
    }

    async fn check_chain_id(&self, provider: &DynProvider) -> Result<()> {
        if self.target.chain_ids.is_empty() {
            return Ok(());
        }

        let actual = provider
            .get_chain_id()
            .await
            .wrap_err("Failed to query chain id")?;

        verify_chain_id(&self.target, actual)
    }
}

fn verify_chain_id(target: &NetworkTarget, actual: u64) -> Result<()> {
    if target.chain_ids.is_empty() || target.chain_ids.contains(&actual) {
        return Ok(());
    }

    let expected = target
        .chain_ids
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(" or ");

    Err(eyre!(
        "Network '{}' expects chain id {} but the RPC endpoint reports {} ({})",
        target.name,
        expected,
        actual,
        chain_id_to_network(actual)
    ))
}

impl Chain for RpcChain {
    async fn submit(&self, tx: TransactionRequest) -> Result<TxHash> {
        let provider = self.provider().await?;
        self.check_chain_id(provider).await?;

        let pending_tx = provider
            .send_transaction(tx)
            .await
            .wrap_err("Failed to send transaction")?;

        Ok(*pending_tx.tx_hash())
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<DeploymentReceipt> {
        let provider = self.provider().await?;

        let receipt = PendingTransactionBuilder::<Ethereum>::new(provider.root().clone(), tx_hash)
            .with_required_confirmations(self.target.confirmations)
            .get_receipt()
            .await
            .wrap_err("Failed to fetch transaction receipt")?;

        if !receipt.status() {
            return Err(eyre!("Transaction {} reverted", tx_hash));
        }

        let address = receipt
            .contract_address()
            .ok_or_else(|| eyre!("No contract address in receipt for {}", tx_hash))?;

        Ok(DeploymentReceipt {
            address,
            tx_hash,
            block_number: receipt.block_number(),
            gas_used: receipt.gas_used(),
            effective_gas_price: receipt.effective_gas_price(),
        })
    }
}
