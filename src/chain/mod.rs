mod networks;
mod rpc;

pub use networks::{chain_id_to_network, default_explorer};
pub use rpc::RpcChain;

use alloy::primitives::{Address, TxHash};
use alloy::rpc::types::TransactionRequest;
use eyre::Result;

/// Receipt data for a confirmed contract creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentReceipt {
    pub address: Address,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub effective_gas_price: u128,
}

/// Network the deployment transaction is signed for and sent to
pub trait Chain {
    /// Sign and broadcast a transaction, returning its hash once the node accepts it
    async fn submit(&self, tx: TransactionRequest) -> Result<TxHash>;

    /// Wait until the transaction is mined with the required confirmations
    async fn confirm(&self, tx_hash: TxHash) -> Result<DeploymentReceipt>;
}
