use alloy::{network::TransactionBuilder, rpc::types::TransactionRequest};
use eyre::{Result, eyre};

use super::abi::param_list;
use super::artifact::Artifact;

/// Builds creation transactions for a single compiled contract
#[derive(Debug, Clone)]
pub struct ContractFactory {
    artifact: Artifact,
}

impl ContractFactory {
    pub fn new(artifact: Artifact) -> Self {
        Self { artifact }
    }

    pub fn contract_name(&self) -> &str {
        &self.artifact.name
    }

    /// Creation transaction with no constructor arguments
    pub fn deploy_transaction(&self) -> Result<TransactionRequest> {
        let inputs = self.artifact.abi.constructor_inputs();
        if !inputs.is_empty() {
            return Err(eyre!(
                "Constructor of '{}' expects {} argument(s) ({}), none were given",
                self.artifact.name,
                inputs.len(),
                param_list(inputs)
            ));
        }

        Ok(TransactionRequest::default().with_deploy_code(self.artifact.bytecode.clone()))
    }
}
