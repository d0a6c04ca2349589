//! Error types for a deployment run.

use alloy::primitives::TxHash;
use thiserror::Error;

use super::DeployStage;

/// Boxed underlying cause, keeps the full context chain of the collaborator error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that end a deployment run, by the step they came from.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Building artifacts from sources failed.
    #[error("compilation failed")]
    Compilation(#[source] BoxError),

    /// No usable artifact matches the requested contract.
    #[error("could not resolve an artifact for contract `{contract}`")]
    ArtifactResolution {
        contract: String,
        #[source]
        source: BoxError,
    },

    /// The deployment transaction could not be built or was rejected.
    #[error("deployment transaction was not accepted by the network")]
    Submission(#[source] BoxError),

    /// The transaction was sent but never confirmed successfully.
    #[error("deployment transaction {tx_hash} was not confirmed")]
    Confirmation {
        tx_hash: TxHash,
        #[source]
        source: BoxError,
    },
}

impl DeployError {
    /// Stage the run was in when it failed
    pub fn stage(&self) -> DeployStage {
        match self {
            DeployError::Compilation(_) => DeployStage::Compiling,
            DeployError::ArtifactResolution { .. } => DeployStage::Resolving,
            DeployError::Submission(_) => DeployStage::Submitting,
            DeployError::Confirmation { .. } => DeployStage::Confirming,
        }
    }
}
