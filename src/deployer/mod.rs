//! The deploy procedure: compile, resolve, submit, confirm.

mod error;
#[cfg(test)]
pub mod fakes;
mod report;

pub use error::DeployError;
pub use report::{DeploymentResult, log_summary};

use crate::chain::Chain;
use crate::compiler::Compiler;
use crate::contracts::{ArtifactSource, ContractFactory};

/// Where a deployment run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStage {
    Idle,
    Compiling,
    Resolving,
    Submitting,
    Confirming,
    Done,
    Failed,
}

impl DeployStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, DeployStage::Done | DeployStage::Failed)
    }
}

impl std::fmt::Display for DeployStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeployStage::Idle => "idle",
            DeployStage::Compiling => "compiling",
            DeployStage::Resolving => "resolving",
            DeployStage::Submitting => "submitting",
            DeployStage::Confirming => "confirming",
            DeployStage::Done => "done",
            DeployStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Contract to deploy. Constructor arguments are not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub contract: String,
}

impl DeploymentRequest {
    pub fn new(contract: &str) -> Self {
        Self {
            contract: contract.to_string(),
        }
    }
}

/// Runs one deployment against injected build, artifact and network collaborators.
///
/// Every call to [`Deployer::deploy`] sends a new creation transaction; nothing
/// is cached between runs and nothing is retried.
pub struct Deployer<C, A, N> {
    compiler: C,
    artifacts: A,
    chain: N,
    stage: DeployStage,
}

impl<C, A, N> Deployer<C, A, N>
where
    C: Compiler,
    A: ArtifactSource,
    N: Chain,
{
    pub fn new(compiler: C, artifacts: A, chain: N) -> Self {
        Self {
            compiler,
            artifacts,
            chain,
            stage: DeployStage::Idle,
        }
    }

    pub fn stage(&self) -> DeployStage {
        self.stage
    }

    pub async fn deploy(
        &mut self,
        request: &DeploymentRequest,
    ) -> Result<DeploymentResult, DeployError> {
        let result = self.run(request).await;

        match &result {
            Ok(_) => self.enter(DeployStage::Done),
            Err(e) => {
                tracing::debug!("Deployment failed while {}: {}", e.stage(), e);
                self.enter(DeployStage::Failed);
            }
        }
        debug_assert!(self.stage.is_terminal());

        result
    }

    async fn run(&mut self, request: &DeploymentRequest) -> Result<DeploymentResult, DeployError> {
        self.enter(DeployStage::Compiling);
        let output = self
            .compiler
            .compile()
            .await
            .map_err(|e| DeployError::Compilation(e.into()))?;
        tracing::info!("Compiled {} sources", output.sources);

        self.enter(DeployStage::Resolving);
        let artifact = self.artifacts.resolve(&request.contract).map_err(|e| {
            DeployError::ArtifactResolution {
                contract: request.contract.clone(),
                source: e.into(),
            }
        })?;
        tracing::info!("Resolved {} from {:?}", artifact.name, artifact.path);
        let factory = ContractFactory::new(artifact);

        self.enter(DeployStage::Submitting);
        let tx = factory
            .deploy_transaction()
            .map_err(|e| DeployError::Submission(e.into()))?;
        let tx_hash = self
            .chain
            .submit(tx)
            .await
            .map_err(|e| DeployError::Submission(e.into()))?;
        tracing::info!("Deploying {} in tx {}", factory.contract_name(), tx_hash);

        self.enter(DeployStage::Confirming);
        let receipt = self
            .chain
            .confirm(tx_hash)
            .await
            .map_err(|e| DeployError::Confirmation {
                tx_hash,
                source: e.into(),
            })?;

        Ok(DeploymentResult::new(factory.contract_name(), receipt))
    }

    fn enter(&mut self, stage: DeployStage) {
        tracing::debug!("Deployer {} -> {}", self.stage, stage);
        self.stage = stage;
    }
}
