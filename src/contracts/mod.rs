mod abi;
mod artifact;
mod factory;

pub use artifact::{Artifact, ArtifactRegistry, ArtifactSource};
pub use factory::ContractFactory;
