mod sources;
mod toolchain;

pub use toolchain::ToolchainCompiler;

use eyre::Result;

/// Summary of a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    pub sources: usize,
}

/// Turns contract sources into artifacts
pub trait Compiler {
    /// Rebuild every artifact; must finish before any artifact is resolved
    async fn compile(&self) -> Result<CompileOutput>;
}
