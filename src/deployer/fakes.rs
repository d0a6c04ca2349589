//! In-memory collaborators for exercising a [`Deployer`](super::Deployer).

use std::cell::Cell;
use std::path::PathBuf;

use alloy::primitives::{Address, Bytes, TxHash, TxKind};
use alloy::rpc::types::TransactionRequest;
use eyre::{Result, eyre};

use crate::chain::{Chain, DeploymentReceipt};
use crate::compiler::{CompileOutput, Compiler};
use crate::contracts::{Artifact, ArtifactSource};

#[derive(Default)]
pub struct FakeCompiler {
    pub fail: bool,
    pub calls: Cell<usize>,
}

impl Compiler for FakeCompiler {
    async fn compile(&self) -> Result<CompileOutput> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(eyre!("ParserError: Expected ';' but got '}}'"));
        }
        Ok(CompileOutput { sources: 1 })
    }
}

pub struct FakeArtifacts {
    pub available: Vec<&'static str>,
    pub calls: Cell<usize>,
}

impl FakeArtifacts {
    pub fn with(available: &[&'static str]) -> Self {
        Self {
            available: available.to_vec(),
            calls: Cell::new(0),
        }
    }
}

impl ArtifactSource for FakeArtifacts {
    fn resolve(&self, name: &str) -> Result<Artifact> {
        self.calls.set(self.calls.get() + 1);
        if !self.available.contains(&name) {
            return Err(eyre!("No artifact for contract '{}'", name));
        }
        Ok(Artifact {
            name: name.to_string(),
            path: PathBuf::from(format!("out/{0}.sol/{0}.json", name)),
            abi: Default::default(),
            bytecode: Bytes::from_static(&[0x60, 0x80, 0x60, 0x40]),
        })
    }
}

/// Hands out tx hashes and addresses ending in a running nonce
#[derive(Default)]
pub struct FakeChain {
    pub reject_submit: bool,
    pub reject_confirm: bool,
    pub nonce: Cell<u8>,
    pub submitted: Cell<usize>,
    pub confirmed: Cell<usize>,
}

impl Chain for FakeChain {
    async fn submit(&self, tx: TransactionRequest) -> Result<TxHash> {
        assert_eq!(tx.to, Some(TxKind::Create));
        if self.reject_submit {
            return Err(eyre!("insufficient funds for gas * price + value"));
        }
        self.submitted.set(self.submitted.get() + 1);
        let nonce = self.nonce.get() + 1;
        self.nonce.set(nonce);
        Ok(TxHash::with_last_byte(nonce))
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<DeploymentReceipt> {
        if self.reject_confirm {
            return Err(eyre!("Transaction {} reverted", tx_hash));
        }
        self.confirmed.set(self.confirmed.get() + 1);
        Ok(DeploymentReceipt {
            address: Address::with_last_byte(tx_hash[31]),
            tx_hash,
            block_number: Some(1),
            gas_used: 21_000,
            effective_gas_price: 1,
        })
    }
}
