use std::fs;
use std::path::{Path, PathBuf};

use alloy::primitives::Bytes;
use eyre::{Result, WrapErr, eyre};
use serde_json::Value;

use super::abi::{ContractAbi, function_signature, parse_abi};

/// Compiled contract ready to be turned into a factory
#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub path: PathBuf,
    pub abi: ContractAbi,
    pub bytecode: Bytes,
}

/// Lookup of compiled contracts by name
pub trait ArtifactSource {
    /// Resolve `Name` or a fully qualified `path/File.sol:Name`
    fn resolve(&self, name: &str) -> Result<Artifact>;
}

/// Reads artifacts written by forge (`out/`) or Hardhat (`artifacts/`).
///
/// Both toolchains lay artifacts out as `<source path>/<File>.sol/<Name>.json`;
/// forge flattens the source path away, Hardhat keeps it.
pub struct ArtifactRegistry {
    out_dir: PathBuf,
}

impl ArtifactRegistry {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    fn candidates(&self, source: Option<&str>, contract: &str) -> Result<Vec<PathBuf>> {
        if !self.out_dir.exists() {
            return Err(eyre!(
                "Artifact directory {:?} does not exist",
                self.out_dir
            ));
        }

        let file_name = format!("{}.json", contract);
        let mut found = Vec::new();
        collect_artifacts(&self.out_dir, &file_name, &mut found)?;

        if let Some(source) = source {
            let source = Path::new(source);
            // forge keeps only the file name of the source, Hardhat the full path
            found.retain(|path| {
                path.parent().is_some_and(|dir| {
                    dir.ends_with(source)
                        || (dir.parent() == Some(self.out_dir.as_path())
                            && dir.file_name() == source.file_name())
                })
            });
        }

        found.sort();
        Ok(found)
    }
}

impl ArtifactSource for ArtifactRegistry {
    fn resolve(&self, name: &str) -> Result<Artifact> {
        let (source, contract) = match name.rsplit_once(':') {
            Some((source, contract)) => (Some(source), contract),
            None => (None, name),
        };

        let candidates = self.candidates(source, contract)?;

        let path = match candidates.as_slice() {
            [] => {
                return Err(eyre!(
                    "No artifact for contract '{}' found in {:?}",
                    name,
                    self.out_dir
                ));
            }
            [path] => path,
            many => {
                let names: Vec<String> = many
                    .iter()
                    .map(|p| qualified_name(&self.out_dir, p, contract))
                    .collect();
                return Err(eyre!(
                    "Multiple artifacts match '{}', use a fully qualified name:\n  {}",
                    name,
                    names.join("\n  ")
                ));
            }
        };

        load_artifact(contract, path)
    }
}

fn collect_artifacts(dir: &Path, file_name: &str, found: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).wrap_err_with(|| format!("Failed to read {:?}", dir))?;

    for entry in entries.flatten() {
        let path = entry.path();

        if path.is_dir() {
            if path.file_name().is_some_and(|n| n == "build-info") {
                continue;
            }
            collect_artifacts(&path, file_name, found)?;
        } else if path.file_name().is_some_and(|n| n == file_name)
            && path
                .parent()
                .and_then(|p| p.extension())
                .is_some_and(|ext| ext == "sol")
        {
            found.push(path);
        }
    }

    Ok(())
}

/// `path/File.sol:Name` relative to the artifact directory
fn qualified_name(out_dir: &Path, artifact: &Path, contract: &str) -> String {
    let source = artifact
        .parent()
        .map(|dir| dir.strip_prefix(out_dir).unwrap_or(dir))
        .unwrap_or(artifact);
    format!("{}:{}", source.display(), contract)
}

pub fn load_artifact(name: &str, path: &Path) -> Result<Artifact> {
    let content =
        fs::read_to_string(path).wrap_err_with(|| format!("Failed to read {:?}", path))?;

    let artifact: Value = serde_json::from_str(&content)
        .wrap_err_with(|| format!("Failed to parse {:?}", path))?;

    let abi = artifact
        .get("abi")
        .ok_or_else(|| eyre!("Artifact {:?} has no ABI", path))?;
    let abi = parse_abi(abi).wrap_err_with(|| format!("Invalid ABI in {:?}", path))?;

    let bytecode = artifact_bytecode(&artifact)
        .ok_or_else(|| eyre!("Artifact {:?} has no bytecode", path))?;
    let bytecode = decode_bytecode(name, bytecode)?;

    tracing::debug!(
        "Loaded {} from {:?}: {} bytes, functions [{}]",
        name,
        path,
        bytecode.len(),
        abi.functions
            .iter()
            .map(function_signature)
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(Artifact {
        name: name.to_string(),
        path: path.to_path_buf(),
        abi,
        bytecode,
    })
}

/// Creation bytecode, `bytecode.object` for forge and `bytecode` for Hardhat
fn artifact_bytecode(artifact: &Value) -> Option<&str> {
    match artifact.get("bytecode")? {
        Value::String(s) => Some(s),
        obj => obj.get("object")?.as_str(),
    }
}

fn decode_bytecode(name: &str, bytecode: &str) -> Result<Bytes> {
    let hex_str = bytecode.strip_prefix("0x").unwrap_or(bytecode);

    if hex_str.is_empty() {
        return Err(eyre!(
            "Contract '{}' is abstract or an interface and cannot be deployed",
            name
        ));
    }

    // Library placeholders look like __$<hash>$__ or __LibName______
    if hex_str.contains("__") {
        return Err(eyre!(
            "Contract '{}' has unlinked library references in its bytecode",
            name
        ));
    }

    let bytes = hex::decode(hex_str)
        .wrap_err_with(|| format!("Invalid bytecode for contract '{}'", name))?;
    Ok(Bytes::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVER_ABI: &str = r#"[{"type":"function","name":"move","inputs":[],"outputs":[],"stateMutability":"nonpayable"}]"#;

    fn write_artifact(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn hardhat_artifact(bytecode: &str) -> String {
        format!(
            r#"{{"contractName":"Mover","abi":{},"bytecode":"{}"}}"#,
            MOVER_ABI, bytecode
        )
    }

    #[test]
    fn test_resolve_foundry_artifact() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(
            dir.path(),
            "Mover.sol/Mover.json",
            &format!(
                r#"{{"abi":{},"bytecode":{{"object":"0x6080604052"}}}}"#,
                MOVER_ABI
            ),
        );

        let artifact = ArtifactRegistry::new(dir.path()).resolve("Mover").unwrap();
        assert_eq!(artifact.name, "Mover");
        assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x80, 0x60, 0x40, 0x52]);
        assert_eq!(artifact.abi.functions.len(), 1);
    }

    #[test]
    fn test_resolve_hardhat_artifact_skips_debug_files() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(
            dir.path(),
            "contracts/Mover.sol/Mover.json",
            &hardhat_artifact("0x6080"),
        );
        write_artifact(
            dir.path(),
            "contracts/Mover.sol/Mover.dbg.json",
            r#"{"buildInfo":"../../build-info/abc.json"}"#,
        );
        write_artifact(dir.path(), "build-info/abc.json", "{}");

        let artifact = ArtifactRegistry::new(dir.path()).resolve("Mover").unwrap();
        assert!(artifact.path.ends_with("contracts/Mover.sol/Mover.json"));
    }

    #[test]
    fn test_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(
            dir.path(),
            "contracts/Other.sol/Other.json",
            &hardhat_artifact("0x6080"),
        );

        let err = ArtifactRegistry::new(dir.path())
            .resolve("Mover")
            .unwrap_err();
        assert!(err.to_string().contains("No artifact"));

        assert!(
            ArtifactRegistry::new(dir.path().join("missing"))
                .resolve("Mover")
                .is_err()
        );
    }

    #[test]
    fn test_ambiguous_and_qualified_names() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(
            dir.path(),
            "contracts/Mover.sol/Mover.json",
            &hardhat_artifact("0x6080"),
        );
        write_artifact(
            dir.path(),
            "contracts/legacy/Mover.sol/Mover.json",
            &hardhat_artifact("0x6081"),
        );

        let registry = ArtifactRegistry::new(dir.path());
        let err = registry.resolve("Mover").unwrap_err();
        assert!(err.to_string().contains("contracts/legacy/Mover.sol:Mover"));

        let artifact = registry
            .resolve("contracts/legacy/Mover.sol:Mover")
            .unwrap();
        assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x81]);
    }

    #[test]
    fn test_undeployable_bytecode() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(
            dir.path(),
            "contracts/Mover.sol/Mover.json",
            &hardhat_artifact("0x"),
        );
        let err = ArtifactRegistry::new(dir.path())
            .resolve("Mover")
            .unwrap_err();
        assert!(err.to_string().contains("abstract"));

        write_artifact(
            dir.path(),
            "contracts/Mover.sol/Mover.json",
            &hardhat_artifact("0x6080__$1234567890abcdef1234567890abcdef12$__6080"),
        );
        let err = ArtifactRegistry::new(dir.path())
            .resolve("Mover")
            .unwrap_err();
        assert!(err.to_string().contains("unlinked"));
    }
}
