use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};

const SOURCE_SUFFIX: &str = ".sol";
const TEST_SUFFIX: &str = ".t.sol";
const SCRIPT_SUFFIX: &str = ".s.sol";

/// Collect Solidity sources below `dir`, leaving out forge tests and scripts
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();

    if !dir.exists() {
        tracing::info!("Source directory does not exist: {:?}", dir);
        return Ok(sources);
    }

    scan_dir(dir, &mut sources)?;
    sources.sort();

    tracing::info!("Found {} contract sources", sources.len());
    Ok(sources)
}

fn scan_dir(dir: &Path, sources: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).wrap_err_with(|| format!("Failed to read {:?}", dir))?;

    for entry in entries.flatten() {
        let path = entry.path();

        if path.is_dir() {
            scan_dir(&path, sources)?;
        } else if path
            .file_name()
            .is_some_and(|n| is_contract_source(&n.to_string_lossy()))
        {
            sources.push(path);
        }
    }

    Ok(())
}

fn is_contract_source(file_name: &str) -> bool {
    file_name.ends_with(SOURCE_SUFFIX)
        && !file_name.ends_with(TEST_SUFFIX)
        && !file_name.ends_with(SCRIPT_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_contract_source() {
        assert!(is_contract_source("Mover.sol"));
        assert!(!is_contract_source("Mover.t.sol"));
        assert!(!is_contract_source("Deploy.s.sol"));
        assert!(!is_contract_source("Mover.json"));
    }

    #[test]
    fn test_discover_prunes_tests() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("test")).unwrap();
        fs::write(dir.path().join("Mover.sol"), "contract Mover {}").unwrap();
        fs::write(dir.path().join("test/Mover.t.sol"), "contract MoverTest {}").unwrap();
        fs::write(dir.path().join("test/Helper.sol"), "contract Helper {}").unwrap();

        let sources = discover(dir.path()).unwrap();
        assert_eq!(
            sources,
            vec![
                dir.path().join("Mover.sol"),
                dir.path().join("test/Helper.sol")
            ]
        );
    }

    #[test]
    fn test_discover_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(&dir.path().join("contracts")).unwrap().is_empty());
    }
}
