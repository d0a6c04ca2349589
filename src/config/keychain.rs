use eyre::{Result, WrapErr};
use keyring::Entry;
use zeroize::Zeroizing;

const SERVICE_NAME: &str = "mover-deploy";

/// Read-only access to secrets in the OS keychain
pub struct KeychainManager {
    service: String,
}

impl KeychainManager {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    pub fn with_service(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    /// Build a manager from a `service:key` reference.
    /// A bare `key` uses the default service.
    pub fn from_reference(reference: &str) -> (Self, String) {
        match reference.split_once(':') {
            Some((service, key)) if !service.is_empty() => {
                (Self::with_service(service), key.to_string())
            }
            _ => (Self::new(), reference.to_string()),
        }
    }

    /// Retrieve a secret from the keychain
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = Entry::new(&self.service, key)
            .wrap_err_with(|| format!("Failed to access keychain entry for {}", key))?;

        match entry.get_password() {
            Ok(password) => Ok(Some(password)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).wrap_err_with(|| format!("Failed to retrieve secret for {}", key)),
        }
    }

    /// Retrieve a secret with zeroization for sensitive data
    pub fn get_zeroizing(&self, key: &str) -> Result<Option<Zeroizing<String>>> {
        self.get(key).map(|opt| opt.map(Zeroizing::new))
    }
}

impl Default for KeychainManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that a private key is 64 hex characters, with or without 0x prefix
pub fn validate_private_key(key: &str) -> Result<()> {
    let clean_key = key.trim();
    let clean_key = clean_key.strip_prefix("0x").unwrap_or(clean_key);
    if clean_key.len() != 64 || hex::decode(clean_key).is_err() {
        return Err(eyre::eyre!(
            "Invalid private key format: expected 64 hex characters"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_parsing() {
        let (km, key) = KeychainManager::from_reference("deployer:wallet_dev");
        assert_eq!(km.service, "deployer");
        assert_eq!(key, "wallet_dev");

        let (km, key) = KeychainManager::from_reference("wallet_dev");
        assert_eq!(km.service, SERVICE_NAME);
        assert_eq!(key, "wallet_dev");
    }

    #[test]
    fn test_validate_private_key() {
        let key = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        assert!(validate_private_key(key).is_ok());
        assert!(validate_private_key(&format!("0x{}", key)).is_ok());
        assert!(validate_private_key(&"1".repeat(63)).is_err());
        assert!(validate_private_key(&"z".repeat(64)).is_err());
    }

    // Requires keychain access and may prompt for permissions
    #[test]
    #[ignore]
    fn test_keychain_missing_entry() {
        let km = KeychainManager::new();
        assert_eq!(km.get("mover_deploy_missing_entry").unwrap(), None);
    }
}
