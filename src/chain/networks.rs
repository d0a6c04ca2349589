pub fn chain_id_to_network(chain_id: u64) -> String {
    match chain_id {
        1 => "mainnet".to_string(),
        4 => "rinkeby".to_string(),
        5 => "goerli".to_string(),
        11155111 => "sepolia".to_string(),
        137 => "polygon".to_string(),
        42161 => "arbitrum".to_string(),
        10 => "optimism".to_string(),
        8453 => "base".to_string(),
        1337 => "hardhat".to_string(),
        31337 => "anvil".to_string(),
        _ => format!("chain-{}", chain_id),
    }
}

/// Block explorer for well-known chains
pub fn default_explorer(chain_id: u64) -> Option<&'static str> {
    match chain_id {
        1 => Some("https://etherscan.io"),
        4 => Some("https://rinkeby.etherscan.io"),
        5 => Some("https://goerli.etherscan.io"),
        11155111 => Some("https://sepolia.etherscan.io"),
        137 => Some("https://polygonscan.com"),
        42161 => Some("https://arbiscan.io"),
        10 => Some("https://optimistic.etherscan.io"),
        8453 => Some("https://basescan.org"),
        _ => None,
    }
}
