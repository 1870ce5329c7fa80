//! Small value types shared across the HTLC engine.

use bitcoin::Network;

/// The bech32 human-readable prefix for a network: `"bc"` mainnet, `"tb"`
/// testnet/signet, `"bcrt"` regtest.
pub fn hrp_for_network(network: Network) -> &'static str {
    match network {
        Network::Bitcoin => "bc",
        Network::Testnet | Network::Signet => "tb",
        Network::Regtest => "bcrt",
        _ => "bc",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainnet_uses_bc_prefix() {
        assert_eq!(hrp_for_network(Network::Bitcoin), "bc");
    }

    #[test]
    fn testnet_and_signet_share_tb_prefix() {
        assert_eq!(hrp_for_network(Network::Testnet), "tb");
        assert_eq!(hrp_for_network(Network::Signet), "tb");
    }
}
