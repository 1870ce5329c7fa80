/// ABI of the deployed 3-secret HTLC contract (§4.4, §6). `claim` is
/// permissionless: any address may call it, but funds always go to the
/// `recipient` recorded at `create` time.
pub const HTLC3S_ABI: &str = r#"[
    {
        "name": "create",
        "type": "function",
        "stateMutability": "nonpayable",
        "inputs": [
            {"name": "recipient", "type": "address"},
            {"name": "token", "type": "address"},
            {"name": "amount", "type": "uint256"},
            {"name": "hUser", "type": "bytes32"},
            {"name": "hLp1", "type": "bytes32"},
            {"name": "hLp2", "type": "bytes32"},
            {"name": "timelock", "type": "uint256"}
        ],
        "outputs": [{"name": "htlcId", "type": "bytes32"}]
    },
    {
        "name": "claim",
        "type": "function",
        "stateMutability": "nonpayable",
        "inputs": [
            {"name": "htlcId", "type": "bytes32"},
            {"name": "sUser", "type": "bytes32"},
            {"name": "sLp1", "type": "bytes32"},
            {"name": "sLp2", "type": "bytes32"}
        ],
        "outputs": []
    },
    {
        "name": "refund",
        "type": "function",
        "stateMutability": "nonpayable",
        "inputs": [{"name": "htlcId", "type": "bytes32"}],
        "outputs": []
    },
    {
        "name": "canClaim",
        "type": "function",
        "stateMutability": "view",
        "inputs": [{"name": "htlcId", "type": "bytes32"}],
        "outputs": [{"name": "", "type": "bool"}]
    },
    {
        "name": "canRefund",
        "type": "function",
        "stateMutability": "view",
        "inputs": [{"name": "htlcId", "type": "bytes32"}],
        "outputs": [{"name": "", "type": "bool"}]
    },
    {
        "name": "getHTLC",
        "type": "function",
        "stateMutability": "view",
        "inputs": [{"name": "htlcId", "type": "bytes32"}],
        "outputs": [
            {"name": "sender", "type": "address"},
            {"name": "recipient", "type": "address"},
            {"name": "token", "type": "address"},
            {"name": "amount", "type": "uint256"},
            {"name": "hUser", "type": "bytes32"},
            {"name": "hLp1", "type": "bytes32"},
            {"name": "hLp2", "type": "bytes32"},
            {"name": "timelock", "type": "uint256"},
            {"name": "status", "type": "uint8"}
        ]
    },
    {
        "name": "HTLCCreated",
        "type": "event",
        "inputs": [
            {"name": "htlcId", "type": "bytes32", "indexed": true},
            {"name": "sender", "type": "address", "indexed": true},
            {"name": "recipient", "type": "address", "indexed": true},
            {"name": "token", "type": "address", "indexed": false},
            {"name": "amount", "type": "uint256", "indexed": false},
            {"name": "hUser", "type": "bytes32", "indexed": false},
            {"name": "hLp1", "type": "bytes32", "indexed": false},
            {"name": "hLp2", "type": "bytes32", "indexed": false},
            {"name": "timelock", "type": "uint256", "indexed": false}
        ]
    },
    {
        "name": "HTLCClaimed",
        "type": "event",
        "inputs": [
            {"name": "htlcId", "type": "bytes32", "indexed": true},
            {"name": "sUser", "type": "bytes32", "indexed": false},
            {"name": "sLp1", "type": "bytes32", "indexed": false},
            {"name": "sLp2", "type": "bytes32", "indexed": false}
        ]
    },
    {
        "name": "HTLCRefunded",
        "type": "event",
        "inputs": [{"name": "htlcId", "type": "bytes32", "indexed": true}]
    }
]"#;

/// Minimal ERC-20 surface needed to approve the HTLC contract as a
/// spender before calling `create`.
pub const ERC20_ABI: &str = r#"[
    {
        "name": "approve",
        "type": "function",
        "stateMutability": "nonpayable",
        "inputs": [
            {"name": "spender", "type": "address"},
            {"name": "amount", "type": "uint256"}
        ],
        "outputs": [{"name": "", "type": "bool"}]
    },
    {
        "name": "allowance",
        "type": "function",
        "stateMutability": "view",
        "inputs": [
            {"name": "owner", "type": "address"},
            {"name": "spender", "type": "address"}
        ],
        "outputs": [{"name": "", "type": "uint256"}]
    },
    {
        "name": "balanceOf",
        "type": "function",
        "stateMutability": "view",
        "inputs": [{"name": "account", "type": "address"}],
        "outputs": [{"name": "", "type": "uint256"}]
    }
]"#;
