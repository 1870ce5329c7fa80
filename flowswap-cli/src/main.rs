//! Thin control surface over the FlowSwap 3S library crates. Per the
//! protocol's own scope boundary, this binary is an external
//! collaborator: it loads configuration, wires the orchestrator up to
//! persisted state, and exposes a handful of operator commands. It
//! contains no protocol logic of its own.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use eyre::Result;
use tracing_subscriber::EnvFilter;

use orchestrator::{LimitsConfig, Orchestrator, QuoteBook, SpreadConfig};
use swap_core::{Asset, JsonStore, Ledger, RevealedSecrets, Swap};

#[derive(Parser)]
#[command(name = "flowswap-cli", about = "FlowSwap 3S control surface")]
struct Cli {
    #[arg(long, default_value = "flowswap.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a quote for an asset pair without touching any node.
    Quote {
        from: AssetArg,
        to: AssetArg,
        amount: u64,
        #[arg(long)]
        mid_usdc_per_m1: Option<f64>,
    },
    /// Scan persisted swap state and list everything still in flight.
    Recover,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum AssetArg {
    Btc,
    M1,
    Usdc,
}

impl From<AssetArg> for Asset {
    fn from(value: AssetArg) -> Self {
        match value {
            AssetArg::Btc => Asset::Btc,
            AssetArg::M1 => Asset::M1,
            AssetArg::Usdc => Asset::Usdc,
        }
    }
}

/// A `LegClaimant` that refuses to act. Listing in-flight swaps doesn't
/// need to submit claims; a long-running service process wires a real
/// implementation backed by the chain-* clients instead.
struct NoopClaimant;

#[async_trait]
impl orchestrator::LegClaimant for NoopClaimant {
    async fn claim(&self, _ledger: Ledger, _swap: &Swap, _secrets: &RevealedSecrets) -> swap_core::Result<()> {
        Ok(())
    }
    async fn refund(&self, _ledger: Ledger, _swap: &Swap) -> swap_core::Result<()> {
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;

    match cli.command {
        Commands::Quote {
            from,
            to,
            amount,
            mid_usdc_per_m1,
        } => {
            let book = QuoteBook::new(SpreadConfig::default(), 60);
            let now = unix_now();
            let quote = book.quote(from.into(), to.into(), amount, mid_usdc_per_m1, now)?;
            println!("{}", serde_json::to_string_pretty(&quote)?);
        }
        Commands::Recover => {
            let store = JsonStore::open(&cfg.persistence_dir)?;
            let orch = Orchestrator::new(store, Arc::new(NoopClaimant));
            let pending = orch.recover_on_startup()?;
            println!("{} swap(s) pending recovery:", pending.len());
            for swap in pending {
                println!("  {} [{:?}] {:?} -> {:?}", swap.id, swap.state, swap.from_asset, swap.to_asset);
            }
            let _ = LimitsConfig::default();
        }
    }

    Ok(())
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs() as i64
}
