//! Euclid Swap Runner CLI
//!
//! Command-line interface for running swap batches against the Euclid testnet.

use clap::{Parser, Subcommand};
use euclid_swap_runner::{Config, Error, Result};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "euclid-swap")]
#[command(about = "Automated ETH swaps on the Euclid testnet")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive swap loop
    Run,

    /// Get a single swap quote without signing anything
    Quote {
        /// Destination token (euclid, andr)
        #[arg(short, long, default_value = "euclid")]
        swap: String,

        /// ETH amount to swap
        #[arg(short, long)]
        amount: String,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Run => run_swaps(config).await?,
        Commands::Quote { swap, amount } => run_quote(config, swap, amount).await?,
        Commands::Config => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
    }

    Ok(())
}

async fn run_swaps(config: Config) -> Result<()> {
    use euclid_swap_runner::api::EuclidClient;
    use euclid_swap_runner::chain::EnvConnector;
    use euclid_swap_runner::console::StdConsole;
    use euclid_swap_runner::{RpcConfig, SwapRunner, PRIVATE_KEY_ENV};

    // The key is loaded by the runner once the operator has entered a plan
    let rpc = RpcConfig::resolve(config.network.chain_id, config.network.rpc_url.as_deref());
    let connector = EnvConnector::new(rpc, PRIVATE_KEY_ENV);
    let api = EuclidClient::new(&config.api, config.retry)?;

    let runner = SwapRunner::new(config, connector, api, StdConsole::new());
    runner.run().await?;
    Ok(())
}

async fn run_quote(config: Config, swap: String, amount: String) -> Result<()> {
    use alloy::primitives::Address;
    use euclid_swap_runner::amount::parse_ether;
    use euclid_swap_runner::api::{EuclidClient, SwapApi};
    use euclid_swap_runner::swap::{SwapKind, SwapRequest};
    use euclid_swap_runner::wallet::SecureWallet;
    use euclid_swap_runner::PRIVATE_KEY_ENV;

    let kind: SwapKind = swap.parse()?;
    let amount_in = parse_ether(&amount)?;
    if amount_in.is_zero() {
        return Err(Error::InvalidArgument("Amount must be positive".to_string()));
    }

    // Quotes only need an address, not a signer
    let sender = match SecureWallet::from_env(PRIVATE_KEY_ENV) {
        Ok(wallet) => wallet.address(),
        Err(_) => {
            tracing::warn!("No {} set - quoting for the zero address", PRIVATE_KEY_ENV);
            Address::ZERO
        }
    };

    let api = EuclidClient::new(&config.api, config.retry)?;
    let request = SwapRequest::for_quote(&config.swap, kind, sender, amount_in)?;
    let quote = api.quote(&request).await?;
    let amount_out = quote.amount_out(kind.profile().default_amount_out)?;

    println!("Swap: {}", kind);
    println!("Amount in: {} ETH", amount);
    println!(
        "Amount out: {}{}",
        amount_out.value(),
        if amount_out.is_default() {
            " (default estimate)"
        } else {
            ""
        }
    );
    for hop in kind.profile().hops {
        println!("  {}: {}", hop.token, hop.apply(amount_out.value())?);
    }

    Ok(())
}
