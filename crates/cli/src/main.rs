//! RocketShoes CLI - drive the shopping cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! rs-cart show
//!
//! # Add one unit of product 3
//! rs-cart add 3
//!
//! # Set product 3 to two units
//! rs-cart update 3 2
//!
//! # Remove product 3
//! rs-cart remove 3
//!
//! # Forget the saved cart
//! rs-cart clear
//! ```
//!
//! Configuration comes from `ROCKETSHOES_*` environment variables (see
//! `rocketshoes_storefront::config`). Set `ROCKETSHOES_LOG_FORMAT=json` for
//! JSON log lines on stderr. Rejected operations are reported as
//! warnings and leave the cart unchanged.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocketshoes_core::ProductId;
use rocketshoes_storefront::StorefrontConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "rs-cart")]
#[command(author, version, about = "RocketShoes shopping cart")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Catalog product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Catalog product ID
        product_id: ProductId,
    },
    /// Set the number of units of a product already in the cart
    Update {
        /// Catalog product ID
        product_id: ProductId,

        /// New number of units
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Delete the saved cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Defaults to user-facing notices plus our own info logs if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketshoes=warn,rocketshoes_storefront=warn,rocketshoes_cli=info".into());

    // JSON lines when a log collector asks for them, plain text otherwise
    let is_json = std::env::var("ROCKETSHOES_LOG_FORMAT").is_ok_and(|format| format == "json");
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = StorefrontConfig::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    if matches!(cli.command, Commands::Clear) {
        return commands::cart::clear(&config).await;
    }

    let store = commands::cart::open(&config).await?;
    match cli.command {
        Commands::Show | Commands::Clear => {}
        Commands::Add { product_id } => store.add_product(product_id).await,
        Commands::Remove { product_id } => store.remove_product(product_id).await,
        Commands::Update { product_id, amount } => {
            commands::cart::update(&store, product_id, amount).await;
        }
    }

    commands::cart::print(&store.cart());
    Ok(())
}
