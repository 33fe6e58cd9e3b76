//! Carrito CLI - drive the cart widget against a file-backed store.
//!
//! The store file plays the role of the browser's origin storage, so two
//! terminals sharing it behave like two tabs.
//!
//! # Usage
//!
//! ```bash
//! # Add two units of an item
//! carrito add --name Widget --price 1000 --quantity 2
//!
//! # Render the counter and summary
//! carrito show
//!
//! # Re-render whenever another process changes the cart
//! carrito watch
//! ```
//!
//! # Environment Variables
//!
//! - `CARRITO_STORAGE_FILE` - Store file (default `.carrito.json`)
//! - `CARRITO_LOG_FORMAT` - `json` for structured logs, text otherwise
//! - `RUST_LOG` - Log filter
//! - `CARRITO_*` - Widget settings, see `WidgetConfig::from_env`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::time::Duration;

use carrito_widget::{BuyAttributes, WidgetConfig};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "carrito")]
#[command(author, version, about = "Shopping cart widget driver")]
struct Cli {
    /// File holding the persisted storage entries
    #[arg(long, env = "CARRITO_STORAGE_FILE", default_value = ".carrito.json")]
    storage: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Click a buy control carrying the given attributes
    Add {
        /// Item name (`data-nombre`)
        #[arg(short, long)]
        name: Option<String>,

        /// Unit price (`data-precio`)
        #[arg(short, long)]
        price: Option<String>,

        /// Units to add (`data-cantidad`)
        #[arg(short, long)]
        quantity: Option<String>,

        /// Image reference (`data-imagen`)
        #[arg(short, long)]
        image: Option<String>,
    },
    /// Render the counter and summary for the persisted cart
    Show,
    /// Re-render whenever the store file changes
    Watch {
        /// Polling interval in milliseconds
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so the rendered page stays alone on stdout.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "carrito_widget=info,carrito_cli=info".into());

    let json = std::env::var("CARRITO_LOG_FORMAT").is_ok_and(|format| format == "json");
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = WidgetConfig::from_env()?;

    match cli.command {
        Commands::Add {
            name,
            price,
            quantity,
            image,
        } => {
            let attributes = BuyAttributes {
                name,
                price,
                quantity,
                image,
            };
            let page = commands::add::run(config, &cli.storage, &attributes)?;
            commands::print_page(&page);
        }
        Commands::Show => {
            let page = commands::show::run(config, &cli.storage);
            commands::print_page(&page);
        }
        Commands::Watch { interval_ms } => {
            commands::watch::run(config, &cli.storage, Duration::from_millis(interval_ms)).await?;
        }
    }
    Ok(())
}
