//! # Metaval - Contract Lifecycle Dashboard
//!
//! The main binary for the Metaval workflow engine.
//!
//! This application provides:
//! - Interactive shell over the dashboard modules
//! - One-shot commands for drafts, workflow walks and contract search
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 apps/metaval (THE BINARY)                │
//! │                                                          │
//! │  ┌───────────┐   ┌─────────────┐   ┌─────────────────┐  │
//! │  │   CLI     │   │    Shell    │   │  Config / Logs  │  │
//! │  │  (clap)   │   │ (tokio loop)│   │ (toml, tracing) │  │
//! │  └─────┬─────┘   └──────┬──────┘   └────────┬────────┘  │
//! │        └────────────────┼───────────────────┘           │
//! │                         ▼                               │
//! │                 ┌───────────────┐                       │
//! │                 │ metaval-core  │                       │
//! │                 │ (THE LOGIC)   │                       │
//! │                 └───────────────┘                       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Interactive session
//! metaval shell --page requests
//!
//! # One-shot commands
//! metaval draft --set contract_name="Valve Supply" --set contract_type=MSA
//! metaval walk --name "Valve Supply" --contract-type MSA
//! metaval search --view expiring
//! ```

use clap::Parser;
use metaval::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // METAVAL_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("METAVAL_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "metaval=info".into());

    // Logs go to stderr; stdout carries command output.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Metaval startup banner.
fn print_banner() {
    println!(
        r#"
  ███╗   ███╗███████╗████████╗ █████╗ ██╗   ██╗ █████╗ ██╗
  ████╗ ████║██╔════╝╚══██╔══╝██╔══██╗██║   ██║██╔══██╗██║
  ██╔████╔██║█████╗     ██║   ███████║██║   ██║███████║██║
  ██║╚██╔╝██║██╔══╝     ██║   ██╔══██║╚██╗ ██╔╝██╔══██║██║
  ██║ ╚═╝ ██║███████╗   ██║   ██║  ██║ ╚████╔╝ ██║  ██║███████╗
  ╚═╝     ╚═╝╚══════╝   ╚═╝   ╚═╝  ╚═╝  ╚═══╝  ╚═╝  ╚═╝╚══════╝

  Contract Lifecycle Dashboard v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
