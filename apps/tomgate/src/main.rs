//! # tomgate - Lifecycle Phase Engine
//!
//! The main binary for the tomgate phase engine.
//!
//! This application provides:
//! - HTTP evaluation API (axum-based, stateless)
//! - CLI interface over every engine operation
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │               apps/tomgate (THE BINARY)             │
//! │                                                     │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐  │
//! │  │    CLI      │  │  HTTP API   │  │   Config    │  │
//! │  │   (clap)    │  │   (axum)    │  │   loader    │  │
//! │  └──────┬──────┘  └──────┬──────┘  └──────┬──────┘  │
//! │         └────────────────┼────────────────┘         │
//! │                          ▼                          │
//! │                  ┌───────────────┐                  │
//! │                  │ tomgate-core  │                  │
//! │                  │  (THE LOGIC)  │                  │
//! │                  └───────────────┘                  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Write the default configuration, then serve it
//! tomgate init
//! tomgate serve --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! tomgate phases --preset hybrid
//! tomgate derive --status Pilot --deployment Production
//! tomgate readiness -i item.json
//! tomgate summary -i items.json --json-mode
//! ```

use clap::Parser;
use tomgate::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // TOMGATE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("TOMGATE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tomgate=info,tower_http=debug".into());

    // Logs go to stderr so --json-mode output on stdout stays parseable.
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

/// Print the tomgate startup banner.
fn print_banner() {
    println!(
        r#"
  ┌┬┐┌─┐┌┬┐┌─┐┌─┐┌┬┐┌─┐
   │ │ ││││││ ┬├─┤ │ ├┤
   ┴ └─┘┴ ┴└─┘┴ ┴ ┴ └─┘

  Lifecycle Phase Engine v{}

  Derived • Gated • Auditable
"#,
        env!("CARGO_PKG_VERSION")
    );
}
