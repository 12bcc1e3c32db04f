//! StreetStyle CLI - browse the catalog, manage the cart and check out.
//!
//! # Usage
//!
//! ```bash
//! # List products
//! streetstyle products list
//!
//! # Add two units of product 1 in size M
//! streetstyle cart add 1 --size M --quantity 2
//!
//! # Show the cart with totals
//! streetstyle cart show
//!
//! # Print the WhatsApp order link and empty the cart
//! streetstyle checkout
//! ```
//!
//! Configuration comes from the environment (see
//! `streetstyle_storefront::config`). Logs go to stderr; set `RUST_LOG` to
//! change verbosity.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use streetstyle_core::{ProductId, Size};
use streetstyle_storefront::AppState;
use streetstyle_storefront::cart::LineKey;
use streetstyle_storefront::config::StorefrontConfig;
use streetstyle_storefront::storage::Storage;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "streetstyle")]
#[command(author, version, about = "StreetStyle storefront CLI")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Print the order message and link, then empty the cart
    Checkout {
        /// Print without emptying the cart
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List all products
    List,
    /// List featured products
    Featured,
    /// Show a product's details
    Show {
        /// Product ID
        id: ProductId,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a product
    Add {
        /// Product ID
        id: ProductId,

        /// Size (P, M, G, GG)
        #[arg(short, long)]
        size: Option<Size>,

        /// Number of units
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Add one unit to a line
    Inc(LineArgs),
    /// Remove one unit from a line
    Dec(LineArgs),
    /// Set a line's quantity (0 removes it)
    Set {
        #[command(flatten)]
        line: LineArgs,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove(LineArgs),
    /// Empty the cart
    Clear,
}

#[derive(clap::Args)]
struct LineArgs {
    /// Product ID
    id: ProductId,

    /// Size of the line
    #[arg(short, long)]
    size: Option<Size>,
}

impl LineArgs {
    fn key(&self) -> LineKey {
        LineKey {
            id: self.id.clone(),
            size: self.size.clone(),
        }
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Map tracing levels to Sentry: warnings and errors become events, the
/// rest breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "streetstyle_storefront=info,streetstyle_cli=info".into());

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter));

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(cli.json_logs);
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let _sentry_guard = init_sentry(&config);
    init_tracing(cli.json_logs);

    let result = AppState::from_config(config)
        .map_err(CliError::from)
        .and_then(|mut state| {
            state
                .cart_mut()
                .subscribe(|count| tracing::debug!(item_count = count, "Cart badge updated"));
            run(cli.command, &mut state, &mut std::io::stdout().lock())
        });

    if let Err(e) = result {
        if e.is_internal() {
            sentry::capture_error(&e);
        }
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run<S: Storage>(
    command: Commands,
    state: &mut AppState<S>,
    out: &mut impl Write,
) -> commands::Result {
    match command {
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list(state, out),
            ProductsAction::Featured => commands::products::featured(state, out),
            ProductsAction::Show { id } => commands::products::show(state, &id, out),
        },
        Commands::Cart { action } => match action {
            CartAction::Show { json } => commands::cart::show(state, json, out),
            CartAction::Add { id, size, quantity } => {
                commands::cart::add(state, &id, size, quantity, out)
            }
            CartAction::Inc(line) => commands::cart::change(state, &line.key(), 1, out),
            CartAction::Dec(line) => commands::cart::change(state, &line.key(), -1, out),
            CartAction::Set { line, quantity } => {
                commands::cart::set(state, &line.key(), quantity, out)
            }
            CartAction::Remove(line) => commands::cart::remove(state, &line.key(), out),
            CartAction::Clear => commands::cart::clear(state, out),
        },
        Commands::Checkout { dry_run } => commands::checkout::run(state, dry_run, out),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cart_add() {
        let cli = Cli::try_parse_from(["streetstyle", "cart", "add", "1", "--size", "gg", "-q", "3"])
            .unwrap();
        match cli.command {
            Commands::Cart {
                action: CartAction::Add { id, size, quantity },
            } => {
                assert_eq!(id.as_str(), "1");
                assert_eq!(size.unwrap().as_str(), "GG");
                assert_eq!(quantity, 3);
            }
            _ => panic!("expected cart add"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_size() {
        assert!(Cli::try_parse_from(["streetstyle", "cart", "add", "1", "--size", "extra large"]).is_err());
    }

    #[test]
    fn test_run_dispatches() {
        let mut state = commands::tests::state();
        let cli = Cli::try_parse_from(["streetstyle", "cart", "add", "2", "-s", "M"]).unwrap();
        let mut out = Vec::new();
        run(cli.command, &mut state, &mut out).unwrap();
        assert_eq!(state.cart().item_count(), 1);

        let cli = Cli::try_parse_from(["streetstyle", "cart", "set", "2", "-s", "M", "0"]).unwrap();
        run(cli.command, &mut state, &mut out).unwrap();
        assert!(state.cart().cart().is_empty());
    }
}
