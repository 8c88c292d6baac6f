//! Cheesecake Cart CLI - drive the cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add a product from the listing
//! cart add cheesecake-1 --name "New York" --price "450₽" --image /img/ny.jpg
//!
//! # Change quantities
//! cart inc cheesecake-1
//! cart dec cheesecake-1 --by 2
//!
//! # Remove a line, show the cart, check out
//! cart remove cheesecake-1
//! cart show
//! cart checkout
//! ```
//!
//! The cart is kept in `$CART_STORAGE_DIR/$CART_STORAGE_KEY.json`, so each
//! invocation sees the previous one's cart.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cheesecake_cart::ProductCard;

mod commands;
mod config;

use commands::CliError;
use commands::cart::Action;
use config::CliConfig;

#[derive(Parser)]
#[command(name = "cart")]
#[command(author, version, about = "Cheesecake Cart CLI")]
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
        /// Product ID
        id: String,

        /// Product display name
        #[arg(short, long)]
        name: String,

        /// Price label as shown in the listing (e.g. "450₽")
        #[arg(short, long)]
        price: String,

        /// Product image URL
        #[arg(short, long, default_value = "")]
        image: String,
    },
    /// Increase an item's quantity
    Inc {
        /// Product ID
        id: String,

        #[arg(short, long, default_value_t = 1)]
        by: u32,
    },
    /// Decrease an item's quantity (removes it at zero)
    Dec {
        /// Product ID
        id: String,

        #[arg(short, long, default_value_t = 1)]
        by: u32,
    },
    /// Remove an item
    Remove {
        /// Product ID
        id: String,
    },
    /// Proceed to checkout
    Checkout,
}

impl From<Commands> for Action {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Show => Self::Show,
            Commands::Add {
                id,
                name,
                price,
                image,
            } => Self::Add(ProductCard::new(id, name, price, image)),
            Commands::Inc { id, by } => Self::ChangeQuantity {
                id,
                delta: i64::from(by),
            },
            Commands::Dec { id, by } => Self::ChangeQuantity {
                id,
                delta: -i64::from(by),
            },
            Commands::Remove { id } => Self::Remove { id },
            Commands::Checkout => Self::Checkout,
        }
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CliConfig) -> Option<sentry::ClientInitGuard> {
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

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Filter used when `RUST_LOG` is unset. The binary's target is `cart`;
/// the library stays at warn so command output stays readable.
const DEFAULT_LOG_FILTER: &str = "cart=info,cheesecake_cart=warn";

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

fn report_failure(error: &CliError) {
    tracing::error!("Command failed: {error}");
}

fn main() {
    let cli = Cli::parse();

    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            report_failure(&CliError::from(e));
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = init_sentry(&config);
    init_tracing();

    let result = commands::cart::run(
        Action::from(cli.command),
        &config.cart,
        &mut std::io::stdout().lock(),
    );

    if let Err(e) = result {
        report_failure(&e);
        // Flush pending Sentry events; process::exit skips destructors
        drop(sentry_guard);
        std::process::exit(1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use cheesecake_cart::CartError;
    use cheesecake_cart::config::ConfigError;
    use tracing_subscriber::EnvFilter;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn logged_under_default_filter(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(DEFAULT_LOG_FILTER))
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_command_failure_is_logged_by_default() {
        let output = logged_under_default_filter(|| {
            report_failure(&CliError::Cart(CartError::CartEmpty));
        });
        assert!(output.contains("Command failed: Your cart is empty!"), "{output}");
    }

    #[test]
    fn test_config_failure_is_logged_by_default() {
        let error = ConfigError::InvalidEnvVar(
            "CART_STORAGE_DIR".to_string(),
            "must not be empty".to_string(),
        );
        let output = logged_under_default_filter(|| {
            report_failure(&CliError::from(error));
        });
        assert!(output.contains("Configuration error"), "{output}");
        assert!(output.contains("CART_STORAGE_DIR"), "{output}");
    }

    #[test]
    fn test_commands_map_to_actions() {
        let cli = Cli::try_parse_from(["cart", "dec", "cheesecake-1", "--by", "2"]).unwrap();
        assert!(matches!(
            Action::from(cli.command),
            Action::ChangeQuantity { ref id, delta: -2 } if id == "cheesecake-1"
        ));
    }
}
