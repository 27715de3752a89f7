use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use cart_client::{
    CartActionClient, CartOutcome, CartRow, CsrfTokenSource, HttpCartTransport, StaticRow,
};
use clap::{Args, Parser, Subcommand};
use shared::domain::CartAction;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

mod config;
mod display;

use config::{load_settings, Settings};
use display::TerminalDisplay;

#[derive(Parser, Debug)]
#[command(name = "cart-cli", about = "Add or update store cart lines from the terminal")]
struct Cli {
    #[arg(long, default_value = "cart.toml")]
    config: PathBuf,
    /// Page URL that relative endpoints are resolved against.
    #[arg(long)]
    base_url: Option<String>,
    /// Cookies to send, e.g. "sessionid=...; csrftoken=...".
    #[arg(long)]
    cookie: Option<String>,
    /// Page to load first so the server issues a CSRF cookie.
    #[arg(long)]
    session_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a product line; skipped when both quantities are empty.
    Add(RowArgs),
    /// Update a cart line; always sent.
    Update(RowArgs),
    /// Print the CSRF token that would be sent.
    Token,
}

#[derive(Args, Debug)]
struct RowArgs {
    #[arg(long)]
    product_id: String,
    /// Defaults to the configured endpoint_url.
    #[arg(long)]
    endpoint: Option<String>,
    #[arg(long, default_value = "")]
    item_quantity: String,
    #[arg(long, default_value = "")]
    package_quantity: String,
    #[arg(long, default_value = "")]
    item_price: String,
    #[arg(long, default_value = "")]
    package_price: String,
}

impl RowArgs {
    fn into_row(self, settings: &Settings) -> StaticRow {
        let endpoint = self
            .endpoint
            .unwrap_or_else(|| settings.endpoint_url.clone());
        StaticRow::new(endpoint, self.product_id)
            .with_quantities(self.item_quantity, self.package_quantity)
            .with_prices(self.item_price, self.package_price)
    }
}

fn parse_url(raw: &str, what: &str) -> Result<Url> {
    raw.parse().with_context(|| format!("invalid {what} '{raw}'"))
}

/// URL whose cookies the CSRF token is read from: the session page, then the
/// base URL, then the row's endpoint (or the configured one for `token`).
fn cookie_scope(settings: &Settings, endpoint: Option<&str>) -> Result<Url> {
    let raw = settings
        .session_url
        .as_deref()
        .or(settings.base_url.as_deref())
        .or(endpoint)
        .unwrap_or(settings.endpoint_url.as_str());
    parse_url(raw, "cookie scope url")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(&cli.config)?;
    if let Some(v) = cli.base_url {
        settings.base_url = Some(v);
    }
    if let Some(v) = cli.cookie {
        settings.cookie = Some(v);
    }
    if let Some(v) = cli.session_url {
        settings.session_url = Some(v);
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let base_url = settings
        .base_url
        .as_deref()
        .map(|raw| parse_url(raw, "base url"))
        .transpose()?;
    let request = match cli.command {
        Command::Token => None,
        Command::Add(args) => Some((CartAction::Add, args.into_row(&settings))),
        Command::Update(args) => Some((CartAction::Update, args.into_row(&settings))),
    };
    let endpoint = request.as_ref().map(|(_, row)| row.endpoint_url());
    let scope = cookie_scope(&settings, endpoint.as_ref().map(|e| e.as_str()))?;
    let transport = HttpCartTransport::new(base_url).context("failed to build http client")?;
    if let Some(cookie) = &settings.cookie {
        transport.add_cookies(cookie, &scope);
    }
    if let Some(session_url) = &settings.session_url {
        let session_url = parse_url(session_url, "session url")?;
        if let Err(err) = transport.prime_session(&session_url).await {
            warn!(%session_url, "cart: could not load session page: {err}");
        }
    }
    let tokens = Arc::new(transport.token_source(scope));

    let client = CartActionClient::with_notification_delay(
        Arc::new(transport),
        tokens.clone(),
        Arc::new(TerminalDisplay),
        settings.notification_hide_after(),
    );

    let Some((action, row)) = request else {
        println!("{}", tokens.csrf_token());
        return Ok(());
    };
    let outcome = match action {
        CartAction::Add => client.on_add_clicked(&row).await,
        CartAction::Update => client.on_row_changed(&row).await,
    };

    match outcome {
        CartOutcome::Skipped => println!("Nothing to add: enter an item or package quantity."),
        CartOutcome::Applied {
            ticket,
            cart_length,
            ..
        }
        | CartOutcome::Stale {
            ticket,
            cart_length,
            ..
        } => {
            info!(%ticket, cart_length, "cart: request finished");
        }
        CartOutcome::Failed { ticket, error } => {
            info!(%ticket, "cart: request failed: {error}");
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
