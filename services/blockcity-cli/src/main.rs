//! Blockcity command-line client
//!
//! Loads credentials from a TOML config and runs a single platform operation:
//! consent URL, token exchange, user info, pay order, or callback
//! verification. Results go to stdout as JSON; logs go to stderr.

mod cli;
mod config;

use std::io::Read;
use std::time::Duration;

use anyhow::{Context, Result};
use blockcity_client::ApiClient;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Command, USAGE};
use crate::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // JSON logs on stderr with LOG_LEVEL / RUST_LOG support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    let args = match cli::parse(&raw_args) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    let config_path = Config::resolve_path(args.config.as_deref());
    info!(path = %config_path.display(), "loading configuration");

    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    let credentials = config
        .credentials()
        .context("failed to load client credentials")?;

    info!(
        gateway = %credentials.gateway,
        client_id = %credentials.client_id,
        pay_expire = %credentials.pay_expire,
        "configuration loaded"
    );

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http.timeout_secs))
        .build()
        .context("failed to build HTTP client")?;
    let client = ApiClient::new(http, credentials);

    match args.command {
        Command::AuthorizeUrl { return_url } => {
            println!("{}", client.authorization_url(&return_url));
        }
        Command::Token { auth_code } => {
            let token = client
                .exchange_token(&auth_code)
                .await
                .context("token exchange failed")?;
            println!("{}", serde_json::to_string_pretty(&token)?);
        }
        Command::User {
            access_token,
            endpoint_url,
        } => {
            let url = endpoint_url.unwrap_or_else(|| config.blockcity.user_info_url.clone());
            let user = client
                .fetch_user(&access_token, &url)
                .await
                .context("user info request failed")?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        Command::Pay {
            biz_content,
            notify_url,
        } => {
            let order = client
                .create_pay_order(&biz_content, &notify_url)
                .await
                .context("pay order failed")?;
            println!("{}", serde_json::to_string_pretty(&order)?);
        }
        Command::Verify { source } => {
            let content = read_source(&source)
                .with_context(|| format!("failed to read callback from {source}"))?;
            let verified = client
                .check_rsa_sign(&content)
                .context("callback could not be checked")?;
            println!("{verified}");
            if !verified {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Read a callback body from a file, or stdin for `-`.
fn read_source(source: &str) -> std::io::Result<String> {
    if source == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        std::fs::read_to_string(source)
    }
}
