//! Command-line front end for the ProxyPay payment-reference API.
//!
//! # Usage
//!
//! ```bash
//! # Generate a reference id on the sandbox
//! PROXYPAY_API_KEY=... proxypay-cli reference-id
//!
//! # Create a reference for 1500 AOA, valid for 3 days
//! proxypay-cli create --amount 1500.00 --expire-days 3 --field invoice=FT-17
//!
//! # List pending payments, then acknowledge one
//! proxypay-cli payments --list
//! proxypay-cli acknowledge 191113510000000000
//! ```
//!
//! # Environment Variables
//!
//! - `PROXYPAY_API_KEY`: API key (required)
//! - `PROXYPAY_ENVIRONMENT`: `production` or `sandbox` (default: `sandbox`)
//! - `PROXYPAY_BASE_URL`: Override the environment's base URL
//! - `PROXYPAY_TIMEOUT_SECS`: Connect and request timeout (default: `60`)
//! - `PROXYPAY_ACCEPT_INVALID_CERTS`: Skip TLS verification (insecure)
//! - `RUST_LOG`: Log level filter (default: `info`)

mod cli;
mod error;

use clap::Parser;
use proxypay::{CreatePayment, ProxyPayClient, ReferenceId};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, custom_fields};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        tracing::error!("proxypay-cli failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let client = ProxyPayClient::try_new(cli.connection.to_config())?;
    tracing::debug!(
        environment = %client.environment(),
        base_url = %client.base_url(),
        "Client ready"
    );

    let output = match cli.command {
        Command::ReferenceId => {
            let reference_id = client.generate_reference_id().await?;
            json!({ "reference_id": reference_id })
        }
        Command::Create {
            amount,
            expire_days,
            reference_id,
            fields,
        } => {
            let mut request = CreatePayment::new(amount)
                .with_expire_days(expire_days)
                .with_custom_fields(custom_fields(&fields));
            if let Some(id) = reference_id {
                request = request.with_reference_id(ReferenceId::new(id)?);
            }
            client.create_payment(request).await?;
            tracing::info!(%amount, expire_days, "Payment reference created");
            json!({ "success": true })
        }
        Command::Acknowledge { payment_id } => {
            client.acknowledge_payment(payment_id).await?;
            tracing::info!(%payment_id, "Payment acknowledged");
            json!({ "success": true })
        }
        Command::Payments { list: false } => {
            client.get_payments().await?;
            json!({ "success": true })
        }
        Command::Payments { list: true } => {
            let payments = client.list_payments().await?;
            tracing::info!(count = payments.len(), "Fetched pending payments");
            serde_json::to_value(payments)?
        }
    };

    print_json(&output)
}

#[allow(clippy::print_stdout)]
fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
