//! Command-line arguments.
//!
//! Every global option can also be set through the environment (or a `.env`
//! file, loaded at startup).

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use proxypay::{ClientConfig, CustomFields, Environment, PaymentId};
use rust_decimal::Decimal;
use serde_json::Value;
use url::Url;

use crate::error::CliError;

/// ProxyPay payment-reference API client.
#[derive(Parser, Debug)]
#[command(name = "proxypay-cli", version)]
#[command(about = "Issue payment references and manage payments on ProxyPay")]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// API key sent as `Authorization: Token <key>`
    #[arg(long, env = "PROXYPAY_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Target environment; anything other than `production` means sandbox
    #[arg(long, env = "PROXYPAY_ENVIRONMENT", default_value = "sandbox")]
    pub environment: Environment,

    /// Override the environment's base URL
    #[arg(long, env = "PROXYPAY_BASE_URL")]
    pub base_url: Option<Url>,

    /// Connect and request timeout, in seconds
    #[arg(long, env = "PROXYPAY_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,

    /// Skip TLS certificate verification (insecure)
    #[arg(long, env = "PROXYPAY_ACCEPT_INVALID_CERTS")]
    pub accept_invalid_certs: bool,
}

impl ConnectionArgs {
    /// Builds the client configuration from the parsed options.
    pub fn to_config(&self) -> ClientConfig {
        let timeout = Duration::from_secs(self.timeout_secs);
        let config = ClientConfig::new(self.api_key.clone())
            .with_environment(self.environment)
            .with_connect_timeout(timeout)
            .with_timeout(timeout)
            .with_accept_invalid_certs(self.accept_invalid_certs);
        match &self.base_url {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        }
    }
}

/// Operations exposed on the command line.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask the API for a new reference identifier
    ReferenceId,

    /// Create a payment reference
    Create {
        /// Amount to charge, e.g. `1500.00`
        #[arg(long)]
        amount: Decimal,

        /// Days from today until the reference expires
        #[arg(long, default_value_t = proxypay::constants::DEFAULT_EXPIRE_DAYS)]
        expire_days: u32,

        /// Use this reference identifier instead of generating one
        #[arg(long)]
        reference_id: Option<u64>,

        /// Custom field as `key=value`; repeatable
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Acknowledge (cancel) a payment
    Acknowledge {
        /// Payment identifier
        payment_id: PaymentId,
    },

    /// Check or list pending payments
    Payments {
        /// Print the decoded payment list instead of only checking the call
        #[arg(long)]
        list: bool,
    },
}

/// Collects `--field` pairs into [`CustomFields`], keeping their order.
pub fn custom_fields(fields: &[(String, String)]) -> CustomFields {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}

fn parse_field(raw: &str) -> Result<(String, String), CliError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(CliError::InvalidField(raw.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("order=A=1").unwrap(),
            ("order".to_owned(), "A=1".to_owned())
        );
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }

    #[test]
    fn test_create_command_parses() {
        let cli = Cli::try_parse_from([
            "proxypay-cli",
            "--api-key",
            "k",
            "--environment",
            "production",
            "create",
            "--amount",
            "12.50",
            "--reference-id",
            "42",
            "--field",
            "a=1",
            "--field",
            "b=2",
        ])
        .unwrap();
        assert_eq!(cli.connection.environment, Environment::Production);
        match cli.command {
            Command::Create {
                amount,
                expire_days,
                reference_id,
                fields,
            } => {
                assert_eq!(amount, Decimal::new(1250, 2));
                assert_eq!(expire_days, 5);
                assert_eq!(reference_id, Some(42));
                let fields = custom_fields(&fields);
                assert_eq!(fields.len(), 2);
                assert_eq!(fields.get("b").unwrap(), "2");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unknown_environment_falls_back_to_sandbox() {
        let cli = Cli::try_parse_from([
            "proxypay-cli",
            "--api-key",
            "k",
            "--environment",
            "staging",
            "payments",
        ])
        .unwrap();
        assert_eq!(cli.connection.environment, Environment::Sandbox);
        assert_eq!(
            cli.connection.to_config().base_url().unwrap().as_str(),
            "https://api.sandbox.proxypay.co.ao/"
        );
    }
}
