#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Async client for the [ProxyPay](https://proxypay.co.ao) payment-reference API.
//!
//! ProxyPay lets merchants in Angola issue *payment references*: numbered
//! invoices that customers pay at ATMs or through home banking. This crate
//! wraps the four calls a merchant integration needs:
//!
//! - generate a reference identifier
//! - create a reference with an amount, an expiry date and custom fields
//! - list pending payments
//! - acknowledge a payment once it has been processed
//!
//! # Example
//!
//! ```no_run
//! use proxypay::{ClientConfig, CreatePayment, CustomFields, Environment, ProxyPayClient};
//! use rust_decimal::Decimal;
//!
//! # async fn run() -> Result<(), proxypay::ProxyPayError> {
//! let client = ProxyPayClient::try_new(
//!     ClientConfig::new("my-api-key").with_environment(Environment::Sandbox),
//! )?;
//!
//! let request = CreatePayment::new(Decimal::new(500_000, 2))
//!     .with_expire_days(3)
//!     .with_custom_fields(CustomFields::new().with("invoice", "FT 2024/17"));
//! client.create_payment(request).await?;
//!
//! for payment in client.list_payments().await? {
//!     client.acknowledge_payment(payment.id).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`client`] - The [`ProxyPayClient`] and its operations
//! - [`config`] - Credentials, environment, timeouts and TLS policy
//! - [`constants`] - Base URLs, media type, endpoint paths and defaults
//! - [`environment`] - Sandbox / production selection
//! - [`error`] - Error types
//! - [`payment`] - Payment types returned by the API
//! - [`reference`] - Payment reference identifiers and request bodies
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod client;
pub mod config;
pub mod constants;
pub mod environment;
pub mod error;
pub mod payment;
pub mod reference;

pub use client::ProxyPayClient;
pub use config::ClientConfig;
pub use environment::Environment;
pub use error::{ProxyPayError, TransportError, TransportErrorKind};
pub use payment::{Payment, PaymentId};
pub use reference::{CreatePayment, CustomFields, ExpireDate, ReferenceBody, ReferenceId};
