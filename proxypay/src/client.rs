//! An async client for the ProxyPay payment-reference API.
//!
//! [`ProxyPayClient`] issues one HTTP request per operation against the
//! sandbox or production host:
//!
//! | Operation | Request |
//! |---|---|
//! | [`ProxyPayClient::generate_reference_id`] | `POST /reference_ids` |
//! | [`ProxyPayClient::create_payment`] | `PUT /references/{id}` |
//! | [`ProxyPayClient::acknowledge_payment`] | `DELETE /payments/{id}` |
//! | [`ProxyPayClient::get_payments`], [`ProxyPayClient::list_payments`] | `GET /payments` |
//!
//! ## Error Handling
//!
//! Every operation returns [`ProxyPayError`]. Transport failures, non-`2xx`
//! answers and invalid references are distinct variants. There are no
//! retries; every failure is final for that call.
//!
//! ## Telemetry
//!
//! With the `telemetry` feature each operation runs in a `proxypay.*` span
//! and failures are logged at `ERROR` level.

use std::fmt::Display;

use chrono::Local;
use http::Method;
use reqwest::{Client, RequestBuilder, Response};
use url::Url;
use uuid::Uuid;

#[cfg(feature = "telemetry")]
use tracing::{Span, instrument};

use crate::config::ClientConfig;
use crate::constants::{PAYMENTS_PATH, REFERENCE_IDS_PATH, REFERENCES_PATH};
use crate::environment::Environment;
use crate::error::{ProxyPayError, TransportError};
use crate::payment::{Payment, PaymentId};
use crate::reference::{CreatePayment, ReferenceBody, ReferenceId};

/// A client for the ProxyPay API.
///
/// Cheap to clone; clones share the underlying connection pool. Holds no
/// mutable state, so one instance can serve concurrent callers.
///
/// # Example
///
/// ```no_run
/// use proxypay::{ClientConfig, CreatePayment, ProxyPayClient};
/// use rust_decimal::Decimal;
///
/// # async fn run() -> Result<(), proxypay::ProxyPayError> {
/// let client = ProxyPayClient::try_new(ClientConfig::new("my-api-key"))?;
/// client
///     .create_payment(CreatePayment::new(Decimal::new(250_000, 2)))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ProxyPayClient {
    /// Environment the base URL was derived from
    environment: Environment,
    /// Base URL, ending with `/`
    base_url: Url,
    /// Full URL to `POST /reference_ids` requests
    reference_ids_url: Url,
    /// Full URL to `GET /payments` requests
    payments_url: Url,
    /// Reqwest client carrying the auth headers and timeouts
    client: Client,
}

impl ProxyPayClient {
    /// Constructs a client from `config`. Performs no network I/O.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyPayError::Config`] if the API key is not a valid header
    /// value, the base URL is unusable, or the HTTP client cannot be built.
    pub fn try_new(config: ClientConfig) -> Result<Self, ProxyPayError> {
        let base_url = config.base_url()?;
        let reference_ids_url = join(
            &base_url,
            REFERENCE_IDS_PATH,
            "Failed to construct ./reference_ids URL",
        )?;
        let payments_url = join(&base_url, PAYMENTS_PATH, "Failed to construct ./payments URL")?;

        #[cfg(feature = "telemetry")]
        if config.accept_invalid_certs() {
            tracing::warn!(
                environment = %config.environment(),
                "TLS certificate verification is disabled"
            );
        }

        let client = Client::builder()
            .default_headers(config.default_headers()?)
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs())
            .build()
            .map_err(|e| ProxyPayError::Config {
                context: "Failed to build HTTP client",
                message: e.to_string(),
            })?;

        Ok(Self {
            environment: config.environment(),
            base_url,
            reference_ids_url,
            payments_url,
            client,
        })
    }

    /// Returns the environment this client talks to.
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns the base URL used by this client.
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the computed `./reference_ids` URL.
    pub const fn reference_ids_url(&self) -> &Url {
        &self.reference_ids_url
    }

    /// Returns the computed `./payments` URL.
    pub const fn payments_url(&self) -> &Url {
        &self.payments_url
    }

    /// Returns the `./references/{id}` URL for a reference.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyPayError::Config`] if the URL cannot be constructed.
    pub fn reference_url(&self, reference_id: ReferenceId) -> Result<Url, ProxyPayError> {
        join(
            &self.base_url,
            &format!("{REFERENCES_PATH}/{reference_id}"),
            "Failed to construct ./references URL",
        )
    }

    /// Returns the `./payments/{id}` URL for a payment.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyPayError::Config`] if the URL cannot be constructed.
    pub fn payment_url(&self, payment_id: PaymentId) -> Result<Url, ProxyPayError> {
        join(
            &self.base_url,
            &format!("{PAYMENTS_PATH}/{payment_id}"),
            "Failed to construct ./payments/{id} URL",
        )
    }

    /// Sends a `POST /reference_ids` request and returns the server-assigned
    /// identifier as raw (trimmed) text.
    ///
    /// The HTTP status is not checked: whatever the server answers is
    /// returned, and [`ProxyPayClient::create_payment`] rejects it if it is
    /// not an integer.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyPayError::Transport`] if no response was received.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "proxypay.generate_reference_id",
            skip_all,
            fields(otel.status_code = tracing::field::Empty, error.message = tracing::field::Empty)
        )
    )]
    pub async fn generate_reference_id(&self) -> Result<String, ProxyPayError> {
        let result = self.generate_reference_id_inner().await;

        record_result_on_span(&result);

        result
    }

    async fn generate_reference_id_inner(&self) -> Result<String, ProxyPayError> {
        const CONTEXT: &str = "POST /reference_ids";
        let response = Self::send(
            self.request(Method::POST, self.reference_ids_url.clone()),
            CONTEXT,
        )
        .await?;

        #[cfg(feature = "telemetry")]
        if !response.status().is_success() {
            tracing::warn!(
                status = %response.status(),
                "Reference id generation answered with a non-2xx status"
            );
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::new(CONTEXT, e))?;
        Ok(body.trim().to_owned())
    }

    /// Creates (or updates) a payment reference with `PUT /references/{id}`.
    ///
    /// When `request.reference_id` is `None`, an identifier is generated first
    /// via [`ProxyPayClient::generate_reference_id`]. The reference expires
    /// `request.expire_days` after today and its custom fields are stamped
    /// with a fresh UUID v4 under `uuid`.
    ///
    /// # Errors
    ///
    /// - [`ProxyPayError::InvalidArgument`] if the generated identifier is not
    ///   an integer of at most 9 digits. No write request is sent.
    /// - [`ProxyPayError::Transport`] if a request got no response.
    /// - [`ProxyPayError::Processing`] if the server answered non-`2xx`.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "proxypay.create_payment",
            skip_all,
            fields(
                amount = %request.amount,
                expire_days = request.expire_days,
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty,
            )
        )
    )]
    pub async fn create_payment(&self, request: CreatePayment) -> Result<(), ProxyPayError> {
        let reference_id = match request.reference_id {
            Some(id) => id,
            None => self.generate_reference_id().await?.parse::<ReferenceId>()?,
        };
        let url = self.reference_url(reference_id)?;
        let body = ReferenceBody::build(request, Local::now().date_naive(), Uuid::new_v4())?;

        #[cfg(feature = "telemetry")]
        tracing::debug!(
            reference_id = %reference_id,
            end_datetime = %body.end_datetime,
            custom_fields = body.custom_fields.len(),
            "Creating payment reference"
        );

        Self::send_checked(self.request(Method::PUT, url).json(&body), "PUT /references")
            .await?;
        Ok(())
    }

    /// Acknowledges (cancels) a payment with `DELETE /payments/{id}`.
    ///
    /// # Errors
    ///
    /// - [`ProxyPayError::Transport`] if the request got no response.
    /// - [`ProxyPayError::Processing`] if the server answered non-`2xx`.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "proxypay.acknowledge_payment",
            skip(self),
            fields(otel.status_code = tracing::field::Empty, error.message = tracing::field::Empty)
        )
    )]
    pub async fn acknowledge_payment(&self, payment_id: PaymentId) -> Result<(), ProxyPayError> {
        let url = self.payment_url(payment_id)?;
        Self::send_checked(self.request(Method::DELETE, url), "DELETE /payments")
            .await?;
        Ok(())
    }

    /// Checks the payments endpoint with `GET /payments`.
    ///
    /// Only success is reported; the payment list in the response body is
    /// discarded. Use [`ProxyPayClient::list_payments`] to read it.
    ///
    /// # Errors
    ///
    /// - [`ProxyPayError::Transport`] if the request got no response.
    /// - [`ProxyPayError::Processing`] if the server answered non-`2xx`.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "proxypay.get_payments",
            skip_all,
            fields(otel.status_code = tracing::field::Empty, error.message = tracing::field::Empty)
        )
    )]
    pub async fn get_payments(&self) -> Result<(), ProxyPayError> {
        Self::send_checked(
            self.request(Method::GET, self.payments_url.clone()),
            "GET /payments",
        )
        .await?;
        Ok(())
    }

    /// Fetches the pending payments with `GET /payments`.
    ///
    /// # Errors
    ///
    /// - [`ProxyPayError::Transport`] if the request got no response.
    /// - [`ProxyPayError::Processing`] if the server answered non-`2xx`.
    /// - [`ProxyPayError::JsonDeserialization`] if the body is not a payment
    ///   list.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "proxypay.list_payments",
            skip_all,
            fields(otel.status_code = tracing::field::Empty, error.message = tracing::field::Empty)
        )
    )]
    pub async fn list_payments(&self) -> Result<Vec<Payment>, ProxyPayError> {
        const CONTEXT: &str = "GET /payments";
        let response = Self::send_checked(
            self.request(Method::GET, self.payments_url.clone()),
            CONTEXT,
        )
        .await?;
        let result = response
            .json::<Vec<Payment>>()
            .await
            .map_err(|e| ProxyPayError::JsonDeserialization {
                context: CONTEXT,
                source: e,
            });

        record_result_on_span(&result);

        result
    }

    /// Starts a request. Authorization, `Accept` and timeouts come from the
    /// client defaults set at construction.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Sends a request, mapping failures to [`ProxyPayError::Transport`].
    async fn send(
        request: RequestBuilder,
        context: &'static str,
    ) -> Result<Response, ProxyPayError> {
        request
            .send()
            .await
            .map_err(|e| TransportError::new(context, e).into())
    }

    /// Sends a request and rejects any status outside `200..=299`.
    async fn send_checked(
        request: RequestBuilder,
        context: &'static str,
    ) -> Result<Response, ProxyPayError> {
        let result = match Self::send(request, context).await {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                Err(ProxyPayError::Processing {
                    context,
                    status,
                    body,
                })
            }
            Err(e) => Err(e),
        };

        record_result_on_span(&result);

        result
    }
}

/// Converts a [`ClientConfig`] into a client, see [`ProxyPayClient::try_new`].
impl TryFrom<ClientConfig> for ProxyPayClient {
    type Error = ProxyPayError;

    fn try_from(value: ClientConfig) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

fn join(base_url: &Url, path: &str, context: &'static str) -> Result<Url, ProxyPayError> {
    base_url.join(path).map_err(|e| ProxyPayError::Config {
        context,
        message: e.to_string(),
    })
}

/// Records the outcome of a request on the current span, including status and errors.
#[cfg(feature = "telemetry")]
fn record_result_on_span<R, E: Display>(result: &Result<R, E>) {
    let span = Span::current();
    match result {
        Ok(_) => {
            span.record("otel.status_code", "OK");
        }
        Err(err) => {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", tracing::field::display(err));
            tracing::event!(tracing::Level::ERROR, error = %err, "Request to ProxyPay failed");
        }
    }
}

/// Records the outcome of a request on the current span, including status and errors.
/// Noop if telemetry feature is off.
#[cfg(not(feature = "telemetry"))]
fn record_result_on_span<R, E: Display>(_result: &Result<R, E>) {}
