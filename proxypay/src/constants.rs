//! HTTP-specific constants for the ProxyPay API.

use std::time::Duration;

/// Production API base URL.
pub const PRODUCTION_URL: &str = "https://api.proxypay.co.ao";

/// Sandbox API base URL.
pub const SANDBOX_URL: &str = "https://api.sandbox.proxypay.co.ao";

/// Media type sent in the `Accept` header of every request.
pub const ACCEPT_MEDIA_TYPE: &str = "application/vnd.proxypay.v2+json";

/// Scheme prefix of the `Authorization` header value (`Token <api key>`).
pub const AUTHORIZATION_SCHEME: &str = "Token";

/// Default timeout for establishing a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default timeout for a whole request, from connect to the last body byte.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default number of days until a payment reference expires.
pub const DEFAULT_EXPIRE_DAYS: u32 = 5;

/// Path of the reference identifier generator endpoint.
pub const REFERENCE_IDS_PATH: &str = "reference_ids";

/// Path prefix of the payment reference endpoints.
pub const REFERENCES_PATH: &str = "references";

/// Path of the payments collection endpoint.
pub const PAYMENTS_PATH: &str = "payments";
