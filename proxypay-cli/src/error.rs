//! Error types for the command-line front end.

/// Errors that end a CLI run.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A `--field` argument was not of the form `key=value`.
    #[error("invalid custom field {0:?}: expected key=value")]
    InvalidField(String),

    /// The ProxyPay call failed.
    #[error(transparent)]
    ProxyPay(#[from] proxypay::ProxyPayError),

    /// The result could not be rendered as JSON.
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}
