use thiserror::Error;

/// Configuration-related errors with structured variants.
///
/// These are user-correctable: the CLI prints the hint and exits non-zero.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required setting: {field}")]
    MissingField {
        field: &'static str,
        hint: &'static str,
    },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigError {
    /// Actionable guidance shown under the error line.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { hint, .. } => Some(hint),
            Self::InvalidValue { .. } => None,
        }
    }
}

/// Input errors caught before any network round trip.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("batch length mismatch: {symbols} symbols but {prices} prices")]
    BatchLengthMismatch { symbols: usize, prices: usize },

    #[error("batch is empty")]
    EmptyBatch,

    #[error("invalid symbol '{symbol}': {reason}")]
    InvalidSymbol { symbol: String, reason: &'static str },

    #[error("invalid price '{input}': {reason}")]
    InvalidPrice { input: String, reason: &'static str },

    #[error("band value {0} is out of range (expected 0-4)")]
    BandOutOfRange(u8),

    #[error("invalid report entry '{0}': expected SYMBOL=PRICE")]
    InvalidReportEntry(String),
}

/// Failures of a contract call after it reached the endpoint.
#[derive(Error, Debug)]
pub enum CallError {
    /// The contract rejected the call; `reason` is what the chain returned.
    #[error("{method} reverted: {reason}")]
    Reverted { method: &'static str, reason: String },

    #[error("{method} failed: {message}")]
    Rpc { method: &'static str, message: String },

    /// Return data did not match the embedded ABI.
    #[error("{method} returned data that does not match the embedded ABI: {reason}")]
    AbiMismatch { method: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Call(#[from] CallError),

    #[error("cannot reach RPC endpoint {endpoint}: {reason}")]
    Connection { endpoint: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}
