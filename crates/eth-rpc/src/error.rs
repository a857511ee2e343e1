//! Errors returned by the Ethereum handlers, and their JSON-RPC codes.

use jsonrpsee::types::ErrorObjectOwned;
use theta_native::NativeClientError;
use thiserror::Error;

use crate::FetchTarget;

/// JSON-RPC error codes following Ethereum conventions.
pub mod codes {
    /// Invalid method parameter(s).
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal JSON-RPC error.
    pub const INTERNAL_ERROR: i32 = -32603;
    /// Resource not found.
    pub const RESOURCE_NOT_FOUND: i32 = -32001;
    /// Resource unavailable.
    pub const RESOURCE_UNAVAILABLE: i32 = -32002;
}

/// An error produced while serving an Ethereum call.
#[derive(Debug, Error)]
pub enum EthRpcError {
    /// A request argument has an unsupported shape or value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A transaction returned by the node lacks fields its kind requires.
    #[error("malformed native transaction: {0}")]
    MalformedTransaction(String),
    /// A signature blob returned by the node is too short to be split into its components.
    #[error("invalid signature: expected 65 bytes, got {0}")]
    InvalidSignature(usize),
    /// Every fetch attempt failed.
    #[error("failed to retrieve {target} after {attempts} attempts: {source}")]
    FetchExhausted {
        /// What was being fetched.
        target: FetchTarget,
        /// How many attempts were made.
        attempts: usize,
        /// The error of the last attempt.
        #[source]
        source: NativeClientError,
    },
    /// The fetch was cancelled before it completed.
    #[error("retrieval of {0} was cancelled")]
    Cancelled(FetchTarget),
    /// The requested object does not exist.
    #[error("{0} not found")]
    NotFound(String),
    /// A native client error, propagated unchanged.
    #[error(transparent)]
    Client(#[from] NativeClientError),
}

impl EthRpcError {
    /// Returns the JSON-RPC error code for this error.
    pub const fn code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => codes::INVALID_PARAMS,
            Self::MalformedTransaction(_) | Self::InvalidSignature(_) => codes::INTERNAL_ERROR,
            Self::NotFound(_) => codes::RESOURCE_NOT_FOUND,
            Self::FetchExhausted { .. } | Self::Cancelled(_) => codes::RESOURCE_UNAVAILABLE,
            Self::Client(NativeClientError::NotFound(_)) => codes::RESOURCE_NOT_FOUND,
            Self::Client(_) => codes::INTERNAL_ERROR,
        }
    }
}

impl From<EthRpcError> for ErrorObjectOwned {
    fn from(err: EthRpcError) -> Self {
        Self::owned(err.code(), err.to_string(), None::<()>)
    }
}
