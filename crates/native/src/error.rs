//! Errors surfaced by a [`crate::NativeClient`].

use alloy_primitives::B256;
use alloy_transport::TransportError;
use thiserror::Error;

/// An error returned by the native chain collaborator.
#[derive(Debug, Error)]
pub enum NativeClientError {
    /// The request could not be completed over the transport, or the node answered with a
    /// JSON-RPC error.
    #[error("native rpc transport error: {0}")]
    Transport(#[from] TransportError),
    /// The node does not know the requested object.
    #[error("{0} not found on the native chain")]
    NotFound(NotFoundKind),
    /// A payload was received but could not be decoded.
    #[error("failed to decode native payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The object a [`NativeClientError::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum NotFoundKind {
    /// A block, by hash.
    #[display("block {_0}")]
    BlockHash(B256),
    /// A block, by height.
    #[display("block at height {_0}")]
    BlockHeight(u64),
    /// A transaction, by hash.
    #[display("transaction {_0}")]
    Transaction(B256),
}

impl NativeClientError {
    /// Returns `true` if the error reports a missing object rather than a failed request.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns `false` if the node answered with a payload that cannot be decoded. Asking again
    /// gets the same payload.
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::Decode(_) | Self::Transport(TransportError::DeserError { .. }))
    }
}

/// A [`Result`] alias for native client calls.
pub type NativeClientResult<T> = Result<T, NativeClientError>;
