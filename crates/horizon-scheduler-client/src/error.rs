//! Error types for the scheduler client.

use std::time::Duration;

use thiserror::Error;

use crate::status::{RpcCode, RpcStatus};

/// Errors that can occur when building a transport or invoking a call.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// Mutually exclusive or otherwise invalid construction options.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The endpoint could not be parsed into a valid URI.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Establishing the underlying channel failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// TLS setup failed.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Credential material could not be loaded or resolved.
    #[error("credential error: {0}")]
    Credentials(String),

    /// The remote service rejected the call.
    #[error("{0}")]
    Rpc(RpcStatus),

    /// The call did not complete within its wall-clock deadline,
    /// including any automatic retries.
    #[error("{method} did not complete within {timeout:?}")]
    DeadlineExceeded {
        /// Name of the remote method that timed out.
        method: &'static str,
        /// The deadline that elapsed.
        timeout: Duration,
    },

    /// The call was cancelled.
    #[error("call was cancelled")]
    Cancelled,
}

impl SchedulerError {
    /// The remote status code associated with this error, if any.
    ///
    /// Configuration, connection and TLS errors have no wire-level code
    /// and return `None`; they are never candidates for automatic retry.
    pub fn rpc_code(&self) -> Option<RpcCode> {
        match self {
            Self::Rpc(status) => Some(status.code),
            Self::Cancelled => Some(RpcCode::Cancelled),
            Self::DeadlineExceeded { .. } => Some(RpcCode::DeadlineExceeded),
            _ => None,
        }
    }
}

impl From<tonic::Status> for SchedulerError {
    fn from(status: tonic::Status) -> Self {
        match status.code() {
            tonic::Code::Cancelled => Self::Cancelled,
            _ => Self::Rpc(RpcStatus::from(status)),
        }
    }
}

/// A specialized Result type for scheduler client operations.
pub type Result<T> = std::result::Result<T, SchedulerError>;
