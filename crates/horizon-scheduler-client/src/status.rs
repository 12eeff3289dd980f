//! Canonical RPC status codes and the typed failure carried back to callers.

use std::fmt;

/// Canonical gRPC status codes.
///
/// These correspond to the standard status codes defined in the gRPC
/// specification. Which of them trigger an automatic retry is decided by
/// the per-method policy, not by the code itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum RpcCode {
    /// The operation completed successfully.
    Ok = 0,
    /// The operation was cancelled (typically by the caller).
    Cancelled = 1,
    /// Unknown error.
    Unknown = 2,
    /// Invalid argument was provided.
    InvalidArgument = 3,
    /// Deadline expired before the operation could complete.
    DeadlineExceeded = 4,
    /// Requested entity was not found.
    NotFound = 5,
    /// Entity already exists.
    AlreadyExists = 6,
    /// Permission denied.
    PermissionDenied = 7,
    /// Resource exhausted (e.g., quota or rate limit).
    ResourceExhausted = 8,
    /// Precondition failed.
    FailedPrecondition = 9,
    /// Operation was aborted.
    Aborted = 10,
    /// Operation was out of valid range.
    OutOfRange = 11,
    /// Operation is not implemented.
    Unimplemented = 12,
    /// Internal error.
    Internal = 13,
    /// Service is unavailable.
    Unavailable = 14,
    /// Unrecoverable data loss or corruption.
    DataLoss = 15,
    /// Unauthenticated request.
    Unauthenticated = 16,
}

impl RpcCode {
    /// Get a human-readable description of the status code.
    pub fn description(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
            Self::InvalidArgument => "Invalid Argument",
            Self::DeadlineExceeded => "Deadline Exceeded",
            Self::NotFound => "Not Found",
            Self::AlreadyExists => "Already Exists",
            Self::PermissionDenied => "Permission Denied",
            Self::ResourceExhausted => "Resource Exhausted",
            Self::FailedPrecondition => "Failed Precondition",
            Self::Aborted => "Aborted",
            Self::OutOfRange => "Out of Range",
            Self::Unimplemented => "Unimplemented",
            Self::Internal => "Internal",
            Self::Unavailable => "Unavailable",
            Self::DataLoss => "Data Loss",
            Self::Unauthenticated => "Unauthenticated",
        }
    }
}

impl fmt::Display for RpcCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl From<tonic::Code> for RpcCode {
    fn from(code: tonic::Code) -> Self {
        match code {
            tonic::Code::Ok => Self::Ok,
            tonic::Code::Cancelled => Self::Cancelled,
            tonic::Code::Unknown => Self::Unknown,
            tonic::Code::InvalidArgument => Self::InvalidArgument,
            tonic::Code::DeadlineExceeded => Self::DeadlineExceeded,
            tonic::Code::NotFound => Self::NotFound,
            tonic::Code::AlreadyExists => Self::AlreadyExists,
            tonic::Code::PermissionDenied => Self::PermissionDenied,
            tonic::Code::ResourceExhausted => Self::ResourceExhausted,
            tonic::Code::FailedPrecondition => Self::FailedPrecondition,
            tonic::Code::Aborted => Self::Aborted,
            tonic::Code::OutOfRange => Self::OutOfRange,
            tonic::Code::Unimplemented => Self::Unimplemented,
            tonic::Code::Internal => Self::Internal,
            tonic::Code::Unavailable => Self::Unavailable,
            tonic::Code::DataLoss => Self::DataLoss,
            tonic::Code::Unauthenticated => Self::Unauthenticated,
        }
    }
}

impl From<RpcCode> for tonic::Code {
    fn from(code: RpcCode) -> Self {
        match code {
            RpcCode::Ok => tonic::Code::Ok,
            RpcCode::Cancelled => tonic::Code::Cancelled,
            RpcCode::Unknown => tonic::Code::Unknown,
            RpcCode::InvalidArgument => tonic::Code::InvalidArgument,
            RpcCode::DeadlineExceeded => tonic::Code::DeadlineExceeded,
            RpcCode::NotFound => tonic::Code::NotFound,
            RpcCode::AlreadyExists => tonic::Code::AlreadyExists,
            RpcCode::PermissionDenied => tonic::Code::PermissionDenied,
            RpcCode::ResourceExhausted => tonic::Code::ResourceExhausted,
            RpcCode::FailedPrecondition => tonic::Code::FailedPrecondition,
            RpcCode::Aborted => tonic::Code::Aborted,
            RpcCode::OutOfRange => tonic::Code::OutOfRange,
            RpcCode::Unimplemented => tonic::Code::Unimplemented,
            RpcCode::Internal => tonic::Code::Internal,
            RpcCode::Unavailable => tonic::Code::Unavailable,
            RpcCode::DataLoss => tonic::Code::DataLoss,
            RpcCode::Unauthenticated => tonic::Code::Unauthenticated,
        }
    }
}

/// A typed RPC failure: the remote status code plus its message.
///
/// Retries are invisible to the caller; whatever status ends the call is
/// the one surfaced here, unmodified.
#[derive(Debug, Clone)]
pub struct RpcStatus {
    /// The status code.
    pub code: RpcCode,
    /// The error message reported by the service.
    pub message: String,
}

impl RpcStatus {
    /// Create a new status.
    pub fn new(code: RpcCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create an unavailable status.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(RpcCode::Unavailable, message)
    }

    /// Create a deadline exceeded status.
    pub fn deadline_exceeded(message: impl Into<String>) -> Self {
        Self::new(RpcCode::DeadlineExceeded, message)
    }

    /// Create a not found status.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(RpcCode::NotFound, message)
    }

    /// Create an invalid argument status.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(RpcCode::InvalidArgument, message)
    }
}

impl fmt::Display for RpcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for RpcStatus {}

impl From<tonic::Status> for RpcStatus {
    fn from(status: tonic::Status) -> Self {
        Self {
            code: RpcCode::from(status.code()),
            message: status.message().to_string(),
        }
    }
}

impl From<RpcStatus> for tonic::Status {
    fn from(status: RpcStatus) -> Self {
        tonic::Status::new(status.code.into(), status.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            RpcCode::Ok,
            RpcCode::Cancelled,
            RpcCode::DeadlineExceeded,
            RpcCode::NotFound,
            RpcCode::Unavailable,
            RpcCode::Unauthenticated,
        ] {
            assert_eq!(RpcCode::from(tonic::Code::from(code)), code);
        }
    }

    #[test]
    fn test_status_creation() {
        let status = RpcStatus::not_found("job not found");
        assert_eq!(status.code, RpcCode::NotFound);
        assert_eq!(status.message, "job not found");
    }

    #[test]
    fn test_status_display() {
        let status = RpcStatus::unavailable("backend unreachable");
        assert_eq!(status.to_string(), "Unavailable: backend unreachable");

        let status = RpcStatus::new(RpcCode::Internal, "");
        assert_eq!(status.to_string(), "Internal");
    }

    #[test]
    fn test_status_from_tonic() {
        let status = RpcStatus::from(tonic::Status::unavailable("overloaded"));
        assert_eq!(status.code, RpcCode::Unavailable);
        assert_eq!(status.message, "overloaded");
    }
}
