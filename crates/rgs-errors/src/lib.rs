//! Closed error taxonomy for the RGS protocol.
//!
//! `ErrorCode` is the only vocabulary the HTTP boundary speaks; every other
//! crate's internal failures get folded into one of these codes before they
//! ever reach a client.
use serde::Serialize;
use std::fmt;

/// The closed set of error codes per the protocol's error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidRequest,
    InvalidBet,
    FeatureDisabled,
    InsufficientFunds,
    RoundInProgress,
    IdempotencyConflict,
    RateLimitExceeded,
    Maintenance,
    InternalError,
    NotImplemented,
}

impl ErrorCode {
    /// HTTP status this code maps to.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorCode::InvalidRequest => 400,
            ErrorCode::InvalidBet => 400,
            ErrorCode::FeatureDisabled => 409,
            ErrorCode::InsufficientFunds => 402,
            ErrorCode::RoundInProgress => 409,
            ErrorCode::IdempotencyConflict => 409,
            ErrorCode::RateLimitExceeded => 429,
            ErrorCode::Maintenance => 503,
            ErrorCode::InternalError => 500,
            ErrorCode::NotImplemented => 501,
        }
    }

    /// Whether a client may retry the same request (same `clientRequestId`).
    pub fn recoverable(self) -> bool {
        match self {
            ErrorCode::InvalidRequest => false,
            ErrorCode::InvalidBet => false,
            ErrorCode::FeatureDisabled => false,
            ErrorCode::InsufficientFunds => true,
            ErrorCode::RoundInProgress => true,
            ErrorCode::IdempotencyConflict => false,
            ErrorCode::RateLimitExceeded => true,
            ErrorCode::Maintenance => true,
            ErrorCode::InternalError => true,
            ErrorCode::NotImplemented => false,
        }
    }

    /// Wire name, e.g. `"INVALID_BET"`.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::InvalidBet => "INVALID_BET",
            ErrorCode::FeatureDisabled => "FEATURE_DISABLED",
            ErrorCode::InsufficientFunds => "INSUFFICIENT_FUNDS",
            ErrorCode::RoundInProgress => "ROUND_IN_PROGRESS",
            ErrorCode::IdempotencyConflict => "IDEMPOTENCY_CONFLICT",
            ErrorCode::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            ErrorCode::Maintenance => "MAINTENANCE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::NotImplemented => "NOT_IMPLEMENTED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A protocol-facing error: the only error type that crosses the HTTP boundary.
#[derive(Debug, Clone)]
pub struct GameError {
    pub code: ErrorCode,
    pub message: String,
}

impl GameError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.code.http_status()
    }

    pub fn recoverable(&self) -> bool {
        self.code.recoverable()
    }

    pub fn to_body(&self, protocol_version: &str) -> ErrorResponse {
        ErrorResponse {
            protocol_version: protocol_version.to_string(),
            error: ErrorBody {
                code: self.code.as_str().to_string(),
                message: self.message.clone(),
                recoverable: self.recoverable(),
            },
        }
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for GameError {}

/// Any internal (non-protocol) failure collapses to `INTERNAL_ERROR` at the
/// orchestrator boundary, per the error handling design: "engine-level
/// invariant violations are bugs and are reported as INTERNAL_ERROR".
impl From<anyhow::Error> for GameError {
    fn from(err: anyhow::Error) -> Self {
        GameError::new(ErrorCode::InternalError, err.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub recoverable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub error: ErrorBody,
}
