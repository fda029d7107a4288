//! Error types for remote service calls and turn processing

use thiserror::Error;

use crate::pipeline::Stage;

/// What went wrong talking to a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// Network failure or timeout; the provider was never reached or
    /// never answered
    Unreachable,
    /// Provider answered with a non-2xx status
    BadStatus(u16),
    /// Provider answered 2xx but the body did not match the expected
    /// schema
    MalformedPayload,
}

impl std::fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreachable => write!(f, "unreachable"),
            Self::BadStatus(code) => write!(f, "status {}", code),
            Self::MalformedPayload => write!(f, "malformed payload"),
        }
    }
}

/// A failed remote service call
///
/// One failed call fails the turn's current branch; nothing is retried.
#[derive(Debug, Clone, Error)]
#[error("{service}: {kind}: {message}")]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    /// Provider name for logs and error payloads
    pub service: &'static str,
    pub message: String,
}

impl ServiceError {
    pub fn unreachable(service: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: ServiceErrorKind::Unreachable,
            service,
            message: message.into(),
        }
    }

    pub fn bad_status(service: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ServiceErrorKind::BadStatus(status),
            service,
            message: message.into(),
        }
    }

    pub fn malformed(service: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: ServiceErrorKind::MalformedPayload,
            service,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self.kind {
            ServiceErrorKind::BadStatus(code) => Some(code),
            _ => None,
        }
    }
}

/// A turn that failed at a named stage
///
/// Terminal for the turn; the conversation buffer retains whatever was
/// appended before the failure.
#[derive(Debug, Clone, Error)]
#[error("turn failed while {stage}: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: ServiceError,
}

impl StageError {
    pub fn new(stage: Stage, source: ServiceError) -> Self {
        Self { stage, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display() {
        let err = ServiceError::bad_status("sarvam-stt", 503, "service unavailable");
        assert!(err.to_string().contains("sarvam-stt"));
        assert!(err.to_string().contains("503"));
        assert_eq!(err.status_code(), Some(503));
    }

    #[test]
    fn test_stage_error_carries_stage() {
        let err = StageError::new(
            Stage::Translating,
            ServiceError::unreachable("sarvam-translate", "connection refused"),
        );
        assert_eq!(err.stage, Stage::Translating);
        assert!(err.to_string().contains("translating"));
    }
}
