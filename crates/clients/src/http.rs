//! Shared request plumbing for the provider clients

use std::time::Duration;

use loan_advisor_core::ServiceError;
use reqwest::{Client, Response};

/// Build a client with the per-request timeout applied
pub(crate) fn build_client(
    service: &'static str,
    timeout: Duration,
) -> Result<Client, ServiceError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ServiceError::unreachable(service, format!("client build failed: {}", e)))
}

/// Map a transport error (connect failure, timeout) for a provider
pub(crate) fn transport_error(service: &'static str, err: reqwest::Error) -> ServiceError {
    ServiceError::unreachable(service, err.to_string())
}

/// Reject non-2xx responses, keeping the provider's error body
pub(crate) async fn check_status(
    service: &'static str,
    response: Response,
) -> Result<Response, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ServiceError::bad_status(service, status.as_u16(), body));
    }
    Ok(response)
}
