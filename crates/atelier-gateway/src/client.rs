//! HTTP client for the calendar gateway
//!
//! Every call is wrapped in a bounded timeout. On expiry the request future
//! is dropped, which aborts the in-flight HTTP exchange, and
//! `AppError::Timeout` is returned. Non-success responses and unparsable
//! bodies map to `AppError::Gateway`; nothing is ever swallowed.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument, warn};

use atelier_core::config::GatewayConfig;
use atelier_core::models::{AvailabilityOutcome, HoldOutcome, HoldRequest, SlotQuery};
use atelier_core::traits::CalendarGateway;
use atelier_core::{AppError, AppResult};

use crate::protocol::{AvailabilityParams, AvailabilityResponse, HoldBody, HoldResponse};

/// reqwest-backed calendar gateway client
///
/// Stateless per call; safe to share behind an `Arc`.
pub struct HttpCalendarGateway {
    http: reqwest::Client,
    base_url: String,
    token: String,
    timeout: Duration,
}

impl HttpCalendarGateway {
    /// Create a new gateway client from configuration
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when the endpoint or token is empty. This
    /// is a construction-time failure by contract: a missing gateway
    /// configuration must never be discovered mid-request.
    pub fn new(config: &GatewayConfig) -> AppResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(AppError::Config(
                "gateway base_url must not be empty".to_string(),
            ));
        }
        if config.token.trim().is_empty() {
            return Err(AppError::Config(
                "gateway token must not be empty".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Override the per-call timeout (used by tests with short bounds)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run a gateway exchange under the configured timeout
    ///
    /// Dropping the inner future on expiry actively cancels the in-flight
    /// request; the late response can never be observed.
    async fn bounded<F, T>(&self, operation: &'static str, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "Gateway {} timed out after {:?}, cancelling request",
                    operation, self.timeout
                );
                Err(AppError::Timeout)
            }
        }
    }
}

#[async_trait]
impl CalendarGateway for HttpCalendarGateway {
    #[instrument(skip(self))]
    async fn check_availability(&self, query: &SlotQuery) -> AppResult<AvailabilityOutcome> {
        debug!(
            "Checking availability for {} {}",
            query.date_param(),
            query.time_param()
        );

        let params = AvailabilityParams::new(&self.token, query);
        let request = self.http.get(&self.base_url).query(&params);

        self.bounded("availability check", async {
            let response = request
                .send()
                .await
                .map_err(|e| AppError::Gateway(format!("availability request failed: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                return Err(AppError::Gateway(format!(
                    "availability check returned {}",
                    status
                )));
            }

            let body: AvailabilityResponse = response
                .json()
                .await
                .map_err(|e| AppError::Gateway(format!("unparsable availability body: {}", e)))?;

            Ok(body.into_outcome())
        })
        .await
    }

    #[instrument(skip(self, request))]
    async fn create_hold(&self, request: &HoldRequest) -> AppResult<HoldOutcome> {
        debug!(
            "Creating hold for {} {} (key {})",
            request.slot.date_param(),
            request.slot.time_param(),
            request.idempotency_key
        );

        let body = HoldBody::new(&self.token, request);
        let http_request = self.http.post(&self.base_url).json(&body);

        self.bounded("hold creation", async {
            let response = http_request
                .send()
                .await
                .map_err(|e| AppError::Gateway(format!("hold request failed: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                return Err(AppError::Gateway(format!(
                    "hold creation returned {}",
                    status
                )));
            }

            let body: HoldResponse = response
                .json()
                .await
                .map_err(|e| AppError::Gateway(format!("unparsable hold body: {}", e)))?;

            body.into_outcome(Utc::now())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str, token: &str) -> GatewayConfig {
        GatewayConfig {
            base_url: base_url.to_string(),
            token: token.to_string(),
            timeout_secs: 7,
        }
    }

    #[test]
    fn test_empty_endpoint_is_config_error() {
        let result = HttpCalendarGateway::new(&config("", "secret"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_empty_token_is_config_error() {
        let result = HttpCalendarGateway::new(&config("https://calendar.example.com", "  "));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let gateway =
            HttpCalendarGateway::new(&config("https://calendar.example.com/api/", "secret"))
                .unwrap();
        assert_eq!(gateway.base_url, "https://calendar.example.com/api");
    }
}
