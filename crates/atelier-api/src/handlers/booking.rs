//! Booking handlers
//!
//! HTTP handlers for the check -> quote -> hold workflow. Each session's
//! flow is fetched from the registry and locked for the duration of the
//! request; validation and conflict errors propagate as `AppError` while
//! gateway outcomes are reported through the track state DTOs.

use actix_web::{web, HttpResponse};
use tracing::{debug, instrument};

use atelier_core::config::AppConfig;
use atelier_core::AppError;

use crate::dto::{
    AvailabilityStateDto, CheckRequest, HoldOrderRequest, HoldStateDto, QuoteRequest,
    QuoteResponse,
};
use crate::sessions::SessionRegistry;

fn require_session_id(session_id: &str) -> Result<(), AppError> {
    if session_id.trim().is_empty() {
        return Err(AppError::Validation("sessionId must not be empty".to_string()));
    }
    Ok(())
}

/// Check slot availability
///
/// POST /api/v1/booking/check
#[instrument(skip(registry, body), fields(session = %body.session_id))]
pub async fn check(
    registry: web::Data<SessionRegistry>,
    body: web::Json<CheckRequest>,
) -> Result<HttpResponse, AppError> {
    require_session_id(&body.session_id)?;
    debug!("Availability check for {} {}", body.date, body.time);

    let flow = registry.flow(&body.session_id).await;
    let mut flow = flow.lock().await;

    flow.update_slot(body.slot_draft());
    let track = flow.check_availability().await?;

    Ok(HttpResponse::Ok().json(AvailabilityStateDto::from(track)))
}

/// Place a hold for the checked slot
///
/// POST /api/v1/booking/hold
#[instrument(skip(registry, body), fields(session = %body.session_id))]
pub async fn hold(
    registry: web::Data<SessionRegistry>,
    body: web::Json<HoldOrderRequest>,
) -> Result<HttpResponse, AppError> {
    require_session_id(&body.session_id)?;

    let flow = registry.flow(&body.session_id).await;
    let mut flow = flow.lock().await;

    let track = flow.place_hold(&body.order_context()).await?;

    Ok(HttpResponse::Ok().json(HoldStateDto::from(track)))
}

/// Price a package draft under the session's promo state
///
/// POST /api/v1/booking/quote
#[instrument(skip(registry, config, body), fields(session = %body.session_id))]
pub async fn quote(
    registry: web::Data<SessionRegistry>,
    config: web::Data<AppConfig>,
    body: web::Json<QuoteRequest>,
) -> Result<HttpResponse, AppError> {
    require_session_id(&body.session_id)?;

    let flow = registry.flow(&body.session_id).await;
    let flow = flow.lock().await;

    let draft = body.package.clone().into_draft();
    let quote = flow.quote(&draft, &config.pricing, &config.discount);

    Ok(HttpResponse::Ok().json(QuoteResponse::from(quote)))
}

/// Configure booking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/booking")
            .route("/check", web::post().to(check))
            .route("/hold", web::post().to(hold))
            .route("/quote", web::post().to(quote)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::{test, App};
    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    use atelier_core::models::{AvailabilityOutcome, HoldOutcome, HoldRequest, SlotQuery};
    use atelier_core::traits::CalendarGateway;
    use atelier_promo::MemoryPromoStore;

    struct OpenGateway;

    #[async_trait]
    impl CalendarGateway for OpenGateway {
        async fn check_availability(
            &self,
            _query: &SlotQuery,
        ) -> Result<AvailabilityOutcome, AppError> {
            Ok(AvailabilityOutcome::Open)
        }

        async fn create_hold(&self, _request: &HoldRequest) -> Result<HoldOutcome, AppError> {
            Ok(HoldOutcome::Placed {
                hold_id: "h-1".to_string(),
                expires_at: Utc::now() + Duration::minutes(30),
            })
        }
    }

    struct DownGateway;

    #[async_trait]
    impl CalendarGateway for DownGateway {
        async fn check_availability(
            &self,
            _query: &SlotQuery,
        ) -> Result<AvailabilityOutcome, AppError> {
            Err(AppError::Timeout)
        }

        async fn create_hold(&self, _request: &HoldRequest) -> Result<HoldOutcome, AppError> {
            Err(AppError::Timeout)
        }
    }

    fn registry(gateway: Arc<dyn CalendarGateway>) -> web::Data<SessionRegistry> {
        web::Data::new(SessionRegistry::new(
            gateway,
            Arc::new(MemoryPromoStore::new()),
        ))
    }

    fn test_config() -> web::Data<AppConfig> {
        use atelier_core::config::{GatewayConfig, PromoConfig, ServerConfig};
        use atelier_core::models::{DiscountPolicy, PricingTable};

        web::Data::new(AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                workers: 1,
            },
            gateway: GatewayConfig {
                base_url: "https://calendar.example.com/api".to_string(),
                token: "secret".to_string(),
                timeout_secs: 7,
            },
            promo: PromoConfig {
                redis_url: "redis://127.0.0.1:6379".to_string(),
            },
            pricing: PricingTable::default(),
            discount: DiscountPolicy::default(),
        })
    }

    macro_rules! booking_app {
        ($gateway:expr) => {
            test::init_service(
                App::new()
                    .app_data(registry($gateway))
                    .app_data(test_config())
                    .configure(configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_check_open_slot() {
        let app = booking_app!(Arc::new(OpenGateway));

        let req = test::TestRequest::post()
            .uri("/booking/check")
            .set_json(serde_json::json!({
                "sessionId": "s-1",
                "date": "2026-09-14",
                "time": "10:30"
            }))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "available");
    }

    #[actix_web::test]
    async fn test_check_malformed_date_is_400() {
        let app = booking_app!(Arc::new(OpenGateway));

        let req = test::TestRequest::post()
            .uri("/booking/check")
            .set_json(serde_json::json!({
                "sessionId": "s-1",
                "date": "2024-13-40",
                "time": "10:30"
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_check_gateway_down_reports_failed_track() {
        let app = booking_app!(Arc::new(DownGateway));

        let req = test::TestRequest::post()
            .uri("/booking/check")
            .set_json(serde_json::json!({
                "sessionId": "s-1",
                "date": "2026-09-14",
                "time": "10:30"
            }))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "failed");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("cannot determine availability"));
    }

    #[actix_web::test]
    async fn test_hold_before_check_is_409() {
        let app = booking_app!(Arc::new(OpenGateway));

        let req = test::TestRequest::post()
            .uri("/booking/hold")
            .set_json(serde_json::json!({ "sessionId": "s-1" }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 409);
    }

    #[actix_web::test]
    async fn test_check_then_hold_then_quote_loses_discount() {
        let app = booking_app!(Arc::new(OpenGateway));

        let check = test::TestRequest::post()
            .uri("/booking/check")
            .set_json(serde_json::json!({
                "sessionId": "s-1",
                "date": "2026-09-14",
                "time": "10:30"
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, check).await;
        assert_eq!(body["status"], "available");

        let hold = test::TestRequest::post()
            .uri("/booking/hold")
            .set_json(serde_json::json!({
                "sessionId": "s-1",
                "catalog": "cat-1",
                "pkg": "pkg-1",
                "city": "Paris"
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, hold).await;
        assert_eq!(body["status"], "held");
        assert_eq!(body["holdId"], "h-1");

        let quote = test::TestRequest::post()
            .uri("/booking/quote")
            .set_json(serde_json::json!({
                "sessionId": "s-1",
                "package": { "duration": "4h", "reels": 3, "photos": 20 }
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, quote).await;
        assert_eq!(body["discount"], "0");
        assert_eq!(body["subtotal"], body["total"]);
    }

    #[actix_web::test]
    async fn test_quote_fresh_session_gets_discount() {
        let app = booking_app!(Arc::new(OpenGateway));

        let req = test::TestRequest::post()
            .uri("/booking/quote")
            .set_json(serde_json::json!({
                "sessionId": "s-2",
                "package": { "duration": "4h", "reels": 3, "photos": 20 }
            }))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["subtotal"], "750");
        assert_eq!(body["discount"], "75");
        assert_eq!(body["total"], "675");
    }

    #[actix_web::test]
    async fn test_empty_session_id_is_400() {
        let app = booking_app!(Arc::new(OpenGateway));

        let req = test::TestRequest::post()
            .uri("/booking/check")
            .set_json(serde_json::json!({
                "sessionId": "  ",
                "date": "2026-09-14",
                "time": "10:30"
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }
}
