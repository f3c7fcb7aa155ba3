//! Integration tests for the calendar gateway client
//!
//! Exercises the fail-closed contract against a mock gateway: success paths,
//! non-success statuses, garbage bodies, protocol violations, and the
//! bounded timeout.

use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use atelier_core::config::GatewayConfig;
use atelier_core::models::{AvailabilityOutcome, HoldOutcome, HoldRequest, SlotQuery};
use atelier_core::traits::CalendarGateway;
use atelier_core::AppError;
use atelier_gateway::HttpCalendarGateway;

fn gateway_for(server: &MockServer) -> HttpCalendarGateway {
    HttpCalendarGateway::new(&GatewayConfig {
        base_url: server.uri(),
        token: "shared-secret".to_string(),
        timeout_secs: 7,
    })
    .unwrap()
}

fn sample_query() -> SlotQuery {
    SlotQuery::parse("2026-09-14", "10:30", 240, 30, 2, "Europe/Paris").unwrap()
}

fn sample_hold_request() -> HoldRequest {
    HoldRequest {
        slot: sample_query(),
        catalog_ref: "studio-a".to_string(),
        package_ref: "pkg-4h".to_string(),
        city: "Lyon".to_string(),
        comment: "side entrance".to_string(),
        locale: "fr".to_string(),
        source_page_url: "https://atelier.example/booking".to_string(),
        idempotency_key: Uuid::new_v4(),
    }
}

#[tokio::test]
async fn availability_check_sends_exact_wire_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("token", "shared-secret"))
        .and(query_param("action", "availability"))
        .and(query_param("date", "2026-09-14"))
        .and(query_param("time", "10:30"))
        .and(query_param("durationMinutes", "240"))
        .and(query_param("bufferMinutes", "30"))
        .and(query_param("maxBookingsPerDay", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"available": true})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = gateway_for(&server)
        .check_availability(&sample_query())
        .await
        .unwrap();

    assert_eq!(outcome, AvailabilityOutcome::Open);
}

#[tokio::test]
async fn availability_closed_carries_reason_and_suggestion() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "available": false,
            "reason": "day fully booked",
            "suggested": "2026-09-15 10:30",
        })))
        .mount(&server)
        .await;

    let outcome = gateway_for(&server)
        .check_availability(&sample_query())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        AvailabilityOutcome::Closed {
            reason: Some("day fully booked".to_string()),
            suggested: Some("2026-09-15 10:30".to_string()),
        }
    );
}

#[tokio::test]
async fn non_success_status_is_gateway_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = gateway_for(&server)
        .check_availability(&sample_query())
        .await;

    assert!(matches!(result, Err(AppError::Gateway(_))));
}

#[tokio::test]
async fn garbage_body_is_gateway_error_not_available() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = gateway_for(&server)
        .check_availability(&sample_query())
        .await;

    // Fail-closed: an unparsable body must never read as "available".
    assert!(matches!(result, Err(AppError::Gateway(_))));
}

#[tokio::test]
async fn hold_creation_posts_body_and_maps_placed() {
    let server = MockServer::start().await;
    let request = sample_hold_request();
    let expires = Utc::now() + chrono::Duration::minutes(30);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "okHold": true,
            "holdId": "h-42",
            "expiresAt": expires.to_rfc3339(),
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = gateway_for(&server).create_hold(&request).await.unwrap();

    match outcome {
        HoldOutcome::Placed {
            hold_id,
            expires_at,
        } => {
            assert_eq!(hold_id, "h-42");
            assert!(expires_at > Utc::now());
        }
        other => panic!("expected Placed, got {:?}", other),
    }

    // The posted body carries the protocol field names and the idempotency key.
    let received: Vec<Request> = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["action"], "hold");
    assert_eq!(body["catalog"], "studio-a");
    assert_eq!(body["pkg"], "pkg-4h");
    assert_eq!(body["lang"], "fr");
    assert_eq!(body["pageUrl"], "https://atelier.example/booking");
    assert_eq!(body["durationMinutes"], 240);
    assert_eq!(
        body["idempotencyKey"],
        request.idempotency_key.to_string()
    );
}

#[tokio::test]
async fn hold_rejection_is_an_outcome_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "okHold": false,
            "reason": "slot taken",
        })))
        .mount(&server)
        .await;

    let outcome = gateway_for(&server)
        .create_hold(&sample_hold_request())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        HoldOutcome::Rejected {
            reason: Some("slot taken".to_string())
        }
    );
}

#[tokio::test]
async fn hold_ok_without_expiry_is_gateway_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"okHold": true, "holdId": "h-1"})),
        )
        .mount(&server)
        .await;

    let result = gateway_for(&server).create_hold(&sample_hold_request()).await;
    assert!(matches!(result, Err(AppError::Gateway(_))));
}

#[tokio::test]
async fn slow_gateway_times_out_within_bound() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"available": true}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let gateway = gateway_for(&server).with_timeout(Duration::from_millis(100));

    let started = std::time::Instant::now();
    let result = gateway.check_availability(&sample_query()).await;

    assert!(matches!(result, Err(AppError::Timeout)));
    // The call returned at the bound, not after the gateway's delay.
    assert!(started.elapsed() < Duration::from_secs(2));
}
