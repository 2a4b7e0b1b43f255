use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::lending::evaluation::EligibilityConfig;
use crate::workflows::lending::LendingService;

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request builds")
}

fn seeded_router() -> axum::Router {
    let mut history = loan(1, 1, 80_000.0);
    history.emis_paid_on_time = 10;
    history.monthly_repayment = 3_000.0;
    let store = Arc::new(MemoryStore::with_records(
        vec![customer(1, 100_000), customer(2, 40_000)],
        vec![history],
    ));
    lending_router_with_service(LendingService::new(
        store.clone(),
        store,
        EligibilityConfig::standard(),
    ))
}

#[tokio::test]
async fn register_route_returns_created_customer() {
    let (service, _) = build_service();
    let router = lending_router_with_service(service);

    let response = router
        .oneshot(json_request(
            "/register",
            json!({
                "first_name": "Meera",
                "last_name": "Iyer",
                "age": 29,
                "monthly_income": 100000,
                "phone_number": "9123456780",
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["customer_id"], json!(1));
    assert_eq!(payload["name"], json!("Meera Iyer"));
    assert_eq!(payload["approved_limit"], json!(3_600_000));
}

#[tokio::test]
async fn register_route_rejects_missing_fields() {
    let (service, _) = build_service();
    let router = lending_router_with_service(service);

    let response = router
        .oneshot(json_request("/register", json!({ "first_name": "Meera" })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("malformed request"));
}

#[tokio::test]
async fn check_eligibility_route_returns_approval_payload() {
    let response = seeded_router()
        .oneshot(json_request(
            "/check-eligibility",
            json!({
                "customer_id": 1,
                "loan_amount": 200000.0,
                "interest_rate": 15.0,
                "tenure": 24,
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["approval"], json!(true));
    assert_eq!(payload["interest_rate"], json!(15.0));
    assert_eq!(payload["corrected_interest_rate"], json!(12.0));
    assert!(payload["monthly_repayment"].as_f64().expect("number") > 0.0);
}

#[tokio::test]
async fn check_eligibility_route_returns_rejection_message() {
    let response = seeded_router()
        .oneshot(json_request(
            "/check-eligibility",
            json!({
                "customer_id": 2,
                "loan_amount": 500000.0,
                "interest_rate": 10.0,
                "tenure": 12,
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["approval"], json!(false));
    assert_eq!(
        payload["message"],
        json!("Loan not approved due to low credit score.")
    );
}

#[tokio::test]
async fn check_eligibility_route_returns_not_found() {
    let response = seeded_router()
        .oneshot(json_request(
            "/check-eligibility",
            json!({
                "customer_id": 404,
                "loan_amount": 1000.0,
                "interest_rate": 10.0,
                "tenure": 12,
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], json!("Customer not found"));
}

#[tokio::test]
async fn check_eligibility_route_maps_invalid_computation() {
    let response = seeded_router()
        .oneshot(json_request(
            "/check-eligibility",
            json!({
                "customer_id": 1,
                "loan_amount": 1000.0,
                "interest_rate": 0.0,
                "tenure": 12,
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn check_eligibility_route_rejects_invalid_terms() {
    let response = seeded_router()
        .oneshot(json_request(
            "/check-eligibility",
            json!({
                "customer_id": 1,
                "loan_amount": -5.0,
                "interest_rate": 10.0,
                "tenure": 12,
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_loan_route_rejects_tenure_past_the_calendar() {
    let response = seeded_router()
        .oneshot(json_request(
            "/create-loan",
            json!({
                "customer_id": 1,
                "loan_amount": 50_000.0,
                "interest_rate": 14.0,
                "tenure": u32::MAX,
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.contains("supported calendar")));
}

#[tokio::test]
async fn create_loan_route_returns_created_loan() {
    let response = seeded_router()
        .oneshot(json_request(
            "/create-loan",
            json!({
                "customer_id": 1,
                "loan_amount": 150000.0,
                "interest_rate": 9.5,
                "tenure": 18,
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["loan_id"], json!(2));
    assert_eq!(payload["customer_id"], json!(1));
    assert_eq!(payload["loan_approved"], json!(true));
    assert!(payload["monthly_installment"].as_f64().expect("number") > 0.0);
}

#[tokio::test]
async fn create_loan_route_passes_rejection_through() {
    let response = seeded_router()
        .oneshot(json_request(
            "/create-loan",
            json!({
                "customer_id": 2,
                "loan_amount": 150000.0,
                "interest_rate": 9.5,
                "tenure": 18,
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["approval"], json!(false));
    assert!(payload.get("loan_id").is_none());
}

#[tokio::test]
async fn view_loan_handler_returns_joined_customer() {
    let mut history = loan(1, 1, 80_000.0);
    history.emis_paid_on_time = 10;
    let store = Arc::new(MemoryStore::with_records(vec![customer(1, 100_000)], vec![history]));
    let service = Arc::new(LendingService::new(
        store.clone(),
        store,
        EligibilityConfig::standard(),
    ));

    let response = crate::workflows::lending::router::view_loan_handler::<MemoryStore, MemoryStore>(
        State(service),
        Path(1),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["loan_id"], json!(1));
    assert_eq!(payload["emis_paid_on_time"], json!(10));
    assert_eq!(payload["customer"]["name"], json!("Asha Rao"));
}

#[tokio::test]
async fn view_loan_route_returns_not_found() {
    let response = seeded_router()
        .oneshot(
            Request::get("/view-loan/999")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], json!("Loan not found"));
}

#[tokio::test]
async fn view_loans_route_lists_customer_loans() {
    let response = seeded_router()
        .oneshot(
            Request::get("/view-loans/1")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let loans = payload.as_array().expect("array payload");
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0]["repayments_left"], json!(14));
    assert_eq!(loans[0]["monthly_installment"], json!(3000.0));
}

#[tokio::test]
async fn view_loans_route_returns_not_found_for_unknown_customer() {
    let response = seeded_router()
        .oneshot(
            Request::get("/view-loans/31")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn repository_outage_maps_to_internal_error() {
    let store = Arc::new(UnavailableStore);
    let router = crate::workflows::lending::lending_router(Arc::new(LendingService::new(
        store.clone(),
        store,
        EligibilityConfig::standard(),
    )));

    let response = router
        .oneshot(json_request(
            "/check-eligibility",
            json!({
                "customer_id": 1,
                "loan_amount": 1000.0,
                "interest_rate": 10.0,
                "tenure": 12,
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
