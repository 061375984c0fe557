// Integration tests for the stop/route query and wallet endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use transit::api::create_app;
use transit::config::SimulationConfig;
use transit::fleet::{FleetSimulator, LiveFleet};
use transit::store::{TransitStore, DEMO_USER};

fn create_test_app() -> Router {
    let store = Arc::new(TransitStore::with_sample_data().unwrap());
    let simulator = FleetSimulator::new(
        &store.route_ids(),
        &SimulationConfig::default(),
        StdRng::seed_from_u64(1),
        Utc::now(),
    );
    let fleet = Arc::new(LiveFleet::new(simulator, 16));
    create_app(store, fleet)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_list_stops() {
    let app = create_test_app();
    let (status, body) = send(&app, get("/api/stops")).await;

    assert_eq!(status, StatusCode::OK);
    let stops = body.as_array().unwrap();
    assert_eq!(stops.len(), 6);
    assert_eq!(stops[0]["id"], 1);
    assert_eq!(stops[0]["name"], "Downtown Transit Center");
}

#[tokio::test]
async fn test_list_routes_camel_case() {
    let app = create_test_app();
    let (status, body) = send(&app, get("/api/routes")).await;

    assert_eq!(status, StatusCode::OK);
    let route = &body[0];
    assert_eq!(route["startStopId"], 1);
    assert_eq!(route["endStopId"], 2);
    assert_eq!(route["duration"], 20);
    assert_eq!(route["tokenCost"], "2.50");
    assert!(route["nextDeparture"].is_string());
}

#[tokio::test]
async fn test_search_stops() {
    let app = create_test_app();

    let (status, body) = send(&app, get("/api/stops/search?q=FISK")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Fisk University");

    let (status, body) = send(&app, get("/api/stops/search?q=airport")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_search_stops_missing_query() {
    let app = create_test_app();
    let (status, body) = send(&app, get("/api/stops/search")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Search query required");
}

#[tokio::test]
async fn test_routes_by_stop() {
    let app = create_test_app();

    let (status, body) = send(&app, get("/api/routes/by-stop/2")).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect();
    // Route 1 ends at stop 2, route 6 ends there too
    assert_eq!(ids, vec![1, 6]);

    let (status, body) = send(&app, get("/api/routes/by-stop/999")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_out_of_range_ids_match_nothing() {
    let app = create_test_app();

    for uri in [
        "/api/routes/by-stop/-1",
        "/api/routes/by-stop/4294967296",
        "/api/routes/between?start=-1&end=2",
    ] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body, json!([]), "{}", uri);
    }
}

#[tokio::test]
async fn test_routes_by_stop_invalid_id() {
    let app = create_test_app();
    let (status, body) = send(&app, get("/api/routes/by-stop/downtown")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid stop ID");
}

#[tokio::test]
async fn test_routes_between_direction() {
    let app = create_test_app();

    let (status, body) = send(&app, get("/api/routes/between?start=1&end=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], 1);

    let (status, body) = send(&app, get("/api/routes/between?start=2&end=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_routes_between_invalid_ids() {
    let app = create_test_app();

    for uri in [
        "/api/routes/between",
        "/api/routes/between?start=1",
        "/api/routes/between?start=x&end=2",
    ] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["message"], "Invalid stop IDs");
    }
}

#[tokio::test]
async fn test_demo_wallet_and_history() {
    let app = create_test_app();

    let (status, wallet) = send(&app, get(&format!("/api/wallet/{}", DEMO_USER))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wallet["userId"], DEMO_USER);
    assert_eq!(wallet["balance"], "25.00");

    let uri = format!("/api/wallet/{}/transactions", wallet["id"]);
    let (status, history) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["type"], "SPEND");
    assert_eq!(history[1]["type"], "EARN");
}

#[tokio::test]
async fn test_post_transaction_updates_balance() {
    let app = create_test_app();
    let (_, wallet) = send(&app, get("/api/wallet/new-rider")).await;
    assert_eq!(wallet["balance"], "0");

    let uri = format!("/api/wallet/{}/transactions", wallet["id"]);
    let (status, tx) = send(
        &app,
        post_json(
            &uri,
            json!({ "type": "EARN", "amount": "5.00", "description": "Referral" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tx["type"], "EARN");
    assert_eq!(tx["walletId"], wallet["id"]);

    let (status, _) = send(
        &app,
        post_json(&uri, json!({ "type": "SPEND", "amount": "1.50", "description": "Ride" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, wallet) = send(&app, get("/api/wallet/new-rider")).await;
    assert_eq!(wallet["balance"], "3.50");
}

#[tokio::test]
async fn test_post_transaction_insufficient_balance() {
    let app = create_test_app();
    let (_, wallet) = send(&app, get("/api/wallet/broke-rider")).await;

    let uri = format!("/api/wallet/{}/transactions", wallet["id"]);
    let (status, body) = send(
        &app,
        post_json(&uri, json!({ "type": "SPEND", "amount": "1.00", "description": "Ride" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Insufficient balance"));

    let (_, history) = send(&app, get(&uri)).await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_post_transaction_balance_overflow() {
    let app = create_test_app();
    let (_, wallet) = send(&app, get(&format!("/api/wallet/{}", DEMO_USER))).await;
    let uri = format!("/api/wallet/{}/transactions", wallet["id"]);

    let (status, body) = send(
        &app,
        post_json(
            &uri,
            json!({ "type": "EARN", "amount": "79228162514264337593543950335" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Amount would overflow wallet balance");

    let (_, wallet) = send(&app, get(&format!("/api/wallet/{}", DEMO_USER))).await;
    assert_eq!(wallet["balance"], "25.00");
}

#[tokio::test]
async fn test_post_transaction_unknown_wallet() {
    let app = create_test_app();
    let (status, body) = send(
        &app,
        post_json(
            "/api/wallet/999/transactions",
            json!({ "type": "EARN", "amount": "1.00" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Wallet 999 not found");
}

#[tokio::test]
async fn test_post_transaction_bad_body() {
    let app = create_test_app();
    let (_, wallet) = send(&app, get(&format!("/api/wallet/{}", DEMO_USER))).await;
    let uri = format!("/api/wallet/{}/transactions", wallet["id"]);

    let (status, body) = send(&app, post_json(&uri, json!({ "type": "REFUND", "amount": "1" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, body) = send(&app, post_json(&uri, json!({ "type": "EARN", "amount": "0" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Amount must be greater than zero");
}

#[tokio::test]
async fn test_transactions_invalid_wallet_id() {
    let app = create_test_app();
    let (status, body) = send(&app, get("/api/wallet/abc/transactions")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid wallet ID");
}
