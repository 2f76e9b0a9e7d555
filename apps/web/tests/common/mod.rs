#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use pharmacy_core::InventoryPolicy;
use pharmacy_db::{Database, DbConfig};
use pharmacy_web::{router, AppState, StoreConfig};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`

pub struct TestApp {
    pub app: Router,
    pub db: Database,
}

// Fresh in-memory database behind the full router
pub async fn setup_app() -> TestApp {
    let db = Database::new(DbConfig::in_memory())
        .await
        .expect("Failed to init DB");
    let state = AppState::new(db.clone(), InventoryPolicy::default(), StoreConfig::default());
    TestApp {
        app: router(state),
        db,
    }
}

// Percent-encodes pairs as an application/x-www-form-urlencoded body
pub fn form_body(pairs: &[(&str, &str)]) -> String {
    fn encode(value: &str) -> String {
        let mut out = String::new();
        for byte in value.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    out.push(byte as char)
                }
                _ => out.push_str(&format!("%{:02X}", byte)),
            }
        }
        out
    }

    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

pub async fn post_form(app: &Router, uri: &str, pairs: &[(&str, &str)]) -> (StatusCode, Value) {
    let req = Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form_body(pairs)))
        .unwrap();
    send(app, req).await
}

pub async fn post_json(app: &Router, uri: &str, payload: &Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap();
    send(app, req).await
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

// Adds a medicine through the form endpoint and returns its id
pub async fn add_medicine(
    app: &Router,
    name: &str,
    category: &str,
    price: &str,
    stock: &str,
    expiry: &str,
) -> i64 {
    let (status, body) = post_form(
        app,
        "/inventory/add",
        &[
            ("name", name),
            ("manufacturer", "Cipla"),
            ("category", category),
            ("price", price),
            ("stock_quantity", stock),
            ("expiry_date", expiry),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "add failed: {body}");
    body["id"].as_i64().unwrap()
}
