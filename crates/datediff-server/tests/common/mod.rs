#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use datediff_server::{build_app, AppConfig};
use serde_json::Value;
use tower::ServiceExt; // for oneshot

pub const REST_PATH: &str = "/V1/datetime/calculate";

pub fn app() -> Router {
    build_app(&AppConfig::default()).expect("default config builds")
}

pub async fn post_raw(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    post_raw(app, uri, body.to_string()).await
}

pub async fn calculate(start: &str, end: &str, unit: &str) -> (StatusCode, Value) {
    let body = serde_json::json!({
        "startDate": start,
        "endDate": end,
        "calculationType": unit,
    });
    post_json(app(), REST_PATH, &body).await
}

pub async fn graphql(query: String) -> (StatusCode, Value) {
    post_json(app(), "/graphql", &serde_json::json!({ "query": query })).await
}

pub fn diff_query(start: &str, end: &str, unit: &str) -> String {
    format!(
        r#"query {{
  DiffCalculatorQuery(
    startDate: "{start}"
    endDate: "{end}"
    calculationType: {unit}
  ) {{
    result
  }}
}}"#
    )
}
