// Local stand-in for the portal server used by request tests

use axum::http::{HeaderMap, Method};
use axum::{Json, Router};
use serde_json::{Map, Value};
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Reflect the method, headers and body of a request back as JSON
pub async fn echo_request(method: Method, headers: HeaderMap, body: String) -> Json<Value> {
    let mut echoed = Map::new();
    for (name, value) in headers.iter() {
        echoed.insert(
            name.to_string(),
            Value::String(value.to_str().unwrap_or_default().to_string()),
        );
    }

    Json(serde_json::json!({
        "method": method.as_str(),
        "headers": echoed,
        "body": body,
    }))
}
