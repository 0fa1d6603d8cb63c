use std::{collections::BTreeMap, time::Duration};

use axum::{
    extract::Path,
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Items with an id at or above this do not exist.
pub const MAX_ITEM_ID: u64 = 1000;

/// How long `/slow` waits before answering.
pub const SLOW_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: u64,
}

/// What `/echo` saw of the request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: BTreeMap<String, Vec<String>>,
    pub body: String,
}

impl Echo {
    /// All values received for a (lower-case) header name.
    pub fn header(&self, name: &str) -> &[String] {
        self.headers.get(name).map(Vec::as_slice).unwrap_or_default()
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/items/{id}", get(get_item))
        .route("/status/{code}", get(status))
        .route("/malformed", get(malformed))
        .route("/empty", get(empty))
        .route("/echo", any(echo))
        .route("/echo/{*rest}", any(echo))
        .route("/slow", get(slow))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn get_item(Path(id): Path<u64>) -> Result<Json<Item>, (StatusCode, Json<Value>)> {
    if id < MAX_ITEM_ID {
        Ok(Json(Item { id }))
    } else {
        Err((StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))))
    }
}

async fn status(Path(code): Path<u16>) -> (StatusCode, String) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, format!("status {code}"))
}

async fn malformed() -> &'static str {
    "{\"id\": seven"
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Json<Echo> {
    let mut seen: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in &headers {
        if let Ok(value) = value.to_str() {
            seen.entry(name.as_str().to_string())
                .or_default()
                .push(value.to_string());
        }
    }

    Json(Echo {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: seen,
        body,
    })
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(SLOW_DELAY).await;
    Json(json!({}))
}
