//! In-process stand-in for the prediction engine.

#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use diapredict::config::Settings;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// How the stub answers `POST /predict`.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
    Hang,
}

#[derive(Clone)]
struct StubState {
    reply: Reply,
    requests: Arc<Mutex<Vec<Value>>>,
}

pub struct StubEngine {
    pub url: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl StubEngine {
    pub async fn spawn(reply: Reply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            reply,
            requests: requests.clone(),
        };
        let app = Router::new()
            .route("/", get(root))
            .route("/predict", post(predict))
            .with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            url: format!("http://{addr}"),
            requests,
        }
    }

    /// Request bodies received so far.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    pub fn settings(&self) -> Settings {
        settings_for(&self.url)
    }
}

pub fn settings_for(url: &str) -> Settings {
    Settings {
        api_url: url.to_string(),
        request_timeout: Duration::from_secs(5),
        reveal_delay: Duration::ZERO,
        ..Settings::default()
    }
}

/// The canonical high-risk answer.
pub fn high_risk() -> Value {
    json!({
        "prediction": 1,
        "probability": 0.82,
        "risk_level": "High",
        "feature_importance": {"Glucose": 0.4, "BMI": 0.3, "Age": 0.1}
    })
}

/// A URL on which nothing is listening.
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn root() -> Json<Value> {
    Json(json!({
        "status": "online",
        "message": "DiaPredict AI Backend is running. Send POST to /predict"
    }))
}

async fn predict(State(state): State<StubState>, Json(body): Json<Value>) -> Response {
    state.requests.lock().unwrap().push(body);
    match state.reply {
        Reply::Json(value) => Json(value).into_response(),
        Reply::Status(code) => (
            StatusCode::from_u16(code).unwrap(),
            Json(json!({"detail": "Model file missing from server."})),
        )
            .into_response(),
        Reply::Hang => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            StatusCode::GATEWAY_TIMEOUT.into_response()
        }
    }
}
