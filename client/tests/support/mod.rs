//! In-process stub of the advisory backend
//!
//! Fields are stored in memory with ids `f-123`, `f-124`, ... Fields whose
//! last crop is wheat get the single Rice recommendation; any other field
//! gets Maize then Sorghum. Special inputs:
//! - field id `malformed`: a recommendation with an out-of-range score
//! - field id `slow`: reads sleep for two seconds
//! - preference `delayMs`: the recommendation response is delayed
//! - image names `slow-*` are delayed, `*healthy*` are healthy, `*broken*` fail

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crop_advisor_client::config::ApiConfig;
use crop_advisor_client::ApiClient;

pub const FIRST_FIELD_ID: u64 = 123;

#[derive(Default)]
struct Inner {
    created: u64,
    fields: HashMap<String, Value>,
    request_ids: Vec<String>,
    diagnose_calls: usize,
}

#[derive(Clone, Default)]
pub struct StubState {
    inner: Arc<Mutex<Inner>>,
}

impl StubState {
    fn record(&self, headers: &HeaderMap) {
        if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
            self.inner.lock().unwrap().request_ids.push(id.to_string());
        }
    }

    pub fn request_ids(&self) -> Vec<String> {
        self.inner.lock().unwrap().request_ids.clone()
    }

    pub fn field_count(&self) -> usize {
        self.inner.lock().unwrap().fields.len()
    }

    pub fn diagnose_calls(&self) -> usize {
        self.inner.lock().unwrap().diagnose_calls
    }
}

pub struct StubBackend {
    pub addr: SocketAddr,
    pub state: StubState,
}

impl StubBackend {
    pub async fn spawn() -> Self {
        let state = StubState::default();
        let app = Router::new().nest("/api/v1", routes(state.clone()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    pub fn client(&self) -> ApiClient {
        self.client_with_timeout(30)
    }

    pub fn client_with_timeout(&self, timeout_secs: u64) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: self.base_url(),
            timeout_secs,
        })
        .unwrap()
    }
}

fn routes(state: StubState) -> Router {
    Router::new()
        .route("/fields", post(create_field))
        .route("/fields/:id", get(get_field))
        .route("/recommend", post(recommend))
        .route("/diagnose", post(diagnose))
        .with_state(state)
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
}

async fn create_field(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    state.record(&headers);

    let mut inner = state.inner.lock().unwrap();
    let id = format!("f-{}", FIRST_FIELD_ID + inner.created);
    inner.created += 1;

    body["id"] = Value::String(id.clone());
    body["createdAt"] = Value::String("2024-06-01T08:30:00".to_string());
    inner.fields.insert(id, body.clone());

    (StatusCode::CREATED, Json(body)).into_response()
}

async fn get_field(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    state.record(&headers);

    if id == "slow" {
        tokio::time::sleep(Duration::from_secs(2)).await;
    }

    let field = state.inner.lock().unwrap().fields.get(&id).cloned();
    match field {
        Some(field) => Json(field).into_response(),
        None => not_found("Field not found"),
    }
}

async fn recommend(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record(&headers);

    if let Some(delay) = body["preferences"]["delayMs"].as_u64() {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let field_id = body["fieldId"].as_str().unwrap_or_default().to_string();
    if field_id == "malformed" {
        return Json(json!({
            "recommendations": [{
                "crop": "Rice",
                "suitabilityScore": 1.7,
                "expectedYield": 4.5,
                "expectedProfit": 25000,
                "sustainabilityScore": 0.8,
                "explanation": []
            }]
        }))
        .into_response();
    }

    let field = state.inner.lock().unwrap().fields.get(&field_id).cloned();
    let Some(field) = field else {
        return not_found("Field not found");
    };

    let recommendations = if field["lastCrop"] == "wheat" {
        json!([{
            "crop": "Rice",
            "suitabilityScore": 0.92,
            "expectedYield": 4.5,
            "expectedProfit": 25000,
            "sustainabilityScore": 0.8,
            "explanation": ["High soil nitrogen favors rice"]
        }])
    } else {
        json!([
            {
                "crop": "Maize",
                "suitabilityScore": 0.75,
                "expectedYield": 5.2,
                "expectedProfit": 18000,
                "sustainabilityScore": 0.7,
                "explanation": ["Moderate rainfall", "Good drainage"]
            },
            {
                "crop": "Sorghum",
                "suitabilityScore": 0.6,
                "expectedYield": 3.1,
                "expectedProfit": -1200.5,
                "sustainabilityScore": 0.9,
                "explanation": []
            }
        ])
    };

    Json(json!({ "recommendations": recommendations })).into_response()
}

async fn diagnose(
    State(state): State<StubState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    state.record(&headers);
    state.inner.lock().unwrap().diagnose_calls += 1;

    let mut image = None;
    while let Ok(Some(part)) = multipart.next_field().await {
        if part.name() != Some("image") {
            continue;
        }
        let file_name = part.file_name().unwrap_or_default().to_string();
        let content_type = part.content_type().unwrap_or_default().to_string();
        let Ok(bytes) = part.bytes().await else {
            return StatusCode::BAD_REQUEST.into_response();
        };
        image = Some((file_name, content_type, bytes.len()));
    }

    let Some((file_name, content_type, size)) = image else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "image is required" })))
            .into_response();
    };
    if !content_type.starts_with("image/") || size == 0 {
        return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
    }

    if file_name.starts_with("slow-") {
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
    if file_name.contains("broken") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "inference failed").into_response();
    }

    let diagnosis = if file_name.contains("healthy") {
        json!({ "disease": "Healthy", "confidence": 0.85, "treatment": "No treatment needed" })
    } else {
        json!({
            "disease": "Leaf Blight",
            "confidence": 0.87,
            "treatment": "Apply copper-based fungicide"
        })
    };
    Json(diagnosis).into_response()
}
