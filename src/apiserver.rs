// apiserver.rs

use askama::Template;
use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::State,
    http::{Method, Response, StatusCode, header},
    response::{Html, IntoResponse},
    routing::*,
};
pub use axum_macros::debug_handler;
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::*;

const MSG_MISSING_READING: &str = "Missing temperature or humidity data";
const MSG_INVALID_THRESHOLD: &str = "Invalid threshold value";
const MSG_THRESHOLD_UPDATED: &str = "Threshold updated successfully";

#[derive(Template)]
#[template(path = "index.html.ask", escape = "html")]
pub struct IndexPage {
    pub temperature: String,
    pub humidity: String,
    pub threshold: String,
    pub buzzer: String,
    pub last_update: String,
    pub version: &'static str,
}

impl From<StatusView> for IndexPage {
    fn from(s: StatusView) -> Self {
        IndexPage {
            temperature: format!("{:.1}", s.state.temperature),
            humidity: format!("{:.1}", s.state.humidity),
            threshold: format!("{:.1}", s.state.threshold),
            buzzer: s.buzzer.to_string(),
            last_update: s.last_update,
            version: FW_VERSION,
        }
    }
}

/// Errors returned to the client as `{"error": message}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// `/api/update_temp` reports missing fields as client errors and
    /// conversion failures as server errors.
    pub fn from_reading(e: MeasurementError) -> Self {
        error!("Error processing update: {e}");
        if e.is_missing() {
            ApiError::BadRequest(MSG_MISSING_READING.into())
        } else {
            ApiError::Internal(e.to_string())
        }
    }

    /// Every failure of `/api/set_threshold` is a client error with one message.
    pub fn from_threshold(e: MeasurementError) -> Self {
        error!("Error setting threshold: {e}");
        ApiError::BadRequest(MSG_INVALID_THRESHOLD.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

fn parse_body(body: &Bytes) -> Result<serde_json::Value, MeasurementError> {
    serde_json::from_slice(body).map_err(|e| MeasurementError::Body(format!("invalid JSON ({e})")))
}

pub fn app(state: Arc<MyState>) -> Router {
    Router::new()
        .route("/", get(get_index))
        .route("/form.js", get(get_formjs))
        .route("/index.css", get(get_indexcss))
        .route("/uptime", get(get_uptime))
        .route("/api/get_data", get(get_data))
        .route("/api/update_temp", post(update_temp))
        .route("/api/set_threshold", post(set_threshold))
        .layer(cors_layer())
        .with_state(state)
}

/// The display client may be served from another origin than the API.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

pub async fn run_api_server(state: Arc<MyState>) -> anyhow::Result<()> {
    let addr = state.config.listen_addr();

    let app = app(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening to {addr}");
    Ok(axum::serve(listener, app.into_make_service()).await?)
}

pub async fn get_index(State(state): State<Arc<MyState>>) -> Response<Body> {
    let cnt = state.api_cnt.fetch_add(1, Ordering::Relaxed);
    info!("#{cnt} get_index()");

    let page = IndexPage::from(state.status().await);
    let index = match page.render() {
        Err(e) => {
            let err_msg = format!("Index template error: {e:?}\n");
            error!("{err_msg}");
            return (StatusCode::INTERNAL_SERVER_ERROR, err_msg).into_response();
        }
        Ok(s) => s,
    };
    (StatusCode::OK, Html(index)).into_response()
}

pub async fn get_formjs(State(state): State<Arc<MyState>>) -> Response<Body> {
    let cnt = state.api_cnt.fetch_add(1, Ordering::Relaxed);
    info!("#{cnt} get_formjs()");

    let formjs = include_bytes!("form.js");
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/javascript")],
        formjs.to_vec(),
    )
        .into_response()
}

pub async fn get_indexcss(State(state): State<Arc<MyState>>) -> Response<Body> {
    let cnt = state.api_cnt.fetch_add(1, Ordering::Relaxed);
    info!("#{cnt} get_indexcss()");

    let indexcss = include_bytes!("index.css");
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        indexcss.to_vec(),
    )
        .into_response()
}

pub async fn get_uptime(State(state): State<Arc<MyState>>) -> (StatusCode, Json<Uptime>) {
    let cnt = state.api_cnt.fetch_add(1, Ordering::Relaxed);
    info!("#{cnt} get_uptime()");

    (StatusCode::OK, Json(state.uptime()))
}

pub async fn get_data(State(state): State<Arc<MyState>>) -> (StatusCode, Json<SensorState>) {
    let cnt = state.api_cnt.fetch_add(1, Ordering::Relaxed);
    info!("#{cnt} get_data()");

    (StatusCode::OK, Json(state.get_state().await))
}

#[debug_handler]
pub async fn update_temp(
    State(state): State<Arc<MyState>>,
    body: Bytes,
) -> Result<Json<BuzzerReply>, ApiError> {
    let cnt = state.api_cnt.fetch_add(1, Ordering::Relaxed);
    info!("#{cnt} update_temp()");

    let m = parse_body(&body)
        .and_then(|v| Measurement::from_json(&v))
        .map_err(ApiError::from_reading)?;

    let buzzer_state = state.report_reading(m).await;
    Ok(Json(BuzzerReply { buzzer_state }))
}

#[debug_handler]
pub async fn set_threshold(
    State(state): State<Arc<MyState>>,
    body: Bytes,
) -> Result<Json<ThresholdReply>, ApiError> {
    let cnt = state.api_cnt.fetch_add(1, Ordering::Relaxed);
    info!("#{cnt} set_threshold()");

    let threshold = parse_body(&body)
        .and_then(|v| parse_threshold(&v))
        .map_err(ApiError::from_threshold)?;

    let new_threshold = state.set_threshold(threshold).await;
    Ok(Json(ThresholdReply {
        message: MSG_THRESHOLD_UPDATED.into(),
        new_threshold,
    }))
}


// EOF
