use crate::infra::{parse_language, AppState, DashboardData};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use payscale::dashboard::{
    export_file_name, Currency, DashboardSession, DashboardView, ExportFormat, FilterCriteria,
    JsonCatalog,
};
use payscale::error::AppError;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Language, currency and filter selection shared by the dashboard and export
/// endpoints. Missing members keep the configured defaults.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SelectionRequest {
    #[serde(default)]
    pub(crate) language: Option<String>,
    #[serde(default)]
    pub(crate) currency: Option<String>,
    #[serde(default)]
    pub(crate) filters: FilterCriteria,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExportRequest {
    #[serde(flatten)]
    pub(crate) selection: SelectionRequest,
    #[serde(default)]
    pub(crate) format: ExportFormat,
    #[serde(default)]
    pub(crate) date: Option<NaiveDate>,
}

pub(crate) fn dashboard_routes(data: Arc<DashboardData>) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/payscale/dashboard", post(dashboard_endpoint))
        .route("/api/v1/payscale/export", post(export_endpoint))
        .layer(Extension(data))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn dashboard_endpoint(
    Extension(data): Extension<Arc<DashboardData>>,
    Json(payload): Json<SelectionRequest>,
) -> Result<Json<DashboardView>, AppError> {
    let mut session = open_session(&data, payload)?;
    Ok(Json(session.view()))
}

pub(crate) async fn export_endpoint(
    Extension(data): Extension<Arc<DashboardData>>,
    Json(payload): Json<ExportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let ExportRequest {
        selection,
        format,
        date,
    } = payload;

    let session = open_session(&data, selection)?;
    let body = session.export(format)?;
    let file_name = export_file_name(format, date.unwrap_or_else(|| Local::now().date_naive()));
    info!(%file_name, bytes = body.len(), "prepared dashboard export");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    ))
}

fn open_session(
    data: &DashboardData,
    selection: SelectionRequest,
) -> Result<DashboardSession<Arc<JsonCatalog>>, AppError> {
    let language = match selection.language.as_deref() {
        Some(code) => parse_language(code).map_err(AppError::InvalidRequest)?,
        None => data.config.default_language,
    };
    let currency = match selection.currency.as_deref() {
        Some(code) => Currency::parse(code).ok_or_else(|| {
            AppError::InvalidRequest(format!("unsupported currency '{code}' (expected IQD or USD)"))
        })?,
        None => Currency::Iqd,
    };

    let mut session = data.session(language);
    session.set_criteria(selection.filters);
    session.set_currency(currency);
    Ok(session)
}
