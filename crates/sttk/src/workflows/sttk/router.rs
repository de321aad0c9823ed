use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::penalty::PenaltyInputs;

use super::domain::{ReportId, ReportRequest, SubmissionReceipt};
use super::options::OptionsProvider;
use super::repository::{RepositoryError, ReportRepository};
use super::service::{ReportServiceError, SttkReportService};

/// Router exposing report intake, approval, preview and dashboards.
pub fn sttk_router<R, O>(service: Arc<SttkReportService<R, O>>) -> Router
where
    R: ReportRepository + 'static,
    O: OptionsProvider + 'static,
{
    Router::new()
        .route(
            "/api/v1/sttk/reports",
            post(submit_handler::<R, O>).get(list_handler::<R, O>),
        )
        .route("/api/v1/sttk/reports/:report_id", get(get_handler::<R, O>))
        .route(
            "/api/v1/sttk/reports/:report_id/approve",
            post(approve_handler::<R, O>),
        )
        .route("/api/v1/sttk/penalties", post(preview_handler::<R, O>))
        .route("/api/v1/sttk/options", get(options_handler::<R, O>))
        .route("/api/v1/sttk/export.csv", get(export_handler::<R, O>))
        .route("/api/v1/sttk/dashboard/kpi", get(kpi_handler::<R, O>))
        .route(
            "/api/v1/sttk/dashboard/manager",
            get(manager_handler::<R, O>),
        )
        .with_state(service)
}

fn status_for(error: &ReportServiceError) -> StatusCode {
    match error {
        ReportServiceError::Submission(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ReportServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ReportServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ReportServiceError::Repository(RepositoryError::Unavailable(_))
        | ReportServiceError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: ReportServiceError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        tracing::error!(error = %error, "sttk request failed");
    }
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}

pub(crate) async fn submit_handler<R, O>(
    State(service): State<Arc<SttkReportService<R, O>>>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Response
where
    R: ReportRepository + 'static,
    O: OptionsProvider + 'static,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "unreadable sttk submission");
            let receipt = SubmissionReceipt::rejected(format!(
                "Gagal mengirim laporan: {}",
                rejection.body_text()
            ));
            return (rejection.status(), Json(receipt)).into_response();
        }
    };

    match service.submit(request) {
        Ok(report) => (
            StatusCode::CREATED,
            Json(SubmissionReceipt::accepted(report.id)),
        )
            .into_response(),
        Err(error) => {
            let status = status_for(&error);
            if status.is_server_error() {
                tracing::error!(error = %error, "sttk submission failed");
            }
            let receipt = SubmissionReceipt::rejected(format!("Gagal mengirim laporan: {error}"));
            (status, Json(receipt)).into_response()
        }
    }
}

pub(crate) async fn list_handler<R, O>(
    State(service): State<Arc<SttkReportService<R, O>>>,
) -> Response
where
    R: ReportRepository + 'static,
    O: OptionsProvider + 'static,
{
    match service.list() {
        Ok(reports) => (StatusCode::OK, Json(reports)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R, O>(
    State(service): State<Arc<SttkReportService<R, O>>>,
    Path(report_id): Path<u64>,
) -> Response
where
    R: ReportRepository + 'static,
    O: OptionsProvider + 'static,
{
    match service.get(ReportId(report_id)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn approve_handler<R, O>(
    State(service): State<Arc<SttkReportService<R, O>>>,
    Path(report_id): Path<u64>,
) -> Response
where
    R: ReportRepository + 'static,
    O: OptionsProvider + 'static,
{
    match service.approve(ReportId(report_id)) {
        Ok(report) => {
            let payload = json!({
                "success": true,
                "id": report.id,
                "status": report.status.label(),
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(ReportServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "success": false,
                "id": report_id,
                "error": "report not found",
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn preview_handler<R, O>(
    State(service): State<Arc<SttkReportService<R, O>>>,
    payload: Result<Json<PenaltyInputs>, JsonRejection>,
) -> Response
where
    R: ReportRepository + 'static,
    O: OptionsProvider + 'static,
{
    let inputs = match payload {
        Ok(Json(inputs)) => inputs,
        Err(rejection) => {
            let body = json!({ "error": rejection.body_text() });
            return (rejection.status(), Json(body)).into_response();
        }
    };
    let computation = service.preview(&inputs);
    (StatusCode::OK, Json(computation)).into_response()
}

pub(crate) async fn options_handler<R, O>(
    State(service): State<Arc<SttkReportService<R, O>>>,
) -> Response
where
    R: ReportRepository + 'static,
    O: OptionsProvider + 'static,
{
    match service.options() {
        Ok(options) => (StatusCode::OK, Json(options)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_handler<R, O>(
    State(service): State<Arc<SttkReportService<R, O>>>,
) -> Response
where
    R: ReportRepository + 'static,
    O: OptionsProvider + 'static,
{
    match service.export_csv_string() {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"sttk-reports.csv\"",
                ),
            ],
            body,
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn kpi_handler<R, O>(
    State(service): State<Arc<SttkReportService<R, O>>>,
) -> Response
where
    R: ReportRepository + 'static,
    O: OptionsProvider + 'static,
{
    match service.kpi() {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ManagerQuery {
    today: NaiveDate,
}

pub(crate) async fn manager_handler<R, O>(
    State(service): State<Arc<SttkReportService<R, O>>>,
    Query(query): Query<ManagerQuery>,
) -> Response
where
    R: ReportRepository + 'static,
    O: OptionsProvider + 'static,
{
    match service.manager_summary(query.today) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}
