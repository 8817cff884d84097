use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::ingest;

use super::domain::{OfferContext, ScoredLead};
use super::intent::CompletionTransport;
use super::repository::LeadRepository;
use super::service::{LeadScoringService, ScoringError};

/// Router builder exposing the lead qualification HTTP API.
pub fn qualification_router<R, T>(service: Arc<LeadScoringService<R, T>>) -> Router
where
    R: LeadRepository + 'static,
    T: CompletionTransport + 'static,
{
    Router::new()
        .route(
            "/api/v1/offer",
            post(set_offer_handler::<R, T>).get(get_offer_handler::<R, T>),
        )
        .route("/api/v1/leads/upload", post(upload_leads_handler::<R, T>))
        .route("/api/v1/leads", get(get_leads_handler::<R, T>))
        .route("/api/v1/score", post(score_handler::<R, T>))
        .route("/api/v1/score/stats", get(stats_handler::<R, T>))
        .route("/api/v1/results", get(results_handler::<R, T>))
        .route("/api/v1/results/export", get(export_handler::<R, T>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct OfferSubmission {
    pub name: String,
    pub value_propositions: Vec<String>,
    pub ideal_use_cases: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LeadUploadRequest {
    pub csv: String,
}

pub(crate) async fn set_offer_handler<R, T>(
    State(service): State<Arc<LeadScoringService<R, T>>>,
    axum::Json(submission): axum::Json<OfferSubmission>,
) -> Response
where
    R: LeadRepository + 'static,
    T: CompletionTransport + 'static,
{
    let offer = match OfferContext::new(
        submission.name,
        submission.value_propositions,
        submission.ideal_use_cases,
    ) {
        Ok(offer) => offer,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    match service.repository().set_offer(offer.clone()) {
        Ok(()) => (StatusCode::CREATED, axum::Json(offer)).into_response(),
        Err(error) => internal_error(error),
    }
}

pub(crate) async fn get_offer_handler<R, T>(
    State(service): State<Arc<LeadScoringService<R, T>>>,
) -> Response
where
    R: LeadRepository + 'static,
    T: CompletionTransport + 'static,
{
    match service.repository().offer() {
        Ok(Some(offer)) => (StatusCode::OK, axum::Json(offer)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "no offer context configured" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => internal_error(error),
    }
}

pub(crate) async fn upload_leads_handler<R, T>(
    State(service): State<Arc<LeadScoringService<R, T>>>,
    axum::Json(request): axum::Json<LeadUploadRequest>,
) -> Response
where
    R: LeadRepository + 'static,
    T: CompletionTransport + 'static,
{
    let max_rows = service.config().max_upload_rows;
    let prospects = match ingest::parse_prospects(Cursor::new(request.csv.into_bytes()), max_rows) {
        Ok(prospects) => prospects,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    match service.repository().replace_prospects(prospects) {
        Ok(count) => {
            let payload = json!({ "uploaded": count });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => internal_error(error),
    }
}

pub(crate) async fn get_leads_handler<R, T>(
    State(service): State<Arc<LeadScoringService<R, T>>>,
) -> Response
where
    R: LeadRepository + 'static,
    T: CompletionTransport + 'static,
{
    match service.repository().prospects() {
        Ok(prospects) => {
            let payload = json!({ "count": prospects.len(), "leads": prospects });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => internal_error(error),
    }
}

pub(crate) async fn score_handler<R, T>(
    State(service): State<Arc<LeadScoringService<R, T>>>,
) -> Response
where
    R: LeadRepository + 'static,
    T: CompletionTransport + 'static,
{
    match service.run_scoring().await {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(ScoringError::NoOffer) => {
            let payload = json!({ "error": ScoringError::NoOffer.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(ScoringError::NoLeads) => {
            let payload = json!({ "error": ScoringError::NoLeads.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(ScoringError::Classifier(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
        Err(error) => internal_error(error),
    }
}

pub(crate) async fn stats_handler<R, T>(
    State(service): State<Arc<LeadScoringService<R, T>>>,
) -> Response
where
    R: LeadRepository + 'static,
    T: CompletionTransport + 'static,
{
    (StatusCode::OK, axum::Json(service.stats())).into_response()
}

pub(crate) async fn results_handler<R, T>(
    State(service): State<Arc<LeadScoringService<R, T>>>,
) -> Response
where
    R: LeadRepository + 'static,
    T: CompletionTransport + 'static,
{
    match service.repository().results() {
        Ok(results) => {
            let results = ranked(results);
            let payload = json!({ "count": results.len(), "results": results });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => internal_error(error),
    }
}

pub(crate) async fn export_handler<R, T>(
    State(service): State<Arc<LeadScoringService<R, T>>>,
) -> Response
where
    R: LeadRepository + 'static,
    T: CompletionTransport + 'static,
{
    let results = match service.repository().results() {
        Ok(results) => ranked(results),
        Err(error) => return internal_error(error),
    };

    match ingest::render_results_csv(&results) {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"scored_leads.csv\"",
                ),
            ],
            body,
        )
            .into_response(),
        Err(error) => internal_error(error),
    }
}

/// Highest combined score first; ties keep their relative upload order.
fn ranked(mut results: Vec<ScoredLead>) -> Vec<ScoredLead> {
    results.sort_by(|a, b| b.total_score.cmp(&a.total_score));
    results
}

fn internal_error(error: impl std::fmt::Display) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
