use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    DonorId, DonorRegistration, DonorSearchFilters, OrganMatchRequest, ScoredDonor,
};
use super::repository::{DonorRepository, MatchRepository, RepositoryError};
use super::service::{DonorMatchingService, RegistryError};
use crate::matching::{CompatibilityResult, DonorProfile, RecipientProfile};

/// Router builder exposing compatibility scoring and the donor registry over HTTP.
pub fn registry_router<R, M>(service: Arc<DonorMatchingService<R, M>>) -> Router
where
    R: DonorRepository + 'static,
    M: MatchRepository + 'static,
{
    Router::new()
        .route("/api/v1/compatibility/score", post(score_handler::<R, M>))
        .route("/api/v1/compatibility/batch", post(batch_handler::<R, M>))
        .route("/api/v1/compatibility/rank", post(rank_handler::<R, M>))
        .route("/api/v1/organ-donors", post(register_handler::<R, M>))
        .route("/api/v1/organ-donors/search", get(search_handler::<R, M>))
        .route("/api/v1/organ-donors/:donor_id", get(donor_handler::<R, M>))
        .route("/api/v1/organ-matches", post(match_handler::<R, M>))
        .with_state(service)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub donor: DonorProfile,
    #[serde(default)]
    pub recipient: Option<RecipientProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub pairs: Vec<ScoreRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<CompatibilityResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankCandidate {
    pub id: String,
    pub donor: DonorProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankRequest {
    #[serde(default)]
    pub recipient: Option<RecipientProfile>,
    pub candidates: Vec<RankCandidate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub count: usize,
    pub donors: Vec<ScoredDonor>,
}

impl RegistryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RegistryError::Validation(_)
            | RegistryError::OrganNotOffered { .. }
            | RegistryError::DonorInactive(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RegistryError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            RegistryError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            RegistryError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn error_response(error: RegistryError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (error.status_code(), axum::Json(payload)).into_response()
}

pub(crate) async fn score_handler<R, M>(
    State(service): State<Arc<DonorMatchingService<R, M>>>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response
where
    R: DonorRepository + 'static,
    M: MatchRepository + 'static,
{
    let result = service.score(&request.donor, request.recipient.as_ref());
    (StatusCode::OK, axum::Json(result)).into_response()
}

pub(crate) async fn batch_handler<R, M>(
    State(service): State<Arc<DonorMatchingService<R, M>>>,
    axum::Json(request): axum::Json<BatchRequest>,
) -> Response
where
    R: DonorRepository + 'static,
    M: MatchRepository + 'static,
{
    let results = service.score_batch(
        request
            .pairs
            .iter()
            .map(|pair| (&pair.donor, pair.recipient.as_ref())),
    );
    (StatusCode::OK, axum::Json(BatchResponse { results })).into_response()
}

pub(crate) async fn rank_handler<R, M>(
    State(service): State<Arc<DonorMatchingService<R, M>>>,
    axum::Json(request): axum::Json<RankRequest>,
) -> Response
where
    R: DonorRepository + 'static,
    M: MatchRepository + 'static,
{
    let summary = service.engine().best_match(
        request.recipient.as_ref(),
        request
            .candidates
            .into_iter()
            .map(|candidate| (candidate.id, candidate.donor)),
    );
    (StatusCode::OK, axum::Json(summary)).into_response()
}

pub(crate) async fn register_handler<R, M>(
    State(service): State<Arc<DonorMatchingService<R, M>>>,
    axum::Json(registration): axum::Json<DonorRegistration>,
) -> Response
where
    R: DonorRepository + 'static,
    M: MatchRepository + 'static,
{
    match service.register(registration) {
        Ok(record) => {
            let view = service.view(&record);
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(RegistryError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "donor already registered",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn search_handler<R, M>(
    State(service): State<Arc<DonorMatchingService<R, M>>>,
    Query(filters): Query<DonorSearchFilters>,
) -> Response
where
    R: DonorRepository + 'static,
    M: MatchRepository + 'static,
{
    match service.search(&filters) {
        Ok(donors) => {
            let body = SearchResponse {
                count: donors.len(),
                donors,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn donor_handler<R, M>(
    State(service): State<Arc<DonorMatchingService<R, M>>>,
    Path(donor_id): Path<String>,
) -> Response
where
    R: DonorRepository + 'static,
    M: MatchRepository + 'static,
{
    let id = DonorId(donor_id);
    match service.get(&id) {
        Ok(record) => {
            let view = service.view(&record);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(RegistryError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "donor not found",
                "donor_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn match_handler<R, M>(
    State(service): State<Arc<DonorMatchingService<R, M>>>,
    axum::Json(request): axum::Json<OrganMatchRequest>,
) -> Response
where
    R: DonorRepository + 'static,
    M: MatchRepository + 'static,
{
    match service.create_match(request) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(other) => error_response(other),
    }
}
