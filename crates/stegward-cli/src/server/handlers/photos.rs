//! Photo submission, listing, decision, and removal handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use stegward::{Artifact, ArtifactStatus};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body for an anonymous photo submission.
#[derive(Deserialize)]
pub struct SubmitRequest {
    /// Base64-encoded image bytes.
    pub data: String,
    /// MIME type; defaults to JPEG.
    pub mime: Option<String>,
}

/// Request body for a moderation decision.
#[derive(Deserialize)]
pub struct DecideRequest {
    /// Target status: "approved" or "rejected".
    pub status: String,
}

/// Photo record as returned by the API.
#[derive(Serialize)]
pub struct ArtifactResponse {
    pub id: String,
    pub payload: String,
    pub status: String,
    pub submitted_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
}

impl From<Artifact> for ArtifactResponse {
    fn from(a: Artifact) -> Self {
        Self {
            id: a.id,
            payload: a.payload,
            status: a.status.to_string(),
            submitted_at: a.submitted_at.to_rfc3339(),
            decided_at: a.decided_at.map(|dt| dt.to_rfc3339()),
            decided_by: a.decided_by,
        }
    }
}

/// POST /api/photos
pub async fn submit_photo(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<ArtifactResponse>), ApiError> {
    let bytes = BASE64
        .decode(req.data.as_bytes())
        .map_err(|e| ApiError::BadRequest(format!("invalid base64 payload: {e}")))?;
    let mime = req.mime.unwrap_or_else(|| "image/jpeg".to_string());

    let artifact = state.queue.submit(&bytes, &mime)?;
    Ok((StatusCode::CREATED, Json(artifact.into())))
}

/// GET /api/photos/approved
pub async fn list_approved(
    State(state): State<AppState>,
) -> Result<Json<Vec<ArtifactResponse>>, ApiError> {
    let artifacts = state.queue.list_approved()?;
    Ok(Json(artifacts.into_iter().map(Into::into).collect()))
}

/// GET /api/photos/pending
pub async fn list_pending(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ArtifactResponse>>, ApiError> {
    state.auth.verify(&headers)?;
    let artifacts = state.queue.list_pending()?;
    Ok(Json(artifacts.into_iter().map(Into::into).collect()))
}

/// PATCH /api/photos/:id/status
pub async fn decide_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<DecideRequest>,
) -> Result<Json<ArtifactResponse>, ApiError> {
    let moderator = state.auth.verify(&headers)?;

    let requested: ArtifactStatus = req
        .status
        .parse()
        .map_err(|e: stegward::StegwardError| ApiError::BadRequest(e.to_string()))?;

    // The decision runs an external detector process, so keep it off the
    // async workers.
    let queue = state.queue.clone();
    let artifact = tokio::task::spawn_blocking(move || queue.decide(&id, requested, &moderator))
        .await
        .map_err(|e| ApiError::Internal(format!("decision task failed: {e}")))??;

    Ok(Json(artifact.into()))
}

/// DELETE /api/photos/:id
pub async fn delete_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.auth.verify(&headers)?;
    state.queue.remove(&id)?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
