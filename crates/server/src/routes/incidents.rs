use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use service::incident::domain::{Incident, IncidentInput};
use tracing::info;
use uuid::Uuid;

use crate::{errors::JsonApiError, state::ServerState};

#[utoipa::path(
    get, path = "/incidents", tag = "incidents",
    responses(
        (status = 200, description = "All incidents, newest first", body = [crate::openapi::IncidentDoc]),
        (status = 500, description = "Failed to fetch incidents")
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Incident>>, JsonApiError> {
    let list = state
        .incidents
        .list()
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch incidents"))?;
    Ok(Json(list))
}

#[utoipa::path(
    post, path = "/incidents", tag = "incidents",
    request_body = crate::openapi::IncidentInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::IncidentDoc),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Failed to save incident")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    body: Result<Json<IncidentInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Incident>), JsonApiError> {
    let Json(input) = body?;
    let created = state
        .incidents
        .create(input)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to save incident"))?;
    info!(id = %created.id, reporter_id = %created.reporter_id, "incident saved");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    patch, path = "/incidents/{id}", tag = "incidents",
    params(("id" = Uuid, Path, description = "Incident ID")),
    request_body = crate::openapi::IncidentInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::IncidentDoc),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Incident not found"),
        (status = 500, description = "Failed to update incident")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    body: Result<Json<IncidentInput>, JsonRejection>,
) -> Result<Json<Incident>, JsonApiError> {
    // an id that is not a UUID cannot name a stored incident
    let id = Uuid::parse_str(&id).map_err(|_| JsonApiError::not_found("incident"))?;
    let Json(input) = body?;
    let updated = state
        .incidents
        .update(id, input)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to update incident"))?;
    Ok(Json(updated))
}
