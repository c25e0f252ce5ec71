use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use service::user::domain::{SyncUserInput, User};
use uuid::Uuid;

use crate::{errors::JsonApiError, state::ServerState};

#[utoipa::path(
    post, path = "/users/sync", tag = "users",
    request_body = crate::openapi::SyncUserDoc,
    responses(
        (status = 200, description = "Existing or newly created user", body = crate::openapi::UserDoc),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Failed to sync user")
    )
)]
pub async fn sync(
    State(state): State<ServerState>,
    body: Result<Json<SyncUserInput>, JsonRejection>,
) -> Result<Json<User>, JsonApiError> {
    let Json(input) = body?;
    let user = state
        .users
        .sync(
            input.firebase_id.as_deref().unwrap_or_default(),
            input.email.as_deref().unwrap_or_default(),
            input.display_name.as_deref(),
        )
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to sync user"))?;
    Ok(Json(user))
}

#[utoipa::path(
    get, path = "/users/by-firebase-id/{firebaseId}", tag = "users",
    params(("firebaseId" = String, Path, description = "Identity provider user id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::UserDoc),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_by_firebase_id(
    State(state): State<ServerState>,
    Path(firebase_id): Path<String>,
) -> Result<Json<User>, JsonApiError> {
    let user = state
        .users
        .get_by_firebase_id(&firebase_id)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch user"))?;
    Ok(Json(user))
}

#[utoipa::path(
    patch, path = "/users/{id}/promote", tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Promoted to officer", body = crate::openapi::UserDoc),
        (status = 404, description = "User not found")
    )
)]
pub async fn promote(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<User>, JsonApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| JsonApiError::not_found("user"))?;
    let user = state
        .users
        .promote(id)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to promote user"))?;
    Ok(Json(user))
}
