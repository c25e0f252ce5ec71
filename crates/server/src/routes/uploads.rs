use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use common::types::UploadedUrl;
use service::upload::UploadFile;

use crate::{errors::JsonApiError, state::ServerState};

/// `scheme://host` the client used to reach us, for building absolute URLs.
fn request_base(headers: &HeaderMap) -> Option<String> {
    let host = headers.get(header::HOST)?.to_str().ok()?;
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .filter(|p| *p == "https" || *p == "http")
        .unwrap_or("http");
    Some(format!("{scheme}://{host}"))
}

#[utoipa::path(
    post, path = "/upload", tag = "uploads",
    request_body(content = crate::openapi::UploadDoc, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Stored", body = crate::openapi::UploadedUrlDoc),
        (status = 400, description = "No file, empty file or file too large"),
        (status = 500, description = "Failed to store file")
    )
)]
pub async fn upload(
    State(state): State<ServerState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadedUrl>, JsonApiError> {
    let mut multipart = multipart?;
    let mut file: Option<UploadFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid upload", Some(e.body_text())))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid upload", Some(e.body_text())))?;
        file = Some(UploadFile { file_name, content_type, bytes: bytes.to_vec() });
    }

    let base = request_base(&headers);
    let url = state
        .uploads
        .store(file, base.as_deref())
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to store file"))?;
    Ok(Json(UploadedUrl { url }))
}
