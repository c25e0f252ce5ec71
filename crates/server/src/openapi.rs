//! OpenAPI document served at `/api-docs/openapi.json`.
//!
//! The doc structs mirror the wire shapes; the real types live in `service`
//! and stay free of utoipa.

use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    /// `connected` or `disconnected`
    pub status: String,
}

#[derive(ToSchema)]
pub struct GeoPointDoc {
    /// always `Point`
    #[schema(example = "Point")]
    pub r#type: String,
    /// `[longitude, latitude]`
    #[schema(example = json!([-122.4194, 37.7749]))]
    pub coordinates: Vec<f64>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct IncidentDoc {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: String,
    pub location: GeoPointDoc,
    pub address: String,
    pub category: String,
    /// `open`, `inProgress` or `resolved`
    pub status: String,
    /// 0 = low, 1 = medium, 2 = high
    pub priority: i16,
    pub reporter_id: String,
    pub images: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub resolved_at: Option<String>,
}

/// Create body; on PATCH every field is optional.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct IncidentInputDoc {
    pub title: Option<String>,
    pub description: String,
    pub location: GeoPointDoc,
    pub address: String,
    pub category: String,
    /// string form, or legacy 0/1/2
    pub status: Option<String>,
    pub priority: i16,
    pub reporter_id: String,
    pub images: Vec<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct SyncUserDoc {
    pub firebase_id: String,
    pub email: String,
    pub display_name: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct UserDoc {
    pub id: Uuid,
    pub firebase_id: String,
    pub email: String,
    pub display_name: Option<String>,
    /// `user` or `officer`
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct UploadDoc {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(ToSchema)]
pub struct UploadedUrlDoc {
    pub url: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::incidents::list,
        crate::routes::incidents::create,
        crate::routes::incidents::update,
        crate::routes::users::sync,
        crate::routes::users::get_by_firebase_id,
        crate::routes::users::promote,
        crate::routes::uploads::upload,
    ),
    components(
        schemas(
            HealthResponse,
            GeoPointDoc,
            IncidentDoc,
            IncidentInputDoc,
            SyncUserDoc,
            UserDoc,
            UploadDoc,
            UploadedUrlDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "incidents"),
        (name = "users"),
        (name = "uploads")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for p in ["/health", "/incidents", "/incidents/{id}", "/users/sync", "/users/{id}/promote", "/upload"] {
            assert!(paths.contains(&p), "missing {p}");
        }
    }
}
