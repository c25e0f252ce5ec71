use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, QuerySelect, Set, TransactionTrait};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::errors::ModelError;

/// Lifecycle state of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "camelCase")]
pub enum IncidentStatus {
    #[sea_orm(string_value = "open")]
    #[default]
    Open,
    #[sea_orm(string_value = "inProgress")]
    InProgress,
    #[sea_orm(string_value = "resolved")]
    Resolved,
}

impl IncidentStatus {
    /// Accepts `"open" | "inProgress" | "resolved"` or the legacy indexes `0 | 1 | 2`.
    pub fn from_json(v: &JsonValue) -> Result<Self, ModelError> {
        match v {
            JsonValue::String(s) => match s.as_str() {
                "open" => Ok(Self::Open),
                "inProgress" => Ok(Self::InProgress),
                "resolved" => Ok(Self::Resolved),
                other => Err(ModelError::invalid(format!("Invalid status value: {other}"))),
            },
            JsonValue::Number(_) => match as_whole_number(v) {
                Some(0) => Ok(Self::Open),
                Some(1) => Ok(Self::InProgress),
                Some(2) => Ok(Self::Resolved),
                _ => Err(ModelError::invalid(format!("Invalid status value: {v}"))),
            },
            _ => Err(ModelError::invalid(format!("Invalid status value: {v}"))),
        }
    }
}

/// 0 = low, 1 = medium, 2 = high. Serialized as the bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
pub enum Priority {
    #[sea_orm(num_value = 0)]
    Low,
    #[sea_orm(num_value = 1)]
    Medium,
    #[sea_orm(num_value = 2)]
    High,
}

impl Priority {
    pub fn level(self) -> i16 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
        }
    }

    pub fn from_json(v: &JsonValue) -> Result<Self, ModelError> {
        as_whole_number(v)
            .and_then(|n| i16::try_from(n).ok())
            .and_then(|n| Priority::from_level(n).ok())
            .ok_or_else(|| ModelError::invalid(format!("Invalid priority value: {v}")))
    }

    pub fn from_level(n: i16) -> Result<Self, ModelError> {
        match n {
            0 => Ok(Priority::Low),
            1 => Ok(Priority::Medium),
            2 => Ok(Priority::High),
            _ => Err(ModelError::invalid(format!("Invalid priority value: {n}"))),
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i16(self.level())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i16::deserialize(deserializer)?;
        Priority::from_level(raw).map_err(serde::de::Error::custom)
    }
}

/// JSON numbers that are integral, including `1.0`.
fn as_whole_number(v: &JsonValue) -> Option<i64> {
    if let Some(n) = v.as_i64() {
        return Some(n);
    }
    v.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)
}

/// GeoJSON point; wire form is `{"type": "Point", "coordinates": [lon, lat]}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, ModelError> {
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ModelError::invalid("Invalid location data: longitude out of range"));
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ModelError::invalid("Invalid location data: latitude out of range"));
        }
        Ok(Self { longitude, latitude })
    }

    pub fn from_json(v: &JsonValue) -> Result<Self, ModelError> {
        let obj = v
            .as_object()
            .ok_or_else(|| ModelError::invalid("Invalid location data: expected an object"))?;
        match obj.get("type") {
            None | Some(JsonValue::Null) => {}
            Some(JsonValue::String(t)) if t == "Point" => {}
            Some(other) => {
                return Err(ModelError::invalid(format!("Invalid location data: unsupported type {other}")))
            }
        }
        let coords = obj
            .get("coordinates")
            .and_then(JsonValue::as_array)
            .ok_or_else(|| ModelError::invalid("Invalid location data: coordinates required"))?;
        if coords.len() != 2 {
            return Err(ModelError::invalid("Invalid location data: expected [longitude, latitude]"));
        }
        let (Some(lon), Some(lat)) = (coords[0].as_f64(), coords[1].as_f64()) else {
            return Err(ModelError::invalid("Invalid location data: coordinates must be numbers"));
        };
        Self::new(lon, lat)
    }
}

impl Serialize for GeoPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut st = serializer.serialize_struct("GeoPoint", 2)?;
        st.serialize_field("type", "Point")?;
        st.serialize_field("coordinates", &[self.longitude, self.latitude])?;
        st.end()
    }
}

pub fn validate_required_text(field: &str, value: Option<&str>) -> Result<String, ModelError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ModelError::invalid(format!("{field} is required"))),
    }
}

pub fn validate_images(v: &JsonValue) -> Result<Vec<String>, ModelError> {
    let items = v
        .as_array()
        .ok_or_else(|| ModelError::invalid("Invalid images data: expected an array"))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| ModelError::invalid("Invalid images data: every image must be a URL string"))
        })
        .collect()
}

/// `resolved_at` after a status transition: stamped on entering `resolved`, kept while it
/// stays resolved, cleared when the incident is reopened.
pub fn resolved_at_after<T>(prev: IncidentStatus, resolved_at: Option<T>, next: IncidentStatus, now: T) -> Option<T> {
    match (prev, next) {
        (IncidentStatus::Resolved, IncidentStatus::Resolved) => resolved_at.or(Some(now)),
        (_, IncidentStatus::Resolved) => Some(now),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incident")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub title: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub longitude: f64,
    pub latitude: f64,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    #[sea_orm(column_type = "Text")]
    pub category: String,
    pub status: IncidentStatus,
    pub priority: Priority,
    #[sea_orm(column_type = "Text")]
    pub reporter_id: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub resolved_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn location(&self) -> GeoPoint {
        GeoPoint { longitude: self.longitude, latitude: self.latitude }
    }

    pub fn image_urls(&self) -> Vec<String> {
        self.images
            .as_array()
            .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default()
    }
}

/// A fully validated incident ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncident {
    pub title: Option<String>,
    pub description: String,
    pub location: GeoPoint,
    pub address: String,
    pub category: String,
    pub status: IncidentStatus,
    pub priority: Priority,
    pub reporter_id: String,
    pub images: Vec<String>,
}

/// Validated partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<GeoPoint>,
    pub address: Option<String>,
    pub category: Option<String>,
    pub status: Option<IncidentStatus>,
    pub priority: Option<Priority>,
    pub reporter_id: Option<String>,
    pub images: Option<Vec<String>>,
}

pub async fn create(db: &DatabaseConnection, new: NewIncident) -> Result<Model, ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let resolved_at = (new.status == IncidentStatus::Resolved).then_some(now);
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(new.title),
        description: Set(new.description),
        longitude: Set(new.location.longitude),
        latitude: Set(new.location.latitude),
        address: Set(new.address),
        category: Set(new.category),
        status: Set(new.status),
        priority: Set(new.priority),
        reporter_id: Set(new.reporter_id),
        images: Set(Json::from(new.images)),
        created_at: Set(now),
        updated_at: Set(now),
        resolved_at: Set(resolved_at),
    };
    Ok(am.insert(db).await?)
}

pub async fn list_newest_first(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().order_by_desc(Column::CreatedAt).all(db).await?)
}

/// Merge `changes` into the row under a row lock; `Ok(None)` when the id does not resolve.
pub async fn apply_changes(db: &DatabaseConnection, id: Uuid, changes: IncidentChanges) -> Result<Option<Model>, ModelError> {
    let txn = db.begin().await?;
    let Some(current) = Entity::find_by_id(id).lock_exclusive().one(&txn).await? else {
        txn.rollback().await?;
        return Ok(None);
    };
    let now: DateTimeWithTimeZone = Utc::now().into();
    let prev_status = current.status;
    let prev_resolved_at = current.resolved_at;
    let mut am: ActiveModel = current.into();
    if let Some(t) = changes.title { am.title = Set(Some(t)); }
    if let Some(d) = changes.description { am.description = Set(d); }
    if let Some(loc) = changes.location {
        am.longitude = Set(loc.longitude);
        am.latitude = Set(loc.latitude);
    }
    if let Some(a) = changes.address { am.address = Set(a); }
    if let Some(c) = changes.category { am.category = Set(c); }
    if let Some(p) = changes.priority { am.priority = Set(p); }
    if let Some(r) = changes.reporter_id { am.reporter_id = Set(r); }
    if let Some(images) = changes.images { am.images = Set(Json::from(images)); }
    if let Some(s) = changes.status {
        am.status = Set(s);
        am.resolved_at = Set(resolved_at_after(prev_status, prev_resolved_at, s, now));
    }
    am.updated_at = Set(now);
    let updated = am.update(&txn).await?;
    txn.commit().await?;
    Ok(Some(updated))
}
