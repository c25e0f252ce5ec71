use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use models::errors::ModelError;
use models::incident::{
    self, resolved_at_after, validate_images, validate_required_text, GeoPoint, IncidentChanges, IncidentStatus,
    NewIncident, Priority,
};

/// Incident as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: String,
    pub location: GeoPoint,
    pub address: String,
    pub category: String,
    pub status: IncidentStatus,
    pub priority: Priority,
    pub reporter_id: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<incident::Model> for Incident {
    fn from(m: incident::Model) -> Self {
        Self {
            id: m.id,
            location: m.location(),
            images: m.image_urls(),
            title: m.title,
            description: m.description,
            address: m.address,
            category: m.category,
            status: m.status,
            priority: m.priority,
            reporter_id: m.reporter_id,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
            resolved_at: m.resolved_at.map(|t| t.with_timezone(&Utc)),
        }
    }
}

impl Incident {
    /// Build a freshly stored incident from validated input.
    pub fn from_new(new: NewIncident, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            location: new.location,
            address: new.address,
            category: new.category,
            resolved_at: (new.status == IncidentStatus::Resolved).then_some(now),
            status: new.status,
            priority: new.priority,
            reporter_id: new.reporter_id,
            images: new.images,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge validated changes; fields left `None` keep their value.
    pub fn apply(&mut self, changes: IncidentChanges, now: DateTime<Utc>) {
        if let Some(t) = changes.title { self.title = Some(t); }
        if let Some(d) = changes.description { self.description = d; }
        if let Some(l) = changes.location { self.location = l; }
        if let Some(a) = changes.address { self.address = a; }
        if let Some(c) = changes.category { self.category = c; }
        if let Some(p) = changes.priority { self.priority = p; }
        if let Some(r) = changes.reporter_id { self.reporter_id = r; }
        if let Some(i) = changes.images { self.images = i; }
        if let Some(s) = changes.status {
            self.resolved_at = resolved_at_after(self.status, self.resolved_at, s, now);
            self.status = s;
        }
        self.updated_at = now;
    }
}

/// Raw request body for create and update.
///
/// Enumerations, location and images stay untyped here so that bad values surface as
/// validation errors with a readable message rather than as deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<JsonValue>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<JsonValue>,
    #[serde(default)]
    pub priority: Option<JsonValue>,
    #[serde(default)]
    pub reporter_id: Option<String>,
    #[serde(default)]
    pub images: Option<JsonValue>,
}

impl IncidentInput {
    pub fn into_new_incident(self) -> Result<NewIncident, ModelError> {
        let location = match &self.location {
            Some(v) => GeoPoint::from_json(v)?,
            None => return Err(ModelError::invalid("Invalid location data: location is required")),
        };
        let priority = match &self.priority {
            Some(v) => Priority::from_json(v)?,
            None => return Err(ModelError::invalid("Invalid priority value: priority is required")),
        };
        let images = match &self.images {
            Some(v) => validate_images(v)?,
            None => return Err(ModelError::invalid("Invalid images data: images is required")),
        };
        let status = match &self.status {
            Some(v) => IncidentStatus::from_json(v)?,
            None => IncidentStatus::default(),
        };
        Ok(NewIncident {
            title: self.title,
            description: validate_required_text("description", self.description.as_deref())?,
            location,
            address: validate_required_text("address", self.address.as_deref())?,
            category: validate_required_text("category", self.category.as_deref())?,
            status,
            priority,
            reporter_id: validate_required_text("reporterId", self.reporter_id.as_deref())?,
            images,
        })
    }

    pub fn into_changes(self) -> Result<IncidentChanges, ModelError> {
        Ok(IncidentChanges {
            title: self.title,
            description: self.description.as_deref().map(|d| validate_required_text("description", Some(d))).transpose()?,
            location: self.location.as_ref().map(GeoPoint::from_json).transpose()?,
            address: self.address.as_deref().map(|a| validate_required_text("address", Some(a))).transpose()?,
            category: self.category.as_deref().map(|c| validate_required_text("category", Some(c))).transpose()?,
            status: self.status.as_ref().map(IncidentStatus::from_json).transpose()?,
            priority: self.priority.as_ref().map(Priority::from_json).transpose()?,
            reporter_id: self.reporter_id.as_deref().map(|r| validate_required_text("reporterId", Some(r))).transpose()?,
            images: self.images.as_ref().map(validate_images).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> JsonValue {
        json!({
            "title": "Pothole",
            "description": "Deep pothole in the right lane",
            "location": {"type": "Point", "coordinates": [-122.42, 37.77]},
            "address": "Market St & 5th",
            "category": "road",
            "priority": 2,
            "reporterId": "fb-uid-1",
            "images": []
        })
    }

    #[test]
    fn valid_body_converts() {
        let input: IncidentInput = serde_json::from_value(valid_body()).unwrap();
        let new = input.into_new_incident().unwrap();
        assert_eq!(new.priority, Priority::High);
        assert_eq!(new.status, IncidentStatus::Open);
        assert_eq!(new.location, GeoPoint { longitude: -122.42, latitude: 37.77 });
    }

    #[test]
    fn each_required_field_is_enforced() {
        for field in ["description", "location", "address", "category", "priority", "reporterId", "images"] {
            let mut body = valid_body();
            body.as_object_mut().unwrap().remove(field);
            let input: IncidentInput = serde_json::from_value(body).unwrap();
            assert!(input.into_new_incident().is_err(), "missing {field} should be rejected");
        }
    }

    #[test]
    fn numeric_status_is_mapped() {
        let mut body = valid_body();
        body["status"] = json!(1);
        let input: IncidentInput = serde_json::from_value(body).unwrap();
        assert_eq!(input.into_new_incident().unwrap().status, IncidentStatus::InProgress);
    }

    #[test]
    fn changes_only_carry_given_fields() {
        let input: IncidentInput = serde_json::from_value(json!({"status": "resolved"})).unwrap();
        let changes = input.into_changes().unwrap();
        assert_eq!(changes, IncidentChanges { status: Some(IncidentStatus::Resolved), ..Default::default() });

        let input: IncidentInput = serde_json::from_value(json!({"address": "  "})).unwrap();
        assert!(input.into_changes().is_err());
    }

    #[test]
    fn apply_tracks_resolution_time() {
        let input: IncidentInput = serde_json::from_value(valid_body()).unwrap();
        let t0 = Utc::now();
        let mut incident = Incident::from_new(input.into_new_incident().unwrap(), t0);
        assert!(incident.resolved_at.is_none());

        let t1 = t0 + chrono::Duration::seconds(5);
        incident.apply(IncidentChanges { status: Some(IncidentStatus::Resolved), ..Default::default() }, t1);
        assert_eq!(incident.resolved_at, Some(t1));
        assert_eq!(incident.updated_at, t1);

        let t2 = t1 + chrono::Duration::seconds(5);
        incident.apply(IncidentChanges { status: Some(IncidentStatus::Open), ..Default::default() }, t2);
        assert!(incident.resolved_at.is_none());
        assert_eq!(incident.created_at, t0);
    }

    #[test]
    fn serializes_camel_case_geojson() {
        let input: IncidentInput = serde_json::from_value(valid_body()).unwrap();
        let incident = Incident::from_new(input.into_new_incident().unwrap(), Utc::now());
        let v = serde_json::to_value(&incident).unwrap();
        assert_eq!(v["reporterId"], "fb-uid-1");
        assert_eq!(v["status"], "open");
        assert_eq!(v["priority"], 2);
        assert_eq!(v["location"]["type"], "Point");
        assert!(v["createdAt"].is_string());
    }
}
