use sea_orm::{entity::prelude::*, Set, DatabaseConnection, QueryFilter};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[sea_orm(string_value = "user")]
    #[default]
    User,
    #[sea_orm(string_value = "officer")]
    Officer,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text", unique)]
    pub firebase_id: String,
    #[sea_orm(column_type = "Text")]
    pub email: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub display_name: Option<String>,
    pub role: UserRole,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if email.trim().is_empty() { return Err(ModelError::invalid("email is required")); }
    if !email.contains('@') { return Err(ModelError::invalid("invalid email")); }
    Ok(())
}

pub fn validate_firebase_id(firebase_id: &str) -> Result<(), ModelError> {
    if firebase_id.trim().is_empty() { return Err(ModelError::invalid("firebaseId is required")); }
    if firebase_id.len() > 128 { return Err(ModelError::invalid("firebaseId too long")); }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, firebase_id: &str, email: &str, display_name: Option<&str>) -> Result<Model, ModelError> {
    validate_firebase_id(firebase_id)?;
    validate_email(email)?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        firebase_id: Set(firebase_id.to_string()),
        email: Set(email.trim().to_string()),
        display_name: Set(display_name.map(str::to_string)),
        role: Set(UserRole::User),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_firebase_id(db: &DatabaseConnection, firebase_id: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::FirebaseId.eq(firebase_id)).one(db).await?)
}

/// `Ok(None)` when no user has this id.
pub async fn set_role(db: &DatabaseConnection, id: Uuid, role: UserRole) -> Result<Option<Model>, ModelError> {
    let Some(found) = Entity::find_by_id(id).one(db).await? else { return Ok(None); };
    let mut am: ActiveModel = found.into();
    am.role = Set(role);
    am.updated_at = Set(Utc::now().into());
    Ok(Some(am.update(db).await?))
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn email_and_firebase_id_rules() {
        assert!(validate_email("a@b.c").is_ok());
        assert!(validate_email("nobody").is_err());
        assert!(validate_email("  ").is_err());
        assert!(validate_firebase_id("uid-123").is_ok());
        assert!(validate_firebase_id("").is_err());
        assert!(validate_firebase_id(&"x".repeat(129)).is_err());
    }

    #[test]
    fn role_wire_format() {
        assert_eq!(serde_json::to_value(UserRole::Officer).unwrap(), serde_json::json!("officer"));
        assert_eq!(UserRole::default(), UserRole::User);
    }
}
