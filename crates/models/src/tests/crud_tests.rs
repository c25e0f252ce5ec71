use crate::errors::ModelError;
use crate::incident::{self, GeoPoint, IncidentChanges, IncidentStatus, NewIncident, Priority};
use crate::user::{self, UserRole};
use sea_orm::EntityTrait;
use anyhow::Result;
use uuid::Uuid;

use super::setup_test_db;

fn sample_incident(reporter: &str) -> NewIncident {
    NewIncident {
        title: Some("Broken street light".into()),
        description: "Light out since Monday".into(),
        location: GeoPoint { longitude: 13.405, latitude: 52.52 },
        address: "Alexanderplatz 1".into(),
        category: "infrastructure".into(),
        status: IncidentStatus::Open,
        priority: Priority::Medium,
        reporter_id: reporter.into(),
        images: vec!["http://localhost/uploads/a.jpg".into()],
    }
}

/// Test incident create, list and merge-update
#[tokio::test]
async fn test_incident_crud() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()); };

    let reporter = format!("reporter_{}", Uuid::new_v4());
    let created = incident::create(&db, sample_incident(&reporter)).await?;
    assert_eq!(created.status, IncidentStatus::Open);
    assert_eq!(created.location(), GeoPoint { longitude: 13.405, latitude: 52.52 });
    assert_eq!(created.image_urls(), vec!["http://localhost/uploads/a.jpg".to_string()]);
    assert!(created.resolved_at.is_none());

    let listed = incident::list_newest_first(&db).await?;
    assert!(listed.iter().any(|m| m.id == created.id));
    assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    let changes = IncidentChanges { status: Some(IncidentStatus::Resolved), priority: Some(Priority::High), ..Default::default() };
    let updated = incident::apply_changes(&db, created.id, changes).await?.expect("incident exists");
    assert_eq!(updated.status, IncidentStatus::Resolved);
    assert_eq!(updated.priority, Priority::High);
    assert_eq!(updated.address, created.address);
    assert!(updated.resolved_at.is_some());

    let missing = incident::apply_changes(&db, Uuid::new_v4(), IncidentChanges::default()).await?;
    assert!(missing.is_none());

    incident::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

/// Hex from fresh UUIDs; barely compressible, so large values stay large on disk.
fn incompressible_text(len: usize) -> String {
    let mut out = String::with_capacity(len + 32);
    while out.len() < len {
        out.push_str(&Uuid::new_v4().simple().to_string());
    }
    out.truncate(len);
    out
}

/// Long free-text fields are stored, not rejected by column widths or index row limits
#[tokio::test]
async fn test_incident_long_text_fields() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()); };

    let mut new = sample_incident(&format!("{}_{}", "r".repeat(200), Uuid::new_v4()));
    new.category = "c".repeat(200);
    new.address = incompressible_text(16 * 1024);
    new.description = incompressible_text(132 * 1024);
    let created = incident::create(&db, new.clone()).await?;
    assert_eq!(created.category.len(), 200);
    assert_eq!(created.description, new.description);
    assert_eq!(created.address, new.address);
    assert_eq!(created.reporter_id, new.reporter_id);

    let changes = IncidentChanges { description: Some(incompressible_text(64 * 1024)), ..Default::default() };
    let updated = incident::apply_changes(&db, created.id, changes).await?.expect("incident exists");
    assert_eq!(updated.description.len(), 64 * 1024);

    incident::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

/// Test user create, unique firebase id and promotion
#[tokio::test]
async fn test_user_crud() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()); };

    let fid = format!("fb_{}", Uuid::new_v4());
    let u = user::create(&db, &fid, "officer@example.com", Some("Officer Dibble")).await?;
    assert_eq!(u.role, UserRole::User);

    let dup = user::create(&db, &fid, "other@example.com", None).await;
    assert!(matches!(dup, Err(ModelError::Conflict(_))));

    let found = user::find_by_firebase_id(&db, &fid).await?.expect("user exists");
    assert_eq!(found.id, u.id);

    let promoted = user::set_role(&db, u.id, UserRole::Officer).await?.expect("user exists");
    assert_eq!(promoted.role, UserRole::Officer);
    assert!(user::set_role(&db, Uuid::new_v4(), UserRole::Officer).await?.is_none());

    user::Entity::delete_by_id(u.id).exec(&db).await?;
    Ok(())
}

/// Display names and emails have no column width limit; firebase ids are capped by validation
#[tokio::test]
async fn test_user_long_text_fields() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()); };

    let fid = format!("{}{}", "f".repeat(96), Uuid::new_v4().simple());
    assert_eq!(fid.len(), 128);
    let email = format!("{}@example.com", "e".repeat(300));
    let name = "n".repeat(200);
    let u = user::create(&db, &fid, &email, Some(&name)).await?;
    assert_eq!(u.display_name.as_deref(), Some(name.as_str()));
    assert_eq!(u.email, email);

    let too_long = format!("{fid}x");
    assert!(matches!(user::create(&db, &too_long, "a@b.c", None).await, Err(ModelError::Validation(_))));

    user::Entity::delete_by_id(u.id).exec(&db).await?;
    Ok(())
}
