//! Incident module: domain, repository, service.
//!
//! Incidents are created, listed newest first, and merged by partial updates.
//! They are never hard-deleted.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::IncidentService;
