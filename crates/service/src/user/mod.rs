//! User profile module: domain, repository, service.
//!
//! Profiles are keyed by the identity provider's id (`firebaseId`); this crate never
//! authenticates anyone itself.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::UserService;
