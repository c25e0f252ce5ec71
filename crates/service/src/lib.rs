//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Each resource follows domain / repository / service, with a SeaORM
//!   repository for production and an in-memory mock for tests.

pub mod errors;
pub mod runtime;
pub mod health;
pub mod incident;
pub mod user;
pub mod upload;
#[cfg(test)]
pub mod test_support;
