//! Image upload: a blob store behind a trait plus the service that names files
//! and builds their public URLs.

pub mod storage;
pub mod service;

pub use service::{UploadFile, UploadService};
pub use storage::{BlobStore, LocalBlobStore};
