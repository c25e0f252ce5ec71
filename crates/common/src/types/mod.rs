use serde::{Deserialize, Serialize};

/// Body of `GET /health`; reports whether the backing store answers.
#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

impl Health {
    pub fn from_connected(connected: bool) -> Self {
        Self { status: if connected { "connected" } else { "disconnected" } }
    }
}

/// Body of `POST /upload`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UploadedUrl {
    pub url: String,
}
