//! Pollution API Data Transfer Objects
//!
//! These types match EXACTLY what the pollution API sends and receives.
//! DO NOT add fields that aren't in the API traffic.
//! DO NOT use these types outside the pollution module - the record
//! payload itself is [`crate::model::RawRecord`], which is shared.
//!
//! Example data response:
//! ```json
//! {
//!   "results": [
//!     {"name": "Warsaw", "country": "PL", "pollution": 54.2},
//!     {"city": "Kraków", "country": "PL", "pollution": "61"}
//!   ]
//! }
//! ```
//! Older deployments return the array bare, without the wrapper object.

use crate::model::RawRecord;
use serde::{Deserialize, Serialize};

/// Login request body
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Login response
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Short-lived access token
    pub token: String,
    /// Longer-lived refresh token; not all deployments issue one
    #[serde(default, rename = "refreshToken")]
    pub refresh_token: Option<String>,
}

/// Refresh request body
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    #[serde(rename = "refreshToken")]
    pub refresh_token: &'a str,
}

/// Refresh response; only a new access token, the refresh token stays valid
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub token: String,
}

/// Data response: either `{"results": [...]}` or a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecordsEnvelope {
    Wrapped { results: Vec<RawRecord> },
    Bare(Vec<RawRecord>),
}

impl RecordsEnvelope {
    pub fn into_records(self) -> Vec<RawRecord> {
        match self {
            Self::Wrapped { results } => results,
            Self::Bare(records) => records,
        }
    }
}

/// Error body; the upstream uses `message` or `error` depending on endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
