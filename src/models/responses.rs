use serde::{Deserialize, Serialize};

use crate::models::domain::{Assignment, ExclusionPair, Participant};

/// Response for the generate endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub assignments: Vec<Assignment>,
    pub year: i32,
    pub count: usize,
}

/// Response for the bijection check endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

/// Response for a history CSV import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportHistoryResponse {
    pub year: i32,
    #[serde(rename = "assignmentsImported")]
    pub assignments_imported: usize,
    #[serde(rename = "exclusionsCreated")]
    pub exclusions_created: usize,
    #[serde(rename = "totalExclusions")]
    pub total_exclusions: usize,
    pub participants: Vec<Participant>,
}

/// Response for a wishlist CSV import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportWishlistResponse {
    pub participants: Vec<Participant>,
    #[serde(rename = "exclusionPairs")]
    pub exclusion_pairs: Vec<ExclusionPair>,
}

/// Per-batch outcome of an email dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailDispatchResponse {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
