use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Assignment, ExclusionPair, Participant};

/// Request to generate assignments
///
/// Participants and exclusions fall back to the stored roster when omitted;
/// history always comes from the store. The year defaults to the server
/// clock and can be overridden for regenerating a past or future event.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateRequest {
    #[serde(default)]
    pub participants: Option<Vec<Participant>>,
    #[serde(alias = "exclusion_pairs", rename = "exclusionPairs", default)]
    pub exclusion_pairs: Option<Vec<ExclusionPair>>,
    #[validate(range(min = 1900, max = 9999))]
    #[serde(alias = "current_year", rename = "currentYear", default)]
    pub current_year: Option<i32>,
}

/// Request to check a result for structural completeness
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub assignments: Vec<Assignment>,
    pub participants: Vec<Participant>,
}

/// Request to archive a completed year
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveYearRequest {
    #[validate(range(min = 1900, max = 9999))]
    pub year: i32,
    #[validate(length(min = 1))]
    pub assignments: Vec<Assignment>,
}

/// Request carrying a raw CSV document to import
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ImportCsvRequest {
    #[validate(length(min = 1))]
    pub csv: String,
}

/// Request to email each giver their assignment
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendEmailsRequest {
    #[validate(length(min = 1))]
    pub assignments: Vec<Assignment>,
}

/// Request to send a single configuration-check email
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TestEmailRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub name: String,
}
