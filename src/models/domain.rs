use serde::{Deserialize, Serialize};

/// A person taking part in the exchange
///
/// The id is the normalized (trimmed, lowercased) email address; two
/// participants are the same entity iff their ids match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wishlist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Raw exclusion text from a wishlist import ("Alice; Bob"), kept so
    /// re-imports can re-resolve names after the roster changes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusions: Option<String>,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            wishlist: None,
            address: None,
            exclusions: None,
        }
    }
}

/// A rule forbidding a giver -> recipient edge
///
/// Bidirectional pairs (the default, entered by the organizer) block both
/// directions. Unidirectional pairs encode "this exact pairing happened
/// before" and block only participant1 -> participant2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionPair {
    pub id: String,
    #[serde(rename = "participant1Id")]
    pub participant1_id: String,
    #[serde(rename = "participant2Id")]
    pub participant2_id: String,
    #[serde(rename = "isUnidirectional", default)]
    pub is_unidirectional: bool,
}

impl ExclusionPair {
    /// Manual exclusion blocking both directions
    pub fn bidirectional(p1: impl Into<String>, p2: impl Into<String>) -> Self {
        let p1 = p1.into();
        let p2 = p2.into();
        Self {
            id: format!("{}-{}", p1, p2),
            participant1_id: p1,
            participant2_id: p2,
            is_unidirectional: false,
        }
    }

    /// Historical pairing blocking only giver -> recipient
    pub fn unidirectional(giver: impl Into<String>, recipient: impl Into<String>) -> Self {
        let giver = giver.into();
        let recipient = recipient.into();
        Self {
            id: format!("{}-{}", giver, recipient),
            participant1_id: giver,
            participant2_id: recipient,
            is_unidirectional: true,
        }
    }
}

/// One resolved edge of a completed matching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(rename = "giverId")]
    pub giver_id: String,
    #[serde(rename = "giverName")]
    pub giver_name: String,
    #[serde(rename = "giverEmail")]
    pub giver_email: String,
    #[serde(rename = "recipientId")]
    pub recipient_id: String,
    #[serde(rename = "recipientName")]
    pub recipient_name: String,
    #[serde(rename = "recipientEmail")]
    pub recipient_email: String,
    #[serde(
        rename = "recipientWishlist",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub recipient_wishlist: Option<String>,
    #[serde(
        rename = "recipientAddress",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub recipient_address: Option<String>,
}

impl Assignment {
    /// Build the edge for a chosen giver/recipient, carrying the recipient's
    /// wishlist and address through for email delivery
    pub fn from_pair(giver: &Participant, recipient: &Participant) -> Self {
        Self {
            giver_id: giver.id.clone(),
            giver_name: giver.name.clone(),
            giver_email: giver.email.clone(),
            recipient_id: recipient.id.clone(),
            recipient_name: recipient.name.clone(),
            recipient_email: recipient.email.clone(),
            recipient_wishlist: recipient.wishlist.clone(),
            recipient_address: recipient.address.clone(),
        }
    }
}

/// Archived assignment set for one past year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearData {
    pub year: i32,
    pub assignments: Vec<Assignment>,
    #[serde(rename = "savedAt")]
    pub saved_at: chrono::DateTime<chrono::Utc>,
}

/// Read-only inputs for one generation run
///
/// The engine never mutates these; each call produces an independent
/// assignment list.
#[derive(Debug, Clone, Copy)]
pub struct MatchConstraints<'a> {
    pub participants: &'a [Participant],
    pub exclusion_pairs: &'a [ExclusionPair],
    pub historical_data: &'a [YearData],
    pub current_year: i32,
}
