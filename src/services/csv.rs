use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Assignment, ExclusionPair, Participant, YearData};

/// Errors that can occur while importing or exporting CSV documents
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to parse CSV: {0}")]
    Parse(#[from] csv::Error),

    #[error("CSV file is empty")]
    Empty,

    #[error("CSV must have headers: {0}")]
    MissingHeaders(String),

    #[error("invalid year in CSV file: {0:?}")]
    InvalidYear(String),

    #[error("CSV file contains multiple years")]
    MultipleYears,

    #[error("row {row} is missing required fields")]
    MissingField { row: usize },
}

const HISTORY_HEADERS: [&str; 5] = [
    "Year",
    "Giver Name",
    "Giver Email",
    "Recipient Name",
    "Recipient Email",
];

/// One row of the history export format
#[derive(Debug, Serialize, Deserialize)]
struct HistoryRow {
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Giver Name")]
    giver_name: String,
    #[serde(rename = "Giver Email")]
    giver_email: String,
    #[serde(rename = "Recipient Name")]
    recipient_name: String,
    #[serde(rename = "Recipient Email")]
    recipient_email: String,
}

/// One row of the wishlist sign-up form export
#[derive(Debug, Deserialize)]
struct WishlistRow {
    #[serde(rename = "Timestamp", default)]
    _timestamp: Option<String>,
    #[serde(rename = "Username", default)]
    username: Option<String>,
    #[serde(rename = "What is your name?", default)]
    name: Option<String>,
    #[serde(rename = "Any exclusions?", default)]
    exclusions: Option<String>,
    #[serde(rename = "What would you like for Christmas this year?", default)]
    wishlist: Option<String>,
    #[serde(rename = "Where would you like your Christmas gift sent to?", default)]
    address: Option<String>,
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Render a saved year as a CSV document
pub fn export_year(year: i32, assignments: &[Assignment]) -> Result<String, CsvError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for assignment in assignments {
        writer.serialize(HistoryRow {
            year: year.to_string(),
            giver_name: assignment.giver_name.clone(),
            giver_email: assignment.giver_email.clone(),
            recipient_name: assignment.recipient_name.clone(),
            recipient_email: assignment.recipient_email.clone(),
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CsvError::Parse(csv::Error::from(e.into_error())))?;
    // csv::Writer only ever emits the UTF-8 we fed it
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Parse a history CSV into one year's archive plus the participants it names
///
/// All rows must carry the same year; emails are trimmed, lowercased, and
/// used as participant ids.
pub fn import_history(csv_text: &str) -> Result<(YearData, Vec<Participant>), CsvError> {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());

    let headers = reader.headers()?.clone();
    let missing = HISTORY_HEADERS
        .iter()
        .any(|required| !headers.iter().any(|h| h == *required));
    if missing {
        return Err(CsvError::MissingHeaders(HISTORY_HEADERS.join(", ")));
    }

    let rows: Vec<HistoryRow> = reader.deserialize().collect::<Result<_, _>>()?;
    if rows.is_empty() {
        return Err(CsvError::Empty);
    }

    let year: i32 = rows[0]
        .year
        .trim()
        .parse()
        .map_err(|_| CsvError::InvalidYear(rows[0].year.clone()))?;
    if rows
        .iter()
        .any(|row| row.year.trim().parse::<i32>() != Ok(year))
    {
        return Err(CsvError::MultipleYears);
    }

    let mut participants: Vec<Participant> = Vec::new();
    let mut assignments = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        if row.giver_name.trim().is_empty()
            || row.giver_email.trim().is_empty()
            || row.recipient_name.trim().is_empty()
            || row.recipient_email.trim().is_empty()
        {
            // +2 accounts for the header line and 1-based numbering
            return Err(CsvError::MissingField { row: index + 2 });
        }

        let giver_email = normalize_email(&row.giver_email);
        let recipient_email = normalize_email(&row.recipient_email);

        if !participants.iter().any(|p| p.id == giver_email) {
            participants.push(Participant::new(
                giver_email.clone(),
                row.giver_name.trim(),
                giver_email.clone(),
            ));
        }
        if !participants.iter().any(|p| p.id == recipient_email) {
            participants.push(Participant::new(
                recipient_email.clone(),
                row.recipient_name.trim(),
                recipient_email.clone(),
            ));
        }

        assignments.push(Assignment {
            giver_id: giver_email.clone(),
            giver_name: row.giver_name.trim().to_string(),
            giver_email,
            recipient_id: recipient_email.clone(),
            recipient_name: row.recipient_name.trim().to_string(),
            recipient_email,
            recipient_wishlist: None,
            recipient_address: None,
        });
    }

    let year_data = YearData {
        year,
        assignments,
        saved_at: chrono::Utc::now(),
    };

    Ok((year_data, participants))
}

/// One unidirectional exclusion per archived edge, so last year's pairings
/// stay blocked even after the record ages out of the lookback window
pub fn exclusions_from_year(year_data: &YearData) -> Vec<ExclusionPair> {
    year_data
        .assignments
        .iter()
        .map(|assignment| {
            ExclusionPair::unidirectional(&assignment.giver_id, &assignment.recipient_id)
        })
        .collect()
}

/// Parse a wishlist sign-up CSV into participants plus the bidirectional
/// exclusions resolved from their free-text "Any exclusions?" answers
///
/// Exclusion names are split on `;`/`,` and matched case-insensitively
/// against participant names; unknown names are silently skipped.
pub fn import_wishlist(
    csv_text: &str,
) -> Result<(Vec<Participant>, Vec<ExclusionPair>), CsvError> {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());

    let rows: Vec<WishlistRow> = reader.deserialize().collect::<Result<_, _>>()?;
    if rows.is_empty() {
        return Err(CsvError::Empty);
    }

    let mut participants: Vec<Participant> = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let username = row.username.as_deref().map(str::trim).unwrap_or_default();
        let name = row.name.as_deref().map(str::trim).unwrap_or_default();
        if username.is_empty() || name.is_empty() {
            return Err(CsvError::MissingField { row: index + 2 });
        }

        let email = normalize_email(username);
        let mut participant = Participant::new(email.clone(), name, email);
        participant.wishlist = row
            .wishlist
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        participant.address = row
            .address
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        participant.exclusions = row
            .exclusions
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        participants.push(participant);
    }

    let mut exclusion_pairs: Vec<ExclusionPair> = Vec::new();

    for participant in &participants {
        let Some(raw) = &participant.exclusions else {
            continue;
        };

        for excluded_name in raw.split([';', ',']).map(str::trim).filter(|s| !s.is_empty()) {
            let Some(excluded) = participants
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(excluded_name))
            else {
                continue;
            };

            let forward_id = format!("{}-{}", participant.id, excluded.id);
            let reverse_id = format!("{}-{}", excluded.id, participant.id);
            let exists = exclusion_pairs
                .iter()
                .any(|pair| pair.id == forward_id || pair.id == reverse_id);

            if !exists {
                exclusion_pairs.push(ExclusionPair::bidirectional(&participant.id, &excluded.id));
            }
        }
    }

    Ok((participants, exclusion_pairs))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HISTORY_CSV: &str = "\
Year,Giver Name,Giver Email,Recipient Name,Recipient Email
2023,Alice,Alice@X.com,Bob,bob@x.com
2023,Bob,bob@x.com,Alice,alice@x.com
";

    #[test]
    fn test_import_history_normalizes_emails() {
        let (year_data, participants) = import_history(HISTORY_CSV).unwrap();

        assert_eq!(year_data.year, 2023);
        assert_eq!(year_data.assignments.len(), 2);
        assert_eq!(year_data.assignments[0].giver_id, "alice@x.com");
        assert_eq!(participants.len(), 2);
    }

    #[test]
    fn test_import_history_rejects_multiple_years() {
        let csv_text = "\
Year,Giver Name,Giver Email,Recipient Name,Recipient Email
2023,Alice,a@x.com,Bob,b@x.com
2022,Bob,b@x.com,Alice,a@x.com
";
        assert!(matches!(
            import_history(csv_text),
            Err(CsvError::MultipleYears)
        ));
    }

    #[test]
    fn test_import_history_rejects_bad_year_and_headers() {
        let bad_year = "\
Year,Giver Name,Giver Email,Recipient Name,Recipient Email
santa,Alice,a@x.com,Bob,b@x.com
";
        assert!(matches!(
            import_history(bad_year),
            Err(CsvError::InvalidYear(_))
        ));

        let bad_headers = "Giver,Recipient\nAlice,Bob\n";
        assert!(matches!(
            import_history(bad_headers),
            Err(CsvError::MissingHeaders(_))
        ));
    }

    #[test]
    fn test_import_history_rejects_blank_fields() {
        let csv_text = "\
Year,Giver Name,Giver Email,Recipient Name,Recipient Email
2023,Alice,a@x.com,,b@x.com
";
        assert!(matches!(
            import_history(csv_text),
            Err(CsvError::MissingField { row: 2 })
        ));
    }

    #[test]
    fn test_import_history_empty_body() {
        let csv_text = "Year,Giver Name,Giver Email,Recipient Name,Recipient Email\n";
        assert!(matches!(import_history(csv_text), Err(CsvError::Empty)));
    }

    #[test]
    fn test_export_round_trips_through_import() {
        let (year_data, _) = import_history(HISTORY_CSV).unwrap();
        let exported = export_year(year_data.year, &year_data.assignments).unwrap();

        let (reimported, _) = import_history(&exported).unwrap();
        assert_eq!(reimported.year, 2023);
        assert_eq!(reimported.assignments.len(), 2);
    }

    #[test]
    fn test_exclusions_from_year_are_unidirectional() {
        let (year_data, _) = import_history(HISTORY_CSV).unwrap();
        let pairs = exclusions_from_year(&year_data);

        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|pair| pair.is_unidirectional));
        assert_eq!(pairs[0].participant1_id, "alice@x.com");
        assert_eq!(pairs[0].participant2_id, "bob@x.com");
    }

    #[test]
    fn test_import_wishlist_builds_roster_and_exclusions() {
        let csv_text = "\
Timestamp,Username,What is your name?,Any exclusions?,What would you like for Christmas this year?,Where would you like your Christmas gift sent to?
2024-11-01,Alice@X.com,Alice,Bob; Carol,socks,1 Elm St
2024-11-01,bob@x.com,Bob,,books,2 Oak St
2024-11-02,carol@x.com,Carol,alice,,
";
        let (participants, pairs) = import_wishlist(csv_text).unwrap();

        assert_eq!(participants.len(), 3);
        assert_eq!(participants[0].id, "alice@x.com");
        assert_eq!(participants[0].wishlist.as_deref(), Some("socks"));
        assert!(participants[2].wishlist.is_none());

        // alice-bob, alice-carol; carol's "alice" is the same pair reversed
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|pair| !pair.is_unidirectional));
    }

    #[test]
    fn test_import_wishlist_unknown_exclusion_names_skipped() {
        let csv_text = "\
Timestamp,Username,What is your name?,Any exclusions?,What would you like for Christmas this year?,Where would you like your Christmas gift sent to?
2024-11-01,a@x.com,Alice,Santa Claus,,
2024-11-01,b@x.com,Bob,,,
";
        let (participants, pairs) = import_wishlist(csv_text).unwrap();
        assert_eq!(participants.len(), 2);
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_import_wishlist_missing_username() {
        let csv_text = "\
Timestamp,Username,What is your name?,Any exclusions?,What would you like for Christmas this year?,Where would you like your Christmas gift sent to?
2024-11-01,,Alice,,,
";
        assert!(matches!(
            import_wishlist(csv_text),
            Err(CsvError::MissingField { row: 2 })
        ));
    }
}
