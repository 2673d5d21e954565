use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;

use crate::models::{ExclusionPair, Participant, YearData};

/// Errors that can occur when reading or writing the data directory
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid stored data: {0}")]
    Serde(#[from] serde_json::Error),
}

const HISTORY_FILE: &str = "history.json";
const PARTICIPANTS_FILE: &str = "participants.json";
const EXCLUSIONS_FILE: &str = "exclusions.json";

/// JSON-file repository for the roster and the historical archive
///
/// Participants and exclusions are working data for the upcoming draw and can
/// be cleared; the historical archive is append-style and only ever changed
/// through save/delete of whole years.
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed
    pub async fn new(data_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).await?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    async fn read_or_default<T: serde::de::DeserializeOwned + Default>(
        &self,
        file: &str,
    ) -> Result<T, StorageError> {
        let path = self.data_dir.join(file);
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_json<T: serde::Serialize>(
        &self,
        file: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let path = self.data_dir.join(file);
        let contents = serde_json::to_string_pretty(value)?;
        fs::write(&path, contents).await?;
        Ok(())
    }

    /// Load the full historical archive, newest year first
    pub async fn load_history(&self) -> Result<Vec<YearData>, StorageError> {
        self.read_or_default(HISTORY_FILE).await
    }

    /// Archive one year, replacing any existing record for the same year
    pub async fn save_year(&self, year_data: YearData) -> Result<(), StorageError> {
        let mut history = self.load_history().await?;
        history.retain(|data| data.year != year_data.year);
        history.push(year_data);
        history.sort_by(|a, b| b.year.cmp(&a.year));
        self.write_json(HISTORY_FILE, &history).await
    }

    pub async fn get_year(&self, year: i32) -> Result<Option<YearData>, StorageError> {
        let history = self.load_history().await?;
        Ok(history.into_iter().find(|data| data.year == year))
    }

    /// Remove one year from the archive; returns whether it existed
    pub async fn delete_year(&self, year: i32) -> Result<bool, StorageError> {
        let mut history = self.load_history().await?;
        let before = history.len();
        history.retain(|data| data.year != year);
        let removed = history.len() != before;
        if removed {
            self.write_json(HISTORY_FILE, &history).await?;
        }
        Ok(removed)
    }

    pub async fn load_participants(&self) -> Result<Vec<Participant>, StorageError> {
        self.read_or_default(PARTICIPANTS_FILE).await
    }

    pub async fn save_participants(
        &self,
        participants: &[Participant],
    ) -> Result<(), StorageError> {
        self.write_json(PARTICIPANTS_FILE, &participants).await
    }

    pub async fn load_exclusions(&self) -> Result<Vec<ExclusionPair>, StorageError> {
        self.read_or_default(EXCLUSIONS_FILE).await
    }

    pub async fn save_exclusions(
        &self,
        exclusion_pairs: &[ExclusionPair],
    ) -> Result<(), StorageError> {
        self.write_json(EXCLUSIONS_FILE, &exclusion_pairs).await
    }

    /// Merge new exclusions into the stored set, skipping ids already present
    pub async fn merge_exclusions(
        &self,
        new_pairs: Vec<ExclusionPair>,
    ) -> Result<Vec<ExclusionPair>, StorageError> {
        let mut merged = self.load_exclusions().await?;
        for pair in new_pairs {
            let reversed_id = format!("{}-{}", pair.participant2_id, pair.participant1_id);
            let exists = merged.iter().any(|existing| {
                existing.id == pair.id
                    || (!pair.is_unidirectional && existing.id == reversed_id)
            });
            if !exists {
                merged.push(pair);
            }
        }
        self.save_exclusions(&merged).await?;
        Ok(merged)
    }

    /// Clear participants and exclusions, keeping the historical archive
    pub async fn clear_working_data(&self) -> Result<(), StorageError> {
        for file in [PARTICIPANTS_FILE, EXCLUSIONS_FILE] {
            let path = self.data_dir.join(file);
            match fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Assignment;
    use chrono::Utc;

    fn temp_store_dir() -> PathBuf {
        std::env::temp_dir()
            .join("santa-algo-tests")
            .join(uuid::Uuid::new_v4().to_string())
    }

    fn year_data(year: i32) -> YearData {
        let giver = Participant::new("a@x.com", "Alice", "a@x.com");
        let recipient = Participant::new("b@x.com", "Bob", "b@x.com");
        YearData {
            year,
            assignments: vec![Assignment::from_pair(&giver, &recipient)],
            saved_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_empty_store_loads_defaults() {
        let store = JsonStore::new(temp_store_dir()).await.unwrap();

        assert!(store.load_history().await.unwrap().is_empty());
        assert!(store.load_participants().await.unwrap().is_empty());
        assert!(store.load_exclusions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_year_replaces_and_sorts() {
        let store = JsonStore::new(temp_store_dir()).await.unwrap();

        store.save_year(year_data(2022)).await.unwrap();
        store.save_year(year_data(2024)).await.unwrap();
        store.save_year(year_data(2023)).await.unwrap();
        // Re-save an existing year
        store.save_year(year_data(2022)).await.unwrap();

        let history = store.load_history().await.unwrap();
        let years: Vec<i32> = history.iter().map(|data| data.year).collect();
        assert_eq!(years, vec![2024, 2023, 2022]);
    }

    #[tokio::test]
    async fn test_get_and_delete_year() {
        let store = JsonStore::new(temp_store_dir()).await.unwrap();
        store.save_year(year_data(2023)).await.unwrap();

        assert!(store.get_year(2023).await.unwrap().is_some());
        assert!(store.get_year(2020).await.unwrap().is_none());

        assert!(store.delete_year(2023).await.unwrap());
        assert!(!store.delete_year(2023).await.unwrap());
        assert!(store.get_year(2023).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_roster_round_trip() {
        let store = JsonStore::new(temp_store_dir()).await.unwrap();

        let roster = vec![Participant::new("a@x.com", "Alice", "a@x.com")];
        store.save_participants(&roster).await.unwrap();
        let loaded = store.load_participants().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "a@x.com");
    }

    #[tokio::test]
    async fn test_merge_exclusions_skips_duplicates_and_reverses() {
        let store = JsonStore::new(temp_store_dir()).await.unwrap();
        store
            .save_exclusions(&[ExclusionPair::bidirectional("a", "b")])
            .await
            .unwrap();

        let merged = store
            .merge_exclusions(vec![
                ExclusionPair::bidirectional("a", "b"),
                ExclusionPair::bidirectional("b", "a"),
                ExclusionPair::unidirectional("c", "d"),
            ])
            .await
            .unwrap();

        assert_eq!(merged.len(), 2);
        assert!(merged.iter().any(|pair| pair.id == "c-d"));
    }

    #[tokio::test]
    async fn test_clear_working_data_keeps_history() {
        let store = JsonStore::new(temp_store_dir()).await.unwrap();
        store.save_year(year_data(2023)).await.unwrap();
        store
            .save_participants(&[Participant::new("a", "Alice", "a")])
            .await
            .unwrap();

        store.clear_working_data().await.unwrap();

        assert!(store.load_participants().await.unwrap().is_empty());
        assert_eq!(store.load_history().await.unwrap().len(), 1);
    }
}
