/// Flat JSON file backend
///
/// The file holds one pretty-printed object mapping user ids to arrays of
/// preference strings. Saves go through a sibling temporary file that is
/// renamed over the target, so a reader sees either the old or the new
/// document and never a partial write.
use crate::{
    db::PreferenceStore,
    error::{AppError, AppResult},
    models::PreferenceMap,
};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use tokio::io::AsyncWriteExt;

/// Per-user value as found on disk. Early files stored a single string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredPreferences {
    List(Vec<String>),
    Single(String),
}

impl From<StoredPreferences> for Vec<String> {
    fn from(stored: StoredPreferences) -> Self {
        match stored {
            StoredPreferences::List(entries) => entries,
            StoredPreferences::Single(text) if text.trim().is_empty() => Vec::new(),
            StoredPreferences::Single(text) => vec![text],
        }
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "preferences.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn parse(&self, contents: &str) -> AppResult<PreferenceMap> {
        if contents.trim().is_empty() {
            return Ok(PreferenceMap::new());
        }

        let raw: BTreeMap<String, StoredPreferences> =
            serde_json::from_str(contents).map_err(|e| {
                AppError::storage(format!(
                    "Failed to parse {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

        Ok(raw
            .into_iter()
            .map(|(user_id, stored)| (user_id, stored.into()))
            .collect())
    }
}

#[async_trait::async_trait]
impl PreferenceStore for JsonFileStore {
    async fn load(&self) -> AppResult<PreferenceMap> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Preference file not found, starting empty");
                return Ok(PreferenceMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        let data = self.parse(&contents)?;
        tracing::debug!(users = data.len(), path = %self.path.display(), "Preferences loaded");
        Ok(data)
    }

    async fn save(&self, data: &PreferenceMap) -> AppResult<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| AppError::storage(format!("Failed to serialize preferences: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp_path = self.temp_path();
        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&temp_path, &self.path).await?;

        tracing::debug!(users = data.len(), path = %self.path.display(), "Preferences saved");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json_file"
    }
}
