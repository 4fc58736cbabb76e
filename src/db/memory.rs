use tokio::sync::RwLock;

use crate::{db::PreferenceStore, error::AppResult, models::PreferenceMap};

/// Process-local store; contents are lost on restart
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<PreferenceMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: PreferenceMap) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }
}

#[async_trait::async_trait]
impl PreferenceStore for MemoryStore {
    async fn load(&self) -> AppResult<PreferenceMap> {
        Ok(self.data.read().await.clone())
    }

    async fn save(&self, data: &PreferenceMap) -> AppResult<()> {
        *self.data.write().await = data.clone();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_replaces_everything() {
        let mut initial = PreferenceMap::new();
        initial.insert("1".to_string(), vec!["Blur".to_string()]);
        let store = MemoryStore::with_data(initial);

        let mut next = PreferenceMap::new();
        next.insert("2".to_string(), vec!["Oasis".to_string()]);
        store.save(&next).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert!(!loaded.contains_key("1"));
        assert_eq!(loaded["2"], vec!["Oasis"]);
    }
}
