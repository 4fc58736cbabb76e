use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    db::PreferenceStore,
    error::{AppError, AppResult},
    models::{
        ClearDecision, ClearOutcome, ClearToken, PreferenceList, PreferenceMap, SetOutcome,
    },
};

/// How long a clear request waits for `/confirm` or `/cancel`
pub const CLEAR_CONFIRMATION_TTL_SECS: i64 = 300;

/// Where a user stands in the two-step clear flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearState {
    Idle,
    PendingConfirmation(ClearToken),
}

/// Preference CRUD on top of a [`PreferenceStore`]
///
/// Every mutation loads the full mapping, changes it in memory and saves it
/// back while holding `write_lock`, so concurrent commands cannot lose each
/// other's updates.
pub struct PreferenceManager {
    store: Arc<dyn PreferenceStore>,
    write_lock: Mutex<()>,
    pending_clears: std::sync::Mutex<HashMap<String, ClearToken>>,
}

impl PreferenceManager {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
            pending_clears: std::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Loads the store, treating unreadable data as empty
    async fn load_or_empty(&self) -> PreferenceMap {
        match self.store.load().await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    store = self.store.name(),
                    "Preference store unreadable, continuing with empty preferences"
                );
                PreferenceMap::new()
            }
        }
    }

    fn require_text(text: &str) -> AppResult<&str> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::EmptyInput);
        }
        Ok(text)
    }

    pub async fn set_preference(&self, user_id: &str, text: &str) -> AppResult<SetOutcome> {
        let text = Self::require_text(text)?;

        let _guard = self.write_lock.lock().await;
        let mut data = self.load_or_empty().await;
        let entries = data.entry(user_id.to_string()).or_default();

        if !PreferenceList::new(entries).add(text) {
            tracing::debug!(user_id = %user_id, "Preference already present");
            return Ok(SetOutcome::AlreadyPresent {
                text: text.to_string(),
            });
        }

        self.store.save(&data).await?;
        tracing::info!(user_id = %user_id, "Preference added");

        Ok(SetOutcome::Added {
            text: text.to_string(),
        })
    }

    pub async fn list_preferences(&self, user_id: &str) -> Vec<String> {
        let _guard = self.write_lock.lock().await;
        self.load_or_empty()
            .await
            .remove(user_id)
            .unwrap_or_default()
    }

    /// Removes `text`, returning the removed preference
    pub async fn remove_preference(&self, user_id: &str, text: &str) -> AppResult<String> {
        let text = Self::require_text(text)?;

        let _guard = self.write_lock.lock().await;
        let mut data = self.load_or_empty().await;

        let removed = data
            .get_mut(user_id)
            .map(|entries| PreferenceList::new(entries).remove(text))
            .unwrap_or(false);

        if !removed {
            return Err(AppError::NotFound(text.to_string()));
        }

        self.store.save(&data).await?;
        tracing::info!(user_id = %user_id, "Preference removed");

        Ok(text.to_string())
    }

    pub fn clear_state(&self, user_id: &str) -> ClearState {
        match self.pending().get(user_id) {
            Some(token) => ClearState::PendingConfirmation(*token),
            None => ClearState::Idle,
        }
    }

    /// Starts the clear flow. A repeated request while one is pending returns
    /// the same token.
    pub fn request_clear(&self, user_id: &str) -> ClearToken {
        let mut pending = self.pending();
        let token = *pending
            .entry(user_id.to_string())
            .or_insert_with(ClearToken::new);
        tracing::debug!(user_id = %user_id, token = %token.id, "Clear confirmation pending");
        token
    }

    /// Resolves a pending clear. The user is back to `Idle` afterwards,
    /// whatever the decision.
    pub async fn confirm_clear(
        &self,
        user_id: &str,
        decision: ClearDecision,
    ) -> AppResult<ClearOutcome> {
        let pending = self.pending().remove(user_id);
        if pending.is_none() {
            return Err(AppError::NoPendingConfirmation);
        }

        if decision == ClearDecision::Cancel {
            tracing::info!(user_id = %user_id, "Clear cancelled");
            return Ok(ClearOutcome::Cancelled);
        }

        let _guard = self.write_lock.lock().await;
        let mut data = self.load_or_empty().await;

        let Some(entries) = data.get_mut(user_id) else {
            return Ok(ClearOutcome::NothingToClear);
        };

        let removed = PreferenceList::new(entries).clear();
        self.store.save(&data).await?;
        tracing::info!(user_id = %user_id, removed = removed, "Preferences cleared");

        Ok(ClearOutcome::Cleared { removed })
    }

    /// Pending tokens, with expired ones already dropped
    fn pending(&self) -> std::sync::MutexGuard<'_, HashMap<String, ClearToken>> {
        // tokens are plain data, a poisoned lock is still usable
        let mut pending = self
            .pending_clears
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let now = Utc::now();
        let ttl = chrono::Duration::seconds(CLEAR_CONFIRMATION_TTL_SECS);
        pending.retain(|user_id, token| {
            let expired = token.is_expired(now, ttl);
            if expired {
                tracing::debug!(user_id = %user_id, token = %token.id, "Clear confirmation expired");
            }
            !expired
        });

        pending
    }
}
