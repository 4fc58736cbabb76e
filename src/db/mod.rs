use crate::{error::AppResult, models::PreferenceMap};

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Persistence for every user's preferences
///
/// Implementations read and replace the whole mapping at once; callers
/// serialize read-modify-write sequences themselves.
#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Reads the entire store. A store with no backing data yet is empty.
    async fn load(&self) -> AppResult<PreferenceMap>;

    /// Replaces the entire store with `data`.
    async fn save(&self, data: &PreferenceMap) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
