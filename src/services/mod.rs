pub mod preferences;
pub mod providers;
pub mod recommendations;

pub use preferences::{ClearState, PreferenceManager};
pub use providers::{SimilarityProvider, TasteDiveProvider};
pub use recommendations::Recommender;
