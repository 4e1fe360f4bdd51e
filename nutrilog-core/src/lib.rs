//! Nutrilog Core Library
//!
//! In-memory food log engine: per-day logs split into meal buckets, the
//! logging session that drafts a serving before it is committed, and the
//! read-only views over both.

pub mod date;
pub mod edamam;
pub mod error;
pub mod history;
pub mod models;
pub mod selectors;
pub mod session;
pub mod store;

pub use error::{LogError, LogResult};
pub use history::SearchHistory;
pub use models::{
    DailyFoodLog, FoodEntryUpdate, FoodItem, FoodLogEntry, MealSummary, MealTime, Measure,
    Nutrition,
};
pub use selectors::FoodLogQuery;
pub use session::{LoggingSession, LoggingState};
pub use store::FoodLogStore;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
