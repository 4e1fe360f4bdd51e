//! Read-only views over the store.
//!
//! Nothing here mutates. Reading a date that has no log yields a computed
//! empty day instead of creating one.

use std::borrow::Cow;

use crate::models::{DailyFoodLog, FoodItem, MealSummary, MealTime, Nutrition};
use crate::session::LoggingState;
use crate::store::FoodLogStore;

pub trait FoodLogQuery {
    fn current_date(&self) -> &str;

    /// The log for `date`, or an empty one if none exists.
    fn daily_log_by_date(&self, date: &str) -> Cow<'_, DailyFoodLog>;

    /// Dates that have a log, oldest first.
    fn logged_dates(&self) -> Vec<&str>;

    fn is_logging(&self) -> bool;

    fn selected_food(&self) -> Option<&FoodItem>;

    fn logging_state(&self) -> LoggingState;

    /// Nutrition the active draft would commit.
    fn draft_preview(&self) -> Option<Nutrition>;

    fn current_daily_log(&self) -> Cow<'_, DailyFoodLog> {
        self.daily_log_by_date(self.current_date())
    }

    /// Summary of one meal on the current date, computed fresh.
    fn meal_summary(&self, meal_time: MealTime) -> MealSummary {
        self.current_daily_log().meal_summary(meal_time)
    }
}

impl FoodLogQuery for FoodLogStore {
    fn current_date(&self) -> &str {
        &self.current_date
    }

    fn daily_log_by_date(&self, date: &str) -> Cow<'_, DailyFoodLog> {
        match self.daily_logs.get(date) {
            Some(log) => Cow::Borrowed(log),
            None => Cow::Owned(DailyFoodLog::empty(date)),
        }
    }

    fn logged_dates(&self) -> Vec<&str> {
        self.daily_logs.keys().map(String::as_str).collect()
    }

    fn is_logging(&self) -> bool {
        self.session.is_active()
    }

    fn selected_food(&self) -> Option<&FoodItem> {
        self.session.selected_food()
    }

    fn logging_state(&self) -> LoggingState {
        self.session.state()
    }

    fn draft_preview(&self) -> Option<Nutrition> {
        self.session.preview()
    }
}
