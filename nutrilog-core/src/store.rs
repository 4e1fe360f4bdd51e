//! The daily log store.
//!
//! Sole owner of every [`DailyFoodLog`]. All mutations are synchronous and
//! recompute the affected day's totals before returning. Read access lives in
//! [`FoodLogQuery`](crate::FoodLogQuery).
//!
//! Each command comes in two flavours: the plain method silently ignores a
//! failed precondition, the `try_` method reports it. Neither mutates anything
//! when the precondition fails.

use std::collections::BTreeMap;

use crate::date;
use crate::error::{LogError, LogResult};
use crate::models::{DailyFoodLog, FoodEntryUpdate, FoodItem, FoodLogEntry, MealTime};
use crate::session::LoggingSession;

#[derive(Debug, Clone)]
pub struct FoodLogStore {
    pub(crate) daily_logs: BTreeMap<String, DailyFoodLog>,
    pub(crate) current_date: String,
    pub(crate) session: LoggingSession,
}

impl Default for FoodLogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FoodLogStore {
    /// An empty store positioned on today.
    pub fn new() -> Self {
        Self::with_date(date::today())
    }

    /// An empty store positioned on `date`. No day is created yet.
    pub fn with_date(date: impl Into<String>) -> Self {
        Self {
            daily_logs: BTreeMap::new(),
            current_date: date.into(),
            session: LoggingSession::new(),
        }
    }

    /// Selects the active date, creating its log if needed.
    pub fn set_current_date(&mut self, date: impl Into<String>) {
        let date = date.into();
        self.ensure_date(&date);
        tracing::debug!(date = %date, "current date set");
        self.current_date = date;
    }

    /// Creates an empty log for `date` unless one exists.
    pub fn ensure_date(&mut self, date: &str) -> &DailyFoodLog {
        self.day_mut(date)
    }

    fn day_mut(&mut self, date: &str) -> &mut DailyFoodLog {
        self.daily_logs
            .entry(date.to_string())
            .or_insert_with(|| DailyFoodLog::empty(date))
    }

    /// Replaces a day with externally persisted entries.
    ///
    /// Each entry lands in the bucket named by its `meal_time`, in the given
    /// order.
    pub fn restore_day(&mut self, date: &str, entries: Vec<FoodLogEntry>) {
        let log = DailyFoodLog::from_entries(date, entries);
        tracing::debug!(date, entries = log.entry_count(), "day restored");
        self.daily_logs.insert(date.to_string(), log);
    }

    // Session commands

    pub fn start_logging(&mut self, food: FoodItem, meal_time: Option<MealTime>) {
        self.session.start(food, meal_time);
    }

    pub fn cancel_logging(&mut self) {
        tracing::debug!("logging cancelled");
        self.session.reset();
    }

    pub fn set_serving_size(&mut self, size: f64) {
        self.session.set_serving_size(size);
    }

    pub fn set_serving_unit(&mut self, unit: impl Into<String>) {
        self.session.set_serving_unit(unit);
    }

    pub fn cycle_serving_unit(&mut self) {
        self.session.cycle_serving_unit();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.session.set_notes(notes);
    }

    pub fn set_selected_meal_time(&mut self, meal_time: MealTime) {
        self.session.set_selected_meal_time(meal_time);
    }

    /// Commits the session into the current date's selected meal bucket.
    ///
    /// Does nothing when no food is selected. The session is reset either way.
    pub fn log_food(&mut self) {
        if let Err(e) = self.try_log_food() {
            tracing::warn!("log food ignored: {}", e);
        }
    }

    /// Like [`log_food`](Self::log_food) but reports a missing food and
    /// returns the new entry's id.
    pub fn try_log_food(&mut self) -> LogResult<String> {
        let Some(food) = self.session.selected_food() else {
            self.session.reset();
            return Err(LogError::NoFoodSelected);
        };

        let entry = FoodLogEntry::from_food(
            food,
            self.session.selected_meal_time(),
            self.session.serving_size(),
            self.session.serving_unit(),
            self.session.notes(),
        );
        let entry_id = entry.id.clone();
        let date = self.current_date.clone();

        tracing::debug!(
            date = %date,
            meal = %entry.meal_time,
            food = %entry.food_id,
            serving_size = entry.serving_size,
            "food logged"
        );
        self.day_mut(&date).push(entry);
        self.session.reset();

        Ok(entry_id)
    }

    /// Removes an entry from whichever bucket holds it. Missing day or entry
    /// is a no-op.
    pub fn remove_food_entry(&mut self, date: &str, entry_id: &str) {
        if let Err(e) = self.try_remove_food_entry(date, entry_id) {
            tracing::warn!("remove ignored: {}", e);
        }
    }

    pub fn try_remove_food_entry(&mut self, date: &str, entry_id: &str) -> LogResult<FoodLogEntry> {
        let log = self.existing_day_mut(date)?;
        let removed = log.remove(entry_id).ok_or_else(|| LogError::EntryNotFound {
            date: date.to_string(),
            entry_id: entry_id.to_string(),
        })?;
        tracing::debug!(date, entry_id, "entry removed");
        Ok(removed)
    }

    /// Merges `updates` into an entry.
    ///
    /// Nutrition is taken from `updates` as given. Changing `serving_size`
    /// alone leaves the nutrition fields untouched; see
    /// [`rescale_food_entry`](Self::rescale_food_entry).
    pub fn update_food_entry(&mut self, date: &str, entry_id: &str, updates: &FoodEntryUpdate) {
        if let Err(e) = self.try_update_food_entry(date, entry_id, updates) {
            tracing::warn!("update ignored: {}", e);
        }
    }

    pub fn try_update_food_entry(
        &mut self,
        date: &str,
        entry_id: &str,
        updates: &FoodEntryUpdate,
    ) -> LogResult<FoodLogEntry> {
        let entry = self.modify_entry(date, entry_id, |entry| updates.apply(entry))?;
        tracing::debug!(date, entry_id, "entry updated");
        Ok(entry)
    }

    /// Re-derives an entry's nutrition for a new serving size.
    pub fn rescale_food_entry(&mut self, date: &str, entry_id: &str, serving_size: f64) {
        if let Err(e) = self.try_rescale_food_entry(date, entry_id, serving_size) {
            tracing::warn!("rescale ignored: {}", e);
        }
    }

    pub fn try_rescale_food_entry(
        &mut self,
        date: &str,
        entry_id: &str,
        serving_size: f64,
    ) -> LogResult<FoodLogEntry> {
        let entry = self.modify_entry(date, entry_id, |entry| {
            *entry = entry.rescaled(serving_size);
        })?;
        tracing::debug!(date, entry_id, serving_size = entry.serving_size, "entry rescaled");
        Ok(entry)
    }

    /// Moves an entry to the end of another meal bucket.
    pub fn move_food_entry(&mut self, date: &str, entry_id: &str, meal_time: MealTime) {
        if let Err(e) = self.try_move_food_entry(date, entry_id, meal_time) {
            tracing::warn!("move ignored: {}", e);
        }
    }

    pub fn try_move_food_entry(
        &mut self,
        date: &str,
        entry_id: &str,
        meal_time: MealTime,
    ) -> LogResult<FoodLogEntry> {
        let log = self.existing_day_mut(date)?;
        let (from, idx) = log.position(entry_id).ok_or_else(|| LogError::EntryNotFound {
            date: date.to_string(),
            entry_id: entry_id.to_string(),
        })?;
        if from == meal_time {
            return Ok(log.bucket(from)[idx].clone());
        }

        let mut entry = log.bucket_mut(from).remove(idx);
        entry.meal_time = meal_time;
        let moved = entry.clone();
        log.push(entry);
        tracing::debug!(date, entry_id, from = %from, to = %meal_time, "entry moved");
        Ok(moved)
    }

    /// Resets a day to empty buckets and zero totals. The date key stays.
    pub fn clear_day_log(&mut self, date: &str) {
        self.day_mut(date).clear();
        tracing::debug!(date, "day cleared");
    }

    fn existing_day_mut(&mut self, date: &str) -> LogResult<&mut DailyFoodLog> {
        self.daily_logs
            .get_mut(date)
            .ok_or_else(|| LogError::DayNotFound(date.to_string()))
    }

    fn modify_entry<F>(&mut self, date: &str, entry_id: &str, f: F) -> LogResult<FoodLogEntry>
    where
        F: FnOnce(&mut FoodLogEntry),
    {
        let log = self.existing_day_mut(date)?;
        let (meal, idx) = log.position(entry_id).ok_or_else(|| LogError::EntryNotFound {
            date: date.to_string(),
            entry_id: entry_id.to_string(),
        })?;
        let entry = &mut log.bucket_mut(meal)[idx];
        f(entry);
        let updated = entry.clone();
        log.recalculate();
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Measure, Nutrition};
    use crate::FoodLogQuery;

    const DAY: &str = "2024-01-15";

    fn food(id: &str, calories: f64) -> FoodItem {
        FoodItem::new(id, id, Nutrition::new(calories, 10.0, 20.0, 5.0, 2.0))
            .with_measures(vec![Measure::new("Cup", 100.0)])
    }

    fn log(store: &mut FoodLogStore, item: FoodItem, meal: MealTime, size: f64) -> String {
        store.start_logging(item, Some(meal));
        store.set_serving_size(size);
        store.try_log_food().unwrap()
    }

    fn assert_totals_consistent(store: &FoodLogStore, date: &str) {
        let day = store.daily_log_by_date(date);
        let sum: Nutrition = day.entries().map(|e| &e.nutrition).sum();
        assert_eq!(*day.totals(), sum.rounded());
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut store = FoodLogStore::with_date("2023-12-31");
        store.set_current_date(DAY);
        store.start_logging(food("porridge", 200.0), Some(MealTime::Breakfast));
        store.set_serving_size(1.5);
        store.log_food();

        let day = store.current_daily_log();
        let breakfast = day.bucket(MealTime::Breakfast);
        assert_eq!(breakfast.len(), 1);
        assert_eq!(
            breakfast[0].nutrition,
            Nutrition::new(300.0, 15.0, 30.0, 7.5, 3.0)
        );
        assert_eq!(day.total_calories(), 300.0);
        assert_eq!(day.total_protein(), 15.0);
        assert_eq!(day.total_carbs(), 30.0);
        assert_eq!(day.total_fat(), 7.5);
        assert_eq!(day.total_fiber(), 3.0);
    }

    #[test]
    fn test_scaling_correctness() {
        let mut store = FoodLogStore::with_date(DAY);
        let id = log(&mut store, food("rice", 100.0), MealTime::Lunch, 2.5);

        let day = store.daily_log_by_date(DAY);
        let (_, entry) = day.find(&id).unwrap();
        assert_eq!(entry.nutrition.calories, 250.0);
        assert_eq!(entry.nutrition.protein, 25.0);
        assert_eq!(entry.nutrition.fat, 12.5);
        assert_eq!(entry.serving_unit, "Cup");
    }

    #[test]
    fn test_log_without_food_is_noop() {
        let mut store = FoodLogStore::with_date(DAY);
        store.log_food();
        assert!(store.daily_logs.is_empty());

        assert_eq!(store.try_log_food(), Err(LogError::NoFoodSelected));
        assert!(store.daily_logs.is_empty());
    }

    #[test]
    fn test_append_order() {
        let mut store = FoodLogStore::with_date(DAY);
        let a = log(&mut store, food("a", 100.0), MealTime::Dinner, 1.0);
        let b = log(&mut store, food("b", 50.0), MealTime::Dinner, 1.0);

        let day = store.daily_log_by_date(DAY);
        let ids: Vec<&str> = day
            .bucket(MealTime::Dinner)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec![a.as_str(), b.as_str()]);
    }

    #[test]
    fn test_session_reset_on_commit_and_cancel() {
        let mut store = FoodLogStore::with_date(DAY);
        store.start_logging(food("a", 100.0), Some(MealTime::Snack));
        store.set_serving_size(3.0);
        store.set_notes("note");
        store.log_food();

        assert!(!store.is_logging());
        assert!(store.selected_food().is_none());
        assert_eq!(store.logging_state().serving_size, 1.0);
        assert_eq!(store.logging_state().notes, "");
        assert_eq!(store.logging_state().selected_meal_time, MealTime::Snack);

        store.start_logging(food("b", 100.0), None);
        store.set_serving_size(2.0);
        store.cancel_logging();

        assert!(!store.is_logging());
        assert!(store.selected_food().is_none());
        assert_eq!(store.logging_state().serving_size, 1.0);
        assert_eq!(store.logging_state().notes, "");
        assert_eq!(store.daily_log_by_date(DAY).entry_count(), 1);
    }

    #[test]
    fn test_commit_appends_to_current_date_only() {
        let mut store = FoodLogStore::with_date(DAY);
        log(&mut store, food("a", 100.0), MealTime::Lunch, 1.0);
        store.set_current_date("2024-01-16");
        log(&mut store, food("b", 40.0), MealTime::Lunch, 1.0);

        assert_eq!(store.daily_log_by_date(DAY).total_calories(), 100.0);
        assert_eq!(store.daily_log_by_date("2024-01-16").total_calories(), 40.0);
    }

    #[test]
    fn test_removal_isolation() {
        let mut store = FoodLogStore::with_date(DAY);
        log(&mut store, food("eggs", 140.0), MealTime::Breakfast, 1.0);
        let lunch = log(&mut store, food("wrap", 300.0), MealTime::Lunch, 1.0);
        log(&mut store, food("soup", 200.0), MealTime::Dinner, 1.0);
        log(&mut store, food("nuts", 90.0), MealTime::Snack, 1.0);
        let before = store.daily_log_by_date(DAY).into_owned();

        store.remove_food_entry(DAY, &lunch);

        let after = store.daily_log_by_date(DAY);
        assert!(after.bucket(MealTime::Lunch).is_empty());
        for meal in [MealTime::Breakfast, MealTime::Dinner, MealTime::Snack] {
            assert_eq!(after.bucket(meal), before.bucket(meal));
        }
        assert_eq!(after.total_calories(), 430.0);
        assert_totals_consistent(&store, DAY);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = FoodLogStore::with_date(DAY);
        log(&mut store, food("a", 100.0), MealTime::Lunch, 1.0);
        let before = store.daily_log_by_date(DAY).into_owned();

        store.remove_food_entry(DAY, "nope");
        store.remove_food_entry("2020-01-01", "nope");

        assert_eq!(store.daily_log_by_date(DAY).into_owned(), before);
        assert!(!store.daily_logs.contains_key("2020-01-01"));
        assert_eq!(
            store.try_remove_food_entry("2020-01-01", "nope"),
            Err(LogError::DayNotFound("2020-01-01".into()))
        );
        assert_eq!(
            store.try_remove_food_entry(DAY, "nope"),
            Err(LogError::EntryNotFound {
                date: DAY.into(),
                entry_id: "nope".into()
            })
        );
    }

    #[test]
    fn test_update_recomputes_totals_without_rescaling() {
        let mut store = FoodLogStore::with_date(DAY);
        let id = log(&mut store, food("a", 100.0), MealTime::Lunch, 1.0);
        log(&mut store, food("b", 50.0), MealTime::Dinner, 1.0);

        store.update_food_entry(
            DAY,
            &id,
            &FoodEntryUpdate {
                serving_size: Some(2.0),
                ..Default::default()
            },
        );
        assert_eq!(store.daily_log_by_date(DAY).total_calories(), 150.0);

        let updated = store
            .try_update_food_entry(
                DAY,
                &id,
                &FoodEntryUpdate {
                    calories: Some(180.0),
                    protein: Some(12.25),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.serving_size, 2.0);
        assert_eq!(updated.nutrition.calories, 180.0);

        let day = store.daily_log_by_date(DAY);
        assert_eq!(day.total_calories(), 230.0);
        assert_eq!(day.total_protein(), 22.25);
        assert_totals_consistent(&store, DAY);
    }

    #[test]
    fn test_update_missing_is_noop() {
        let mut store = FoodLogStore::with_date(DAY);
        let update = FoodEntryUpdate {
            calories: Some(1.0),
            ..Default::default()
        };
        store.update_food_entry(DAY, "nope", &update);
        assert!(store.daily_logs.is_empty());
        assert!(store.try_update_food_entry(DAY, "nope", &update).is_err());
    }

    #[test]
    fn test_rescale() {
        let mut store = FoodLogStore::with_date(DAY);
        let id = log(&mut store, food("a", 100.0), MealTime::Lunch, 2.0);

        store.rescale_food_entry(DAY, &id, 1.0);

        let day = store.daily_log_by_date(DAY);
        let (_, entry) = day.find(&id).unwrap();
        assert_eq!(entry.serving_size, 1.0);
        assert_eq!(entry.nutrition, Nutrition::new(100.0, 10.0, 20.0, 5.0, 2.0));
        assert_eq!(day.total_calories(), 100.0);
    }

    #[test]
    fn test_move_entry() {
        let mut store = FoodLogStore::with_date(DAY);
        let a = log(&mut store, food("a", 100.0), MealTime::Breakfast, 1.0);
        let b = log(&mut store, food("b", 50.0), MealTime::Snack, 1.0);

        let moved = store.try_move_food_entry(DAY, &a, MealTime::Snack).unwrap();
        assert_eq!(moved.meal_time, MealTime::Snack);

        let day = store.daily_log_by_date(DAY);
        assert!(day.bucket(MealTime::Breakfast).is_empty());
        let ids: Vec<&str> = day
            .bucket(MealTime::Snack)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec![b.as_str(), a.as_str()]);
        assert_eq!(day.total_calories(), 150.0);
    }

    #[test]
    fn test_move_to_same_bucket_keeps_order() {
        let mut store = FoodLogStore::with_date(DAY);
        let a = log(&mut store, food("a", 100.0), MealTime::Lunch, 1.0);
        let b = log(&mut store, food("b", 50.0), MealTime::Lunch, 1.0);

        store.move_food_entry(DAY, &a, MealTime::Lunch);

        let day = store.daily_log_by_date(DAY);
        assert_eq!(day.bucket(MealTime::Lunch)[0].id, a);
        assert_eq!(day.bucket(MealTime::Lunch)[1].id, b);
    }

    #[test]
    fn test_clear_day_log() {
        let mut store = FoodLogStore::with_date(DAY);
        log(&mut store, food("a", 100.0), MealTime::Lunch, 1.0);

        store.clear_day_log(DAY);

        assert!(store.daily_logs.contains_key(DAY));
        assert_eq!(
            store.daily_log_by_date(DAY).into_owned(),
            DailyFoodLog::empty(DAY)
        );
    }

    #[test]
    fn test_set_current_date_is_idempotent() {
        let mut store = FoodLogStore::with_date(DAY);
        log(&mut store, food("a", 100.0), MealTime::Lunch, 1.0);
        store.set_current_date(DAY);
        store.set_current_date(DAY);
        assert_eq!(store.current_daily_log().entry_count(), 1);
        assert_eq!(store.daily_logs.len(), 1);
    }

    #[test]
    fn test_restore_day() {
        let a = FoodLogEntry::from_food(&food("a", 100.0), MealTime::Dinner, 1.0, "Cup", "");
        let b = FoodLogEntry::from_food(&food("b", 20.0), MealTime::Breakfast, 2.0, "Cup", "");
        let mut store = FoodLogStore::with_date(DAY);

        store.restore_day(DAY, vec![a.clone(), b.clone()]);

        let day = store.daily_log_by_date(DAY);
        assert_eq!(day.bucket(MealTime::Dinner), &[a]);
        assert_eq!(day.bucket(MealTime::Breakfast), &[b]);
        assert_eq!(day.total_calories(), 140.0);
    }

    #[test]
    fn test_totals_stay_consistent_across_mixed_operations() {
        let mut store = FoodLogStore::with_date(DAY);
        let mut ids = Vec::new();
        for (i, meal) in MealTime::ALL.iter().cycle().take(12).enumerate() {
            let size = 0.3 + i as f64 * 0.7;
            ids.push(log(&mut store, food(&format!("f{}", i), 33.33), *meal, size));
            assert_totals_consistent(&store, DAY);
        }
        for (i, id) in ids.iter().enumerate() {
            match i % 3 {
                0 => store.remove_food_entry(DAY, id),
                1 => store.update_food_entry(
                    DAY,
                    id,
                    &FoodEntryUpdate {
                        fat: Some(i as f64 * 1.11),
                        ..Default::default()
                    },
                ),
                _ => store.move_food_entry(DAY, id, MealTime::Snack),
            }
            assert_totals_consistent(&store, DAY);
        }
    }
}
