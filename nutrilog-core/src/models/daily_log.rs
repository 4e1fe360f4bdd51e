use serde::{Deserialize, Serialize};
use std::fmt;

use super::entry::FoodLogEntry;
use super::meal_time::MealTime;
use super::nutrition::{MealSummary, Nutrition};

/// The food log for one calendar date, split into four meal buckets.
///
/// `totals` always equals the rounded sum over every entry in every bucket.
/// Mutations go through methods that call [`DailyFoodLog::recalculate`]
/// before returning; fields are read-only outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyFoodLog {
    pub(crate) date: String,
    pub(crate) breakfast: Vec<FoodLogEntry>,
    pub(crate) lunch: Vec<FoodLogEntry>,
    pub(crate) dinner: Vec<FoodLogEntry>,
    pub(crate) snack: Vec<FoodLogEntry>,
    pub(crate) totals: Nutrition,
}

impl DailyFoodLog {
    /// Empty buckets, zero totals.
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            breakfast: Vec::new(),
            lunch: Vec::new(),
            dinner: Vec::new(),
            snack: Vec::new(),
            totals: Nutrition::default(),
        }
    }

    /// Rebuilds a day from loose entries, each placed by its `meal_time`.
    pub fn from_entries(date: impl Into<String>, entries: Vec<FoodLogEntry>) -> Self {
        let mut log = Self::empty(date);
        for entry in entries {
            log.bucket_mut(entry.meal_time).push(entry);
        }
        log.recalculate();
        log
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn totals(&self) -> &Nutrition {
        &self.totals
    }

    pub fn total_calories(&self) -> f64 {
        self.totals.calories
    }

    pub fn total_protein(&self) -> f64 {
        self.totals.protein
    }

    pub fn total_carbs(&self) -> f64 {
        self.totals.carbs
    }

    pub fn total_fat(&self) -> f64 {
        self.totals.fat
    }

    pub fn total_fiber(&self) -> f64 {
        self.totals.fiber
    }

    /// Entries of one meal, in logging order.
    pub fn bucket(&self, meal_time: MealTime) -> &[FoodLogEntry] {
        match meal_time {
            MealTime::Breakfast => &self.breakfast,
            MealTime::Lunch => &self.lunch,
            MealTime::Dinner => &self.dinner,
            MealTime::Snack => &self.snack,
        }
    }

    pub(crate) fn bucket_mut(&mut self, meal_time: MealTime) -> &mut Vec<FoodLogEntry> {
        match meal_time {
            MealTime::Breakfast => &mut self.breakfast,
            MealTime::Lunch => &mut self.lunch,
            MealTime::Dinner => &mut self.dinner,
            MealTime::Snack => &mut self.snack,
        }
    }

    /// All entries, bucket by bucket.
    pub fn entries(&self) -> impl Iterator<Item = &FoodLogEntry> {
        MealTime::ALL
            .into_iter()
            .flat_map(move |meal| self.bucket(meal).iter())
    }

    pub fn entry_count(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        MealTime::ALL.iter().all(|meal| self.bucket(*meal).is_empty())
    }

    /// Finds an entry and the bucket holding it.
    pub fn find(&self, entry_id: &str) -> Option<(MealTime, &FoodLogEntry)> {
        MealTime::ALL.into_iter().find_map(|meal| {
            self.bucket(meal)
                .iter()
                .find(|e| e.id == entry_id)
                .map(|e| (meal, e))
        })
    }

    pub(crate) fn position(&self, entry_id: &str) -> Option<(MealTime, usize)> {
        MealTime::ALL.into_iter().find_map(|meal| {
            self.bucket(meal)
                .iter()
                .position(|e| e.id == entry_id)
                .map(|idx| (meal, idx))
        })
    }

    /// Sums one bucket. Computed fresh on every call.
    pub fn meal_summary(&self, meal_time: MealTime) -> MealSummary {
        let entries = self.bucket(meal_time);
        MealSummary {
            nutrition: entries.iter().map(|e| &e.nutrition).sum(),
            count: entries.len(),
        }
    }

    /// Recomputes all five totals from scratch over every bucket.
    pub(crate) fn recalculate(&mut self) {
        let sum: Nutrition = self.entries().map(|e| &e.nutrition).sum();
        self.totals = sum.rounded();
    }

    pub(crate) fn push(&mut self, entry: FoodLogEntry) {
        self.bucket_mut(entry.meal_time).push(entry);
        self.recalculate();
    }

    pub(crate) fn remove(&mut self, entry_id: &str) -> Option<FoodLogEntry> {
        let (meal, idx) = self.position(entry_id)?;
        let removed = self.bucket_mut(meal).remove(idx);
        self.recalculate();
        Some(removed)
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::empty(std::mem::take(&mut self.date));
    }
}

impl fmt::Display for DailyFoodLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Food Log: {}", self.date)?;
        writeln!(f, "{}", "=".repeat(30))?;

        for meal in MealTime::ALL {
            let summary = self.meal_summary(meal);
            writeln!(
                f,
                "\n{} ({}) - {} cal, {} item(s)",
                meal.label(),
                meal.time_range(),
                summary.nutrition.calories.round(),
                summary.count
            )?;
            for entry in self.bucket(meal) {
                writeln!(f, "  - {}", entry)?;
            }
        }

        writeln!(f, "\nTotal: {}", self.totals)?;
        Ok(())
    }
}
