use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::food_item::FoodItem;
use super::meal_time::MealTime;
use super::nutrition::Nutrition;

/// Smallest serving size a session or entry will hold.
pub const MIN_SERVING_SIZE: f64 = 0.1;

/// Unit label used when a food offers no measures.
pub const DEFAULT_SERVING_UNIT: &str = "serving";

/// Clamps a serving size to the [`MIN_SERVING_SIZE`] floor.
///
/// NaN clamps to the floor as well.
pub fn clamp_serving_size(size: f64) -> f64 {
    if size.is_nan() {
        MIN_SERVING_SIZE
    } else {
        size.max(MIN_SERVING_SIZE)
    }
}

/// One committed serving of food.
///
/// Nutrition is stored already scaled by `serving_size`, so entries can be
/// summed without looking at the source food again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodLogEntry {
    pub id: String,
    pub food_id: String,
    pub food_name: String,
    pub meal_time: MealTime,
    pub serving_size: f64,
    pub serving_unit: String,
    #[serde(flatten)]
    pub nutrition: Nutrition,
    pub logged_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl FoodLogEntry {
    /// Builds an entry from a per-unit food and a serving size.
    ///
    /// Every nutrition field becomes `round2(per_unit * serving_size)`. Empty
    /// notes are dropped.
    pub fn from_food(
        food: &FoodItem,
        meal_time: MealTime,
        serving_size: f64,
        serving_unit: impl Into<String>,
        notes: &str,
    ) -> Self {
        let serving_size = clamp_serving_size(serving_size);
        Self {
            id: Uuid::new_v4().to_string(),
            food_id: food.id.clone(),
            food_name: food.name.clone(),
            meal_time,
            serving_size,
            serving_unit: serving_unit.into(),
            nutrition: food.nutrition.scaled(serving_size),
            logged_at: Utc::now(),
            notes: if notes.is_empty() {
                None
            } else {
                Some(notes.to_string())
            },
            image: food.image.clone(),
        }
    }

    /// Returns a copy whose nutrition is re-derived for `serving_size`.
    ///
    /// Per-unit values are recovered from the stored ones, so repeated
    /// rescaling can accumulate rounding error in the second decimal.
    pub fn rescaled(&self, serving_size: f64) -> Self {
        let serving_size = clamp_serving_size(serving_size);
        let ratio = serving_size / clamp_serving_size(self.serving_size);
        Self {
            serving_size,
            nutrition: self.nutrition.scaled(ratio),
            ..self.clone()
        }
    }
}

impl fmt::Display for FoodLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} {} - {} cal (P: {}g  C: {}g  F: {}g)",
            self.food_name,
            self.serving_size,
            self.serving_unit,
            self.nutrition.calories.round(),
            self.nutrition.protein.round(),
            self.nutrition.carbs.round(),
            self.nutrition.fat.round()
        )
    }
}

/// Partial update merged into an existing entry.
///
/// Fields left as `None` are kept. Nutrition is never re-derived from a new
/// `serving_size`; callers that want that use a rescale instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodEntryUpdate {
    pub food_name: Option<String>,
    pub serving_size: Option<f64>,
    pub serving_unit: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    /// An empty string clears the notes.
    pub notes: Option<String>,
    pub image: Option<String>,
}

impl FoodEntryUpdate {
    pub fn is_empty(&self) -> bool {
        *self == FoodEntryUpdate::default()
    }

    pub fn apply(&self, entry: &mut FoodLogEntry) {
        if let Some(name) = &self.food_name {
            entry.food_name = name.clone();
        }
        if let Some(size) = self.serving_size {
            entry.serving_size = clamp_serving_size(size);
        }
        if let Some(unit) = &self.serving_unit {
            entry.serving_unit = unit.clone();
        }
        if let Some(v) = self.calories {
            entry.nutrition.calories = v;
        }
        if let Some(v) = self.protein {
            entry.nutrition.protein = v;
        }
        if let Some(v) = self.carbs {
            entry.nutrition.carbs = v;
        }
        if let Some(v) = self.fat {
            entry.nutrition.fat = v;
        }
        if let Some(v) = self.fiber {
            entry.nutrition.fiber = v;
        }
        if let Some(notes) = &self.notes {
            entry.notes = if notes.is_empty() {
                None
            } else {
                Some(notes.clone())
            };
        }
        if let Some(image) = &self.image {
            entry.image = Some(image.clone());
        }
    }
}
