//! Transient draft state for a food being portioned before it is logged.

use serde::{Deserialize, Serialize};

use crate::models::{
    clamp_serving_size, FoodItem, MealTime, Nutrition, DEFAULT_SERVING_UNIT,
};

/// Draft of a single serving.
///
/// A session is either inactive (every field at its default) or drafting a
/// selected food. The selected meal time survives commit and cancel so the
/// next session defaults to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSession {
    active: bool,
    selected_food: Option<FoodItem>,
    serving_size: f64,
    serving_unit: String,
    notes: String,
    selected_meal_time: MealTime,
}

impl Default for LoggingSession {
    fn default() -> Self {
        Self {
            active: false,
            selected_food: None,
            serving_size: 1.0,
            serving_unit: DEFAULT_SERVING_UNIT.to_string(),
            notes: String::new(),
            selected_meal_time: MealTime::default(),
        }
    }
}

/// Flat read-only copy of the serving parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggingState {
    pub serving_size: f64,
    pub serving_unit: String,
    pub notes: String,
    pub selected_meal_time: MealTime,
}

impl LoggingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a draft for `food`. Any draft in progress is overwritten.
    pub fn start(&mut self, food: FoodItem, meal_time: Option<MealTime>) {
        if self.active {
            tracing::debug!(
                previous = self.selected_food.as_ref().map(|f| f.id.as_str()),
                "discarding unfinished draft"
            );
        }
        self.active = true;
        if let Some(meal) = meal_time {
            self.selected_meal_time = meal;
        }
        self.serving_size = 1.0;
        self.serving_unit = food
            .default_unit()
            .unwrap_or(DEFAULT_SERVING_UNIT)
            .to_string();
        self.notes.clear();
        tracing::debug!(food = %food.id, meal = %self.selected_meal_time, "logging started");
        self.selected_food = Some(food);
    }

    /// Back to the inactive state. The selected meal time is kept.
    pub fn reset(&mut self) {
        let meal = self.selected_meal_time;
        *self = Self {
            selected_meal_time: meal,
            ..Self::default()
        };
    }

    /// Clamps to a floor of 0.1.
    pub fn set_serving_size(&mut self, size: f64) {
        self.serving_size = clamp_serving_size(size);
    }

    pub fn set_serving_unit(&mut self, unit: impl Into<String>) {
        self.serving_unit = unit.into();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn set_selected_meal_time(&mut self, meal_time: MealTime) {
        self.selected_meal_time = meal_time;
    }

    /// Moves the unit to the next measure of the selected food, wrapping.
    ///
    /// An unknown current unit moves to the first measure. Without a food or
    /// without measures the unit is left alone.
    pub fn cycle_serving_unit(&mut self) {
        let Some(food) = &self.selected_food else {
            return;
        };
        if food.measures.is_empty() {
            return;
        }
        let next = match food
            .measures
            .iter()
            .position(|m| m.label == self.serving_unit)
        {
            Some(idx) => (idx + 1) % food.measures.len(),
            None => 0,
        };
        self.serving_unit = food.measures[next].label.clone();
    }

    /// Nutrition the current draft would commit.
    pub fn preview(&self) -> Option<Nutrition> {
        self.selected_food
            .as_ref()
            .map(|food| food.nutrition.scaled(self.serving_size))
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn selected_food(&self) -> Option<&FoodItem> {
        self.selected_food.as_ref()
    }

    pub fn serving_size(&self) -> f64 {
        self.serving_size
    }

    pub fn serving_unit(&self) -> &str {
        &self.serving_unit
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn selected_meal_time(&self) -> MealTime {
        self.selected_meal_time
    }

    pub fn state(&self) -> LoggingState {
        LoggingState {
            serving_size: self.serving_size,
            serving_unit: self.serving_unit.clone(),
            notes: self.notes.clone(),
            selected_meal_time: self.selected_meal_time,
        }
    }
}
