use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Rounds to two decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The five tracked nutrition values.
///
/// Depending on where it appears this is either a per-unit value set (on a
/// [`FoodItem`](super::FoodItem)) or an already scaled value set (on an entry,
/// a summary or a day's totals).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}

impl Nutrition {
    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64, fiber: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
            fiber,
        }
    }

    /// Multiplies every field by `ratio` and rounds each to two decimals.
    pub fn scaled(&self, ratio: f64) -> Self {
        Self {
            calories: round2(self.calories * ratio),
            protein: round2(self.protein * ratio),
            carbs: round2(self.carbs * ratio),
            fat: round2(self.fat * ratio),
            fiber: round2(self.fiber * ratio),
        }
    }

    pub fn rounded(&self) -> Self {
        self.scaled(1.0)
    }
}

impl Add for Nutrition {
    type Output = Nutrition;

    fn add(self, rhs: Nutrition) -> Nutrition {
        Nutrition {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
            fiber: self.fiber + rhs.fiber,
        }
    }
}

impl Sum for Nutrition {
    fn sum<I: Iterator<Item = Nutrition>>(iter: I) -> Self {
        iter.fold(Nutrition::default(), |acc, n| acc + n)
    }
}

impl<'a> Sum<&'a Nutrition> for Nutrition {
    fn sum<I: Iterator<Item = &'a Nutrition>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Nutrition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cal | P: {}g  C: {}g  F: {}g  Fiber: {}g",
            self.calories, self.protein, self.carbs, self.fat, self.fiber
        )
    }
}

/// Aggregate of one meal bucket: summed nutrition plus the entry count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MealSummary {
    #[serde(flatten)]
    pub nutrition: Nutrition,
    pub count: usize,
}
