use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four fixed meal buckets a day's log is partitioned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealTime {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealTime {
    /// All meal times in bucket order.
    pub const ALL: [MealTime; 4] = [
        MealTime::Breakfast,
        MealTime::Lunch,
        MealTime::Dinner,
        MealTime::Snack,
    ];

    /// Heading used when rendering a meal section.
    pub fn label(&self) -> &'static str {
        match self {
            MealTime::Breakfast => "Breakfast",
            MealTime::Lunch => "Lunch",
            MealTime::Dinner => "Dinner",
            MealTime::Snack => "Snacks",
        }
    }

    /// Typical time window for the meal.
    pub fn time_range(&self) -> &'static str {
        match self {
            MealTime::Breakfast => "6:00 - 11:00",
            MealTime::Lunch => "11:00 - 15:00",
            MealTime::Dinner => "17:00 - 22:00",
            MealTime::Snack => "Anytime",
        }
    }
}

impl Default for MealTime {
    fn default() -> Self {
        MealTime::Breakfast
    }
}

impl fmt::Display for MealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealTime::Breakfast => write!(f, "breakfast"),
            MealTime::Lunch => write!(f, "lunch"),
            MealTime::Dinner => write!(f, "dinner"),
            MealTime::Snack => write!(f, "snack"),
        }
    }
}

impl FromStr for MealTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealTime::Breakfast),
            "lunch" => Ok(MealTime::Lunch),
            "dinner" => Ok(MealTime::Dinner),
            "snack" | "snacks" => Ok(MealTime::Snack),
            _ => Err(format!(
                "Invalid meal time '{}'. Valid options: breakfast, lunch, dinner, snack",
                s
            )),
        }
    }
}
