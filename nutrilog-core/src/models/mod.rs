mod daily_log;
mod entry;
mod food_item;
mod meal_time;
mod nutrition;

pub use daily_log::DailyFoodLog;
pub use entry::{
    clamp_serving_size, FoodEntryUpdate, FoodLogEntry, DEFAULT_SERVING_UNIT, MIN_SERVING_SIZE,
};
pub use food_item::{FoodItem, Measure};
pub use meal_time::MealTime;
pub use nutrition::{round2, MealSummary, Nutrition};
