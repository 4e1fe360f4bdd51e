//! Response models of the Edamam food database parser and their conversion
//! into [`FoodItem`]s.

use serde::{Deserialize, Serialize};

use crate::models::{FoodItem, Measure, Nutrition};

/// Measure labels considered common enough to offer first.
pub const COMMON_MEASURE_LABELS: [&str; 9] = [
    "Serving",
    "Cup",
    "Tablespoon",
    "Ounce",
    "Gram",
    "Slice",
    "Piece",
    "Unit",
    "Whole",
];

const MAX_COMMON_MEASURES: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserResponse {
    #[serde(default)]
    pub text: String,
    /// Foods the parser matched exactly; filled for `food-id` lookups.
    #[serde(default)]
    pub parsed: Vec<ParsedFood>,
    #[serde(default)]
    pub hints: Vec<FoodHint>,
    #[serde(rename = "_links", default)]
    pub links: Links,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Links {
    pub next: Option<Link>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedFood {
    pub food: EdamamFood,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodHint {
    pub food: EdamamFood,
    #[serde(default)]
    pub measures: Vec<EdamamMeasure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdamamFood {
    pub food_id: String,
    pub label: String,
    #[serde(default)]
    pub known_as: String,
    #[serde(default)]
    pub nutrients: Nutrients,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub category_label: String,
    pub image: Option<String>,
}

/// Per 100g values. Anything missing is zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Nutrients {
    #[serde(rename = "ENERC_KCAL", default)]
    pub energy_kcal: f64,
    #[serde(rename = "PROCNT", default)]
    pub protein: f64,
    #[serde(rename = "FAT", default)]
    pub fat: f64,
    #[serde(rename = "CHOCDF", default)]
    pub carbs: f64,
    #[serde(rename = "FIBTG", default)]
    pub fiber: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdamamMeasure {
    #[serde(default)]
    pub uri: String,
    pub label: String,
    #[serde(default)]
    pub weight: f64,
}

impl From<&EdamamMeasure> for Measure {
    fn from(m: &EdamamMeasure) -> Self {
        Measure {
            label: m.label.clone(),
            weight: m.weight,
            uri: m.uri.clone(),
        }
    }
}

/// Converts a hint into a food, rounding each nutrient to a whole number.
pub fn to_food_item(hint: &FoodHint) -> FoodItem {
    convert(&hint.food, &hint.measures)
}

fn convert(food: &EdamamFood, measures: &[EdamamMeasure]) -> FoodItem {
    let n = &food.nutrients;
    FoodItem {
        id: food.food_id.clone(),
        name: food.label.clone(),
        nutrition: Nutrition::new(
            n.energy_kcal.round(),
            n.protein.round(),
            n.carbs.round(),
            n.fat.round(),
            n.fiber.round(),
        ),
        category: food.category.clone(),
        image: food.image.clone(),
        measures: measures.iter().map(Measure::from).collect(),
    }
}

pub fn to_food_items(response: &ParserResponse) -> Vec<FoodItem> {
    response.hints.iter().map(to_food_item).collect()
}

/// Picks `food_id` out of a response.
///
/// A matching hint wins since it carries measures; a `parsed` match is used
/// otherwise.
pub fn find_food_item(response: &ParserResponse, food_id: &str) -> Option<FoodItem> {
    if let Some(hint) = response.hints.iter().find(|h| h.food.food_id == food_id) {
        return Some(to_food_item(hint));
    }
    response
        .parsed
        .iter()
        .find(|p| p.food.food_id == food_id)
        .map(|p| convert(&p.food, &[]))
}

/// Keeps measures with a common label, at most five, in their original order.
pub fn common_measures(measures: &[Measure]) -> Vec<&Measure> {
    measures
        .iter()
        .filter(|m| COMMON_MEASURE_LABELS.contains(&m.label.as_str()))
        .take(MAX_COMMON_MEASURES)
        .collect()
}

/// Whole calories for `serving_weight` percent of a measure.
///
/// `serving_weight` is 100 for one full measure.
pub fn calories_for_serving(kcal_per_100g: f64, measure_weight: f64, serving_weight: f64) -> f64 {
    let actual_weight = measure_weight * serving_weight / 100.0;
    (kcal_per_100g * actual_weight / 100.0).round()
}
