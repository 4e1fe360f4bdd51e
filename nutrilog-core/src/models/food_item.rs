use serde::{Deserialize, Serialize};
use std::fmt;

use super::nutrition::Nutrition;

/// A portion measure offered by the nutrition lookup for a food.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Measure {
    pub label: String,
    pub weight: f64,
    #[serde(default)]
    pub uri: String,
}

impl Measure {
    pub fn new(label: impl Into<String>, weight: f64) -> Self {
        Self {
            label: label.into(),
            weight,
            uri: String::new(),
        }
    }
}

/// A food as supplied by the nutrition lookup collaborator.
///
/// Nutrition values are per one unit of serving. They are trusted verbatim and
/// only ever multiplied by a serving size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub nutrition: Nutrition,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub measures: Vec<Measure>,
}

impl FoodItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, nutrition: Nutrition) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            nutrition,
            category: String::new(),
            image: None,
            measures: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_measures(mut self, measures: Vec<Measure>) -> Self {
        self.measures = measures;
        self
    }

    /// Label of the first measure, the default serving unit for a new session.
    pub fn default_unit(&self) -> Option<&str> {
        self.measures.first().map(|m| m.label.as_str())
    }
}

impl fmt::Display for FoodItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)?;
        if !self.category.is_empty() {
            write!(f, " [{}]", self.category)?;
        }
        write!(f, " - {}", self.nutrition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apple() -> FoodItem {
        FoodItem::new("food_apple", "Apple", Nutrition::new(52.0, 0.0, 14.0, 0.0, 2.0))
    }

    #[test]
    fn test_food_item_builder() {
        let food = apple()
            .with_category("Generic foods")
            .with_image("https://img.example/apple.jpg")
            .with_measures(vec![Measure::new("Whole", 182.0), Measure::new("Cup", 125.0)]);

        assert_eq!(food.category, "Generic foods");
        assert_eq!(food.image.as_deref(), Some("https://img.example/apple.jpg"));
        assert_eq!(food.default_unit(), Some("Whole"));
    }

    #[test]
    fn test_default_unit_without_measures() {
        assert_eq!(apple().default_unit(), None);
    }

    #[test]
    fn test_food_item_json_is_flat() {
        let json = serde_json::to_value(apple()).unwrap();
        assert_eq!(json["calories"], 52.0);
        assert_eq!(json["name"], "Apple");
        assert!(json.get("image").is_none());
    }

    #[test]
    fn test_food_item_parses_without_optional_fields() {
        let json = r#"{"id":"x","name":"Rice","calories":130,"protein":2.7,"carbs":28,"fat":0.3,"fiber":0.4}"#;
        let food: FoodItem = serde_json::from_str(json).unwrap();
        assert_eq!(food.nutrition.carbs, 28.0);
        assert!(food.measures.is_empty());
        assert!(food.category.is_empty());
    }

    #[test]
    fn test_food_item_display() {
        let output = format!("{}", apple().with_category("Generic foods"));
        assert!(output.contains("Apple (food_apple)"));
        assert!(output.contains("[Generic foods]"));
        assert!(output.contains("52 cal"));
    }
}
