use serde::{Deserialize, Serialize};

use crate::models::FoodItem;

pub const MAX_SEARCH_HISTORY: usize = 10;
pub const MAX_RECENT_FOODS: usize = 20;

/// Past search queries and the foods they turned up, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHistory {
    queries: Vec<String>,
    recent_foods: Vec<FoodItem>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores persisted state, re-applying the caps.
    pub fn from_parts(mut queries: Vec<String>, mut recent_foods: Vec<FoodItem>) -> Self {
        queries.truncate(MAX_SEARCH_HISTORY);
        recent_foods.truncate(MAX_RECENT_FOODS);
        Self {
            queries,
            recent_foods,
        }
    }

    /// Records a query. Blank queries and queries already present are ignored.
    pub fn add_query(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() || self.queries.iter().any(|q| q == query) {
            return;
        }
        self.queries.insert(0, query.to_string());
        self.queries.truncate(MAX_SEARCH_HISTORY);
    }

    pub fn clear_queries(&mut self) {
        self.queries.clear();
    }

    /// Puts `food` at the front, dropping any older copy with the same id.
    pub fn add_recent_food(&mut self, food: FoodItem) {
        self.recent_foods.retain(|f| f.id != food.id);
        self.recent_foods.insert(0, food);
        self.recent_foods.truncate(MAX_RECENT_FOODS);
    }

    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    pub fn recent_foods(&self) -> &[FoodItem] {
        &self.recent_foods
    }

    /// Looks up a recent food by exact id, then by case-insensitive name.
    pub fn find_food(&self, reference: &str) -> Option<&FoodItem> {
        self.recent_foods
            .iter()
            .find(|f| f.id == reference)
            .or_else(|| {
                self.recent_foods
                    .iter()
                    .find(|f| f.name.eq_ignore_ascii_case(reference))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Nutrition;

    fn food(id: &str, name: &str) -> FoodItem {
        FoodItem::new(id, name, Nutrition::default())
    }

    #[test]
    fn test_add_query_dedupes_and_trims() {
        let mut history = SearchHistory::new();
        history.add_query(" apple ");
        history.add_query("banana");
        history.add_query("apple");
        history.add_query("   ");

        assert_eq!(history.queries(), &["banana", "apple"]);
    }

    #[test]
    fn test_query_cap() {
        let mut history = SearchHistory::new();
        for i in 0..15 {
            history.add_query(&format!("q{}", i));
        }
        assert_eq!(history.queries().len(), MAX_SEARCH_HISTORY);
        assert_eq!(history.queries()[0], "q14");
        assert_eq!(history.queries()[9], "q5");

        history.clear_queries();
        assert!(history.queries().is_empty());
    }

    #[test]
    fn test_recent_food_moves_to_front() {
        let mut history = SearchHistory::new();
        history.add_recent_food(food("a", "Apple"));
        history.add_recent_food(food("b", "Bread"));
        history.add_recent_food(food("a", "Apple"));

        let ids: Vec<&str> = history.recent_foods().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_recent_food_cap() {
        let mut history = SearchHistory::new();
        for i in 0..25 {
            history.add_recent_food(food(&format!("f{}", i), "x"));
        }
        assert_eq!(history.recent_foods().len(), MAX_RECENT_FOODS);
        assert_eq!(history.recent_foods()[0].id, "f24");
    }

    #[test]
    fn test_find_food() {
        let mut history = SearchHistory::new();
        history.add_recent_food(food("food_1", "Greek Yogurt"));
        history.add_recent_food(food("food_2", "Granola"));

        assert_eq!(history.find_food("food_1").unwrap().name, "Greek Yogurt");
        assert_eq!(history.find_food("granola").unwrap().id, "food_2");
        assert!(history.find_food("pizza").is_none());
    }

    #[test]
    fn test_from_parts_applies_caps() {
        let queries = (0..12).map(|i| format!("q{}", i)).collect();
        let history = SearchHistory::from_parts(queries, vec![food("a", "A")]);
        assert_eq!(history.queries().len(), MAX_SEARCH_HISTORY);
        assert_eq!(history.recent_foods().len(), 1);
    }
}
