use nutrilog_core::{FoodItem, SearchHistory};
use sqlx::SqlitePool;

/// Persists search queries and recently seen foods.
pub struct HistoryRepository {
    pool: SqlitePool,
}

impl HistoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn load(&self) -> Result<SearchHistory, sqlx::Error> {
        let queries: Vec<(String,)> =
            sqlx::query_as("SELECT query FROM search_history ORDER BY position")
                .fetch_all(&self.pool)
                .await?;

        let foods: Vec<(String,)> =
            sqlx::query_as("SELECT food_json FROM recent_foods ORDER BY position")
                .fetch_all(&self.pool)
                .await?;

        let mut recent = Vec::with_capacity(foods.len());
        for (json,) in foods {
            match serde_json::from_str::<FoodItem>(&json) {
                Ok(food) => recent.push(food),
                Err(e) => tracing::warn!("Skipping unreadable recent food: {}", e),
            }
        }

        Ok(SearchHistory::from_parts(
            queries.into_iter().map(|(q,)| q).collect(),
            recent,
        ))
    }

    pub async fn save(&self, history: &SearchHistory) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM search_history")
            .execute(&mut *tx)
            .await?;
        for (position, query) in history.queries().iter().enumerate() {
            sqlx::query("INSERT INTO search_history (position, query) VALUES (?, ?)")
                .bind(position as i64)
                .bind(query)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM recent_foods")
            .execute(&mut *tx)
            .await?;
        for (position, food) in history.recent_foods().iter().enumerate() {
            let json = serde_json::to_string(food)
                .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
            sqlx::query("INSERT INTO recent_foods (position, food_id, food_json) VALUES (?, ?, ?)")
                .bind(position as i64)
                .bind(&food.id)
                .bind(json)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
