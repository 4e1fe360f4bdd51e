use chrono::{DateTime, Utc};
use nutrilog_core::{DailyFoodLog, FoodLogEntry, MealTime, Nutrition};
use sqlx::SqlitePool;

/// Persists whole days of the food log.
///
/// The store stays the only place entries are built or changed; this
/// repository only snapshots a day after a command and restores it before
/// the next one.
pub struct FoodLogRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: String,
    date: String,
    meal_time: String,
    food_id: String,
    food_name: String,
    serving_size: f64,
    serving_unit: String,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    fiber: f64,
    logged_at: String,
    notes: Option<String>,
    image: Option<String>,
}

impl EntryRow {
    fn into_entry(self) -> Result<FoodLogEntry, sqlx::Error> {
        let meal_time: MealTime = self
            .meal_time
            .parse()
            .map_err(|e: String| sqlx::Error::Decode(e.into()))?;

        Ok(FoodLogEntry {
            id: self.id,
            food_id: self.food_id,
            food_name: self.food_name,
            meal_time,
            serving_size: self.serving_size,
            serving_unit: self.serving_unit,
            nutrition: Nutrition::new(self.calories, self.protein, self.carbs, self.fat, self.fiber),
            logged_at: DateTime::parse_from_rfc3339(&self.logged_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            notes: self.notes,
            image: self.image,
        })
    }
}

impl FoodLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Entries of one day in bucket order, then logging order.
    pub async fn load_day(&self, date: &str) -> Result<Vec<FoodLogEntry>, sqlx::Error> {
        let rows: Vec<EntryRow> =
            sqlx::query_as("SELECT * FROM food_log_entries WHERE date = ? ORDER BY position")
                .bind(date)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(EntryRow::into_entry).collect()
    }

    /// Replaces everything stored for the log's date.
    pub async fn save_day(&self, log: &DailyFoodLog) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM food_log_entries WHERE date = ?")
            .bind(log.date())
            .execute(&mut *tx)
            .await?;

        for (position, entry) in log.entries().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO food_log_entries (
                    id, date, meal_time, position, food_id, food_name, serving_size,
                    serving_unit, calories, protein, carbs, fat, fiber, logged_at, notes, image
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&entry.id)
            .bind(log.date())
            .bind(entry.meal_time.to_string())
            .bind(position as i64)
            .bind(&entry.food_id)
            .bind(&entry.food_name)
            .bind(entry.serving_size)
            .bind(&entry.serving_unit)
            .bind(entry.nutrition.calories)
            .bind(entry.nutrition.protein)
            .bind(entry.nutrition.carbs)
            .bind(entry.nutrition.fat)
            .bind(entry.nutrition.fiber)
            .bind(entry.logged_at.to_rfc3339())
            .bind(&entry.notes)
            .bind(&entry.image)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::info!(date = log.date(), entries = log.entry_count(), "day saved");
        Ok(())
    }

    /// Rebuilt logs for every date in `[from, to]` that has entries.
    pub async fn list_range(&self, from: &str, to: &str) -> Result<Vec<DailyFoodLog>, sqlx::Error> {
        let rows: Vec<EntryRow> = sqlx::query_as(
            "SELECT * FROM food_log_entries WHERE date >= ? AND date <= ? ORDER BY date, position",
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        let mut days: Vec<(String, Vec<FoodLogEntry>)> = Vec::new();
        for row in rows {
            let date = row.date.clone();
            let entry = row.into_entry()?;
            if let Some((d, entries)) = days.last_mut() {
                if *d == date {
                    entries.push(entry);
                    continue;
                }
            }
            days.push((date, vec![entry]));
        }

        Ok(days
            .into_iter()
            .map(|(date, entries)| DailyFoodLog::from_entries(date, entries))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use nutrilog_core::{FoodItem, FoodLogQuery, FoodLogStore};
    use tempfile::TempDir;

    struct TestContext {
        repo: FoodLogRepository,
        _temp_dir: TempDir,
    }

    async fn setup() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let pool = init_db(&db_path).await.unwrap();
        TestContext {
            repo: FoodLogRepository::new(pool),
            _temp_dir: temp_dir,
        }
    }

    fn commit(store: &mut FoodLogStore, name: &str, calories: f64, meal: MealTime) -> String {
        let food = FoodItem::new(
            format!("food_{}", name),
            name,
            Nutrition::new(calories, 2.0, 3.0, 1.0, 0.5),
        );
        store.start_logging(food, Some(meal));
        store.set_notes("note");
        store.try_log_food().unwrap()
    }

    #[tokio::test]
    async fn test_save_and_load_day() {
        let ctx = setup().await;
        let mut store = FoodLogStore::with_date("2025-01-15");
        commit(&mut store, "toast", 120.0, MealTime::Breakfast);
        commit(&mut store, "soup", 200.0, MealTime::Dinner);
        commit(&mut store, "jam", 50.0, MealTime::Breakfast);

        let day = store.daily_log_by_date("2025-01-15");
        ctx.repo.save_day(&day).await.unwrap();

        let entries = ctx.repo.load_day("2025-01-15").await.unwrap();
        let restored = DailyFoodLog::from_entries("2025-01-15", entries);

        assert_eq!(restored.bucket(MealTime::Breakfast), day.bucket(MealTime::Breakfast));
        assert_eq!(restored.bucket(MealTime::Dinner), day.bucket(MealTime::Dinner));
        assert_eq!(restored.totals(), day.totals());
    }

    #[tokio::test]
    async fn test_save_day_replaces_previous_rows() {
        let ctx = setup().await;
        let mut store = FoodLogStore::with_date("2025-01-15");
        let id = commit(&mut store, "toast", 120.0, MealTime::Breakfast);
        ctx.repo
            .save_day(&store.daily_log_by_date("2025-01-15"))
            .await
            .unwrap();

        store.remove_food_entry("2025-01-15", &id);
        ctx.repo
            .save_day(&store.daily_log_by_date("2025-01-15"))
            .await
            .unwrap();

        assert!(ctx.repo.load_day("2025-01-15").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_unknown_day_is_empty() {
        let ctx = setup().await;
        assert!(ctx.repo.load_day("1999-01-01").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_range_groups_by_date() {
        let ctx = setup().await;
        let mut store = FoodLogStore::with_date("2025-01-14");
        commit(&mut store, "a", 100.0, MealTime::Lunch);
        store.set_current_date("2025-01-15");
        commit(&mut store, "b", 200.0, MealTime::Lunch);
        commit(&mut store, "c", 50.0, MealTime::Snack);
        store.set_current_date("2025-01-20");
        commit(&mut store, "d", 10.0, MealTime::Snack);

        for date in ["2025-01-14", "2025-01-15", "2025-01-20"] {
            ctx.repo
                .save_day(&store.daily_log_by_date(date))
                .await
                .unwrap();
        }

        let days = ctx.repo.list_range("2025-01-14", "2025-01-16").await.unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date(), "2025-01-14");
        assert_eq!(days[0].total_calories(), 100.0);
        assert_eq!(days[1].date(), "2025-01-15");
        assert_eq!(days[1].total_calories(), 250.0);
    }
}
