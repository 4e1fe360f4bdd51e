use clap::{Args, Subcommand};
use nutrilog_core::date;
use nutrilog_core::{
    DailyFoodLog, FoodEntryUpdate, FoodItem, FoodLogQuery, FoodLogStore, MealTime, Nutrition,
};

use super::{resolve_date, OutputFormat};
use crate::config::Config;
use crate::db::{FoodLogRepository, HistoryRepository};
use crate::lookup::FoodLookupClient;

/// Repositories needed for log commands
pub struct LogRepos<'a> {
    pub food_log: &'a FoodLogRepository,
    pub history: &'a HistoryRepository,
}

#[derive(Args)]
pub struct LogCommand {
    #[command(subcommand)]
    pub command: LogSubcommand,
}

/// Serving parameters shared by `add` and `quick`
#[derive(Args, Clone)]
pub struct ServingArgs {
    /// Date (YYYY-MM-DD, today, yesterday, tomorrow), defaults to today
    #[arg(long, short)]
    pub date: Option<String>,

    /// Meal (breakfast, lunch, dinner, snack), defaults to config default_meal
    #[arg(long, short)]
    pub meal: Option<MealTime>,

    /// Number of servings
    #[arg(long, short, default_value = "1", allow_negative_numbers = true)]
    pub servings: f64,

    /// Serving unit label, defaults to the food's first measure
    #[arg(long, short)]
    pub unit: Option<String>,

    /// Notes for this entry
    #[arg(long, short)]
    pub notes: Option<String>,
}

#[derive(Subcommand)]
pub enum LogSubcommand {
    /// Log a food by id or name; ids not in recent history are looked up
    Add {
        /// Food id or name from `nutrilog food recent`, or a lookup food id
        food: String,

        #[command(flatten)]
        serving: ServingArgs,
    },

    /// Log a food by entering its nutrition per serving
    Quick {
        /// Food name
        #[arg(long)]
        name: String,

        /// Calories per serving
        #[arg(long)]
        calories: f64,

        /// Protein per serving (g)
        #[arg(long, default_value = "0")]
        protein: f64,

        /// Carbohydrates per serving (g)
        #[arg(long, default_value = "0")]
        carbs: f64,

        /// Fat per serving (g)
        #[arg(long, default_value = "0")]
        fat: f64,

        /// Fiber per serving (g)
        #[arg(long, default_value = "0")]
        fiber: f64,

        #[command(flatten)]
        serving: ServingArgs,
    },

    /// Show the food log for a day
    Show {
        /// Date (YYYY-MM-DD, today, yesterday, tomorrow), defaults to today
        #[arg(long, short)]
        date: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show daily totals over a date range
    History {
        /// Start date, defaults to 7 days before --to
        #[arg(long)]
        from: Option<String>,

        /// End date, defaults to today
        #[arg(long)]
        to: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Remove an entry
    Remove {
        /// Entry id
        entry_id: String,

        #[arg(long, short)]
        date: Option<String>,
    },

    /// Change fields of an entry (nutrition is not recalculated)
    Update {
        /// Entry id
        entry_id: String,

        #[arg(long, short)]
        date: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        servings: Option<f64>,

        #[arg(long)]
        unit: Option<String>,

        /// New notes (empty string clears)
        #[arg(long)]
        notes: Option<String>,

        #[arg(long)]
        calories: Option<f64>,

        #[arg(long)]
        protein: Option<f64>,

        #[arg(long)]
        carbs: Option<f64>,

        #[arg(long)]
        fat: Option<f64>,

        #[arg(long)]
        fiber: Option<f64>,
    },

    /// Change an entry's serving count and recalculate its nutrition
    Rescale {
        /// Entry id
        entry_id: String,

        #[arg(long, short)]
        servings: f64,

        #[arg(long, short)]
        date: Option<String>,
    },

    /// Move an entry to another meal
    Move {
        /// Entry id
        entry_id: String,

        #[arg(long, short)]
        meal: MealTime,

        #[arg(long, short)]
        date: Option<String>,
    },

    /// Remove every entry of a day
    Clear {
        #[arg(long, short)]
        date: Option<String>,
    },
}

impl LogCommand {
    pub async fn run(
        &self,
        repos: LogRepos<'_>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            LogSubcommand::Add { food, serving } => {
                let mut history = repos.history.load().await?;
                let item = match history.find_food(food).cloned() {
                    Some(item) => item,
                    None => lookup_food(food, config).await?,
                };

                self.log_serving(item.clone(), serving, &repos, config)
                    .await?;

                history.add_recent_food(item);
                repos.history.save(&history).await?;
                Ok(())
            }
            LogSubcommand::Quick {
                name,
                calories,
                protein,
                carbs,
                fat,
                fiber,
                serving,
            } => {
                let item = FoodItem::new(
                    format!("custom:{}", name.trim().to_lowercase()),
                    name.trim(),
                    Nutrition::new(*calories, *protein, *carbs, *fat, *fiber),
                );
                self.log_serving(item, serving, &repos, config).await
            }
            LogSubcommand::Show { date, format } => {
                let date = resolve_date(date.as_deref())?;
                let store = open_day(repos.food_log, &date).await?;
                print_day(&store.current_daily_log(), format)
            }
            LogSubcommand::History { from, to, format } => {
                self.show_history(from.as_deref(), to.as_deref(), format, &repos)
                    .await
            }
            LogSubcommand::Remove { entry_id, date } => {
                let date = resolve_date(date.as_deref())?;
                let mut store = open_day(repos.food_log, &date).await?;
                let removed = store.try_remove_food_entry(&date, entry_id)?;
                save_day(repos.food_log, &store, &date).await?;

                println!("Removed {} from {} on {}", removed.food_name, removed.meal_time, date);
                print_totals(&store.daily_log_by_date(&date));
                Ok(())
            }
            LogSubcommand::Update {
                entry_id,
                date,
                name,
                servings,
                unit,
                notes,
                calories,
                protein,
                carbs,
                fat,
                fiber,
            } => {
                let updates = FoodEntryUpdate {
                    food_name: name.clone(),
                    serving_size: *servings,
                    serving_unit: unit.clone(),
                    calories: *calories,
                    protein: *protein,
                    carbs: *carbs,
                    fat: *fat,
                    fiber: *fiber,
                    notes: notes.clone(),
                    image: None,
                };
                if updates.is_empty() {
                    return Err("Nothing to update. Pass at least one field to change.".into());
                }
                if let Some(size) = servings {
                    validate_servings(*size)?;
                }

                let date = resolve_date(date.as_deref())?;
                let mut store = open_day(repos.food_log, &date).await?;
                let entry = store.try_update_food_entry(&date, entry_id, &updates)?;
                save_day(repos.food_log, &store, &date).await?;

                println!("Updated entry:");
                println!("  {}", entry);
                print_totals(&store.daily_log_by_date(&date));
                Ok(())
            }
            LogSubcommand::Rescale {
                entry_id,
                servings,
                date,
            } => {
                validate_servings(*servings)?;
                let date = resolve_date(date.as_deref())?;
                let mut store = open_day(repos.food_log, &date).await?;
                let entry = store.try_rescale_food_entry(&date, entry_id, *servings)?;
                save_day(repos.food_log, &store, &date).await?;

                println!("Rescaled entry:");
                println!("  {}", entry);
                print_totals(&store.daily_log_by_date(&date));
                Ok(())
            }
            LogSubcommand::Move {
                entry_id,
                meal,
                date,
            } => {
                let date = resolve_date(date.as_deref())?;
                let mut store = open_day(repos.food_log, &date).await?;
                let entry = store.try_move_food_entry(&date, entry_id, *meal)?;
                save_day(repos.food_log, &store, &date).await?;

                println!("Moved {} to {}", entry.food_name, meal.label());
                Ok(())
            }
            LogSubcommand::Clear { date } => {
                let date = resolve_date(date.as_deref())?;
                let mut store = open_day(repos.food_log, &date).await?;
                let count = store.daily_log_by_date(&date).entry_count();
                store.clear_day_log(&date);
                save_day(repos.food_log, &store, &date).await?;

                println!("Cleared {} entry(ies) from {}", count, date);
                Ok(())
            }
        }
    }

    async fn log_serving(
        &self,
        food: FoodItem,
        serving: &ServingArgs,
        repos: &LogRepos<'_>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let date = resolve_date(serving.date.as_deref())?;
        let meal = serving.meal.unwrap_or(config.default_meal.value);

        let mut store = open_day(repos.food_log, &date).await?;
        let entry_id = commit_serving(&mut store, food, meal, serving)?;
        save_day(repos.food_log, &store, &date).await?;

        let day = store.current_daily_log();
        if let Some((_, entry)) = day.find(&entry_id) {
            println!("Logged to {} on {}:", meal.label(), date);
            println!("  {}", entry);
            println!();
            println!("Entry ID: {}", entry.id);
        }
        print_totals(&day);
        Ok(())
    }

    async fn show_history(
        &self,
        from: Option<&str>,
        to: Option<&str>,
        format: &OutputFormat,
        repos: &LogRepos<'_>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let to_date = resolve_date(to)?;
        let from_date = match from {
            Some(_) => resolve_date(from)?,
            None => date::shift_date(&to_date, -7)?,
        };

        let days = repos.food_log.list_range(&from_date, &to_date).await?;
        if days.is_empty() {
            println!("No food logged for {} to {}", from_date, to_date);
            return Ok(());
        }

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&days)?);
            }
            OutputFormat::Text => {
                println!(
                    "{:10}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}  {:>5}",
                    "date", "calories", "protein", "carbs", "fat", "fiber", "items"
                );
                for day in &days {
                    let t = day.totals();
                    println!(
                        "{:10}  {:>8.0}  {:>8.1}  {:>8.1}  {:>8.1}  {:>8.1}  {:>5}",
                        day.date(),
                        t.calories,
                        t.protein,
                        t.carbs,
                        t.fat,
                        t.fiber,
                        day.entry_count()
                    );
                }
                println!("\n{} day(s)", days.len());
            }
        }
        Ok(())
    }
}

/// Fetches a food that is not in recent history by its lookup id.
async fn lookup_food(food: &str, config: &Config) -> Result<FoodItem, Box<dyn std::error::Error>> {
    let not_found = || {
        format!(
            "Food not found: {}. Search for it first with 'nutrilog food search'.",
            food
        )
    };
    if !config.edamam.is_configured() {
        return Err(not_found().into());
    }

    let client = FoodLookupClient::from_config(&config.edamam)?;
    match client.food_details(food).await? {
        Some(item) => Ok(item),
        None => Err(not_found().into()),
    }
}

/// Loads one day from the database into a fresh store positioned on it.
async fn open_day(repo: &FoodLogRepository, date: &str) -> Result<FoodLogStore, sqlx::Error> {
    let entries = repo.load_day(date).await?;
    let mut store = FoodLogStore::with_date(date);
    store.restore_day(date, entries);
    store.set_current_date(date);
    Ok(store)
}

async fn save_day(
    repo: &FoodLogRepository,
    store: &FoodLogStore,
    date: &str,
) -> Result<(), sqlx::Error> {
    repo.save_day(&store.daily_log_by_date(date)).await
}

fn validate_servings(servings: f64) -> Result<(), String> {
    if servings.is_finite() && servings > 0.0 {
        Ok(())
    } else {
        Err(format!(
            "Invalid serving size '{}'. It must be greater than 0.",
            servings
        ))
    }
}

/// Drives one logging session from start to commit on the store's current date.
fn commit_serving(
    store: &mut FoodLogStore,
    food: FoodItem,
    meal: MealTime,
    serving: &ServingArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    validate_servings(serving.servings)?;

    store.start_logging(food, Some(meal));
    store.set_serving_size(serving.servings);
    if let Some(unit) = &serving.unit {
        store.set_serving_unit(unit.as_str());
    }
    if let Some(notes) = &serving.notes {
        store.set_notes(notes.as_str());
    }

    Ok(store.try_log_food()?)
}

fn print_totals(day: &DailyFoodLog) {
    println!();
    println!("Day total ({}): {}", day.date(), day.totals());
}

fn print_day(day: &DailyFoodLog, format: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(day)?);
        }
        OutputFormat::Text => {
            println!("{}", day.date());
            println!("{}", "=".repeat(10));

            for meal in MealTime::ALL {
                let summary = day.meal_summary(meal);
                println!();
                println!(
                    "{} ({}) - {} cal, {} item(s)",
                    meal.label(),
                    meal.time_range(),
                    summary.nutrition.calories.round(),
                    summary.count
                );
                for entry in day.bucket(meal) {
                    println!("  {}", entry);
                    println!("      id: {}", entry.id);
                    if let Some(notes) = &entry.notes {
                        println!("      notes: {}", notes);
                    }
                }
            }

            print_totals(day);
        }
    }
    Ok(())
}
