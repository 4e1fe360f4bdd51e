use clap::{Args, Subcommand};
use nutrilog_core::edamam::{calories_for_serving, common_measures};
use nutrilog_core::{FoodItem, SearchHistory};

use super::OutputFormat;
use crate::config::Config;
use crate::db::HistoryRepository;
use crate::lookup::FoodLookupClient;

#[derive(Args)]
pub struct FoodCommand {
    #[command(subcommand)]
    pub command: FoodSubcommand,
}

#[derive(Subcommand)]
pub enum FoodSubcommand {
    /// Search the nutrition database
    Search {
        /// What to search for (e.g. "greek yogurt")
        query: String,

        /// Limit results to one food category (e.g. generic-foods)
        #[arg(long)]
        category: Option<String>,

        /// Maximum number of results to show and remember
        #[arg(long, short, default_value = "10")]
        limit: usize,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a sample of popular foods
    Popular {
        /// Maximum number of results to show and remember
        #[arg(long, short, default_value = "10")]
        limit: usize,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List recently seen foods (usable with `log add`)
    Recent {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List past search queries
    History,
}

impl FoodCommand {
    pub async fn run(
        &self,
        history_repo: &HistoryRepository,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            FoodSubcommand::Search {
                query,
                category,
                limit,
                format,
            } => {
                let client = FoodLookupClient::from_config(&config.edamam)?;
                let foods = client.search(query, category.as_deref()).await?;
                let shown: Vec<FoodItem> = foods.into_iter().take(*limit).collect();

                let mut history = history_repo.load().await?;
                history.add_query(query);
                remember(&mut history, &shown);
                history_repo.save(&history).await?;

                if shown.is_empty() {
                    println!("No foods found for '{}'", query);
                    return Ok(());
                }
                print_foods(&shown, format)
            }
            FoodSubcommand::Popular { limit, format } => {
                let client = FoodLookupClient::from_config(&config.edamam)?;
                let shown: Vec<FoodItem> =
                    client.popular().await?.into_iter().take(*limit).collect();

                let mut history = history_repo.load().await?;
                remember(&mut history, &shown);
                history_repo.save(&history).await?;

                if shown.is_empty() {
                    println!("No popular foods returned");
                    return Ok(());
                }
                print_foods(&shown, format)
            }
            FoodSubcommand::Recent { format } => {
                let history = history_repo.load().await?;
                if history.recent_foods().is_empty() {
                    println!("No recent foods. Use 'nutrilog food search <query>' first.");
                    return Ok(());
                }
                print_foods(history.recent_foods(), format)
            }
            FoodSubcommand::History => {
                let history = history_repo.load().await?;
                if history.queries().is_empty() {
                    println!("No searches yet.");
                }
                for query in history.queries() {
                    println!("{}", query);
                }
                Ok(())
            }
        }
    }
}

/// Oldest first so the top result ends up at the front.
fn remember(history: &mut SearchHistory, foods: &[FoodItem]) {
    for food in foods.iter().rev() {
        history.add_recent_food(food.clone());
    }
}

/// Common measures of a food with the calories of one full measure.
///
/// Lookup nutrition is per 100g.
fn measure_summary(food: &FoodItem) -> Vec<String> {
    common_measures(&food.measures)
        .into_iter()
        .map(|m| {
            format!(
                "{} ({}g, {} cal)",
                m.label,
                m.weight.round(),
                calories_for_serving(food.nutrition.calories, m.weight, 100.0)
            )
        })
        .collect()
}

fn print_foods(foods: &[FoodItem], format: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(foods)?);
        }
        OutputFormat::Text => {
            for food in foods {
                println!("{}", food);
                let measures = measure_summary(food);
                if !measures.is_empty() {
                    println!("    measures: {}", measures.join(", "));
                }
            }
            println!("\n{} food(s)", foods.len());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutrilog_core::{Measure, Nutrition};

    #[test]
    fn test_measure_summary_lists_common_measures() {
        let apple = FoodItem::new("food_apple", "Apple", Nutrition::new(52.0, 0.0, 14.0, 0.0, 2.0))
            .with_measures(vec![
                Measure::new("Whole", 182.0),
                Measure::new("Handful", 30.0),
                Measure::new("Cup", 125.0),
            ]);

        assert_eq!(
            measure_summary(&apple),
            vec!["Whole (182g, 95 cal)", "Cup (125g, 65 cal)"]
        );
    }

    #[test]
    fn test_remember_keeps_top_result_first() {
        let mut history = SearchHistory::new();
        let foods = vec![
            FoodItem::new("a", "First", Nutrition::default()),
            FoodItem::new("b", "Second", Nutrition::default()),
        ];

        remember(&mut history, &foods);
        assert_eq!(history.recent_foods()[0].id, "a");
        assert_eq!(history.recent_foods()[1].id, "b");
    }
}
