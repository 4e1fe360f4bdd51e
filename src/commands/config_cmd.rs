use clap::{Args, Subcommand};

use super::OutputFormat;
use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!(
                            "database_path: {}",
                            config.database_path.value.display()
                        );
                        println!("  source: {}", config.database_path.source);
                        println!();

                        println!("default_meal: {}", config.default_meal.value);
                        println!("  source: {}", config.default_meal.source);
                        println!();

                        println!(
                            "food lookup: {}",
                            if config.edamam.is_configured() {
                                "configured"
                            } else {
                                "not configured"
                            }
                        );
                        println!("edamam.base_url: {}", config.edamam.base_url.value);
                        println!("  source: {}", config.edamam.base_url.source);
                        println!();

                        println!(
                            "edamam.app_id: {}",
                            config.edamam.app_id.value.as_deref().unwrap_or("(not set)")
                        );
                        println!("  source: {}", config.edamam.app_id.source);
                        println!();

                        println!(
                            "edamam.app_key: {}",
                            if config.edamam.app_key.value.is_some() {
                                "(set)"
                            } else {
                                "(not set)"
                            }
                        );
                        println!("  source: {}", config.edamam.app_key.source);
                    }
                }
                Ok(())
            }
        }
    }
}
