mod config_cmd;
mod food;
pub mod log;

pub use config_cmd::ConfigCommand;
pub use food::FoodCommand;
pub use log::LogCommand;

use clap::ValueEnum;
use nutrilog_core::date;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Turns a `--date` argument into a log key.
///
/// Accepts `YYYY-MM-DD`, `today`, `yesterday` and `tomorrow`; no argument
/// means today.
pub fn resolve_date(arg: Option<&str>) -> Result<String, Box<dyn std::error::Error>> {
    let today = date::today();
    let resolved = match arg.map(|s| s.trim().to_lowercase()) {
        None => today,
        Some(s) if s == "today" => today,
        Some(s) if s == "yesterday" => date::shift_date(&today, -1)?,
        Some(s) if s == "tomorrow" => date::shift_date(&today, 1)?,
        Some(s) => date::normalize_date(&s)?,
    };
    Ok(resolved)
}
