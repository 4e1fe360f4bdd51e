//! HTTP client for the nutrition lookup service.

use nutrilog_core::edamam::{find_food_item, to_food_items, ParserResponse};
use nutrilog_core::FoodItem;

use crate::config::EdamamConfig;

#[derive(Debug)]
pub enum LookupError {
    /// app_id / app_key missing
    NotConfigured,
    HttpError(String),
    /// Non-success status from the service
    Status(u16),
    DecodeError(String),
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::NotConfigured => write!(
                f,
                "Food lookup not configured. Set edamam.app_id and edamam.app_key in config \
                 or NUTRILOG_EDAMAM_APP_ID / NUTRILOG_EDAMAM_APP_KEY."
            ),
            LookupError::HttpError(e) => write!(f, "Food lookup request failed: {}", e),
            LookupError::Status(code) => write!(f, "Food lookup returned status {}", code),
            LookupError::DecodeError(e) => write!(f, "Could not read food lookup response: {}", e),
        }
    }
}

impl std::error::Error for LookupError {}

/// The kinds of parser queries the CLI sends.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupRequest<'a> {
    /// Free-text ingredient search, optionally limited to one food category
    Search {
        query: &'a str,
        category: Option<&'a str>,
    },
    /// Random sample of common foods
    Popular,
    /// One food by its lookup id
    Details { food_id: &'a str },
}

impl LookupRequest<'_> {
    /// Query parameters, credentials excluded.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("nutrition-type", "logging".to_string())];
        match self {
            LookupRequest::Search { query, category } => {
                params.push(("ingr", query.to_string()));
                if let Some(category) = category {
                    params.push(("category", category.to_string()));
                }
            }
            LookupRequest::Popular => {
                params.push(("ingr", "popular".to_string()));
                params.push(("random", "true".to_string()));
            }
            LookupRequest::Details { food_id } => {
                params.push(("food-id", food_id.to_string()));
            }
        }
        params
    }
}

pub struct FoodLookupClient {
    client: reqwest::Client,
    base_url: String,
    app_id: String,
    app_key: String,
}

impl FoodLookupClient {
    pub fn from_config(config: &EdamamConfig) -> Result<Self, LookupError> {
        match (&config.app_id.value, &config.app_key.value) {
            (Some(app_id), Some(app_key)) => Ok(Self {
                client: reqwest::Client::new(),
                base_url: config.base_url.value.clone(),
                app_id: app_id.clone(),
                app_key: app_key.clone(),
            }),
            _ => Err(LookupError::NotConfigured),
        }
    }

    /// Searches foods by free-text ingredient query.
    pub async fn search(
        &self,
        query: &str,
        category: Option<&str>,
    ) -> Result<Vec<FoodItem>, LookupError> {
        tracing::info!(query, category, "searching foods");
        let response = self.fetch(&LookupRequest::Search { query, category }).await?;
        let foods = to_food_items(&response);
        tracing::debug!(query, results = foods.len(), "search finished");
        Ok(foods)
    }

    pub async fn popular(&self) -> Result<Vec<FoodItem>, LookupError> {
        let response = self.fetch(&LookupRequest::Popular).await?;
        Ok(to_food_items(&response))
    }

    /// Looks up a single food by id. `None` when the service does not know it.
    pub async fn food_details(&self, food_id: &str) -> Result<Option<FoodItem>, LookupError> {
        tracing::info!(food_id, "fetching food details");
        let response = self.fetch(&LookupRequest::Details { food_id }).await?;
        Ok(find_food_item(&response, food_id))
    }

    async fn fetch(&self, request: &LookupRequest<'_>) -> Result<ParserResponse, LookupError> {
        let mut params = vec![
            ("app_id", self.app_id.clone()),
            ("app_key", self.app_key.clone()),
        ];
        params.extend(request.params());

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| LookupError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::HttpError(e.to_string()))?;

        parse_response(&body)
    }
}

fn parse_response(body: &str) -> Result<ParserResponse, LookupError> {
    serde_json::from_str(body).map_err(|e| LookupError::DecodeError(e.to_string()))
}
