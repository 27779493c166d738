//! Spoonacular recipe search and detail client.

use std::sync::Arc;
use std::time::Duration;

use dishcast_core::ApiConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{build_client, read_json, ServiceError};

/// One entry of a recipe list (complexSearch `results[]` or findByIngredients).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSearchResponse {
    #[serde(default)]
    pub results: Vec<RecipeSummary>,
    #[serde(default)]
    pub total_results: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub original: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionStep {
    #[serde(default)]
    pub number: Option<u32>,
    pub step: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionBlock {
    #[serde(default)]
    pub steps: Vec<InstructionStep>,
}

/// Full recipe record from `/{id}/information`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ready_in_minutes: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub extended_ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub analyzed_instructions: Vec<InstructionBlock>,
}

impl RecipeDetail {
    /// Steps of the first instruction block; empty when there is none.
    pub fn steps(&self) -> &[InstructionStep] {
        self.analyzed_instructions
            .first()
            .map(|block| block.steps.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone)]
pub struct RecipeClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    results: u32,
}

impl RecipeClient {
    pub fn new(api: &ApiConfig, results: u32, timeout: Duration) -> Result<Self, ServiceError> {
        Ok(Self {
            client: Arc::new(build_client(timeout)?),
            base_url: api.base_url.trim_end_matches('/').to_string(),
            api_key: api.key().to_string(),
            results,
        })
    }

    /// Free-text recipe search.
    #[instrument(skip(self), level = "info")]
    pub async fn search(&self, query: &str) -> Result<RecipeSearchResponse, ServiceError> {
        let url = format!("{}/complexSearch", self.base_url);
        let number = self.results.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("query", query),
                ("number", number.as_str()),
            ])
            .send()
            .await?;

        let found: RecipeSearchResponse = read_json(response).await?;
        tracing::debug!("Recipe search returned {} results", found.results.len());
        Ok(found)
    }

    /// Recipes using a comma-separated list of ingredients.
    #[instrument(skip(self), level = "info")]
    pub async fn find_by_ingredients(
        &self,
        ingredients: &str,
    ) -> Result<Vec<RecipeSummary>, ServiceError> {
        let url = format!("{}/findByIngredients", self.base_url);
        let number = self.results.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("ingredients", ingredients),
                ("number", number.as_str()),
            ])
            .send()
            .await?;

        read_json(response).await
    }

    /// Full record for one recipe.
    #[instrument(skip(self), level = "info")]
    pub async fn recipe(&self, id: u64) -> Result<RecipeDetail, ServiceError> {
        let url = format!("{}/{}/information", self.base_url, id);
        let response = self
            .client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_deserializes_camel_case() {
        let detail: RecipeDetail = serde_json::from_value(serde_json::json!({
            "id": 715538,
            "title": "Bruschetta",
            "image": "https://img.example/715538.jpg",
            "readyInMinutes": 35,
            "servings": 6,
            "extendedIngredients": [{"original": "2 tomatoes", "id": 1}],
            "analyzedInstructions": [{"name": "", "steps": [{"number": 1, "step": "Toast bread."}]}]
        }))
        .unwrap();

        assert_eq!(detail.ready_in_minutes, Some(35));
        assert_eq!(detail.extended_ingredients[0].original, "2 tomatoes");
        assert_eq!(detail.steps()[0].step, "Toast bread.");
    }

    #[test]
    fn test_detail_without_instructions_has_no_steps() {
        let detail: RecipeDetail = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Mystery",
            "analyzedInstructions": []
        }))
        .unwrap();
        assert!(detail.steps().is_empty());
        assert!(detail.image.is_none());
    }

    #[test]
    fn test_search_response_tolerates_missing_results() {
        let found: RecipeSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(found.results.is_empty());
    }
}
