//! Gemini mood-based recipe suggestions.
//!
//! The model is asked for JSON but answers with free text, so the payload is
//! parsed loosely: code fences and surrounding prose are stripped, and a few
//! common key spellings are accepted.

use std::sync::Arc;
use std::time::Duration;

use dishcast_core::ApiConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::error::{build_client, read_json, ServiceError};

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

/// One suggested dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodSuggestion {
    pub name: String,
    pub description: String,
}

const NAME_KEYS: &[&str] = &["name", "recipe_name", "recipeName", "title"];
const DESCRIPTION_KEYS: &[&str] = &["description", "brief_description", "briefDescription", "desc"];
const LIST_KEYS: &[&str] = &["recipes", "suggestions", "dishes"];

/// Extract suggestions from a generateContent response.
pub fn parse_mood_suggestions(
    response: &GenerateContentResponse,
) -> Result<Vec<MoodSuggestion>, ServiceError> {
    let text = response
        .first_text()
        .ok_or_else(|| ServiceError::Parse("response has no candidate text".into()))?;
    parse_suggestion_text(text)
}

/// Parse the model's text into suggestions. Fails when nothing usable is found.
pub fn parse_suggestion_text(text: &str) -> Result<Vec<MoodSuggestion>, ServiceError> {
    let value = parse_loose_json(text)
        .ok_or_else(|| ServiceError::Parse("suggestion text is not JSON".into()))?;

    let items: &[Value] = match &value {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => LIST_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .map(Vec::as_slice)
            .unwrap_or_else(|| std::slice::from_ref(&value)),
        _ => &[],
    };

    let suggestions: Vec<MoodSuggestion> = items.iter().filter_map(suggestion_from).collect();

    if suggestions.is_empty() {
        return Err(ServiceError::Parse("no suggestions with a name".into()));
    }
    Ok(suggestions)
}

fn suggestion_from(item: &Value) -> Option<MoodSuggestion> {
    let obj = item.as_object()?;
    let pick = |keys: &[&str]| {
        keys.iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Some(MoodSuggestion {
        name: pick(NAME_KEYS)?,
        description: pick(DESCRIPTION_KEYS).unwrap_or_default(),
    })
}

fn parse_loose_json(text: &str) -> Option<Value> {
    let trimmed = strip_code_fence(text.trim());
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    // Prose around the payload: try each bracketed span in turn.
    trimmed
        .char_indices()
        .filter(|(_, c)| matches!(c, '[' | '{'))
        .find_map(|(start, _)| {
            let len = balanced_len(&trimmed[start..])?;
            serde_json::from_str(&trimmed[start..start + len]).ok()
        })
}

/// Byte length of the bracketed span at the start of `text`, ignoring
/// brackets inside string literals.
fn balanced_len(text: &str) -> Option<usize> {
    let mut closers = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' => closers.push(']'),
            '{' => closers.push('}'),
            ']' | '}' => {
                if closers.pop() != Some(c) {
                    return None;
                }
                if closers.is_empty() {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening fence line.
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Prompt sent for a mood.
pub fn mood_prompt(mood: &str) -> String {
    format!(
        "Suggest 3 recipes that would be good for someone feeling {}. \
         Format the response as JSON with recipe names and brief descriptions.",
        mood
    )
}

#[derive(Debug, Clone)]
pub struct SuggestionClient {
    client: Arc<Client>,
    endpoint: String,
    api_key: String,
}

impl SuggestionClient {
    pub fn new(api: &ApiConfig, timeout: Duration) -> Result<Self, ServiceError> {
        Ok(Self {
            client: Arc::new(build_client(timeout)?),
            endpoint: api.base_url.clone(),
            api_key: api.key().to_string(),
        })
    }

    /// Ask for three dishes suited to `mood`. The raw response is returned;
    /// use [`parse_mood_suggestions`] to read it.
    #[instrument(skip(self), level = "info")]
    pub async fn mood_suggestions(
        &self,
        mood: &str,
    ) -> Result<GenerateContentResponse, ServiceError> {
        let prompt = mood_prompt(mood);
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        read_json(response).await
    }
}
