//! GeminiSuggestionProvider - tag suggestions via the Gemini REST API.
//!
//! Sends the abstract and the full tag vocabulary in one `generateContent`
//! call and asks for a JSON object of the form `{"tags": ["..."]}`.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use tagger_core::config::{GeminiConfig, is_placeholder};
use tagger_core::suggestion::SuggestionProvider;
use tagger_core::taxonomy::Taxonomy;
use tagger_core::{Result, TaggerError};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

static FENCED_JSON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("fenced JSON pattern is valid")
});

/// Suggestion provider that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiSuggestionProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiSuggestionProvider {
    /// Creates a provider with the given API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Builds a provider from the `[gemini]` config table.
    ///
    /// Fails with `Unconfigured` when the key is still a placeholder, before
    /// any client is created.
    pub fn from_config(config: &GeminiConfig) -> Result<Self> {
        config.ensure_configured()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| TaggerError::network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Overrides the API base URL (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url,
            model = self.model,
            api_key = self.api_key
        );

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            // reqwest errors can embed the URL, which carries the key
            .map_err(|err| {
                TaggerError::network(format!("Gemini API request failed: {}", err.without_url()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            TaggerError::suggestion(format!("Failed to parse Gemini response: {}", err.without_url()))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait::async_trait]
impl SuggestionProvider for GeminiSuggestionProvider {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn suggest(&self, abstract_text: &str, taxonomy: &Taxonomy) -> Result<Vec<String>> {
        if is_placeholder(&self.api_key) {
            return Err(TaggerError::unconfigured(
                "Gemini",
                "update gemini.api_key in config.toml with your Google AI API key",
            ));
        }

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: build_prompt(abstract_text, taxonomy),
                }],
            }],
            generation_config: GenerationConfig::json_tags(),
        };

        tracing::debug!(model = %self.model, tags = taxonomy.len(), "Requesting Gemini suggestions");
        let text = self.send_request(&request).await?;
        let tags = parse_tag_response(&text)?;
        tracing::info!(count = tags.len(), "Gemini suggested tags");
        Ok(tags)
    }
}

/// Builds the classification prompt: instruction, abstract, then one
/// `Tag: <name>, Definition: <definition>` line per taxonomy entry.
pub fn build_prompt(abstract_text: &str, taxonomy: &Taxonomy) -> String {
    let tag_definitions = taxonomy
        .tags()
        .iter()
        .map(|tag| format!("Tag: {}, Definition: {}", tag.name, tag.definition))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Classify the following literature abstract by assigning relevant tags from the provided list.\n\
         Respond with a JSON object of the form {{\"tags\": [\"<tag name>\", ...]}} using only tag names from the list.\n\n\
         Abstract:\n{abstract_text}\n\n\
         Possible Tags:\n{tag_definitions}"
    )
}

/// Extracts tag names from the model's text output.
///
/// Accepts `{"tags": [...]}`, a bare `[...]`, and either of those wrapped in
/// a Markdown code fence. Non-string entries are skipped.
pub fn parse_tag_response(text: &str) -> Result<Vec<String>> {
    let trimmed = text.trim();
    let body = FENCED_JSON
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed);

    let value: Value = serde_json::from_str(body)
        .map_err(|e| TaggerError::suggestion(format!("response is not valid JSON: {e}")))?;

    let tags = match &value {
        Value::Object(map) => map.get("tags").and_then(Value::as_array).ok_or_else(|| {
            TaggerError::suggestion("response JSON has no \"tags\" array")
        })?,
        Value::Array(array) => array,
        _ => {
            return Err(TaggerError::suggestion(
                "response JSON is neither an object nor an array",
            ));
        }
    };

    Ok(tags
        .iter()
        .filter_map(Value::as_str)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

impl GenerationConfig {
    fn json_tags() -> Self {
        Self {
            response_mime_type: "application/json".to_string(),
            response_schema: serde_json::json!({
                "type": "OBJECT",
                "properties": {
                    "tags": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" }
                    }
                },
                "required": ["tags"]
            }),
        }
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .and_then(|mut candidates| {
            if candidates.is_empty() {
                None
            } else {
                Some(candidates.swap_remove(0))
            }
        })
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| {
            TaggerError::suggestion("Gemini API returned no text in the response candidates")
        })
}

fn map_http_error(status: StatusCode, body: String) -> TaggerError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    TaggerError::network(format!("Gemini API returned {}: {}", status.as_u16(), message))
}
