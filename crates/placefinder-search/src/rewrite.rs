//! Language-model query rewriting.
//!
//! Turns conversational input ("I'm looking for a good pizza place in
//! Manhattan") into a compact search query ("pizza restaurant Manhattan")
//! through an OpenAI-compatible chat-completions endpoint. The rewrite is
//! best-effort: [`QueryRewriter::rewrite_or_original`] never fails.

use std::time::Duration;

use placefinder_core::AppConfig;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::client::normalize_base_url;
use crate::error::SearchError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";

const SYSTEM_PROMPT: &str = "You rewrite place-search requests into short search-engine queries. \
Keep only the kind of place, notable qualifiers, and the location. \
Drop filler words, greetings, and punctuation. \
Example: \"I'm looking for a good pizza place in Manhattan\" becomes \"pizza restaurant Manhattan\". \
Reply with the query text only.";

/// Chat-completions client used to normalize search queries.
pub struct QueryRewriter {
    client: Client,
    api_key: String,
    model: String,
    url: Url,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl QueryRewriter {
    /// Creates a rewriter pointed at the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, SearchError> {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL, timeout_secs)
    }

    /// Creates a rewriter with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`SearchError::InvalidBaseUrl`] for an unusable base.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        base_url: &str,
        timeout_secs: u64,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        let base = normalize_base_url(base_url)?;
        let url = base
            .join("chat/completions")
            .map_err(|e| SearchError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            url,
        })
    }

    /// Builds a rewriter when `OPENAI_API_KEY` is configured.
    ///
    /// # Errors
    ///
    /// Propagates construction errors from [`QueryRewriter::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Option<Self>, SearchError> {
        config
            .rewrite_api_key
            .as_deref()
            .map(|key| {
                Self::with_base_url(
                    key,
                    &config.rewrite_model,
                    &config.rewrite_base_url,
                    config.request_timeout_secs,
                )
            })
            .transpose()
    }

    /// Asks the model for a rewritten query.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Rewrite`] on transport failure, non-2xx
    /// status, an unparseable body, or an empty completion.
    pub async fn rewrite(&self, query: &str) -> Result<String, SearchError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: query,
                },
            ],
            temperature: 0.2,
            max_tokens: 60,
        };

        let response = self
            .client
            .post(self.url.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SearchError::Rewrite(format!("request failed: {}", e.without_url())))?;

        if !response.status().is_success() {
            return Err(SearchError::Rewrite(format!(
                "model endpoint returned status {}",
                response.status()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Rewrite(format!("response parse error: {}", e.without_url())))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_owned())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| SearchError::Rewrite("model returned no completion text".to_owned()))
    }

    /// Rewrites `query`, falling back to it unchanged on any failure.
    pub async fn rewrite_or_original(&self, query: &str) -> String {
        match self.rewrite(query).await {
            Ok(rewritten) => {
                tracing::debug!(original = query, rewritten = %rewritten, "query rewritten");
                rewritten
            }
            Err(e) => {
                tracing::warn!(error = %e, "query rewrite failed; using original query");
                query.to_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completions_url_is_resolved_under_base_path() {
        let rewriter =
            QueryRewriter::with_base_url("sk-test", "gpt-4o-mini", "https://llm.example.com/v1", 5)
                .expect("construct");
        assert_eq!(
            rewriter.url.as_str(),
            "https://llm.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn request_body_has_system_then_user_message() {
        let request = ChatRequest {
            model: "m",
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: "best tacos near me",
                },
            ],
            temperature: 0.2,
            max_tokens: 60,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "best tacos near me");
        assert_eq!(json["max_tokens"], 60);
    }
}
