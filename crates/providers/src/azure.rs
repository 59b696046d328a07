//! Azure OpenAI chat-completions client.
//!
//! Speaks the deployment-scoped endpoint:
//! `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version=...`
//! with the `api-key` request header. Non-streaming only.

use async_trait::async_trait;
use colloquy_core::error::ClientError;
use colloquy_core::message::{Entry, Role};
use colloquy_core::{CompletionClient, GenerationParams};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const API_VERSION: &str = "2023-05-15";

/// A client for an Azure OpenAI chat-completions deployment.
pub struct AzureOpenAiClient {
    url: String,
    api_key: String,
    client: reqwest::Client,
}

impl AzureOpenAiClient {
    /// Create a new client for the given endpoint and deployment.
    pub fn new(
        endpoint: impl Into<String>,
        deployment: impl AsRef<str>,
        api_key: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            url: Self::completions_url(&endpoint.into(), deployment.as_ref()),
            api_key: api_key.into(),
            client,
        }
    }

    fn completions_url(endpoint: &str, deployment: &str) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint.trim_end_matches('/'),
            deployment,
            API_VERSION
        )
    }

    /// Convert transcript entries to the wire message format.
    fn to_api_messages(messages: &[Entry]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|e| ApiMessage {
                role: match e.role {
                    Role::System => "system".into(),
                    Role::User => "user".into(),
                    Role::Assistant => "assistant".into(),
                },
                content: e.text.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl CompletionClient for AzureOpenAiClient {
    fn name(&self) -> &str {
        "azure-openai"
    }

    async fn complete(
        &self,
        messages: &[Entry],
        params: &GenerationParams,
    ) -> std::result::Result<String, ClientError> {
        let body = ApiRequest {
            messages: Self::to_api_messages(messages),
            max_tokens: params.max_tokens,
            n: params.candidate_count,
            temperature: params.temperature,
            top_p: params.top_p,
        };

        debug!(
            client = %self.name(),
            messages = messages.len(),
            max_tokens = params.max_tokens,
            "Sending completion request"
        );

        let response = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ClientError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(ClientError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Completion service returned error");
            return Err(ClientError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ClientError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::MalformedResponse("No choices in response".into()))?;

        // An empty completion is accepted as-is.
        Ok(choice.message.content.unwrap_or_default())
    }
}

// --- Wire types (internal) ---

#[derive(Debug, Serialize)]
struct ApiRequest {
    messages: Vec<ApiMessage>,
    max_tokens: u32,
    n: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_construction_strips_trailing_slash() {
        let url = AzureOpenAiClient::completions_url(
            "https://example.openai.azure.com/",
            "gpt-4o-mini",
        );
        assert_eq!(
            url,
            "https://example.openai.azure.com/openai/deployments/gpt-4o-mini/chat/completions?api-version=2023-05-15"
        );
    }

    #[test]
    fn message_conversion_covers_all_roles() {
        let messages = vec![
            Entry::system("Be terse."),
            Entry::user("hi"),
            Entry::assistant("hello"),
        ];
        let api = AzureOpenAiClient::to_api_messages(&messages);
        assert_eq!(api.len(), 3);
        assert_eq!(api[0].role, "system");
        assert_eq!(api[1].role, "user");
        assert_eq!(api[2].role, "assistant");
        assert_eq!(api[1].content, "hi");
    }

    #[test]
    fn request_body_includes_generation_params() {
        let body = ApiRequest {
            messages: AzureOpenAiClient::to_api_messages(&[Entry::user("hi")]),
            max_tokens: 150,
            n: 1,
            temperature: 0.7,
            top_p: 1.0,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["max_tokens"], 150);
        assert_eq!(json["n"], 1);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn parse_response_extracts_first_choice() {
        let data = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Salve!"}, "finish_reason": "stop"}
            ]
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("Salve!")
        );
    }

    #[test]
    fn parse_response_with_empty_choices() {
        let data = r#"{"choices": []}"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert!(parsed.choices.is_empty());
    }

    #[test]
    fn parse_response_with_null_content() {
        let data = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
