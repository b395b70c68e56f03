use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use spendlens_core::config::DelegateConfig;

use crate::delegate::{AnswerDelegate, DelegateError, SYSTEM_INSTRUCTION};

/// Delegate backed by an OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatCompletionsDelegate {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<SecretString>,
    model: String,
    max_tokens: u32,
    timeout_secs: u64,
}

impl ChatCompletionsDelegate {
    pub fn from_config(config: &DelegateConfig) -> Result<Self, DelegateError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| DelegateError::Construction(error.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/chat/completions",
                config.effective_base_url().trim_end_matches('/')
            ),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body(&self, question: &str, context: &str) -> Value {
        json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [
                {"role": "system", "content": SYSTEM_INSTRUCTION},
                {"role": "assistant", "content": context},
                {"role": "user", "content": question}
            ]
        })
    }

    fn transport_error(&self, error: reqwest::Error) -> DelegateError {
        if error.is_timeout() {
            DelegateError::Timeout { millis: Duration::from_secs(self.timeout_secs).as_millis() }
        } else {
            DelegateError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl AnswerDelegate for ChatCompletionsDelegate {
    fn is_available(&self) -> bool {
        true
    }

    async fn answer(&self, question: &str, context: &str) -> Result<String, DelegateError> {
        let body = self.request_body(question, context);
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request.send().await.map_err(|error| self.transport_error(error))?;
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(DelegateError::QuotaExceeded);
        }
        if !status.is_success() {
            return Err(DelegateError::Http { status: status.as_u16() });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|error| DelegateError::MalformedResponse(error.to_string()))?;

        payload["choices"][0]["message"]["content"].as_str().map(str::to_string).ok_or_else(|| {
            DelegateError::MalformedResponse("missing choices[0].message.content".to_string())
        })
    }
}
