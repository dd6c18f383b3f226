//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of ZiPrompt.
//! The ZiPrompt project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Completion Service
//!
//! The context and paraphrase axes delegate text generation to an external
//! completion service. ZiPrompt never implements a model; it only consumes the
//! [`ZiCompletionService`] contract. Services are injected into the axes, so
//! tests substitute a closure.
//!
//! ```rust
//! use std::sync::Arc;
//! use ziprompt::completion::{ZiCompletionService, ZiFnCompletion};
//!
//! let echo: Arc<dyn ZiCompletionService> =
//!     Arc::new(ZiFnCompletion::new(|prompt: &str| Ok(prompt.to_string())));
//! ```
//!
//! Calls are synchronous and single-attempt. Callers impose timeouts; the HTTP
//! implementation carries one in its configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Contract for an external text-generation capability.
pub trait ZiCompletionService: Send + Sync {
    /// Identifier used in logs and error messages.
    fn name(&self) -> &str {
        "completion"
    }

    /// Returns the generated text for `prompt`, or an error on any failure.
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Adapts a closure into a completion service.
pub struct ZiFnCompletion<F> {
    func: F,
}

impl<F> ZiFnCompletion<F>
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> fmt::Debug for ZiFnCompletion<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ZiFnCompletion")
    }
}

impl<F> ZiCompletionService for ZiFnCompletion<F>
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn name(&self) -> &str {
        "fn"
    }

    fn complete(&self, prompt: &str) -> Result<String> {
        (self.func)(prompt)
    }
}

pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://api.together.xyz/v1/chat/completions";
pub const DEFAULT_COMPLETION_MODEL: &str = "meta-llama/Llama-3.3-70B-Instruct-Turbo-Free";
pub const DEFAULT_API_KEY_ENV: &str = "TOGETHER_API_KEY";

/// Configuration for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiHttpCompletionConfig {
    /// Chat-completions endpoint URL.
    pub endpoint: String,
    /// Model name to use.
    pub model: String,
    /// API key for authentication.
    pub api_key: Option<String>,
    /// Environment variable consulted when `api_key` is absent.
    pub api_key_env: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: usize,
    /// Sampling temperature.
    pub temperature: f64,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ZiHttpCompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_COMPLETION_ENDPOINT.to_string(),
            model: DEFAULT_COMPLETION_MODEL.to_string(),
            api_key: None,
            api_key_env: Some(DEFAULT_API_KEY_ENV.to_string()),
            max_tokens: 1024,
            temperature: 0.7,
            timeout_secs: 60,
        }
    }
}

impl ZiHttpCompletionConfig {
    /// Explicit key first, then the configured environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key.clone().or_else(|| {
            self.api_key_env
                .as_deref()
                .and_then(|var| std::env::var(var).ok())
                .filter(|key| !key.is_empty())
        })
    }
}

/// Extracts the generated text from a chat or legacy completion response.
pub fn parse_completion_response(json: &serde_json::Value) -> Option<String> {
    let choice = json.get("choices")?.as_array()?.first()?;
    if let Some(content) = choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
    {
        return Some(content.to_string());
    }
    choice
        .get("text")
        .and_then(|t| t.as_str())
        .map(|t| t.to_string())
}

#[cfg(feature = "http")]
pub use http::ZiHttpCompletion;

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use serde_json::{json, Value};

    use super::{parse_completion_response, ZiCompletionService, ZiHttpCompletionConfig};
    use crate::errors::{Result, ZiError};

    /// Blocking HTTP completion service.
    #[derive(Debug)]
    pub struct ZiHttpCompletion {
        config: ZiHttpCompletionConfig,
        client: reqwest::blocking::Client,
    }

    impl ZiHttpCompletion {
        pub fn new(config: ZiHttpCompletionConfig) -> Result<Self> {
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs.max(1)))
                .build()
                .map_err(|e| ZiError::internal(format!("http client: {}", e)))?;
            Ok(Self { config, client })
        }

        pub fn config(&self) -> &ZiHttpCompletionConfig {
            &self.config
        }
    }

    impl ZiCompletionService for ZiHttpCompletion {
        fn name(&self) -> &str {
            "http"
        }

        fn complete(&self, prompt: &str) -> Result<String> {
            let body = json!({
                "model": self.config.model,
                "messages": [{"role": "user", "content": prompt}],
                "max_tokens": self.config.max_tokens,
                "temperature": self.config.temperature,
            });

            let mut request = self.client.post(&self.config.endpoint).json(&body);
            if let Some(api_key) = self.config.resolve_api_key() {
                request = request.bearer_auth(api_key);
            }

            let response = request
                .send()
                .map_err(|e| ZiError::external("http", format!("request failed: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().unwrap_or_default();
                return Err(ZiError::external(
                    "http",
                    format!("endpoint returned {}: {}", status, body),
                ));
            }

            let json: Value = response
                .json()
                .map_err(|e| ZiError::external("http", format!("invalid response body: {}", e)))?;

            parse_completion_response(&json)
                .ok_or_else(|| ZiError::external("http", "response carried no completion text"))
        }
    }
}
