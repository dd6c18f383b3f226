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

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::augmenter::{ZiAugmenterConfig, ZiAxisAugmenter, ZiAxisContext};
use crate::completion::ZiCompletionService;
use crate::errors::{Result, ZiError};
use crate::variation::ZiVariationList;

/// Extracts a list of strings from a completion response.
///
/// The outermost `[...]` span is parsed as a JSON array of strings, which
/// tolerates code fences and chatter around the list.
pub fn parse_string_list(response: &str) -> Result<Vec<String>> {
    let start = response.find('[');
    let end = response.rfind(']');
    let span = match (start, end) {
        (Some(s), Some(e)) if s < e => &response[s..=e],
        _ => {
            return Err(ZiError::external(
                "paraphrase",
                "response does not contain a list",
            ))
        }
    };
    serde_json::from_str::<Vec<String>>(span)
        .map_err(|e| ZiError::external("paraphrase", format!("malformed list: {}", e)))
}

/// Alternative phrasings of the prompt from a completion service.
pub struct ZiParaphraseAugmenter {
    name: String,
    config: ZiAugmenterConfig,
    service: Arc<dyn ZiCompletionService>,
}

impl fmt::Debug for ZiParaphraseAugmenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZiParaphraseAugmenter")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("service", &self.service.name())
            .finish()
    }
}

impl ZiParaphraseAugmenter {
    pub fn new(config: ZiAugmenterConfig, service: Arc<dyn ZiCompletionService>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name: "paraphrase".to_string(),
            config,
            service,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn instruction(&self, prompt: &str) -> String {
        let k = self.config.paraphrase_count();
        format!(
            "Rephrase the following prompt in {k} different ways.\n\
             Every paraphrase must keep the exact meaning and the expected answer of the original.\n\
             \n\
             Original prompt:\n\
             \"{prompt}\"\n\
             \n\
             Return ONLY a JSON list of {k} strings, for example [\"first\", \"second\"]. Do not include any explanations.",
            k = k,
            prompt = prompt,
        )
    }

    fn request(&self, prompt: &str) -> Result<Vec<String>> {
        let response = self.service.complete(&self.instruction(prompt))?;
        parse_string_list(&response)
    }
}

impl ZiAxisAugmenter for ZiParaphraseAugmenter {
    fn name(&self) -> &str {
        &self.name
    }

    /// Prompt first, then up to `k` accepted paraphrases. Service failures and
    /// malformed lists leave only the prompt.
    fn augment(&self, prompt: &str, _context: Option<&ZiAxisContext>) -> Result<ZiVariationList> {
        let mut variations = vec![prompt.to_string()];
        let paraphrases = match self.request(prompt) {
            Ok(list) => list,
            Err(err) => {
                log::warn!("{} axis skipped: {}", self.name, err);
                return Ok(variations);
            }
        };

        let mut seen: HashSet<String> = HashSet::from([prompt.to_string()]);
        for candidate in paraphrases {
            if variations.len() > self.config.paraphrase_count() {
                break;
            }
            let candidate = candidate.trim().to_string();
            if !candidate.is_empty() && seen.insert(candidate.clone()) {
                variations.push(candidate);
            }
        }

        log::debug!("{} axis produced {} variations", self.name, variations.len());
        Ok(variations)
    }
}
