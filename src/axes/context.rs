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

//! Irrelevant-context axis.
//!
//! A completion service is asked to surround the prompt with unrelated but
//! coherent text. A response is accepted only when it is non-empty, differs
//! from the prompt and still contains the prompt verbatim; anything else,
//! including service errors, falls back to the unmodified prompt.

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::augmenter::{ZiAugmenterConfig, ZiAxisAugmenter, ZiAxisContext};
use crate::completion::ZiCompletionService;
use crate::errors::Result;
use crate::seed::rng_for;
use crate::variation::ZiVariationList;

/// Where the added context goes relative to the prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZiContextPlacement {
    Before,
    After,
    Both,
}

impl ZiContextPlacement {
    pub const ALL: [ZiContextPlacement; 3] = [Self::Before, Self::After, Self::Both];

    fn heading(&self) -> &'static str {
        match self {
            Self::Before => "BEFORE",
            Self::After => "AFTER",
            Self::Both => "BOTH BEFORE AND AFTER",
        }
    }

    fn position(&self) -> &'static str {
        match self {
            Self::Before => "before it",
            Self::After => "after it",
            Self::Both => "before and after it",
        }
    }

    /// Instruction sent to the completion service.
    pub fn meta_prompt(&self, prompt: &str) -> String {
        format!(
            "Your task is to add irrelevant context {heading} the following prompt.\n\
             The added context should NOT change the meaning or expected answer of the original prompt.\n\
             The context should be coherent but not directly related to the task.\n\
             \n\
             Original prompt:\n\
             \"{prompt}\"\n\
             \n\
             Return ONLY the modified prompt with added context {position}. Do not include any explanations.",
            heading = self.heading(),
            prompt = prompt,
            position = self.position(),
        )
    }
}

/// Adds irrelevant context around the prompt through a completion service.
pub struct ZiContextAugmenter {
    name: String,
    config: ZiAugmenterConfig,
    service: Arc<dyn ZiCompletionService>,
}

impl fmt::Debug for ZiContextAugmenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZiContextAugmenter")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("service", &self.service.name())
            .finish()
    }
}

impl ZiContextAugmenter {
    pub fn new(config: ZiAugmenterConfig, service: Arc<dyn ZiCompletionService>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name: "context".to_string(),
            config,
            service,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// One service round trip; the prompt itself on rejection or failure.
    pub fn generate_variation(&self, prompt: &str, placement: ZiContextPlacement) -> String {
        match self.service.complete(&placement.meta_prompt(prompt)) {
            Ok(response) => {
                let candidate = response.trim();
                if !candidate.is_empty() && candidate != prompt && candidate.contains(prompt) {
                    candidate.to_string()
                } else {
                    log::warn!(
                        "{} axis rejected completion ({:?}): prompt not preserved verbatim",
                        self.name,
                        placement
                    );
                    prompt.to_string()
                }
            }
            Err(err) => {
                log::warn!(
                    "{} axis completion via '{}' failed: {}, using original prompt",
                    self.name,
                    self.service.name(),
                    err
                );
                prompt.to_string()
            }
        }
    }
}

impl ZiAxisAugmenter for ZiContextAugmenter {
    fn name(&self) -> &str {
        &self.name
    }

    fn augment(&self, prompt: &str, _context: Option<&ZiAxisContext>) -> Result<ZiVariationList> {
        let mut rng = rng_for(self.config.seed);
        let mut variations = vec![prompt.to_string()];

        for _ in 1..self.config.n_augments {
            let placements = ZiContextPlacement::ALL;
            let placement = placements[rng.gen_range(0..placements.len())];
            let variation = self.generate_variation(prompt, placement);
            if variation != prompt {
                variations.push(variation);
            }
        }

        log::debug!("{} axis produced {} variations", self.name, variations.len());
        Ok(variations)
    }
}
