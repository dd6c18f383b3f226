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

use crate::augmenter::{ZiAugmenterConfig, ZiAxisAugmenter, ZiAxisContext};
use crate::errors::{Result, ZiError};
use crate::fewshot::ZiFewShotSampler;
use crate::seed::rng_for;
use crate::variation::ZiVariationList;

/// Few-shot axis: distinct exemplar blocks drawn from the context's pool.
#[derive(Debug)]
pub struct ZiFewShotAugmenter {
    name: String,
    config: ZiAugmenterConfig,
    sampler: ZiFewShotSampler,
}

impl ZiFewShotAugmenter {
    pub fn new(config: ZiAugmenterConfig) -> Result<Self> {
        config.validate()?;
        let mut sampler = ZiFewShotSampler::new(config.num_examples);
        if let Some((min, max)) = config.example_range() {
            sampler = sampler.with_count_range(min, max)?;
        }
        Ok(Self {
            name: "fewshot".to_string(),
            config,
            sampler,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn sampler(&self) -> &ZiFewShotSampler {
        &self.sampler
    }
}

impl ZiAxisAugmenter for ZiFewShotAugmenter {
    fn name(&self) -> &str {
        &self.name
    }

    /// The excluded question is `context.question`, else the prompt. A pool
    /// that is empty after exclusion leaves `[prompt]`.
    fn augment(&self, prompt: &str, context: Option<&ZiAxisContext>) -> Result<ZiVariationList> {
        let pool = context
            .and_then(|ctx| ctx.exemplars.as_ref())
            .ok_or_else(|| ZiError::configuration("fewshot axis requires an exemplar pool"))?;
        let question = context
            .and_then(|ctx| ctx.question.as_deref())
            .unwrap_or(prompt);

        let mut rng = rng_for(self.config.seed);
        let blocks =
            self.sampler
                .sample_distinct(question, pool, self.config.n_augments, &mut rng);

        if blocks.is_empty() {
            log::debug!("{} axis found no exemplars for question", self.name);
            return Ok(vec![prompt.to_string()]);
        }
        Ok(blocks)
    }
}
