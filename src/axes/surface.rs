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

use rand::Rng;

use crate::augmenter::{ZiAugmenterConfig, ZiAxisAugmenter, ZiAxisContext};
use crate::errors::Result;
use crate::seed::{derive_seed, rng_for_text};
use crate::transforms::{ZiSurfaceParams, ZiSurfaceTransform};
use crate::variation::ZiVariationList;

/// Surface-noise axis: one randomly chosen transform per variation.
#[derive(Debug)]
pub struct ZiTextSurfaceAugmenter {
    name: String,
    config: ZiAugmenterConfig,
    params: ZiSurfaceParams,
}

impl ZiTextSurfaceAugmenter {
    pub fn new(config: ZiAugmenterConfig, params: ZiSurfaceParams) -> Result<Self> {
        config.validate()?;
        params.validate()?;
        Ok(Self {
            name: "surface".to_string(),
            config,
            params,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl ZiAxisAugmenter for ZiTextSurfaceAugmenter {
    fn name(&self) -> &str {
        &self.name
    }

    /// Keeps the prompt first, then applies one uniformly chosen transform to
    /// the original prompt per iteration. Variants equal to the prompt are dropped.
    fn augment(&self, prompt: &str, _context: Option<&ZiAxisContext>) -> Result<ZiVariationList> {
        let mut rng = rng_for_text(self.config.seed, prompt);
        let mut variations = vec![prompt.to_string()];

        for _ in 1..self.config.n_augments {
            let transform =
                ZiSurfaceTransform::ALL[rng.gen_range(0..ZiSurfaceTransform::ALL.len())];
            let variant = self.params.apply(transform, prompt, derive_seed(&mut rng));
            if variant != prompt {
                variations.push(variant);
            }
        }

        log::debug!("{} axis produced {} variations", self.name, variations.len());
        Ok(variations)
    }
}
