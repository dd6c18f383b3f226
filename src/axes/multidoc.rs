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

use crate::augmenter::{ZiAugmenterConfig, ZiAxisAugmenter, ZiAxisContext};
use crate::errors::Result;
use crate::multidoc::{add_random_contexts, permute_docs_order, ZiDocSeparator};
use crate::seed::rng_for;
use crate::variation::ZiVariationList;

/// Multi-document axis: optional distractor documents, then reordering.
#[derive(Debug)]
pub struct ZiMultiDocAugmenter {
    name: String,
    config: ZiAugmenterConfig,
    n_new_docs: usize,
    separator: ZiDocSeparator,
}

impl ZiMultiDocAugmenter {
    pub fn new(config: ZiAugmenterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name: "multidoc".to_string(),
            config,
            n_new_docs: 0,
            separator: ZiDocSeparator::default(),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_new_docs(mut self, n_new_docs: usize) -> Self {
        self.n_new_docs = n_new_docs;
        self
    }

    pub fn with_separator(mut self, separator: ZiDocSeparator) -> Self {
        self.separator = separator;
        self
    }
}

impl ZiAxisAugmenter for ZiMultiDocAugmenter {
    fn name(&self) -> &str {
        &self.name
    }

    /// Documents come from the context, else the prompt is the single document.
    /// The first variation keeps the (possibly extended) original order.
    fn augment(&self, prompt: &str, context: Option<&ZiAxisContext>) -> Result<ZiVariationList> {
        let mut rng = rng_for(self.config.seed);
        let mut docs = context
            .and_then(|ctx| ctx.documents.clone())
            .filter(|docs| !docs.is_empty())
            .unwrap_or_else(|| vec![prompt.to_string()]);

        if self.n_new_docs > 0 {
            if let Some(corpus) = context.and_then(|ctx| ctx.corpus.as_ref()) {
                docs = add_random_contexts(&docs, corpus, self.n_new_docs, &mut rng);
            }
        }

        let original = self.separator.render(&docs);
        let mut seen = HashSet::from([original.clone()]);
        let mut variations = vec![original];
        for ordering in permute_docs_order(&docs, self.config.n_augments, &mut rng) {
            if variations.len() >= self.config.n_augments {
                break;
            }
            let rendered = self.separator.render(&ordering);
            if seen.insert(rendered.clone()) {
                variations.push(rendered);
            }
        }

        log::debug!("{} axis produced {} variations", self.name, variations.len());
        Ok(variations)
    }
}
