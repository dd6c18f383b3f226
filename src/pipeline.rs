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
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::augmenter::{execute_axis, ZiAxisAugmenter, ZiAxisConfig, ZiAxisContext};
use crate::combiner::{ZiCombineStrategy, ZiVariantCombiner, DEFAULT_MAX_COMBINATIONS};
use crate::completion::ZiCompletionService;
use crate::errors::Result;
use crate::variation::{slot_name, ZiVariationList, ZiVariationSet};

/// Prompt handed to a pipeline run, optionally split into named parts.
#[derive(Clone, Debug, Default)]
pub struct ZiPromptInput {
    pub prompt: String,
    /// Named prompt parts such as `task_description` or `examples`.
    pub parts: Vec<(String, String)>,
    pub context: Option<ZiAxisContext>,
}

impl ZiPromptInput {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_part(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.parts.push((name.into(), text.into()));
        self
    }

    pub fn with_context(mut self, context: ZiAxisContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Part text whose name matches `name` under slot naming.
    pub fn part(&self, name: &str) -> Option<&str> {
        let wanted = slot_name(name);
        self.parts
            .iter()
            .find(|(key, _)| slot_name(key) == wanted)
            .map(|(_, text)| text.as_str())
    }
}

/// Result of one pipeline run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiPipelineOutput {
    pub prompt: String,
    pub variations: ZiVariationSet,
    pub combined: Vec<String>,
    /// Full cross-product size; `None` when it overflows.
    pub cross_product_size: Option<u128>,
}

/// Axes evaluated independently, then combined under a budget.
#[derive(Debug)]
pub struct ZiPromptPipeline {
    axes: Vec<Box<dyn ZiAxisAugmenter>>,
    combiner: ZiVariantCombiner,
}

impl ZiPromptPipeline {
    pub fn new(axes: Vec<Box<dyn ZiAxisAugmenter>>, combiner: ZiVariantCombiner) -> Self {
        Self { axes, combiner }
    }

    pub fn builder() -> ZiPipelineBuilder {
        ZiPipelineBuilder::new()
    }

    pub fn axes(&self) -> impl Iterator<Item = &str> {
        self.axes.iter().map(|axis| axis.name())
    }

    pub fn combiner(&self) -> &ZiVariantCombiner {
        &self.combiner
    }

    fn evaluate(
        &self,
        axis: &dyn ZiAxisAugmenter,
        input: &ZiPromptInput,
    ) -> Result<(String, ZiVariationList)> {
        let target = input.part(axis.name()).unwrap_or(input.prompt.as_str());
        let variations = execute_axis(axis, target, input.context.as_ref())?;
        Ok((axis.name().to_string(), variations))
    }

    /// Runs every axis and collects the variation set in axis order.
    ///
    /// Axes sharing a name are merged, keeping first occurrences. Parts no
    /// axis targets contribute their text unchanged.
    pub fn variations(&self, input: &ZiPromptInput) -> Result<ZiVariationSet> {
        #[cfg(feature = "parallel")]
        let results: Vec<Result<(String, ZiVariationList)>> = self
            .axes
            .par_iter()
            .map(|axis| self.evaluate(axis.as_ref(), input))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let results: Vec<Result<(String, ZiVariationList)>> = self
            .axes
            .iter()
            .map(|axis| self.evaluate(axis.as_ref(), input))
            .collect();

        let mut set = ZiVariationSet::new();
        for result in results {
            let (name, variations) = result?;
            let merged = match set.get(&name) {
                Some(existing) => merge_variations(existing, variations),
                None => variations,
            };
            set.insert(name, merged);
        }

        let targeted: HashSet<String> = set.keys().map(slot_name).collect();
        for (name, text) in &input.parts {
            if !targeted.contains(&slot_name(name)) && !set.contains_key(name) {
                set.insert(name.clone(), vec![text.clone()]);
            }
        }
        Ok(set)
    }

    /// Runs the axes and combines their variations. Without a template, one
    /// placeholder per axis is joined line by line.
    pub fn run(&self, input: &ZiPromptInput, template: Option<&str>) -> Result<ZiPipelineOutput> {
        let variations = self.variations(input)?;
        let template = template
            .map(str::to_string)
            .unwrap_or_else(|| ZiVariantCombiner::default_template(&variations));
        let combined = self.combiner.combine(&variations, &template);
        let cross_product_size = variations.cross_product_size();

        log::info!(
            "pipeline run: {} axes, cross product {}, {} combined variants (budget {})",
            variations.len(),
            cross_product_size.map_or_else(|| "overflow".to_string(), |n| n.to_string()),
            combined.len(),
            self.combiner.budget()
        );

        Ok(ZiPipelineOutput {
            prompt: input.prompt.clone(),
            variations,
            combined,
            cross_product_size,
        })
    }

    /// Runs each input independently; outputs follow input order.
    pub fn run_batch(
        &self,
        inputs: &[ZiPromptInput],
        template: Option<&str>,
    ) -> Result<Vec<ZiPipelineOutput>> {
        inputs.iter().map(|input| self.run(input, template)).collect()
    }
}

fn merge_variations(existing: &[String], incoming: ZiVariationList) -> ZiVariationList {
    let mut seen: HashSet<String> = existing.iter().cloned().collect();
    let mut merged = existing.to_vec();
    for variation in incoming {
        if seen.insert(variation.clone()) {
            merged.push(variation);
        }
    }
    merged
}

enum ZiPendingAxis {
    Built(Box<dyn ZiAxisAugmenter>),
    Config(ZiAxisConfig),
}

/// Builder assembling axes from instances or declarative configs.
///
/// A pipeline seed fixes the combiner and every configured axis that has no
/// seed of its own (axis `i` gets `seed + i + 1`).
pub struct ZiPipelineBuilder {
    axes: Vec<ZiPendingAxis>,
    completion: Option<Arc<dyn ZiCompletionService>>,
    budget: usize,
    strategy: ZiCombineStrategy,
    seed: Option<u64>,
}

impl Default for ZiPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ZiPipelineBuilder {
    pub fn new() -> Self {
        Self {
            axes: Vec::new(),
            completion: None,
            budget: DEFAULT_MAX_COMBINATIONS,
            strategy: ZiCombineStrategy::default(),
            seed: None,
        }
    }

    pub fn axis(mut self, axis: Box<dyn ZiAxisAugmenter>) -> Self {
        self.axes.push(ZiPendingAxis::Built(axis));
        self
    }

    pub fn axis_config(mut self, config: ZiAxisConfig) -> Self {
        self.axes.push(ZiPendingAxis::Config(config));
        self
    }

    pub fn completion(mut self, service: Arc<dyn ZiCompletionService>) -> Self {
        self.completion = Some(service);
        self
    }

    pub fn budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    pub fn strategy(mut self, strategy: ZiCombineStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<ZiPromptPipeline> {
        let mut axes = Vec::with_capacity(self.axes.len());
        for (i, pending) in self.axes.into_iter().enumerate() {
            let axis = match pending {
                ZiPendingAxis::Built(axis) => axis,
                ZiPendingAxis::Config(mut config) => {
                    if let Some(seed) = self.seed {
                        let augment = config.augment_config_mut();
                        if augment.seed.is_none() {
                            augment.seed = Some(seed.wrapping_add(i as u64 + 1));
                        }
                    }
                    config.build(self.completion.clone())?
                }
            };
            axes.push(axis);
        }

        let mut combiner = ZiVariantCombiner::new(self.budget).with_strategy(self.strategy);
        if let Some(seed) = self.seed {
            combiner = combiner.with_seed(seed);
        }
        Ok(ZiPromptPipeline::new(axes, combiner))
    }
}
