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

//! # Axis Augmenter Module
//!
//! An axis is an independent dimension along which a prompt can vary without
//! changing its meaning. Every axis implements [`ZiAxisAugmenter`]:
//!
//! - `name()`: stable label, used as the variation set key and template slot
//! - `augment()`: returns the axis' variation list for one prompt
//!
//! ## Contract
//!
//! - The returned list is never empty; `[prompt]` is the fallback.
//! - The list targets `n_augments` entries but may be shorter after
//!   duplicate suppression.
//! - Failures of external collaborators are recovered inside the axis. Only
//!   structurally invalid configuration is reported as an error.
//!
//! ## Construction
//!
//! Axes are built from [`ZiAxisConfig`], a tagged enum whose variants share
//! the canonical [`ZiAugmenterConfig`] parameter surface:
//!
//! ```rust
//! use ziprompt::augmenter::{axis_factory, ZiAxisContext};
//! use serde_json::json;
//!
//! let axis = axis_factory(&json!({"type": "surface", "augment": {"n_augments": 4, "seed": 7}}), None)?;
//! let variations = axis.augment("The quick brown fox", None)?;
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::axes::{
    ZiChoiceSet, ZiContextAugmenter, ZiFewShotAugmenter, ZiMultiDocAugmenter,
    ZiMultipleChoiceAugmenter, ZiParaphraseAugmenter, ZiTextSurfaceAugmenter,
};
use crate::completion::ZiCompletionService;
use crate::errors::{Result, ZiError};
use crate::fewshot::ZiExemplarPool;
use crate::multidoc::ZiDocSeparator;
use crate::transforms::ZiSurfaceParams;
use crate::variation::ZiVariationList;

pub const DEFAULT_VARIATIONS_PER_AXIS: usize = 3;
pub const MIN_VARIATIONS_PER_AXIS: usize = 1;
pub const MAX_VARIATIONS_PER_AXIS: usize = 10;

/// Contract every axis variant fulfils.
pub trait ZiAxisAugmenter: std::fmt::Debug + Send + Sync {
    /// Stable axis label, used as the variation set key.
    fn name(&self) -> &str;

    /// Produces the variation list for `prompt`.
    ///
    /// `context` carries optional per-axis data (exemplar pool, documents,
    /// parsed choices); axes that do not need it ignore it.
    fn augment(&self, prompt: &str, context: Option<&ZiAxisContext>) -> Result<ZiVariationList>;
}

/// Runs an axis, enforcing the non-empty contract and tagging errors with the axis name.
pub fn execute_axis(
    axis: &dyn ZiAxisAugmenter,
    prompt: &str,
    context: Option<&ZiAxisContext>,
) -> Result<ZiVariationList> {
    let variations = axis.augment(prompt, context).map_err(|err| match err {
        ZiError::Configuration { message } => {
            ZiError::configuration(format!("axis '{}': {}", axis.name(), message))
        }
        other => ZiError::axis(axis.name(), other.to_string()),
    })?;
    if variations.is_empty() {
        return Ok(vec![prompt.to_string()]);
    }
    Ok(variations)
}

/// Optional structured data handed to axes alongside the prompt.
#[derive(Clone, Debug, Default)]
pub struct ZiAxisContext {
    /// Question excluded from few-shot sampling; defaults to the prompt.
    pub question: Option<String>,
    /// Exemplar pool for the few-shot axis.
    pub exemplars: Option<ZiExemplarPool>,
    /// Documents of a multi-document prompt, in original order.
    pub documents: Option<Vec<String>>,
    /// Corpus from which extra documents are drawn.
    pub corpus: Option<Vec<String>>,
    /// Pre-parsed multiple-choice options.
    pub choices: Option<ZiChoiceSet>,
}

impl ZiAxisContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    pub fn with_exemplars(mut self, pool: ZiExemplarPool) -> Self {
        self.exemplars = Some(pool);
        self
    }

    pub fn with_documents(mut self, documents: Vec<String>) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn with_corpus(mut self, corpus: Vec<String>) -> Self {
        self.corpus = Some(corpus);
        self
    }

    pub fn with_choices(mut self, choices: ZiChoiceSet) -> Self {
        self.choices = Some(choices);
        self
    }
}

/// Parameters shared by every axis variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiAugmenterConfig {
    /// Target number of variations, the unmodified prompt included.
    pub n_augments: usize,
    /// Few-shot examples per block.
    pub num_examples: usize,
    /// Paraphrases requested from the completion service.
    pub k: Option<usize>,
    /// Lower bound of a varying few-shot example count.
    pub min_examples: Option<usize>,
    /// Upper bound of a varying few-shot example count.
    pub max_examples: Option<usize>,
    /// Caller seed; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for ZiAugmenterConfig {
    fn default() -> Self {
        Self {
            n_augments: DEFAULT_VARIATIONS_PER_AXIS,
            num_examples: 1,
            k: None,
            min_examples: None,
            max_examples: None,
            seed: None,
        }
    }
}

impl ZiAugmenterConfig {
    pub fn with_n_augments(mut self, n_augments: usize) -> Self {
        self.n_augments = n_augments;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_VARIATIONS_PER_AXIS..=MAX_VARIATIONS_PER_AXIS).contains(&self.n_augments) {
            return Err(ZiError::validation(format!(
                "n_augments must be in [{}, {}], got {}",
                MIN_VARIATIONS_PER_AXIS, MAX_VARIATIONS_PER_AXIS, self.n_augments
            )));
        }
        if self.k == Some(0) {
            return Err(ZiError::validation("k must be at least 1"));
        }
        match (self.min_examples, self.max_examples) {
            (Some(min), Some(max)) if min > max => Err(ZiError::validation(format!(
                "min_examples ({}) exceeds max_examples ({})",
                min, max
            ))),
            _ => Ok(()),
        }
    }

    /// Number of paraphrases to request: `k`, else `n_augments - 1` (at least one).
    pub fn paraphrase_count(&self) -> usize {
        self.k
            .unwrap_or_else(|| self.n_augments.saturating_sub(1))
            .max(1)
    }

    /// Example-count range when either bound is set.
    pub fn example_range(&self) -> Option<(usize, usize)> {
        match (self.min_examples, self.max_examples) {
            (None, None) => None,
            (min, max) => {
                let min = min.unwrap_or(1);
                let max = max.unwrap_or(self.num_examples).max(min);
                Some((min, max))
            }
        }
    }
}

fn default_true() -> bool {
    true
}

/// Declarative description of one axis.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ZiAxisConfig {
    Surface {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        augment: ZiAugmenterConfig,
        #[serde(default)]
        surface: ZiSurfaceParams,
    },
    Context {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        augment: ZiAugmenterConfig,
    },
    Paraphrase {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        augment: ZiAugmenterConfig,
    },
    Fewshot {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        augment: ZiAugmenterConfig,
    },
    Multidoc {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        augment: ZiAugmenterConfig,
        #[serde(default)]
        n_new_docs: usize,
        #[serde(default)]
        separator: ZiDocSeparator,
    },
    MultipleChoice {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        augment: ZiAugmenterConfig,
        #[serde(default = "default_true")]
        vary_enumeration: bool,
        #[serde(default = "default_true")]
        shuffle_options: bool,
    },
}

impl ZiAxisConfig {
    pub fn surface(augment: ZiAugmenterConfig) -> Self {
        Self::Surface {
            name: None,
            augment,
            surface: ZiSurfaceParams::default(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Surface { .. } => "surface",
            Self::Context { .. } => "context",
            Self::Paraphrase { .. } => "paraphrase",
            Self::Fewshot { .. } => "fewshot",
            Self::Multidoc { .. } => "multidoc",
            Self::MultipleChoice { .. } => "multiple_choice",
        }
    }

    pub fn augment_config(&self) -> &ZiAugmenterConfig {
        match self {
            Self::Surface { augment, .. }
            | Self::Context { augment, .. }
            | Self::Paraphrase { augment, .. }
            | Self::Fewshot { augment, .. }
            | Self::Multidoc { augment, .. }
            | Self::MultipleChoice { augment, .. } => augment,
        }
    }

    pub fn augment_config_mut(&mut self) -> &mut ZiAugmenterConfig {
        match self {
            Self::Surface { augment, .. }
            | Self::Context { augment, .. }
            | Self::Paraphrase { augment, .. }
            | Self::Fewshot { augment, .. }
            | Self::Multidoc { augment, .. }
            | Self::MultipleChoice { augment, .. } => augment,
        }
    }

    fn name_override(&self) -> Option<&str> {
        match self {
            Self::Surface { name, .. }
            | Self::Context { name, .. }
            | Self::Paraphrase { name, .. }
            | Self::Fewshot { name, .. }
            | Self::Multidoc { name, .. }
            | Self::MultipleChoice { name, .. } => name.as_deref(),
        }
    }

    /// Checks parameters without building the axis.
    pub fn validate(&self) -> Result<()> {
        self.augment_config().validate()?;
        if let Self::Surface { surface, .. } = self {
            surface.validate()?;
        }
        Ok(())
    }

    /// Axis name: the override if set, else the axis kind.
    pub fn axis_name(&self) -> String {
        self.name_override()
            .map(str::to_string)
            .unwrap_or_else(|| self.kind().to_string())
    }

    /// Instantiates the axis. Context and paraphrase axes need a completion service.
    pub fn build(
        &self,
        completion: Option<Arc<dyn ZiCompletionService>>,
    ) -> Result<Box<dyn ZiAxisAugmenter>> {
        let name = self.axis_name();
        let require_service = |service: Option<Arc<dyn ZiCompletionService>>| {
            service.ok_or_else(|| {
                ZiError::configuration(format!(
                    "{} axis '{}' requires a completion service",
                    self.kind(),
                    name
                ))
            })
        };

        let axis: Box<dyn ZiAxisAugmenter> = match self {
            Self::Surface { augment, surface, .. } => Box::new(
                ZiTextSurfaceAugmenter::new(augment.clone(), surface.clone())?
                    .with_name(name.clone()),
            ),
            Self::Context { augment, .. } => Box::new(
                ZiContextAugmenter::new(augment.clone(), require_service(completion)?)?
                    .with_name(name.clone()),
            ),
            Self::Paraphrase { augment, .. } => Box::new(
                ZiParaphraseAugmenter::new(augment.clone(), require_service(completion)?)?
                    .with_name(name.clone()),
            ),
            Self::Fewshot { augment, .. } => {
                Box::new(ZiFewShotAugmenter::new(augment.clone())?.with_name(name.clone()))
            }
            Self::Multidoc {
                augment,
                n_new_docs,
                separator,
                ..
            } => Box::new(
                ZiMultiDocAugmenter::new(augment.clone())?
                    .with_new_docs(*n_new_docs)
                    .with_separator(*separator)
                    .with_name(name.clone()),
            ),
            Self::MultipleChoice {
                augment,
                vary_enumeration,
                shuffle_options,
                ..
            } => Box::new(
                ZiMultipleChoiceAugmenter::new(augment.clone())?
                    .with_dimensions(*vary_enumeration, *shuffle_options)
                    .with_name(name.clone()),
            ),
        };
        Ok(axis)
    }
}

/// Builds an axis from a JSON object such as `{"type": "surface", "augment": {...}}`.
pub fn axis_factory(
    config: &Value,
    completion: Option<Arc<dyn ZiCompletionService>>,
) -> Result<Box<dyn ZiAxisAugmenter>> {
    if !config.is_object() {
        return Err(ZiError::configuration("axis config must be object"));
    }
    let parsed: ZiAxisConfig = serde_json::from_value(config.clone())
        .map_err(|e| ZiError::configuration(format!("invalid axis config: {}", e)))?;
    parsed.build(completion)
}
