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

//! Declarative pipeline configuration.
//!
//! ```yaml
//! budget: 20
//! seed: 7
//! strategy: sampled
//! axes:
//!   - type: surface
//!     augment: { n_augments: 4 }
//!     surface: { typo_prob: 0.1, keyboard: qwerty }
//!   - type: fewshot
//!     name: examples
//!     augment: { n_augments: 3, num_examples: 2 }
//! completion:
//!   model: meta-llama/Llama-3.3-70B-Instruct-Turbo-Free
//!   timeout_secs: 30
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::augmenter::ZiAxisConfig;
use crate::combiner::{ZiCombineStrategy, DEFAULT_MAX_COMBINATIONS};
use crate::completion::{ZiCompletionService, ZiHttpCompletionConfig};
use crate::errors::{Result, ZiError};
use crate::pipeline::{ZiPipelineBuilder, ZiPromptPipeline};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiPipelineConfig {
    /// Maximum number of combined variants per run.
    pub budget: usize,
    pub strategy: ZiCombineStrategy,
    pub seed: Option<u64>,
    pub axes: Vec<ZiAxisConfig>,
    /// HTTP completion service for the context and paraphrase axes.
    pub completion: Option<ZiHttpCompletionConfig>,
}

impl Default for ZiPipelineConfig {
    fn default() -> Self {
        Self {
            budget: DEFAULT_MAX_COMBINATIONS,
            strategy: ZiCombineStrategy::default(),
            seed: None,
            axes: Vec::new(),
            completion: None,
        }
    }
}

impl ZiPipelineConfig {
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(raw)
            .map_err(|e| ZiError::configuration(format!("invalid pipeline yaml: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| ZiError::configuration(format!("invalid pipeline json: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a `.yaml`/`.yml` file as YAML, anything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);
        if is_yaml {
            Self::from_yaml_str(&raw)
        } else {
            Self::from_json_str(&raw)
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (i, axis) in self.axes.iter().enumerate() {
            axis.validate().map_err(|e| {
                ZiError::validation(format!("axis #{} ({}): {}", i, axis.axis_name(), e))
            })?;
        }
        Ok(())
    }

    fn builder(&self) -> ZiPipelineBuilder {
        let mut builder = ZiPipelineBuilder::new()
            .budget(self.budget)
            .strategy(self.strategy);
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        for axis in &self.axes {
            builder = builder.axis_config(axis.clone());
        }
        builder
    }

    /// Builds the pipeline, creating the HTTP completion service when configured.
    pub fn build(&self) -> Result<ZiPromptPipeline> {
        self.validate()?;
        let mut builder = self.builder();
        if let Some(service) = self.completion_service()? {
            builder = builder.completion(service);
        }
        builder.build()
    }

    /// Builds the pipeline with an injected completion service.
    pub fn build_with(&self, completion: Arc<dyn ZiCompletionService>) -> Result<ZiPromptPipeline> {
        self.validate()?;
        self.builder().completion(completion).build()
    }

    #[cfg(feature = "http")]
    fn completion_service(&self) -> Result<Option<Arc<dyn ZiCompletionService>>> {
        match &self.completion {
            Some(config) => {
                let service = crate::completion::ZiHttpCompletion::new(config.clone())?;
                Ok(Some(Arc::new(service)))
            }
            None => Ok(None),
        }
    }

    #[cfg(not(feature = "http"))]
    fn completion_service(&self) -> Result<Option<Arc<dyn ZiCompletionService>>> {
        if self.completion.is_some() {
            log::warn!("completion config ignored: built without the 'http' feature");
        }
        Ok(None)
    }
}
