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

//! # ZiPrompt Core Library
//!
//! ZiPrompt produces meaning-preserving variants of a prompt along independent
//! axes and assembles a bounded, deduplicated set of fully combined prompts
//! for multi-prompt model evaluation.
//!
//! ## Module Overview
//!
//! - **seed**: Explicit RNG derivation; every randomized step takes a seed
//! - **transforms**: Surface noise algorithms (typos, case, swaps, whitespace)
//! - **augmenter**: The axis contract, shared parameters and axis configs
//! - **axes**: Surface, context, paraphrase, few-shot, multi-document and
//!   multiple-choice axes
//! - **fewshot**: Exemplar pools and few-shot block sampling
//! - **multidoc**: Corpus sampling and bounded document permutations
//! - **completion**: Injected completion service (HTTP client behind `http`)
//! - **variation**: Axis name to variation list mapping
//! - **combiner**: Budgeted cross-product assembly
//! - **pipeline**: Runs axes and combines their output
//! - **config**: YAML/JSON pipeline configuration
//!
//! ## Feature Flags
//!
//! - `http`: Blocking HTTP completion service (reqwest)
//! - `parallel`: Axes evaluated in parallel (rayon)
//! - `full`: Enables all features
//!
//! ## Quick Start
//!
//! ```rust
//! use ziprompt::{ZiAugmenterConfig, ZiAxisConfig, ZiPromptInput, ZiPromptPipeline};
//!
//! let pipeline = ZiPromptPipeline::builder()
//!     .axis_config(ZiAxisConfig::surface(ZiAugmenterConfig::default().with_n_augments(4)))
//!     .budget(10)
//!     .seed(42)
//!     .build()?;
//!
//! let output = pipeline.run(&ZiPromptInput::new("What is the capital of France?"), None)?;
//! for variant in &output.combined {
//!     println!("{}", variant);
//! }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return `Result<T, ZiError>`. Only structurally
//! invalid configuration is an error; completion-service failures and
//! degenerate inputs fall back to the unmodified prompt.

pub mod errors;
pub mod seed;
pub mod transforms;
pub mod variation;
pub mod completion;
pub mod fewshot;
pub mod multidoc;
pub mod augmenter;
pub mod axes;
pub mod combiner;
pub mod pipeline;
pub mod config;

pub use errors::{Result, ZiError};
pub use seed::{rng_for, seeded_rng, text_seed};
pub use transforms::{
    add_white_spaces, butter_finger, change_char_case, swap_characters, ZiKeyboardLayout,
    ZiSurfaceParams, ZiSurfaceTransform,
};
pub use variation::{ZiVariationList, ZiVariationSet};
pub use completion::{ZiCompletionService, ZiFnCompletion, ZiHttpCompletionConfig};
#[cfg(feature = "http")]
pub use completion::ZiHttpCompletion;
pub use fewshot::{ZiExemplar, ZiExemplarPool, ZiFewShotSampler};
pub use multidoc::{add_random_contexts, permute_docs_order, ZiDocSeparator};
pub use augmenter::{
    axis_factory, execute_axis, ZiAugmenterConfig, ZiAxisAugmenter, ZiAxisConfig, ZiAxisContext,
};
pub use axes::{
    ZiChoiceSet, ZiContextAugmenter, ZiContextPlacement, ZiEnumerationStyle, ZiFewShotAugmenter,
    ZiMultiDocAugmenter, ZiMultipleChoiceAugmenter, ZiParaphraseAugmenter, ZiTextSurfaceAugmenter,
};
pub use combiner::{ZiCombineStrategy, ZiCombinedVariant, ZiVariantCombiner};
pub use pipeline::{ZiPipelineBuilder, ZiPipelineOutput, ZiPromptInput, ZiPromptPipeline};
pub use config::ZiPipelineConfig;
