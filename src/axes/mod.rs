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

//! # Axes Module
//!
//! Concrete [`ZiAxisAugmenter`](crate::augmenter::ZiAxisAugmenter) variants.
//!
//! ## Axis Categories
//!
//! - **surface**: Typos, case flips, character swaps, whitespace noise
//! - **context**: Irrelevant context added by a completion service
//! - **paraphrase**: Alternative phrasings from a completion service
//! - **fewshot**: Exemplar block selection
//! - **multidoc**: Extra documents and document order
//! - **choice**: Multiple-choice enumeration style and option order

pub mod choice;
pub mod context;
pub mod fewshot;
pub mod multidoc;
pub mod paraphrase;
pub mod surface;

pub use choice::{ZiChoiceSet, ZiEnumerationStyle, ZiMultipleChoiceAugmenter};
pub use context::{ZiContextAugmenter, ZiContextPlacement};
pub use fewshot::ZiFewShotAugmenter;
pub use multidoc::ZiMultiDocAugmenter;
pub use paraphrase::{parse_string_list, ZiParaphraseAugmenter};
pub use surface::ZiTextSurfaceAugmenter;
