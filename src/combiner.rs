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

//! # Variant Combiner Module
//!
//! Assembles full prompts from a [`ZiVariationSet`] by substituting one
//! variation per axis into a placeholder template.
//!
//! The cross product is never materialized in full. At most `budget` combined
//! variants are produced:
//!
//! - `Nested`: odometer iteration (last axis fastest) with early exit
//! - `Sampled`: random index tuples without repetition, bounded attempts
//! - `Auto`: `Nested` when the whole cross product fits the budget, else `Sampled`
//!
//! Rendered strings are deduplicated. An axis with an empty variation list
//! contributes the empty string to its slot; an axis the template never
//! mentions is held at its first variation.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use rand::Rng;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::seed::rng_for;
use crate::variation::{placeholder, slot_name, ZiVariationSet};

pub const DEFAULT_MAX_COMBINATIONS: usize = 100;

/// Attempt multiplier for bounded iteration.
const ATTEMPT_FACTOR: usize = 4;

/// How combinations are enumerated when building variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZiCombineStrategy {
    Auto,
    Nested,
    Sampled,
}

impl Default for ZiCombineStrategy {
    fn default() -> Self {
        ZiCombineStrategy::Auto
    }
}

/// One rendered prompt with the variation index chosen per axis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiCombinedVariant {
    pub text: String,
    pub indices: Vec<usize>,
}

fn slot_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{([^{}]+)\}").expect("slot pattern is valid"))
}

fn looks_like_slot(inner: &str) -> bool {
    !inner.is_empty()
        && inner.chars().any(|c| c.is_ascii_uppercase())
        && inner
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Template with every slot resolved to an axis position once.
struct ZiCompiledTemplate<'a> {
    template: &'a str,
    slots: HashMap<String, usize>,
    referenced: HashSet<usize>,
}

impl<'a> ZiCompiledTemplate<'a> {
    fn new(template: &'a str, set: &ZiVariationSet) -> Self {
        let mut slots = HashMap::new();
        for (position, key) in set.keys().enumerate() {
            slots.entry(slot_name(key)).or_insert(position);
        }
        let referenced = slot_pattern()
            .captures_iter(template)
            .filter_map(|caps| slots.get(&slot_name(&caps[1])).copied())
            .collect();
        Self {
            template,
            slots,
            referenced,
        }
    }

    /// Whether the axis at `position` has a slot in the template.
    fn references(&self, position: usize) -> bool {
        self.referenced.contains(&position)
    }

    /// Single pass: substituted values are never rescanned for slots.
    fn render(&self, values: &[&str]) -> String {
        slot_pattern()
            .replace_all(self.template, |caps: &Captures| {
                let inner = &caps[1];
                match self.slots.get(&slot_name(inner)) {
                    Some(&position) => values.get(position).copied().unwrap_or("").to_string(),
                    None if looks_like_slot(inner) => String::new(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

/// Bounded cross-product assembler.
#[derive(Clone, Debug)]
pub struct ZiVariantCombiner {
    budget: usize,
    strategy: ZiCombineStrategy,
    seed: Option<u64>,
}

impl Default for ZiVariantCombiner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COMBINATIONS)
    }
}

impl ZiVariantCombiner {
    pub fn new(budget: usize) -> Self {
        Self {
            budget,
            strategy: ZiCombineStrategy::default(),
            seed: None,
        }
    }

    pub fn with_strategy(mut self, strategy: ZiCombineStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn strategy(&self) -> ZiCombineStrategy {
        self.strategy
    }

    /// Template with one placeholder per axis, one per line, in axis order.
    pub fn default_template(set: &ZiVariationSet) -> String {
        set.keys().map(placeholder).collect::<Vec<_>>().join("\n")
    }

    pub fn combine(&self, set: &ZiVariationSet, template: &str) -> Vec<String> {
        self.combine_detailed(set, template)
            .into_iter()
            .map(|variant| variant.text)
            .collect()
    }

    /// Combined variants with the per-axis indices that produced them.
    pub fn combine_detailed(&self, set: &ZiVariationSet, template: &str) -> Vec<ZiCombinedVariant> {
        if self.budget == 0 {
            return Vec::new();
        }

        let empty = [String::new()];
        let compiled = ZiCompiledTemplate::new(template, set);
        // Axes without a slot cannot change the rendering; they stay at index 0.
        let lists: Vec<&[String]> = set
            .iter()
            .enumerate()
            .map(|(position, (_, list))| match list.len() {
                0 => &empty[..],
                _ if !compiled.references(position) => &list[..1],
                _ => list.as_slice(),
            })
            .collect();
        let total = lists
            .iter()
            .try_fold(1u128, |acc, list| acc.checked_mul(list.len() as u128));

        let fits = total.map_or(false, |size| size <= self.budget as u128);
        let strategy = match self.strategy {
            ZiCombineStrategy::Auto if fits => ZiCombineStrategy::Nested,
            ZiCombineStrategy::Auto => ZiCombineStrategy::Sampled,
            other => other,
        };

        let variants = match strategy {
            ZiCombineStrategy::Sampled => self.sampled(&lists, &compiled, total),
            _ => self.nested(&lists, &compiled),
        };
        log::debug!(
            "combined {} variants from {} axes ({:?})",
            variants.len(),
            lists.len(),
            strategy
        );
        variants
    }

    fn nested(
        &self,
        lists: &[&[String]],
        compiled: &ZiCompiledTemplate<'_>,
    ) -> Vec<ZiCombinedVariant> {
        let mut collector = ZiVariantCollector::new(self.budget);
        let mut indices = vec![0usize; lists.len()];
        let max_duplicates = self.budget.saturating_mul(ATTEMPT_FACTOR);
        let mut duplicates = 0;

        loop {
            if !collector.offer(lists, &indices, compiled) {
                duplicates += 1;
            }
            if collector.is_full() || duplicates >= max_duplicates {
                break;
            }

            // Odometer step; wraps past the first axis when exhausted.
            let mut axis = lists.len();
            let mut advanced = false;
            while axis > 0 {
                axis -= 1;
                indices[axis] += 1;
                if indices[axis] < lists[axis].len() {
                    advanced = true;
                    break;
                }
                indices[axis] = 0;
            }
            if !advanced {
                break;
            }
        }
        collector.into_variants()
    }

    fn sampled(
        &self,
        lists: &[&[String]],
        compiled: &ZiCompiledTemplate<'_>,
        total: Option<u128>,
    ) -> Vec<ZiCombinedVariant> {
        let mut rng = rng_for(self.seed);
        let mut collector = ZiVariantCollector::new(self.budget);
        let mut seen_tuples: HashSet<Vec<usize>> = HashSet::new();
        let max_attempts = self.budget.saturating_mul(ATTEMPT_FACTOR);
        let mut attempts = 0;

        while !collector.is_full() && attempts < max_attempts {
            if let Some(total) = total {
                if seen_tuples.len() as u128 >= total {
                    break;
                }
            }
            attempts += 1;
            let indices: Vec<usize> = lists
                .iter()
                .map(|list| rng.gen_range(0..list.len()))
                .collect();
            if !seen_tuples.insert(indices.clone()) {
                continue;
            }
            collector.offer(lists, &indices, compiled);
        }
        collector.into_variants()
    }
}

/// Deduplicating, budget-capped output buffer.
struct ZiVariantCollector {
    budget: usize,
    seen: HashSet<String>,
    variants: Vec<ZiCombinedVariant>,
}

impl ZiVariantCollector {
    fn new(budget: usize) -> Self {
        Self {
            budget,
            seen: HashSet::new(),
            variants: Vec::new(),
        }
    }

    fn is_full(&self) -> bool {
        self.variants.len() >= self.budget
    }

    /// Renders one combination; `false` when it duplicates an earlier one.
    fn offer(
        &mut self,
        lists: &[&[String]],
        indices: &[usize],
        compiled: &ZiCompiledTemplate<'_>,
    ) -> bool {
        if self.is_full() {
            return false;
        }
        let values: Vec<&str> = lists
            .iter()
            .zip(indices)
            .map(|(list, &i)| list[i].as_str())
            .collect();
        let text = compiled.render(&values);
        if !self.seen.insert(text.clone()) {
            return false;
        }
        self.variants.push(ZiCombinedVariant {
            text,
            indices: indices.to_vec(),
        });
        true
    }

    fn into_variants(self) -> Vec<ZiCombinedVariant> {
        self.variants
    }
}
