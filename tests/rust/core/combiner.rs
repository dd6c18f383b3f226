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

//! # ZiPrompt Tests - Combiner
//!
//! Tests for budget enforcement, deduplication, slot substitution and the
//! nested and sampled strategies.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test combiner
//! ```

use std::collections::HashSet;

use ziprompt::combiner::{ZiCombineStrategy, ZiVariantCombiner};
use ziprompt::variation::ZiVariationSet;

fn variation_set(entries: Vec<(&str, Vec<&str>)>) -> ZiVariationSet {
    entries.into_iter().collect()
}

/// Duplicate renderings collapse: two surface variants times one context variant.
#[test]
fn combines_surface_and_context() {
    let set = variation_set(vec![
        ("surface", vec!["Hello world", "Hxllo wor1d"]),
        ("context", vec!["Hello world"]),
    ]);
    let out = ZiVariantCombiner::new(10).combine(&set, "{SURFACE} — {CONTEXT}");
    assert_eq!(out, vec!["Hello world — Hello world", "Hxllo wor1d — Hello world"]);
}

/// Output never exceeds the budget, whichever strategy is used.
#[test]
fn budget_is_enforced() {
    let list: Vec<String> = (0..10).map(|i| i.to_string()).collect();
    let list: Vec<&str> = list.iter().map(String::as_str).collect();
    let set = variation_set(vec![("a", list.clone()), ("b", list.clone()), ("c", list)]);

    for strategy in [
        ZiCombineStrategy::Auto,
        ZiCombineStrategy::Nested,
        ZiCombineStrategy::Sampled,
    ] {
        let out = ZiVariantCombiner::new(25)
            .with_strategy(strategy)
            .with_seed(1)
            .combine(&set, "{A}{B}{C}");
        assert!(out.len() <= 25);
        assert_eq!(out.iter().collect::<HashSet<_>>().len(), out.len());
    }
}

/// Large spaces under the auto strategy are sampled, not enumerated in order.
#[test]
fn auto_samples_large_spaces() {
    let list: Vec<String> = (0..10).map(|i| i.to_string()).collect();
    let list: Vec<&str> = list.iter().map(String::as_str).collect();
    let set = variation_set(
        ["a", "b", "c", "d", "e", "f"]
            .into_iter()
            .map(|key| (key, list.clone()))
            .collect(),
    );
    let out = ZiVariantCombiner::new(20).with_seed(3).combine(&set, "{A}{B}{C}{D}{E}{F}");
    assert_eq!(out.len(), 20);
    assert_ne!(out[1], "000001");
}

/// Sampling is reproducible under a seed.
#[test]
fn sampled_is_deterministic() {
    let set = variation_set(vec![("a", vec!["1", "2", "3"]), ("b", vec!["x", "y", "z"])]);
    let combiner = ZiVariantCombiner::new(4)
        .with_strategy(ZiCombineStrategy::Sampled)
        .with_seed(9);
    assert_eq!(combiner.combine(&set, "{A}{B}"), combiner.combine(&set, "{A}{B}"));
}

/// Small spaces are enumerated in full.
#[test]
fn nested_covers_small_space() {
    let set = variation_set(vec![("a", vec!["1", "2", "3"]), ("b", vec!["x", "y"])]);
    let out = ZiVariantCombiner::new(100).combine(&set, "{A}{B}");
    assert_eq!(out.len(), 6);
}

/// Axes with no variations substitute the empty string.
#[test]
fn empty_axis_is_no_op() {
    let set = variation_set(vec![("task", vec!["Add 2 and 3."]), ("examples", vec![])]);
    let out = ZiVariantCombiner::new(5).combine(&set, "{EXAMPLES}{TASK}");
    assert_eq!(out, vec!["Add 2 and 3."]);
}

/// Unselected upper-case slots vanish while other braces stay.
#[test]
fn absent_slots_degrade() {
    let set = variation_set(vec![("task", vec!["Return {\"a\": 1}"])]);
    let out = ZiVariantCombiner::new(5).combine(&set, "{CHOICES}{TASK} as {json}");
    assert_eq!(out, vec!["Return {\"a\": 1} as {json}"]);
}

/// Detailed output reports the index chosen per axis.
#[test]
fn detailed_reports_indices() {
    let set = variation_set(vec![("a", vec!["p", "q"]), ("b", vec!["r"])]);
    let out = ZiVariantCombiner::new(10).combine_detailed(&set, "{A}{B}");
    assert_eq!(out[1].text, "qr");
    assert_eq!(out[1].indices, vec![1, 0]);
}

/// The default template lists one slot per axis.
#[test]
fn default_template_lists_axes() {
    let set = variation_set(vec![("task description", vec!["t"]), ("fewshot", vec!["f"])]);
    assert_eq!(
        ZiVariantCombiner::default_template(&set),
        "{TASK_DESCRIPTION}\n{FEWSHOT}"
    );
}
