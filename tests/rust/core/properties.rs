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

//! # ZiPrompt Tests - Properties
//!
//! Property-based checks over generated text, pools, document lists and
//! variation sets.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test properties
//! ```

use std::collections::HashSet;

use proptest::prelude::*;
use ziprompt::combiner::{ZiCombineStrategy, ZiVariantCombiner};
use ziprompt::fewshot::{ZiExemplarPool, ZiFewShotSampler};
use ziprompt::multidoc::{factorial, permute_docs_order};
use ziprompt::seed::seeded_rng;
use ziprompt::transforms::{add_white_spaces, butter_finger, change_char_case, swap_characters};
use ziprompt::variation::ZiVariationSet;

proptest! {
    #[test]
    fn zero_probability_never_changes_text(text in ".{0,64}", seed in any::<u64>()) {
        prop_assert_eq!(butter_finger(&text, 0.0, "qwerty", seed, 2), vec![text.clone(); 2]);
        prop_assert_eq!(change_char_case(&text, 0.0, seed, 2), vec![text.clone(); 2]);
        prop_assert_eq!(swap_characters(&text, 0.0, seed, 2), vec![text.clone(); 2]);
        prop_assert_eq!(add_white_spaces(&text, 0.0, seed, 2), vec![text.clone(); 2]);
    }

    #[test]
    fn full_case_flip_inverts_ascii(text in "[a-zA-Z0-9 ,.]{0,48}", seed in any::<u64>()) {
        let flipped = change_char_case(&text, 1.0, seed, 1).remove(0);
        let expected: String = text
            .chars()
            .map(|c| if c.is_ascii_uppercase() { c.to_ascii_lowercase() } else { c.to_ascii_uppercase() })
            .collect();
        prop_assert_eq!(flipped, expected);
    }

    #[test]
    fn transforms_repeat_under_seed(text in "[a-z ]{0,40}", seed in any::<u64>()) {
        prop_assert_eq!(butter_finger(&text, 0.3, "qwerty", seed, 3), butter_finger(&text, 0.3, "qwerty", seed, 3));
        prop_assert_eq!(swap_characters(&text, 0.3, seed, 3), swap_characters(&text, 0.3, seed, 3));
        prop_assert_eq!(add_white_spaces(&text, 0.5, seed, 3), add_white_spaces(&text, 0.5, seed, 3));
    }

    #[test]
    fn swap_of_short_text_is_identity(text in ".{0,1}", prob in 0.0f64..=1.0, seed in any::<u64>()) {
        prop_assert_eq!(swap_characters(&text, prob, seed, 2), vec![text.clone(); 2]);
    }

    #[test]
    fn sampler_never_returns_question(
        inputs in proptest::collection::vec("[a-c]{1,2}", 0..8),
        question in "[a-c]{1,2}",
        num_examples in 0usize..5,
        seed in any::<u64>(),
    ) {
        let pool = ZiExemplarPool::from_pairs(inputs.iter().map(|i| (i.clone(), "out".to_string())));
        let drawn = ZiFewShotSampler::new(num_examples).sample(&question, &pool, &mut seeded_rng(seed));
        let available = inputs.iter().filter(|i| **i != question).count();
        prop_assert_eq!(drawn.len(), num_examples.min(available));
        prop_assert!(drawn.iter().all(|row| row.input != question));
    }

    #[test]
    fn permutation_count_is_bounded(len in 0usize..7, n in 0usize..30, seed in any::<u64>()) {
        let docs: Vec<String> = (0..len).map(|i| format!("doc{i}")).collect();
        let out = permute_docs_order(&docs, n, &mut seeded_rng(seed));
        if len <= 1 {
            prop_assert_eq!(out, vec![docs]);
        } else {
            let expected = (n as u128).min(factorial(len).unwrap_or(u128::MAX)) as usize;
            prop_assert_eq!(out.len(), expected);
            prop_assert_eq!(out.iter().collect::<HashSet<_>>().len(), expected);
        }
    }

    #[test]
    fn combiner_respects_budget(
        lists in proptest::collection::vec(proptest::collection::vec("[ab]{0,2}", 0..5), 0..5),
        budget in 0usize..40,
        sampled in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let set: ZiVariationSet = lists
            .into_iter()
            .enumerate()
            .map(|(i, list)| (format!("axis{i}"), list))
            .collect();
        let strategy = if sampled { ZiCombineStrategy::Sampled } else { ZiCombineStrategy::Nested };
        let out = ZiVariantCombiner::new(budget)
            .with_strategy(strategy)
            .with_seed(seed)
            .combine(&set, &ZiVariantCombiner::default_template(&set));
        prop_assert!(out.len() <= budget);
        prop_assert_eq!(out.iter().collect::<HashSet<_>>().len(), out.len());
    }
}
