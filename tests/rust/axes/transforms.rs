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

//! # ZiPrompt Tests - Surface Transforms
//!
//! Tests for typo injection, case flips, character swaps and whitespace
//! randomization.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test transforms
//! ```

use ziprompt::transforms::{
    add_white_spaces, butter_finger, change_char_case, split_whitespace_runs, swap_characters,
    ZiKeyboardLayout, ZiSurfaceParams, ZiSurfaceTransform,
};

const SAMPLE: &str = "The Quick brown fox jumps over the lazy dog 42 times.";

/// Probability zero leaves the text untouched for every transform.
#[test]
fn zero_probability_is_identity() {
    assert_eq!(butter_finger(SAMPLE, 0.0, "qwerty", 1, 3), vec![SAMPLE; 3]);
    assert_eq!(change_char_case(SAMPLE, 0.0, 1, 3), vec![SAMPLE; 3]);
    assert_eq!(swap_characters(SAMPLE, 0.0, 1, 3), vec![SAMPLE; 3]);
    assert_eq!(add_white_spaces(SAMPLE, 0.0, 1, 3), vec![SAMPLE; 3]);
}

/// Probability one inverts the case of every alphabetic character.
#[test]
fn full_case_flip_inverts_letters() {
    let out = change_char_case("aBc 1-Z", 1.0, 9, 1);
    assert_eq!(out, vec!["AbC 1-z"]);
}

/// Same seed and input give the same variants.
#[test]
fn transforms_are_deterministic_per_seed() {
    for transform in ZiSurfaceTransform::ALL {
        let params = ZiSurfaceParams {
            typo_prob: 0.3,
            case_prob: 0.3,
            swap_prob: 0.3,
            ..Default::default()
        };
        assert_eq!(
            params.apply(transform, SAMPLE, 77),
            params.apply(transform, SAMPLE, 77),
            "{} not deterministic",
            transform.name()
        );
    }
}

/// Typos only come from the adjacency table and keep uppercase sources uppercase.
#[test]
fn typos_stay_on_adjacent_keys() {
    let out = butter_finger("QWERTY", 1.0, "qwerty", 3, 5);
    for variant in out {
        assert_eq!(variant.chars().count(), 6);
        for (src, dst) in "QWERTY".chars().zip(variant.chars()) {
            assert!(dst.is_ascii_uppercase());
            let keys = ZiKeyboardLayout::Qwerty
                .adjacent(src.to_ascii_lowercase())
                .unwrap();
            assert!(keys.contains(dst.to_ascii_lowercase()));
        }
    }
}

/// Characters outside the table pass through even at probability one.
#[test]
fn typos_skip_unmapped_characters() {
    let out = butter_finger("123!?", 1.0, "qwerty", 4, 1);
    assert_eq!(out, vec!["123!?"]);
}

/// Unknown layouts degrade to returning the input.
#[test]
fn unsupported_layout_returns_input() {
    assert_eq!(butter_finger("hello", 1.0, "dvorak", 1, 2), vec!["hello"; 2]);
    assert_eq!(ZiKeyboardLayout::from_name("querty"), Some(ZiKeyboardLayout::Qwerty));
    assert!(ZiKeyboardLayout::parse("azerty").unwrap_err().is_configuration());
}

/// Strings of at most one character are never swapped.
#[test]
fn swap_short_strings_unchanged() {
    assert_eq!(swap_characters("", 1.0, 1, 3), vec![""; 3]);
    assert_eq!(swap_characters("x", 1.0, 1, 3), vec!["x"; 3]);
}

/// Swaps permute characters without adding or dropping any.
#[test]
fn swap_preserves_multiset() {
    for variant in swap_characters(SAMPLE, 0.5, 11, 5) {
        let mut a: Vec<char> = variant.chars().collect();
        let mut b: Vec<char> = SAMPLE.chars().collect();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }
}

/// Equal-length strings under the same seed do not share a swap pattern.
#[test]
fn swap_seed_depends_on_text() {
    let a = "abcdefghijklmnopqrstuvwxyz";
    let b = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let pattern = |text: &str, out: &str| -> Vec<bool> {
        text.chars().zip(out.chars()).map(|(x, y)| x != y).collect()
    };
    let out_a = swap_characters(a, 0.4, 5, 1).remove(0);
    let out_b = swap_characters(b, 0.4, 5, 1).remove(0);
    assert_ne!(pattern(a, &out_a), pattern(b, &out_b));
}

/// Whitespace runs become 1-3 newline, tab or space symbols; words survive.
#[test]
fn whitespace_runs_are_rebuilt() {
    for variant in add_white_spaces("one two  three\tfour", 1.0, 21, 10) {
        let words: Vec<&str> = variant.split_whitespace().collect();
        assert_eq!(words, vec!["one", "two", "three", "four"]);
        for (token, is_space) in split_whitespace_runs(&variant) {
            if is_space {
                assert!(token.chars().all(|c| matches!(c, '\n' | '\t' | ' ')));
            }
        }
    }
}

/// Tokens are split without losing characters.
#[test]
fn split_round_trips_text() {
    let text = "\tleading and trailing \n";
    let joined: String = split_whitespace_runs(text).into_iter().map(|(t, _)| t).collect();
    assert_eq!(joined, text);
}
