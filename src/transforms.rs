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

//! # Text Surface Transforms
//!
//! Four independent noise algorithms that perturb the surface of a text
//! without touching its meaning:
//!
//! - [`butter_finger`]: keyboard-adjacent typo injection
//! - [`change_char_case`]: per-character case flip
//! - [`swap_characters`]: adjacent character transposition
//! - [`add_white_spaces`]: whitespace run randomization
//!
//! Each function takes an explicit seed and returns `max_outputs` variants
//! sampled from one generator stream, so the outputs differ from each other
//! while the whole call stays reproducible.

use std::sync::OnceLock;

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ZiError};
use crate::seed::{seeded_rng, text_seed};

pub const DEFAULT_TYPO_PROB: f64 = 0.05;
pub const DEFAULT_CASE_CHANGE_PROB: f64 = 0.1;
pub const DEFAULT_SWAP_PROB: f64 = 0.05;
pub const DEFAULT_WHITESPACE_PROB: f64 = 1.0;
pub const DEFAULT_MAX_OUTPUTS: usize = 1;

pub const MIN_WHITESPACE_COUNT: usize = 1;
pub const MAX_WHITESPACE_COUNT: usize = 3;

/// Replacement symbols for whitespace runs. The trailing empty option is part
/// of the table but lies outside `MIN_WHITESPACE_INDEX..=MAX_WHITESPACE_INDEX`.
pub const WHITE_SPACE_OPTIONS: [&str; 4] = ["\n", "\t", " ", ""];
pub const MIN_WHITESPACE_INDEX: usize = 0;
pub const MAX_WHITESPACE_INDEX: usize = 2;

/// Supported keyboard layouts for typo injection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZiKeyboardLayout {
    #[serde(alias = "querty")]
    Qwerty,
}

impl Default for ZiKeyboardLayout {
    fn default() -> Self {
        Self::Qwerty
    }
}

impl ZiKeyboardLayout {
    /// Looks up a layout by name, `None` when unsupported.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "qwerty" | "querty" => Some(Self::Qwerty),
            _ => None,
        }
    }

    /// Strict variant of [`Self::from_name`] used when reading configuration.
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_name(name).ok_or_else(|| {
            ZiError::configuration(format!("keyboard layout '{}' is not supported", name))
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Qwerty => "qwerty",
        }
    }

    /// Keys physically near `key` (lowercase), including the key itself.
    pub fn adjacent(&self, key: char) -> Option<&'static str> {
        match self {
            Self::Qwerty => qwerty_adjacent(key),
        }
    }
}

fn qwerty_adjacent(key: char) -> Option<&'static str> {
    let keys = match key {
        'q' => "qwasedzx",
        'w' => "wqesadrfcx",
        'e' => "ewrsfdqazxcvgt",
        'r' => "retdgfwsxcvgt",
        't' => "tryfhgedcvbnju",
        'y' => "ytugjhrfvbnji",
        'u' => "uyihkjtgbnmlo",
        'i' => "iuojlkyhnmlp",
        'o' => "oipklujm",
        'p' => "plo['ik",
        'a' => "aqszwxwdce",
        's' => "swxadrfv",
        'd' => "decsfaqgbv",
        'f' => "fdgrvwsxyhn",
        'g' => "gtbfhedcyjn",
        'h' => "hyngjfrvkim",
        'j' => "jhknugtblom",
        'k' => "kjlinyhn",
        'l' => "lokmpujn",
        'z' => "zaxsvde",
        'x' => "xzcsdbvfrewq",
        'c' => "cxvdfzswergb",
        'v' => "vcfbgxdertyn",
        'b' => "bvnghcftyun",
        'n' => "nbmhjvgtuik",
        'm' => "mnkjloik",
        ' ' => " ",
        _ => return None,
    };
    Some(keys)
}

fn clamp_probability(prob: f64) -> f64 {
    if prob.is_nan() {
        0.0
    } else {
        prob.clamp(0.0, 1.0)
    }
}

/// Introduces keyboard-adjacent typos with per-character probability `prob`.
///
/// Characters without an adjacency entry pass through unchanged and uppercase
/// sources stay uppercase. An unsupported `keyboard` degrades to returning the
/// input unchanged.
pub fn butter_finger(
    text: &str,
    prob: f64,
    keyboard: &str,
    seed: u64,
    max_outputs: usize,
) -> Vec<String> {
    let layout = match ZiKeyboardLayout::from_name(keyboard) {
        Some(layout) => layout,
        None => {
            log::warn!("keyboard layout '{}' not supported, leaving text unchanged", keyboard);
            return vec![text.to_string(); max_outputs.max(1)];
        }
    };
    butter_finger_with_layout(text, prob, layout, seed, max_outputs)
}

/// [`butter_finger`] for an already resolved layout.
pub fn butter_finger_with_layout(
    text: &str,
    prob: f64,
    layout: ZiKeyboardLayout,
    seed: u64,
    max_outputs: usize,
) -> Vec<String> {
    let prob = clamp_probability(prob);
    let mut rng = seeded_rng(seed);
    (0..max_outputs.max(1))
        .map(|_| {
            text.chars()
                .map(|ch| {
                    let lower = ch.to_ascii_lowercase();
                    let keys = match layout.adjacent(lower) {
                        Some(keys) => keys.as_bytes(),
                        None => return ch,
                    };
                    if !rng.gen_bool(prob) {
                        return ch;
                    }
                    let replacement = keys[rng.gen_range(0..keys.len())] as char;
                    if ch.is_uppercase() {
                        replacement.to_ascii_uppercase()
                    } else {
                        replacement
                    }
                })
                .collect()
        })
        .collect()
}

/// Flips the case of each alphabetic character independently with probability `prob`.
pub fn change_char_case(text: &str, prob: f64, seed: u64, max_outputs: usize) -> Vec<String> {
    let prob = clamp_probability(prob);
    let mut rng = seeded_rng(seed);
    (0..max_outputs.max(1))
        .map(|_| {
            let mut out = String::with_capacity(text.len());
            for ch in text.chars() {
                if ch.is_uppercase() && rng.gen_bool(prob) {
                    out.extend(ch.to_lowercase());
                } else if ch.is_lowercase() && rng.gen_bool(prob) {
                    out.extend(ch.to_uppercase());
                } else {
                    out.push(ch);
                }
            }
            out
        })
        .collect()
}

/// Transposes adjacent characters, each pair marked with probability `prob`.
///
/// Marked transpositions are applied in shuffled order. The generator is keyed
/// on `seed` and the text itself. Texts of at most one character come back
/// unchanged.
pub fn swap_characters(text: &str, prob: f64, seed: u64, max_outputs: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= 1 {
        return vec![text.to_string(); max_outputs.max(1)];
    }

    let prob = clamp_probability(prob);
    let mut rng = seeded_rng(text_seed(seed, text));
    let num_pairs = chars.len() - 1;

    (0..max_outputs.max(1))
        .map(|_| {
            let draws: Vec<f64> = (0..num_pairs).map(|_| rng.gen::<f64>()).collect();
            let mut indices: Vec<usize> = draws
                .iter()
                .enumerate()
                .filter(|(_, draw)| **draw < prob)
                .map(|(idx, _)| idx)
                .collect();
            indices.shuffle(&mut rng);

            let mut swapped = chars.clone();
            for idx in indices {
                swapped.swap(idx, idx + 1);
            }
            swapped.into_iter().collect()
        })
        .collect()
}

fn whitespace_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Splits text into alternating non-whitespace and whitespace-run tokens.
///
/// Concatenating the tokens reproduces the input exactly. The flag is `true`
/// for whitespace runs.
pub fn split_whitespace_runs(text: &str) -> Vec<(&str, bool)> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for run in whitespace_run().find_iter(text) {
        if run.start() > last {
            tokens.push((&text[last..run.start()], false));
        }
        tokens.push((run.as_str(), true));
        last = run.end();
    }
    if last < text.len() {
        tokens.push((&text[last..], false));
    }
    tokens
}

/// Replaces whitespace runs with 1-3 random newline, tab or space symbols.
///
/// Each run is randomized with probability `prob`; non-whitespace tokens are
/// copied through.
pub fn add_white_spaces(text: &str, prob: f64, seed: u64, max_outputs: usize) -> Vec<String> {
    let prob = clamp_probability(prob);
    let mut rng = seeded_rng(seed);
    let tokens = split_whitespace_runs(text);

    (0..max_outputs.max(1))
        .map(|_| {
            let mut out = String::with_capacity(text.len());
            for (token, is_space) in &tokens {
                if *is_space && rng.gen_bool(prob) {
                    let count = rng.gen_range(MIN_WHITESPACE_COUNT..=MAX_WHITESPACE_COUNT);
                    for _ in 0..count {
                        let idx = rng.gen_range(MIN_WHITESPACE_INDEX..=MAX_WHITESPACE_INDEX);
                        out.push_str(WHITE_SPACE_OPTIONS[idx]);
                    }
                } else {
                    out.push_str(token);
                }
            }
            out
        })
        .collect()
}

/// The four transforms as a closed set, so callers can pick one at random.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZiSurfaceTransform {
    ButterFinger,
    ChangeCase,
    SwapCharacters,
    WhiteSpaces,
}

impl ZiSurfaceTransform {
    pub const ALL: [ZiSurfaceTransform; 4] = [
        ZiSurfaceTransform::ButterFinger,
        ZiSurfaceTransform::ChangeCase,
        ZiSurfaceTransform::SwapCharacters,
        ZiSurfaceTransform::WhiteSpaces,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::ButterFinger => "butter_finger",
            Self::ChangeCase => "change_char_case",
            Self::SwapCharacters => "swap_characters",
            Self::WhiteSpaces => "add_white_spaces",
        }
    }
}

/// Per-transform probabilities and keyboard layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiSurfaceParams {
    pub typo_prob: f64,
    pub case_prob: f64,
    pub swap_prob: f64,
    pub whitespace_prob: f64,
    pub keyboard: ZiKeyboardLayout,
}

impl Default for ZiSurfaceParams {
    fn default() -> Self {
        Self {
            typo_prob: DEFAULT_TYPO_PROB,
            case_prob: DEFAULT_CASE_CHANGE_PROB,
            swap_prob: DEFAULT_SWAP_PROB,
            whitespace_prob: DEFAULT_WHITESPACE_PROB,
            keyboard: ZiKeyboardLayout::Qwerty,
        }
    }
}

impl ZiSurfaceParams {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("typo_prob", self.typo_prob),
            ("case_prob", self.case_prob),
            ("swap_prob", self.swap_prob),
            ("whitespace_prob", self.whitespace_prob),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ZiError::validation(format!(
                    "surface '{}' must be in [0,1]",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Runs a single transform once.
    pub fn apply(&self, transform: ZiSurfaceTransform, text: &str, seed: u64) -> String {
        let mut outputs = self.apply_many(transform, text, seed, DEFAULT_MAX_OUTPUTS);
        outputs.truncate(1);
        outputs.pop().unwrap_or_else(|| text.to_string())
    }

    /// Runs a transform with this parameter set, returning `max_outputs` variants.
    pub fn apply_many(
        &self,
        transform: ZiSurfaceTransform,
        text: &str,
        seed: u64,
        max_outputs: usize,
    ) -> Vec<String> {
        match transform {
            ZiSurfaceTransform::ButterFinger => {
                butter_finger_with_layout(text, self.typo_prob, self.keyboard, seed, max_outputs)
            }
            ZiSurfaceTransform::ChangeCase => {
                change_char_case(text, self.case_prob, seed, max_outputs)
            }
            ZiSurfaceTransform::SwapCharacters => {
                swap_characters(text, self.swap_prob, seed, max_outputs)
            }
            ZiSurfaceTransform::WhiteSpaces => {
                add_white_spaces(text, self.whitespace_prob, seed, max_outputs)
            }
        }
    }
}
