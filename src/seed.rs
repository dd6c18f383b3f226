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

//! # Seed Policy
//!
//! Every randomized algorithm in ZiPrompt receives its randomness through an
//! explicit generator handle. There is no process-global random state.
//!
//! - A caller seed fixes a whole run: same seed and same input give the same
//!   output.
//! - Algorithms that must vary per input under a fixed caller seed combine the
//!   seed with a stable hash of the text ([`text_seed`]), so two unrelated
//!   strings of equal length are not perturbed identically.
//! - Without a caller seed the generator is drawn from OS entropy.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Modulus applied to text-derived seeds.
pub const TEXT_SEED_MODULUS: u64 = 1 << 32;

/// Sum of the text's character codes.
pub fn text_hash(text: &str) -> u64 {
    text.chars().fold(0u64, |acc, ch| acc.wrapping_add(ch as u64))
}

/// Combines a caller seed with the text hash, reduced modulo [`TEXT_SEED_MODULUS`].
pub fn text_seed(caller_seed: u64, text: &str) -> u64 {
    caller_seed.wrapping_add(text_hash(text)) % TEXT_SEED_MODULUS
}

/// Deterministic generator for a fixed seed.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Generator for an optional caller seed; entropy-backed when absent.
pub fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Generator keyed on both the caller seed and the text being perturbed.
pub fn rng_for_text(seed: Option<u64>, text: &str) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(text_seed(s, text)),
        None => StdRng::from_entropy(),
    }
}

/// Draws a child seed so nested algorithms stay reproducible under one parent.
pub fn derive_seed<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    rng.gen()
}
