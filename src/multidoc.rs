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

//! # Multi-Document Operations
//!
//! Corpus sampling and document-order permutation for multi-document prompts.
//! Permutations are drawn as ranks in the factorial number system, so the
//! `n!` permutation space is never materialized.

use std::collections::HashSet;

use rand::seq::{index, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEPARATOR_LENGTH: usize = 20;
pub const DOC_TITLE_PREFIX: &str = "Document";

/// Largest document count whose `n!` still fits a 64-bit rank.
const MAX_RANKED_DOCS: usize = 20;

/// `n!`, or `None` on overflow.
pub fn factorial(n: usize) -> Option<u128> {
    (1..=n as u128).try_fold(1u128, |acc, k| acc.checked_mul(k))
}

/// Appends up to `n_new_docs` corpus documents not already in `docs`.
///
/// Sampling is without replacement; the original documents keep their
/// positions at the front. A corpus with fewer candidates yields fewer
/// additions.
pub fn add_random_contexts<R: Rng + ?Sized>(
    docs: &[String],
    corpus: &[String],
    n_new_docs: usize,
    rng: &mut R,
) -> Vec<String> {
    let present: HashSet<&str> = docs.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    let candidates: Vec<&String> = corpus
        .iter()
        .filter(|doc| !present.contains(doc.as_str()) && seen.insert(doc.as_str()))
        .collect();

    let amount = n_new_docs.min(candidates.len());
    if amount < n_new_docs {
        log::debug!(
            "corpus offers {} new documents, {} requested",
            candidates.len(),
            n_new_docs
        );
    }

    let mut augmented = docs.to_vec();
    augmented.extend(
        index::sample(rng, candidates.len(), amount)
            .into_iter()
            .map(|idx| candidates[idx].clone()),
    );
    augmented
}

fn nth_permutation(docs: &[String], mut rank: u128) -> Vec<String> {
    let mut remaining: Vec<&String> = docs.iter().collect();
    let mut ordering = Vec::with_capacity(docs.len());
    for slot in (0..docs.len()).rev() {
        let block = factorial(slot).unwrap_or(1);
        let idx = (rank / block) as usize;
        rank %= block;
        ordering.push(remaining.remove(idx).clone());
    }
    ordering
}

/// Draws `min(n_permutations, len(docs)!)` distinct orderings without replacement.
///
/// A list of at most one document yields exactly one trivial ordering.
pub fn permute_docs_order<R: Rng + ?Sized>(
    docs: &[String],
    n_permutations: usize,
    rng: &mut R,
) -> Vec<Vec<String>> {
    if docs.len() <= 1 {
        return vec![docs.to_vec()];
    }

    if docs.len() <= MAX_RANKED_DOCS {
        let total = factorial(docs.len())
            .and_then(|f| usize::try_from(f).ok())
            .unwrap_or(usize::MAX);
        let amount = n_permutations.min(total);
        return index::sample(rng, total, amount)
            .into_iter()
            .map(|rank| nth_permutation(docs, rank as u128))
            .collect();
    }

    // Beyond 20! every requested count fits the space; collisions are only
    // rejected, never expected.
    let mut seen: HashSet<Vec<usize>> = HashSet::new();
    let mut orderings = Vec::with_capacity(n_permutations);
    let mut positions: Vec<usize> = (0..docs.len()).collect();
    let max_attempts = n_permutations.saturating_mul(4);
    let mut attempts = 0;
    while orderings.len() < n_permutations && attempts < max_attempts {
        attempts += 1;
        positions.shuffle(rng);
        if seen.insert(positions.clone()) {
            orderings.push(positions.iter().map(|&i| docs[i].clone()).collect());
        }
    }
    orderings
}

/// How an ordering of documents is rendered into a single prompt segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZiDocSeparator {
    #[serde(rename = "single_doc")]
    SingleDoc,
    #[serde(rename = "2_newlines")]
    DoubleNewlines,
    #[serde(rename = "titles")]
    Titles,
    #[serde(rename = "dashes")]
    Dashes,
}

impl Default for ZiDocSeparator {
    fn default() -> Self {
        Self::DoubleNewlines
    }
}

impl ZiDocSeparator {
    pub fn render(&self, docs: &[String]) -> String {
        match self {
            Self::SingleDoc => docs.join("\n"),
            Self::DoubleNewlines => docs.join("\n\n"),
            Self::Titles => docs
                .iter()
                .enumerate()
                .map(|(i, doc)| format!("{} {}: {}", DOC_TITLE_PREFIX, i + 1, doc))
                .collect::<Vec<_>>()
                .join("\n\n"),
            Self::Dashes => {
                let rule = format!("\n{}\n", "-".repeat(DEFAULT_SEPARATOR_LENGTH));
                docs.join(&rule)
            }
        }
    }
}
