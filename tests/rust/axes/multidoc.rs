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

//! # ZiPrompt Tests - Multi-Document
//!
//! Tests for corpus sampling, permutation bounds and document rendering.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test multidoc
//! ```

use std::collections::HashSet;

use ziprompt::augmenter::{ZiAugmenterConfig, ZiAxisAugmenter, ZiAxisContext};
use ziprompt::axes::ZiMultiDocAugmenter;
use ziprompt::multidoc::{add_random_contexts, permute_docs_order, ZiDocSeparator};
use ziprompt::seed::seeded_rng;

fn docs(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Permutation count is `min(n, len!)` and every ordering is distinct.
#[test]
fn permutations_bounded_by_factorial() {
    let three = docs(&["a", "b", "c"]);
    let out = permute_docs_order(&three, 10, &mut seeded_rng(1));
    assert_eq!(out.len(), 6);
    assert_eq!(out.iter().collect::<HashSet<_>>().len(), 6);

    let out = permute_docs_order(&three, 4, &mut seeded_rng(1));
    assert_eq!(out.len(), 4);
    assert_eq!(out.iter().collect::<HashSet<_>>().len(), 4);
}

/// Zero or one document gives exactly one trivial ordering.
#[test]
fn trivial_lists_single_ordering() {
    assert_eq!(permute_docs_order(&docs(&["only"]), 5, &mut seeded_rng(2)), vec![docs(&["only"])]);
    assert_eq!(permute_docs_order(&[], 5, &mut seeded_rng(2)), vec![Vec::<String>::new()]);
}

/// New documents are drawn without replacement and skip those already present.
#[test]
fn random_contexts_exclude_present() {
    let base = docs(&["a", "b"]);
    let corpus = docs(&["a", "c", "d", "e", "c"]);
    let out = add_random_contexts(&base, &corpus, 2, &mut seeded_rng(3));
    assert_eq!(&out[..2], &base[..]);
    assert_eq!(out.len(), 4);
    let added: HashSet<_> = out[2..].iter().collect();
    assert_eq!(added.len(), 2);
    assert!(out[2..].iter().all(|d| ["c", "d", "e"].contains(&d.as_str())));

    let capped = add_random_contexts(&base, &corpus, 10, &mut seeded_rng(3));
    assert_eq!(capped.len(), 5);
}

/// Rendering styles follow their separators.
#[test]
fn separators_render() {
    let pair = docs(&["x", "y"]);
    assert_eq!(ZiDocSeparator::SingleDoc.render(&pair), "x\ny");
    assert_eq!(ZiDocSeparator::DoubleNewlines.render(&pair), "x\n\ny");
    assert_eq!(ZiDocSeparator::Titles.render(&pair), "Document 1: x\n\nDocument 2: y");
    assert_eq!(
        ZiDocSeparator::Dashes.render(&pair),
        format!("x\n{}\ny", "-".repeat(20))
    );
}

/// The axis keeps the original order first and yields distinct orderings.
#[test]
fn axis_permutes_context_documents() {
    let config = ZiAugmenterConfig::default().with_n_augments(4).with_seed(5);
    let axis = ZiMultiDocAugmenter::new(config)
        .unwrap()
        .with_separator(ZiDocSeparator::SingleDoc);
    let ctx = ZiAxisContext::new().with_documents(docs(&["one", "two", "three"]));
    let out = axis.augment("ignored", Some(&ctx)).unwrap();
    assert_eq!(out[0], "one\ntwo\nthree");
    assert_eq!(out.len(), 4);
    assert_eq!(out.iter().collect::<HashSet<_>>().len(), 4);
}

/// A lone prompt with no corpus has nothing to reorder.
#[test]
fn axis_single_document_is_prompt() {
    let axis = ZiMultiDocAugmenter::new(ZiAugmenterConfig::default()).unwrap();
    assert_eq!(axis.augment("solo", None).unwrap(), vec!["solo"]);
}

/// Corpus documents extend the set before permutation.
#[test]
fn axis_adds_corpus_documents() {
    let config = ZiAugmenterConfig::default().with_n_augments(3).with_seed(9);
    let axis = ZiMultiDocAugmenter::new(config).unwrap().with_new_docs(1);
    let ctx = ZiAxisContext::new()
        .with_documents(docs(&["base"]))
        .with_corpus(docs(&["extra"]));
    let out = axis.augment("base", Some(&ctx)).unwrap();
    assert_eq!(out[0], "base\n\nextra");
    assert_eq!(out, vec!["base\n\nextra", "extra\n\nbase"]);
}
