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

//! # ZiPrompt Tests - Few-Shot
//!
//! Tests for exemplar pools, question exclusion, sampling bounds and the
//! distinct-variant loop of the few-shot axis.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test fewshot
//! ```

use serde_json::json;
use ziprompt::augmenter::{ZiAugmenterConfig, ZiAxisAugmenter, ZiAxisContext};
use ziprompt::axes::ZiFewShotAugmenter;
use ziprompt::fewshot::{ZiExemplarPool, ZiFewShotSampler};
use ziprompt::seed::seeded_rng;

fn pool(n: usize) -> ZiExemplarPool {
    ZiExemplarPool::from_pairs((0..n).map(|i| (format!("{i} + {i}"), format!("{}", 2 * i))))
}

/// A one-row pool with three requested examples yields that single row.
#[test]
fn sample_caps_at_pool_size() {
    let pool = ZiExemplarPool::from_pairs([("2 + 2", "4")]);
    let sampler = ZiFewShotSampler::new(3);
    let drawn = sampler.sample("5 + 5", &pool, &mut seeded_rng(1));
    assert_eq!(drawn.len(), 1);
    assert_eq!(drawn[0].input, "2 + 2");
}

/// The target question is excluded, which may leave nothing to sample.
#[test]
fn sample_excludes_target_question() {
    let pool = ZiExemplarPool::from_pairs([("2 + 2", "4")]);
    let sampler = ZiFewShotSampler::new(3);
    assert!(sampler.sample("2 + 2", &pool, &mut seeded_rng(1)).is_empty());

    let bigger = pool_with_target();
    let mut rng = seeded_rng(2);
    for _ in 0..50 {
        let drawn = sampler.sample("target", &bigger, &mut rng);
        assert!(drawn.iter().all(|row| row.input != "target"));
    }
}

fn pool_with_target() -> ZiExemplarPool {
    let mut rows: Vec<(String, String)> =
        (0..4).map(|i| (format!("q{i}"), format!("a{i}"))).collect();
    rows.push(("target".into(), "answer".into()));
    ZiExemplarPool::from_pairs(rows)
}

/// Every pool question gets exemplars drawn from the other rows.
#[test]
fn sample_all_covers_every_question() {
    let pool = pool(5);
    for num_examples in [1, 3, 4, 9] {
        let all = ZiFewShotSampler::new(num_examples).sample_all(&pool, &mut seeded_rng(12));
        let questions: Vec<&str> = all.iter().map(|(q, _)| q.as_str()).collect();
        let expected: Vec<&str> = pool.rows().iter().map(|row| row.input.as_str()).collect();
        assert_eq!(questions, expected);
        for (question, exemplars) in &all {
            assert_eq!(exemplars.len(), num_examples.min(pool.len() - 1));
            assert!(exemplars.iter().all(|row| &row.input != question));
        }
    }

    let single = ZiExemplarPool::from_pairs([("only", "one")]);
    let all = ZiFewShotSampler::new(2).sample_all(&single, &mut seeded_rng(1));
    assert_eq!(all, vec![("only".to_string(), Vec::new())]);
}

/// Blocks use the fixed template and blank-line separator.
#[test]
fn block_is_formatted() {
    let pool = ZiExemplarPool::from_pairs([("hi", "hello"), ("bye", "goodbye")]);
    let block = ZiFewShotSampler::new(2).sample_block("other", &pool, &mut seeded_rng(3));
    let parts: Vec<&str> = block.split("\n\n").collect();
    assert_eq!(parts.len(), 2);
    for part in parts {
        assert!(part == "Input: hi\nOutput: hello" || part == "Input: bye\nOutput: goodbye");
    }
}

/// Distinct blocks never repeat and small pools return fewer than requested.
#[test]
fn distinct_blocks_bounded_by_pool() {
    let sampler = ZiFewShotSampler::new(1);
    let blocks = sampler.sample_distinct("none", &pool(2), 5, &mut seeded_rng(4));
    assert!(!blocks.is_empty());
    assert!(blocks.len() <= 2);
    assert_ne!(blocks.first(), blocks.get(1));

    let many = sampler.sample_distinct("none", &pool(30), 5, &mut seeded_rng(4));
    assert!(many.len() <= 5);
}

/// Pools loaded from JSON require both columns.
#[test]
fn pool_requires_both_columns() {
    let ok = ZiExemplarPool::from_json_str(r#"[{"input": "a", "output": "b", "id": 1}]"#).unwrap();
    assert_eq!(ok.len(), 1);

    let err = ZiExemplarPool::from_records(&[json!({"output": "b"})]).unwrap_err();
    assert!(err.is_configuration());
    assert!(ZiExemplarPool::from_json_str(r#"{"input": "a"}"#).unwrap_err().is_configuration());
}

/// The axis reads the pool and excluded question from its context.
#[test]
fn axis_uses_context_pool() {
    let config = ZiAugmenterConfig {
        n_augments: 3,
        num_examples: 2,
        seed: Some(10),
        ..Default::default()
    };
    let axis = ZiFewShotAugmenter::new(config).unwrap();
    let ctx = ZiAxisContext::new()
        .with_exemplars(pool_with_target())
        .with_question("target");
    let out = axis.augment("{EXAMPLES}\ntarget", Some(&ctx)).unwrap();
    assert!(!out.is_empty() && out.len() <= 3);
    for block in &out {
        assert!(!block.contains("Input: target"));
        assert_eq!(block.matches("Input: ").count(), 2);
    }
}

/// A pool emptied by exclusion leaves the prompt itself.
#[test]
fn axis_falls_back_when_pool_excluded() {
    let axis = ZiFewShotAugmenter::new(ZiAugmenterConfig::default()).unwrap();
    let ctx = ZiAxisContext::new().with_exemplars(ZiExemplarPool::from_pairs([("Q", "A")]));
    assert_eq!(axis.augment("Q", Some(&ctx)).unwrap(), vec!["Q"]);
}

/// Varying counts stay within the configured range.
#[test]
fn axis_varies_example_count() {
    let config = ZiAugmenterConfig {
        n_augments: 5,
        min_examples: Some(1),
        max_examples: Some(3),
        seed: Some(6),
        ..Default::default()
    };
    let axis = ZiFewShotAugmenter::new(config).unwrap();
    let ctx = ZiAxisContext::new().with_exemplars(pool(10));
    for block in axis.augment("new question", Some(&ctx)).unwrap() {
        let count = block.matches("Input: ").count();
        assert!((1..=3).contains(&count));
    }
}
