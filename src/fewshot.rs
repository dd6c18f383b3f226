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

//! # Few-Shot Sampling
//!
//! Builds exemplar blocks for a target question from a pool of
//! `(input, output)` pairs. The pool is read-only and supplied per call.

use std::collections::HashSet;

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, ZiError};

/// Blank line between rendered exemplars.
pub const EXEMPLAR_SEPARATOR: &str = "\n\n";

/// One candidate demonstration.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZiExemplar {
    pub input: String,
    pub output: String,
}

impl ZiExemplar {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// `Input: {input}\nOutput: {output}`
    pub fn render(&self) -> String {
        format!("Input: {}\nOutput: {}", self.input, self.output)
    }
}

/// Table of exemplars with both fields required.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZiExemplarPool {
    rows: Vec<ZiExemplar>,
}

impl ZiExemplarPool {
    pub fn new(rows: Vec<ZiExemplar>) -> Self {
        Self { rows }
    }

    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        Self {
            rows: pairs
                .into_iter()
                .map(|(input, output)| ZiExemplar::new(input, output))
                .collect(),
        }
    }

    /// Builds a pool from JSON objects carrying string `input` and `output` fields.
    ///
    /// A row missing either field is a configuration error.
    pub fn from_records(records: &[Value]) -> Result<Self> {
        let rows = records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let obj = record.as_object().ok_or_else(|| {
                    ZiError::configuration(format!("exemplar row {} must be an object", idx))
                })?;
                let field = |name: &str| {
                    obj.get(name)
                        .and_then(Value::as_str)
                        .map(|s| s.to_string())
                        .ok_or_else(|| {
                            ZiError::configuration(format!(
                                "exemplar pool must contain columns 'input' and 'output' (row {} lacks '{}')",
                                idx, name
                            ))
                        })
                };
                Ok(ZiExemplar {
                    input: field("input")?,
                    output: field("output")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rows })
    }

    /// Parses a JSON array of `{"input": .., "output": ..}` objects.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        let records = value
            .as_array()
            .ok_or_else(|| ZiError::configuration("exemplar pool must be a JSON array"))?;
        Self::from_records(records)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ZiExemplar] {
        &self.rows
    }

    /// Rows whose input differs from `question`.
    pub fn excluding(&self, question: &str) -> Vec<&ZiExemplar> {
        self.rows.iter().filter(|row| row.input != question).collect()
    }
}

/// Renders exemplars joined by [`EXEMPLAR_SEPARATOR`].
pub fn format_exemplars(exemplars: &[ZiExemplar]) -> String {
    exemplars
        .iter()
        .map(ZiExemplar::render)
        .collect::<Vec<_>>()
        .join(EXEMPLAR_SEPARATOR)
}

/// Exemplar selection for a target question.
#[derive(Clone, Debug)]
pub struct ZiFewShotSampler {
    num_examples: usize,
    count_range: Option<(usize, usize)>,
}

impl ZiFewShotSampler {
    pub fn new(num_examples: usize) -> Self {
        Self {
            num_examples,
            count_range: None,
        }
    }

    /// Draws the example count uniformly from `min..=max` on every sample.
    pub fn with_count_range(mut self, min: usize, max: usize) -> Result<Self> {
        if min > max {
            return Err(ZiError::validation(format!(
                "fewshot min_examples ({}) exceeds max_examples ({})",
                min, max
            )));
        }
        self.count_range = Some((min, max));
        Ok(self)
    }

    pub fn num_examples(&self) -> usize {
        self.num_examples
    }

    fn draw_count<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match self.count_range {
            Some((min, max)) => rng.gen_range(min..=max),
            None => self.num_examples,
        }
    }

    /// Samples up to `num_examples` rows without replacement, never `question` itself.
    ///
    /// Returns an empty list when nothing remains after exclusion.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        question: &str,
        pool: &ZiExemplarPool,
        rng: &mut R,
    ) -> Vec<ZiExemplar> {
        let candidates = pool.excluding(question);
        if candidates.is_empty() {
            return Vec::new();
        }
        let amount = self.draw_count(rng).min(candidates.len());
        index::sample(rng, candidates.len(), amount)
            .into_iter()
            .map(|idx| candidates[idx].clone())
            .collect()
    }

    /// Samples and renders one exemplar block.
    pub fn sample_block<R: Rng + ?Sized>(
        &self,
        question: &str,
        pool: &ZiExemplarPool,
        rng: &mut R,
    ) -> String {
        format_exemplars(&self.sample(question, pool, rng))
    }

    /// Exemplars for every distinct question in the pool, in pool order.
    ///
    /// Each entry excludes its own question, so a count is at most
    /// `min(num_examples, rows with another input)`.
    pub fn sample_all<R: Rng + ?Sized>(
        &self,
        pool: &ZiExemplarPool,
        rng: &mut R,
    ) -> Vec<(String, Vec<ZiExemplar>)> {
        let mut visited = HashSet::new();
        pool.rows()
            .iter()
            .filter(|row| visited.insert(row.input.as_str()))
            .map(|row| (row.input.clone(), self.sample(&row.input, pool, rng)))
            .collect()
    }

    /// Collects up to `n_augments` distinct exemplar blocks.
    ///
    /// Each attempt is a fresh draw; duplicates and empty blocks are skipped.
    /// Attempts are capped at `2 * n_augments`, so small pools may yield fewer.
    pub fn sample_distinct<R: Rng + ?Sized>(
        &self,
        question: &str,
        pool: &ZiExemplarPool,
        n_augments: usize,
        rng: &mut R,
    ) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut blocks = Vec::new();
        let max_attempts = n_augments.saturating_mul(2);
        let mut attempts = 0;

        while blocks.len() < n_augments && attempts < max_attempts {
            attempts += 1;
            let block = self.sample_block(question, pool, rng);
            if block.is_empty() || !seen.insert(block.clone()) {
                continue;
            }
            blocks.push(block);
        }

        log::debug!(
            "fewshot sampler collected {} of {} blocks in {} attempts",
            blocks.len(),
            n_augments,
            attempts
        );
        blocks
    }
}
