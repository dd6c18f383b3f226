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

use serde::{Deserialize, Serialize};

/// Ordered variants produced by one axis for one prompt.
pub type ZiVariationList = Vec<String>;

/// Template slot for an axis key: upper-cased, non-alphanumerics as `_`.
pub fn slot_name(key: &str) -> String {
    key.trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// `{SLOT}` placeholder for an axis key.
pub fn placeholder(key: &str) -> String {
    format!("{{{}}}", slot_name(key))
}

/// Axis name to variation list, keys unique, insertion order preserved.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZiVariationSet {
    entries: Vec<(String, ZiVariationList)>,
}

impl ZiVariationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces in place; a replaced key keeps its position.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        variations: ZiVariationList,
    ) -> Option<ZiVariationList> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, variations)),
            None => {
                self.entries.push((key, variations));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ZiVariationList> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ZiVariationList)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Size of the full cross product, empty lists counting as one; `None` on overflow.
    pub fn cross_product_size(&self) -> Option<u128> {
        self.entries
            .iter()
            .try_fold(1u128, |acc, (_, v)| acc.checked_mul(v.len().max(1) as u128))
    }
}

impl<K, S> FromIterator<(K, Vec<S>)> for ZiVariationSet
where
    K: Into<String>,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Vec<S>)>>(iter: I) -> Self {
        let mut set = ZiVariationSet::new();
        for (key, values) in iter {
            set.insert(key, values.into_iter().map(Into::into).collect());
        }
        set
    }
}
