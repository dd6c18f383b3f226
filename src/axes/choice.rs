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

//! Multiple-choice axis.
//!
//! Options are enumerated with one of a fixed catalog of styles and may be
//! shuffled. Options come from the axis context or are parsed from text such
//! as `"A) red B) green"` or one `1. option` per line.

use std::collections::HashSet;
use std::sync::OnceLock;

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::augmenter::{ZiAugmenterConfig, ZiAxisAugmenter, ZiAxisContext};
use crate::errors::Result;
use crate::seed::rng_for;
use crate::variation::ZiVariationList;

/// Enumeration catalog for option markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZiEnumerationStyle {
    /// `A. B. C.`
    UpperLetter,
    /// `a. b. c.`
    LowerLetter,
    /// `1. 2. 3.`
    Number,
    /// `A) B) C)`
    UpperLetterParen,
    /// `a) b) c)`
    LowerLetterParen,
    /// `1) 2) 3)`
    NumberParen,
}

impl ZiEnumerationStyle {
    pub const ALL: [ZiEnumerationStyle; 6] = [
        Self::UpperLetter,
        Self::LowerLetter,
        Self::Number,
        Self::UpperLetterParen,
        Self::LowerLetterParen,
        Self::NumberParen,
    ];

    fn letters(mut index: usize) -> String {
        let mut out = Vec::new();
        loop {
            out.push((b'A' + (index % 26) as u8) as char);
            if index < 26 {
                break;
            }
            index = index / 26 - 1;
        }
        out.iter().rev().collect()
    }

    /// Marker for the option at `index`, bracket included.
    pub fn marker(&self, index: usize) -> String {
        match self {
            Self::UpperLetter => Self::letters(index),
            Self::LowerLetter => Self::letters(index).to_ascii_lowercase(),
            Self::Number => (index + 1).to_string(),
            Self::UpperLetterParen => format!("{})", Self::letters(index)),
            Self::LowerLetterParen => format!("{})", Self::letters(index).to_ascii_lowercase()),
            Self::NumberParen => format!("{})", index + 1),
        }
    }

    /// `"A) red"` for bracketed styles, `"A. red"` otherwise.
    pub fn label(&self, index: usize, option: &str) -> String {
        match self {
            Self::UpperLetter | Self::LowerLetter | Self::Number => {
                format!("{}. {}", self.marker(index), option)
            }
            _ => format!("{} {}", self.marker(index), option),
        }
    }

    /// Infers the style of a parsed marker such as `"b"` with bracket `')'`.
    pub fn detect(marker: &str, bracket: char) -> Option<Self> {
        let paren = bracket == ')';
        let first = marker.chars().next()?;
        let style = if first.is_ascii_digit() {
            if paren {
                Self::NumberParen
            } else {
                Self::Number
            }
        } else if first.is_ascii_uppercase() {
            if paren {
                Self::UpperLetterParen
            } else {
                Self::UpperLetter
            }
        } else if first.is_ascii_lowercase() {
            if paren {
                Self::LowerLetterParen
            } else {
                Self::LowerLetter
            }
        } else {
            return None;
        };
        Some(style)
    }
}

/// Options of one multiple-choice question.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiChoiceSet {
    /// Text preceding the first option.
    pub preamble: String,
    pub options: Vec<String>,
    /// Markers as they appeared in the source, without brackets.
    pub markers: Vec<String>,
    /// Style of the source markers, when known.
    pub style: Option<ZiEnumerationStyle>,
    /// Whether options were laid out on one line.
    pub inline: bool,
    /// Whitespace between the preamble and the first option, as in the source.
    #[serde(default)]
    pub separator: String,
    /// Whitespace between consecutive options, as in the source.
    #[serde(default)]
    pub delimiter: String,
}

fn option_marker() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:^|\s)([A-Za-z]|[0-9]{1,2})([.)])\s+")
            .expect("option marker pattern is valid")
    })
}

fn marker_ordinal(marker: &str) -> Option<usize> {
    if let Ok(n) = marker.parse::<usize>() {
        return n.checked_sub(1);
    }
    let ch = marker.chars().next()?;
    if ch.is_ascii_alphabetic() {
        Some((ch.to_ascii_lowercase() as u8 - b'a') as usize)
    } else {
        None
    }
}

impl ZiChoiceSet {
    /// Options without source markers, rendered as `A) ...` by default.
    pub fn new(options: Vec<String>) -> Self {
        Self {
            markers: (0..options.len())
                .map(|i| ZiEnumerationStyle::UpperLetter.marker(i))
                .collect(),
            options,
            preamble: String::new(),
            style: Some(ZiEnumerationStyle::UpperLetterParen),
            inline: false,
            separator: "\n".to_string(),
            delimiter: "\n".to_string(),
        }
    }

    /// Parses enumerated options; `None` unless at least two consecutively
    /// numbered options are found.
    pub fn parse(text: &str) -> Option<Self> {
        let captures: Vec<_> = option_marker().captures_iter(text).collect();
        if captures.len() < 2 {
            return None;
        }

        let mut markers = Vec::with_capacity(captures.len());
        let mut options = Vec::with_capacity(captures.len());
        let mut delimiter = String::new();
        let mut previous: Option<usize> = None;
        for (i, cap) in captures.iter().enumerate() {
            let whole = cap.get(0)?;
            let marker = cap.get(1)?.as_str();
            let ordinal = marker_ordinal(marker)?;
            if let Some(prev) = previous {
                if ordinal != prev + 1 {
                    return None;
                }
            }
            previous = Some(ordinal);

            let next = captures.get(i + 1);
            let end = next
                .and_then(|next| next.get(0))
                .map(|m| m.start())
                .unwrap_or(text.len());
            let raw = &text[whole.end()..end];
            let option = raw.trim();
            if option.is_empty() {
                return None;
            }
            if i == 0 {
                if let Some(next_marker) = next.and_then(|next| next.get(1)) {
                    let option_end = whole.end() + raw.trim_end().len();
                    delimiter = text[option_end..next_marker.start()].to_string();
                }
            }
            markers.push(marker.to_string());
            options.push(option.to_string());
        }

        let first = captures[0].get(0)?;
        let first_marker = captures[0].get(1)?;
        let bracket = captures[0].get(2)?.as_str().chars().next()?;
        let between_options = &text[first.end()..captures[captures.len() - 1].get(0)?.end()];
        let preamble = text[..first.start()].trim_end();
        Some(Self {
            separator: text[preamble.len()..first_marker.start()].to_string(),
            preamble: preamble.to_string(),
            style: ZiEnumerationStyle::detect(&markers[0], bracket),
            inline: !between_options.contains('\n'),
            delimiter,
            markers,
            options,
        })
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Renders options in `order` with `style`, preamble first.
    ///
    /// Source whitespace around the options is reused, so the original style
    /// and order reproduce a parsed text exactly.
    pub fn render(&self, style: ZiEnumerationStyle, order: &[usize]) -> String {
        let delimiter = match self.delimiter.as_str() {
            "" if self.inline => " ",
            "" => "\n",
            source => source,
        };
        let body = order
            .iter()
            .enumerate()
            .filter_map(|(pos, &idx)| self.options.get(idx).map(|opt| style.label(pos, opt)))
            .collect::<Vec<_>>()
            .join(delimiter);
        if self.preamble.is_empty() {
            body
        } else {
            let separator = match self.separator.as_str() {
                "" => "\n",
                source => source,
            };
            format!("{}{}{}", self.preamble, separator, body)
        }
    }
}

/// Varies enumeration style and option order of a multiple-choice prompt.
#[derive(Debug)]
pub struct ZiMultipleChoiceAugmenter {
    name: String,
    config: ZiAugmenterConfig,
    vary_enumeration: bool,
    shuffle_options: bool,
}

impl ZiMultipleChoiceAugmenter {
    pub fn new(config: ZiAugmenterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name: "multiple_choice".to_string(),
            config,
            vary_enumeration: true,
            shuffle_options: true,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Selects the enumeration and answer-order dimensions.
    pub fn with_dimensions(mut self, vary_enumeration: bool, shuffle_options: bool) -> Self {
        self.vary_enumeration = vary_enumeration;
        self.shuffle_options = shuffle_options;
        self
    }
}

impl ZiAxisAugmenter for ZiMultipleChoiceAugmenter {
    fn name(&self) -> &str {
        &self.name
    }

    fn augment(&self, prompt: &str, context: Option<&ZiAxisContext>) -> Result<ZiVariationList> {
        // Context options are appended to the prompt, which becomes the preamble.
        let (choices, from_context) = match context.and_then(|ctx| ctx.choices.clone()) {
            Some(mut choices) if !choices.is_empty() => {
                if choices.preamble.is_empty() {
                    choices.preamble = prompt.trim_end().to_string();
                    choices.separator = "\n".to_string();
                }
                (choices, true)
            }
            _ => match ZiChoiceSet::parse(prompt) {
                Some(choices) => (choices, false),
                None => {
                    log::debug!("{} axis found no options to vary", self.name);
                    return Ok(vec![prompt.to_string()]);
                }
            },
        };

        let mut rng = rng_for(self.config.seed);
        let base_style = choices.style.unwrap_or(ZiEnumerationStyle::UpperLetterParen);
        let identity: Vec<usize> = (0..choices.len()).collect();
        let base = if from_context {
            choices.render(base_style, &identity)
        } else {
            prompt.to_string()
        };

        let mut seen = HashSet::from([base.clone()]);
        let mut variations = vec![base];
        let max_attempts = self.config.n_augments.saturating_mul(2);
        let mut attempts = 0;

        while variations.len() < self.config.n_augments && attempts < max_attempts {
            attempts += 1;
            let style = if self.vary_enumeration {
                ZiEnumerationStyle::ALL[rng.gen_range(0..ZiEnumerationStyle::ALL.len())]
            } else {
                base_style
            };
            let mut order = identity.clone();
            if self.shuffle_options {
                order.shuffle(&mut rng);
            }
            let rendered = choices.render(style, &order);
            if seen.insert(rendered.clone()) {
                variations.push(rendered);
            }
        }

        log::debug!("{} axis produced {} variations", self.name, variations.len());
        Ok(variations)
    }
}
