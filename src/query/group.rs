//! Pattern groups: one extraction rule evaluated against one document.

use std::fmt;

use serde_json::Value;
use tracing::debug;

use super::evaluate::{evaluate, NullPolicy, SearchResult};
use super::join::consolidate;
use super::pattern::{PathPattern, PatternError};
use crate::normalize::{count_non_combining, is_latin_text, normalize, normalize_word};

/// Only keep results of `pattern` whose value is exactly `required`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub pattern: PathPattern,
    pub required: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternGroup {
    pub name: String,
    pub language: PathPattern,
    pub word: PathPattern,
    pub pronunciation: PathPattern,
    pub conditions: Vec<Condition>,
}

impl PatternGroup {
    pub fn compile(
        name: &str,
        language: &str,
        word: &str,
        pronunciation: &str,
        conditions: &[(&str, &str)],
    ) -> Result<Self, PatternError> {
        let conditions = conditions
            .iter()
            .map(|&(pattern, required)| -> Result<Condition, PatternError> {
                Ok(Condition {
                    pattern: PathPattern::parse(pattern)?,
                    required: required.to_string(),
                })
            })
            .collect::<Result<Vec<_>, PatternError>>()?;

        Ok(Self {
            name: name.to_string(),
            language: PathPattern::parse(language)?,
            word: PathPattern::parse(word)?,
            pronunciation: PathPattern::parse(pronunciation)?,
            conditions,
        })
    }
}

impl fmt::Display for PatternGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: ({}, {}, {})",
            self.name, self.language, self.word, self.pronunciation
        )?;
        for condition in &self.conditions {
            write!(f, " where {} = {:?}", condition.pattern, condition.required)?;
        }
        Ok(())
    }
}

/// A normalized (language, word, pronunciation or romanization) triple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entry {
    pub language: String,
    pub word: String,
    pub pronunciation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    /// IPA transcriptions; only emptiness is checked.
    Pronunciation,
    /// Romanizations; also rejects long text and words already in Latin script.
    Romanization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validation {
    pub purpose: Purpose,
    pub max_non_combining_length: usize,
}

impl Validation {
    pub fn accepts(&self, entry: &Entry) -> bool {
        if entry.language.is_empty() || entry.word.is_empty() || entry.pronunciation.is_empty() {
            return false;
        }
        match self.purpose {
            Purpose::Pronunciation => true,
            Purpose::Romanization => {
                [&entry.word, &entry.pronunciation]
                    .iter()
                    .all(|text| count_non_combining(text) <= self.max_non_combining_length)
                    && !is_latin_text(&entry.word)
            }
        }
    }
}

/// Run `group` against `document` and return its valid entries in join order.
pub fn extract(group: &PatternGroup, document: &Value, validation: &Validation) -> Vec<Entry> {
    let mut inputs: Vec<Vec<SearchResult<'_>>> = group
        .conditions
        .iter()
        .map(|condition| {
            evaluate(&condition.pattern, document, NullPolicy::Warn)
                .into_iter()
                .filter(|result| result.value == condition.required)
                .collect()
        })
        .collect();

    // The language code is null for records covering a group of languages.
    inputs.push(evaluate(&group.language, document, NullPolicy::Ignore));
    inputs.push(evaluate(&group.word, document, NullPolicy::Warn));
    inputs.push(evaluate(&group.pronunciation, document, NullPolicy::Warn));

    let tuples = consolidate(&inputs);
    let mut entries = Vec::new();
    for tuple in &tuples {
        let &[.., language, word, pronunciation] = tuple.as_slice() else {
            continue;
        };
        let entry = Entry {
            language: language.to_string(),
            word: normalize_word(&normalize(word), language).into_owned(),
            pronunciation: normalize(pronunciation),
        };
        if validation.accepts(&entry) {
            entries.push(entry);
        }
    }

    debug!(
        group = %group.name,
        tuples = tuples.len(),
        entries = entries.len(),
        "extracted"
    );
    entries
}
