use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::fs::data_lines;

/// Word and transcription are separated by two or more spaces.
static ENTRY_DELIMITER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Alternative pronunciations are labelled `WORD(2)`, `WORD(3)`, ...
static WORD_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\d+\)$").unwrap());

pub const PHONEME_DELIMITER: char = ' ';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CmudictError {
    #[error("invalid CMUdict phoneme: \"{0}\"")]
    UnknownPhoneme(String),
    #[error("expected \"{text}\" to be two values separated with {delimiter}")]
    NotAPair {
        text: String,
        delimiter: &'static str,
    },
}

/// CMU phoneme (with or without a stress digit) → IPA.
pub type PhonemeTable = HashMap<String, String>;

/// One phoneme of a transcription. Vowels carry a stress digit, consonants
/// don't.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone {
    pub ipa: String,
    pub stress: Option<u8>,
}

pub const NO_STRESS: u8 = 0;
pub const PRIMARY_STRESS: u8 = 1;
pub const SECONDARY_STRESS: u8 = 2;

impl Phone {
    pub fn is_vowel(&self) -> bool {
        self.stress.is_some()
    }

    pub fn is_stressed(&self) -> bool {
        matches!(self.stress, Some(PRIMARY_STRESS | SECONDARY_STRESS))
    }
}

fn pair<'t>(
    text: &'t str,
    mut sections: impl Iterator<Item = &'t str>,
    delimiter: &'static str,
) -> Result<(&'t str, &'t str), CmudictError> {
    match (sections.next(), sections.next(), sections.next()) {
        (Some(left), Some(right), None) => Ok((left, right)),
        _ => Err(CmudictError::NotAPair {
            text: text.to_string(),
            delimiter,
        }),
    }
}

pub fn split_tab(text: &str) -> Result<(&str, &str), CmudictError> {
    pair(text, text.split('\t'), "a tab")
}

/// Split a dictionary line into word and transcription.
pub fn split_entry(line: &str) -> Result<(&str, &str), CmudictError> {
    pair(line, ENTRY_DELIMITER_RE.split(line), "two or more spaces")
}

/// Strip the alternative pronunciation label from a word.
pub fn normalize_word(word: &str) -> &str {
    match WORD_LABEL_RE.find(word) {
        Some(label) => &word[..label.start()],
        None => word,
    }
}

pub fn load_phonemes(text: &str) -> Result<PhonemeTable, CmudictError> {
    data_lines(text, None)
        .map(|line| -> Result<(String, String), CmudictError> {
            let (cmu, ipa) = split_tab(line)?;
            Ok((cmu.to_string(), ipa.to_string()))
        })
        .collect()
}

/// Look up one CMU phoneme like `AH0` or `K`. The full symbol is tried first
/// so a table can give unstressed vowels their own IPA.
pub fn to_phone(cmu_phoneme: &str, table: &PhonemeTable) -> Result<Phone, CmudictError> {
    let (core, stress) = match cmu_phoneme.char_indices().last() {
        Some((at, digit)) if digit.is_ascii_digit() => {
            (&cmu_phoneme[..at], digit.to_digit(10).and_then(|d| u8::try_from(d).ok()))
        }
        _ => (cmu_phoneme, None),
    };

    let ipa = table
        .get(cmu_phoneme)
        .or_else(|| table.get(core))
        .ok_or_else(|| CmudictError::UnknownPhoneme(cmu_phoneme.to_string()))?;

    Ok(Phone {
        ipa: ipa.clone(),
        stress,
    })
}

pub fn to_phones(transcription: &str, table: &PhonemeTable) -> Result<Vec<Phone>, CmudictError> {
    transcription
        .split(PHONEME_DELIMITER)
        .map(|phoneme| to_phone(phoneme, table))
        .collect()
}
