//! Stress placement for CMUdict transcriptions.
//!
//! CMUdict marks stress on vowels, but IPA puts the mark at the start of the
//! syllable. The mark is moved left across the consonants that can begin a
//! syllable (the onset), and never across the boundary between the parts of
//! a compound word, which are found by looking the parts up in the
//! dictionary itself:
//!
//! - blacklist → black_list
//! - homeownership → home_owner_ship
//! - cat → cat

use std::collections::{HashMap, HashSet};

use super::phonemes::{Phone, PRIMARY_STRESS, SECONDARY_STRESS};

/// Parts at least this long are taken to form a compound without needing to
/// be listed.
pub const COMPOUND_PART_MIN_LENGTH: usize = 5;

pub const IPA_BRACKETS: (char, char) = ('/', '/');
pub const IPA_PRIMARY_STRESS: &str = "ˈ";
pub const IPA_SECONDARY_STRESS: &str = "ˌ";

/// A phone with vowel quality erased: consonants are kept, vowels only
/// remember whether they are stressed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Masked {
    Consonant(String),
    Vowel { stressed: bool },
}

impl From<&Phone> for Masked {
    fn from(phone: &Phone) -> Self {
        if phone.is_vowel() {
            Masked::Vowel {
                stressed: phone.is_stressed(),
            }
        } else {
            Masked::Consonant(phone.ipa.clone())
        }
    }
}

pub fn mask(phones: &[Phone]) -> Vec<Masked> {
    phones.iter().map(Masked::from).collect()
}

/// Words of the dictionary keyed by their masked transcription.
#[derive(Debug, Default)]
pub struct WordIndex {
    words: HashMap<Vec<Masked>, Vec<String>>,
}

impl WordIndex {
    pub fn build<'a>(entries: impl IntoIterator<Item = (&'a str, &'a [Phone])>) -> Self {
        let mut words: HashMap<Vec<Masked>, Vec<String>> = HashMap::new();
        for (word, phones) in entries {
            words.entry(mask(phones)).or_default().push(word.to_string());
        }
        Self { words }
    }

    pub fn words(&self, masked: &[Masked]) -> &[String] {
        self.words
            .get(masked)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Whether `word` is `left` and `right` joined directly or with a
/// non-word connector such as a hyphen.
pub fn is_compound_of(
    word: &str,
    left: &str,
    right: &str,
    compounds: &HashSet<(String, String)>,
) -> bool {
    if !(word.starts_with(left)
        && word.ends_with(right)
        && word.len() >= left.len() + right.len())
    {
        return false;
    }

    let connector = &word[left.len()..word.len() - right.len()];
    if connector.chars().any(|ch| ch.is_alphanumeric() || ch == '_') {
        return false;
    }

    // all-out = all + out
    !connector.is_empty()
        || compounds.contains(&(left.to_string(), right.to_string()))
        || left.chars().count().min(right.chars().count()) >= COMPOUND_PART_MIN_LENGTH
}

/// Everything needed to syllabify words of one dictionary.
pub struct Syllabifier<'a> {
    pub onsets: &'a HashSet<String>,
    pub compounds: &'a HashSet<(String, String)>,
    pub index: &'a WordIndex,
}

impl Syllabifier<'_> {
    /// Phone indices where `word` splits into compound parts.
    ///
    /// Empty when the word has fewer than two stressed vowels (this keeps
    /// `caseworker` from splitting into `casework + er`) or when the parts can
    /// be found in more than one inconsistent way.
    pub fn find_split_indices(&self, phones: &[Phone], word: &str) -> Vec<usize> {
        let stressed: Vec<usize> = phones
            .iter()
            .enumerate()
            .filter(|(_, phone)| phone.is_stressed())
            .map(|(i, _)| i)
            .collect();
        if stressed.len() < 2 {
            return Vec::new();
        }
        let (first, last) = (stressed[0], stressed[stressed.len() - 1]);

        let masked = mask(phones);
        let mut splits: Vec<(usize, &str, &str)> = Vec::new();
        for index in first + 1..=last {
            let lefts = self.index.words(&masked[..index]);
            let rights = self.index.words(&masked[index..]);
            'pairs: for left in lefts {
                for right in rights {
                    if is_compound_of(word, left, right, self.compounds) {
                        splits.push((index, left, right));
                        break 'pairs;
                    }
                }
            }
        }

        let indices: Vec<usize> = splits.iter().map(|&(index, _, _)| index).collect();
        let consistent = splits.iter().enumerate().all(|(nth, &(index, left, right))| {
            let left_agrees =
                nth == 0 || self.find_split_indices(&phones[..index], left) == &indices[..nth];
            let right_agrees = nth == splits.len() - 1 || {
                let shifted: Vec<usize> = indices[nth + 1..].iter().map(|&i| i - index).collect();
                self.find_split_indices(&phones[index..], right) == shifted
            };
            left_agrees && right_agrees
        });

        if consistent { indices } else { Vec::new() }
    }

    /// Render a transcription as IPA between slashes with stress marks at
    /// syllable starts.
    pub fn construct_ipa(&self, phones: &[Phone], word: &str) -> String {
        let vowel_count = phones.iter().filter(|phone| phone.is_vowel()).count();
        let mut marks: Vec<Option<u8>> = vec![None; phones.len()];

        if vowel_count > 1 {
            let mut breaks = vec![0];
            breaks.extend(self.find_split_indices(phones, word));

            for (index, phone) in phones.iter().enumerate() {
                if !phone.is_stressed() {
                    continue;
                }
                let mut position = index;
                while !breaks.contains(&position)
                    && self.onsets.contains(&join_ipa(&phones[position - 1..index]))
                {
                    position -= 1;
                }
                for &start in &breaks {
                    if start >= position {
                        break;
                    }
                    if phones[start..position].iter().all(|phone| !phone.is_vowel()) {
                        position = start;
                        break;
                    }
                }
                marks[position] = phone.stress;
            }
        }

        let (open, close) = IPA_BRACKETS;
        let mut ipa = String::new();
        ipa.push(open);
        for (mark, phone) in marks.iter().zip(phones) {
            ipa.push_str(stress_mark(*mark));
            ipa.push_str(&phone.ipa);
        }
        ipa.push(close);
        ipa
    }
}

fn join_ipa(phones: &[Phone]) -> String {
    phones.iter().map(|phone| phone.ipa.as_str()).collect()
}

fn stress_mark(stress: Option<u8>) -> &'static str {
    match stress {
        Some(PRIMARY_STRESS) => IPA_PRIMARY_STRESS,
        Some(SECONDARY_STRESS) => IPA_SECONDARY_STRESS,
        _ => "",
    }
}
