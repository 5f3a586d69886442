//! Wiktextract pipeline: JSON lines in, per-language pronunciation and
//! romanization tables out.

use std::collections::HashSet;
use std::io::{self, BufRead};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::WiktionaryConfig;
use crate::fs::{ensure_dir, numbered_lines, open_lines};
use crate::normalize::{is_clipped_ipa, romanization_to_ascii};
use crate::query::{extract, Entry, Purpose, RuleSet, Validation};
use crate::storage::{Category, Storage};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    /// Lines read, including skipped ones.
    pub lines: usize,
    /// Lines that were not valid UTF-8 or not valid JSON.
    pub malformed: usize,
}

/// Applies the rule set to records one at a time and accumulates the results.
pub struct Collector<'a> {
    rules: &'a RuleSet,
    latin_languages: &'a HashSet<String>,
    pronunciation: Validation,
    romanization: Validation,
    storage: Storage,
}

impl<'a> Collector<'a> {
    pub fn new(
        rules: &'a RuleSet,
        latin_languages: &'a HashSet<String>,
        max_non_combining_length: usize,
    ) -> Self {
        Self {
            rules,
            latin_languages,
            pronunciation: Validation {
                purpose: Purpose::Pronunciation,
                max_non_combining_length,
            },
            romanization: Validation {
                purpose: Purpose::Romanization,
                max_non_combining_length,
            },
            storage: Storage::new(),
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn into_storage(self) -> Storage {
        self.storage
    }

    /// Run every rule against one record.
    ///
    /// Romanizations whose ASCII transliteration comes out empty (e.g. a bare `-`)
    /// are kept in the `roman` category but get no `ascii` entry, so the
    /// ascii tables never contain a `word<TAB>` line with nothing after it.
    pub fn collect_document(&mut self, document: &Value) {
        for group in &self.rules.pronunciation {
            for (index, entry) in extract(group, document, &self.pronunciation)
                .iter()
                .enumerate()
            {
                // Fragments like `/-æt/` are only kept when they are the first
                // transcription a rule found.
                if index > 0 && is_clipped_ipa(&entry.pronunciation) {
                    continue;
                }
                self.storage.add(Category::Ipa, entry);
            }
        }

        for group in &self.rules.romanization {
            for entry in extract(group, document, &self.romanization) {
                if self.latin_languages.contains(&entry.language) {
                    continue;
                }
                self.storage.add(Category::Romanization, &entry);

                let ascii = romanization_to_ascii(&entry.pronunciation);
                if !ascii.is_empty() {
                    self.storage.add(
                        Category::Ascii,
                        &Entry {
                            pronunciation: ascii,
                            ..entry
                        },
                    );
                }
            }
        }
    }

    /// Parse and collect one record per line.
    pub fn collect_lines<R: BufRead>(
        &mut self,
        reader: R,
        logging_period: usize,
    ) -> Result<CollectStats> {
        let mut stats = CollectStats::default();

        for (line_number, line) in numbered_lines(reader) {
            stats.lines = line_number;
            let line = match line {
                Ok(line) => Some(line),
                // The bytes of the bad line are consumed; reading resumes at the next one.
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    stats.malformed += 1;
                    warn!(line = line_number, "skipping record that is not valid UTF-8: {e}");
                    None
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("failed to read line {line_number}"));
                }
            };

            if let Some(line) = line.filter(|line| !line.trim().is_empty()) {
                match serde_json::from_str::<Value>(&line) {
                    Ok(document) => self.collect_document(&document),
                    Err(e) => {
                        stats.malformed += 1;
                        warn!(line = line_number, "skipping malformed record: {e}");
                    }
                }
            }

            if logging_period > 0 && line_number % logging_period == 0 {
                info!("Processed {} lines", format_count(line_number));
            }
        }

        Ok(stats)
    }
}

/// Collect everything from the Wiktextract dump at `input` and write the
/// tables under `output_dir`.
pub fn run_wiktionary(
    input: &Path,
    output_dir: &Path,
    config: &WiktionaryConfig,
    rules: &RuleSet,
) -> Result<CollectStats> {
    for category in Category::ALL {
        ensure_dir(&output_dir.join(category.dir_name()))?;
    }

    let latin_languages = config.load_latin_languages()?;
    debug!(count = latin_languages.len(), "loaded Latin-script languages");

    let reader = open_lines(input)?;
    let mut collector = Collector::new(rules, &latin_languages, config.max_non_combining_length);
    let stats = collector
        .collect_lines(reader, config.logging_period)
        .with_context(|| format!("failed to process {}", input.display()))?;

    if stats.malformed > 0 {
        warn!(
            malformed = stats.malformed,
            "some lines were malformed and were skipped"
        );
    }

    collector.into_storage().dump(output_dir)?;
    info!("Done");
    Ok(stats)
}

/// `1234567` → `1,234,567`
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn latin() -> HashSet<String> {
        ["en", "fr"].iter().map(|s| s.to_string()).collect()
    }

    fn pairs(storage: &Storage, category: Category, language: &str) -> Vec<(String, String)> {
        storage
            .pairs(category, language)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    #[test]
    fn collects_ipa_from_sounds() {
        let rules = RuleSet::standard().unwrap();
        let latin = latin();
        let mut collector = Collector::new(&rules, &latin, 20);
        collector.collect_document(&json!({
            "lang_code": "en",
            "word": "cat",
            "sounds": [{"ipa": "/kæt/"}, {"ipa": "/-æt/"}, {"enpr": "kăt"}],
        }));
        let ipa = pairs(collector.storage(), Category::Ipa, "en");
        assert_eq!(ipa, vec![("cat".to_string(), "/kæt/".to_string())]);
    }

    #[test]
    fn first_clipped_ipa_is_kept() {
        let rules = RuleSet::standard().unwrap();
        let latin = latin();
        let mut collector = Collector::new(&rules, &latin, 20);
        collector.collect_document(&json!({
            "lang_code": "en",
            "word": "-ness",
            "sounds": [{"ipa": "/-nəs/"}, {"ipa": "/-nɪs/"}],
        }));
        let ipa = pairs(collector.storage(), Category::Ipa, "en");
        assert_eq!(ipa.len(), 1);
        assert_eq!(ipa[0].1, "/-nəs/");
    }

    #[test]
    fn collects_romanization_and_ascii() {
        let rules = RuleSet::standard().unwrap();
        let latin = latin();
        let mut collector = Collector::new(&rules, &latin, 20);
        collector.collect_document(&json!({
            "lang_code": "ja",
            "word": "東京",
            "forms": [
                {"form": "東京", "tags": ["canonical"]},
                {"form": "Tōkyō", "tags": ["romanization"]},
            ],
        }));
        let storage = collector.storage();
        let roman = pairs(storage, Category::Romanization, "ja");
        assert!(roman.contains(&("東京".to_string(), "To\u{304}kyo\u{304}".to_string())));
        let ascii = pairs(storage, Category::Ascii, "ja");
        assert!(ascii.contains(&("東京".to_string(), "tokyo".to_string())));
    }

    #[test]
    fn latin_languages_get_no_romanization() {
        let rules = RuleSet::standard().unwrap();
        let latin = latin();
        let mut collector = Collector::new(&rules, &latin, 20);
        collector.collect_document(&json!({
            "lang_code": "en",
            "word": "tea",
            "translations": [
                {"code": "fr", "word": "thé", "roman": "te"},
                {"code": "zh", "word": "茶", "roman": "chá"},
            ],
        }));
        let storage = collector.storage();
        assert!(pairs(storage, Category::Romanization, "fr").is_empty());
        assert_eq!(pairs(storage, Category::Romanization, "zh").len(), 1);
    }

    #[test]
    fn collect_lines_skips_malformed_records() {
        let rules = RuleSet::standard().unwrap();
        let latin = latin();
        let mut collector = Collector::new(&rules, &latin, 20);
        let input = concat!(
            r#"{"lang_code": "ru", "word": "кот", "forms": [{"form": "кота", "roman": "kota"}]}"#,
            "\n",
            "{not json\n",
            "\n",
            r#"{"lang_code": "ru", "word": "пёс", "forms": [{"form": "пса", "roman": "psa"}]}"#,
            "\n",
        );
        let stats = collector
            .collect_lines(std::io::Cursor::new(input), 2)
            .unwrap();
        assert_eq!(stats, CollectStats { lines: 4, malformed: 1 });
        assert_eq!(
            pairs(collector.storage(), Category::Romanization, "ru").len(),
            2
        );
    }

    #[test]
    fn collect_lines_skips_invalid_utf8() {
        let rules = RuleSet::standard().unwrap();
        let latin = latin();
        let mut collector = Collector::new(&rules, &latin, 20);
        let mut input: Vec<u8> = Vec::new();
        input.extend_from_slice(
            r#"{"lang_code": "ru", "word": "кот", "forms": [{"form": "кота", "roman": "kota"}]}"#
                .as_bytes(),
        );
        input.extend_from_slice(b"\n{\"word\": \"caf\xe9\"}\n");
        input.extend_from_slice(
            r#"{"lang_code": "ru", "word": "пёс", "forms": [{"form": "пса", "roman": "psa"}]}"#
                .as_bytes(),
        );
        input.push(b'\n');

        let stats = collector
            .collect_lines(std::io::Cursor::new(input), 0)
            .unwrap();
        assert_eq!(stats, CollectStats { lines: 3, malformed: 1 });
        assert_eq!(
            pairs(collector.storage(), Category::Romanization, "ru"),
            vec![
                ("кота".to_string(), "kota".to_string()),
                ("пса".to_string(), "psa".to_string()),
            ]
        );
    }

    #[test]
    fn empty_transliteration_gets_no_ascii_entry() {
        let rules = RuleSet::standard().unwrap();
        let latin = latin();
        let mut collector = Collector::new(&rules, &latin, 20);
        collector.collect_document(&json!({
            "lang_code": "ja",
            "forms": [{"form": "ん", "roman": "-"}],
        }));
        let storage = collector.storage();
        assert_eq!(pairs(storage, Category::Romanization, "ja").len(), 1);
        assert!(pairs(storage, Category::Ascii, "ja").is_empty());
    }

    #[test]
    fn format_count_groups_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(10_000), "10,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
