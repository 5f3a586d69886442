//! Built-in extraction rules for Wiktextract records.
//!
//! Each rule names the language, word and pronunciation paths of one place
//! where Wiktextract stores a (word, transcription) pair, plus optional
//! equality conditions. Rules are grouped by what they collect:
//! - pronunciation: IPA transcriptions from `sounds` and `forms`
//! - romanization: romanized spellings from linkage lists, examples,
//!   forms tagged `romanization`, and translations

use super::group::PatternGroup;
use super::pattern::PatternError;

/// A rule as authored, before its paths are compiled.
pub struct RuleSpec {
    pub name: &'static str,
    pub language: &'static str,
    pub word: &'static str,
    pub pronunciation: &'static str,
    pub conditions: &'static [(&'static str, &'static str)],
}

impl RuleSpec {
    pub fn compile(&self) -> Result<PatternGroup, PatternError> {
        PatternGroup::compile(
            self.name,
            self.language,
            self.word,
            self.pronunciation,
            self.conditions,
        )
    }
}

const fn linkage(name: &'static str, word: &'static str, roman: &'static str) -> RuleSpec {
    RuleSpec {
        name,
        language: "lang_code",
        word,
        pronunciation: roman,
        conditions: &[],
    }
}

pub const PRONUNCIATION_RULES: &[RuleSpec] = &[
    RuleSpec {
        name: "sounds",
        language: "lang_code",
        word: "word",
        pronunciation: "sounds/N/ipa",
        conditions: &[],
    },
    RuleSpec {
        name: "forms_ipa",
        language: "lang_code",
        word: "forms/N/form",
        pronunciation: "forms/N/ipa",
        conditions: &[],
    },
];

pub const ROMANIZATION_RULES: &[RuleSpec] = &[
    linkage("forms", "forms/N/form", "forms/N/roman"),
    linkage("form_of", "form_of/N/word", "form_of/N/roman"),
    linkage("abbreviations", "abbreviations/N/word", "abbreviations/N/roman"),
    linkage("synonyms", "synonyms/N/word", "synonyms/N/roman"),
    linkage("antonyms", "antonyms/N/word", "antonyms/N/roman"),
    linkage("hyponyms", "hyponyms/N/word", "hyponyms/N/roman"),
    linkage("hypernyms", "hypernyms/N/word", "hypernyms/N/roman"),
    linkage("coordinate_terms", "coordinate_terms/N/word", "coordinate_terms/N/roman"),
    linkage("meronyms", "meronyms/N/word", "meronyms/N/roman"),
    linkage("holonyms", "holonyms/N/word", "holonyms/N/roman"),
    linkage("troponyms", "troponyms/N/word", "troponyms/N/roman"),
    linkage("derived", "derived/N/word", "derived/N/roman"),
    linkage("related", "related/N/word", "related/N/roman"),
    linkage("proverbs", "proverbs/N/word", "proverbs/N/roman"),
    linkage("examples", "senses/N/examples/M/text", "senses/N/examples/M/roman"),
    // The page itself is the romanization of the words it is an alternative of.
    RuleSpec {
        name: "romanization_of",
        language: "lang_code",
        word: "senses/N/alt_of/M/word",
        pronunciation: "word",
        conditions: &[("senses/N/tags/T", "romanization")],
    },
    RuleSpec {
        name: "romanized_forms",
        language: "lang_code",
        word: "word",
        pronunciation: "forms/N/form",
        conditions: &[("forms/N/tags/T", "romanization")],
    },
    RuleSpec {
        name: "canonical_romanization",
        language: "lang_code",
        word: "forms/A/form",
        pronunciation: "forms/B/form",
        conditions: &[
            ("forms/A/tags/C", "canonical"),
            ("forms/B/tags/D", "romanization"),
        ],
    },
    RuleSpec {
        name: "translations",
        language: "translations/N/code",
        word: "translations/N/word",
        pronunciation: "translations/N/roman",
        conditions: &[],
    },
];

/// Compiled pronunciation and romanization rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub pronunciation: Vec<PatternGroup>,
    pub romanization: Vec<PatternGroup>,
}

impl RuleSet {
    pub fn compile(
        pronunciation: &[RuleSpec],
        romanization: &[RuleSpec],
    ) -> Result<Self, PatternError> {
        Ok(Self {
            pronunciation: pronunciation
                .iter()
                .map(RuleSpec::compile)
                .collect::<Result<_, _>>()?,
            romanization: romanization
                .iter()
                .map(RuleSpec::compile)
                .collect::<Result<_, _>>()?,
        })
    }

    /// The built-in rules.
    pub fn standard() -> Result<Self, PatternError> {
        Self::compile(PRONUNCIATION_RULES, ROMANIZATION_RULES)
    }
}
