use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::canonical_combining_class;

/// Left-to-right and right-to-left marks at either end of the text
/// (they are kept in the middle of a word).
static EDGE_DIRECTION_MARKS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\x{200E}\x{200F}]+|[\x{200E}\x{200F}]+$").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Parenthesized glosses in Japanese headwords, e.g. `日本 (にほん)`.
static JA_GLOSS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" ?\([^)]*\)").unwrap());

static CLIPPED_IPA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[/\[]-|-[\]/]$").unwrap());

/// NFD-normalize, drop direction marks at the edges, collapse whitespace runs
/// and trim.
pub fn normalize(text: &str) -> String {
    let decomposed: String = text.nfd().collect();
    let unmarked = EDGE_DIRECTION_MARKS_RE.replace_all(&decomposed, "");
    let collapsed = WHITESPACE_RE.replace_all(&unmarked, " ");
    collapsed.trim().to_string()
}

/// Language-specific cleanup applied to headwords after `normalize`.
pub fn normalize_word<'a>(word: &'a str, language: &str) -> Cow<'a, str> {
    match language {
        "ja" => JA_GLOSS_RE.replace_all(word, ""),
        _ => Cow::Borrowed(word),
    }
}

pub fn is_combining(ch: char) -> bool {
    canonical_combining_class(ch) != 0
}

pub fn count_non_combining(text: &str) -> usize {
    text.chars().filter(|&ch| !is_combining(ch)).count()
}

/// ASCII letters, space and hyphen, plus the dotless `ı` and long `ſ`,
/// which case-fold to `i` and `s`.
pub fn is_latin(ch: char) -> bool {
    ch.is_ascii_alphabetic() || matches!(ch, ' ' | '-' | 'ı' | 'ſ')
}

/// Whether the text consists only of combining marks and Latin characters,
/// i.e. is already written in Latin script.
pub fn is_latin_text(text: &str) -> bool {
    text.chars().all(|ch| is_combining(ch) || is_latin(ch))
}

/// IPA transcriptions of word fragments, like `/-æt/` or `[kæ-]`.
pub fn is_clipped_ipa(text: &str) -> bool {
    CLIPPED_IPA_RE.is_match(text)
}

/// Transliterate to lowercase ASCII, keeping only letters and spaces.
pub fn romanization_to_ascii(romanization: &str) -> String {
    any_ascii::any_ascii(romanization)
        .to_lowercase()
        .chars()
        .filter(|&ch| ch.is_ascii_lowercase() || ch == ' ')
        .collect()
}
