//! CMUdict pipeline: ARPAbet transcriptions in, `word<TAB>/ipa/` lines out.

pub mod phonemes;
pub mod syllables;

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::CmudictConfig;
use crate::fs::{data_lines, read_text};
use crate::storage::TAB;
use phonemes::{load_phonemes, normalize_word, split_entry, split_tab, to_phones, Phone, PhonemeTable};
use syllables::{Syllabifier, WordIndex};

pub const CMUDICT_COMMENT: &str = ";;;";
pub const DATA_COMMENT: &str = "#";

/// Parse dictionary text into (word, phones) pairs in input order.
pub fn parse_dictionary(text: &str, table: &PhonemeTable) -> Result<Vec<(String, Vec<Phone>)>> {
    data_lines(text, Some(CMUDICT_COMMENT))
        .map(|line| -> Result<(String, Vec<Phone>)> {
            let (word, transcription) = split_entry(line)?;
            let phones = to_phones(transcription, table)
                .with_context(|| format!("in dictionary entry \"{line}\""))?;
            Ok((normalize_word(word).to_string(), phones))
        })
        .collect()
}

pub fn load_onsets(text: &str) -> HashSet<String> {
    data_lines(text, Some(DATA_COMMENT)).map(String::from).collect()
}

pub fn load_compounds(text: &str) -> Result<HashSet<(String, String)>> {
    data_lines(text, Some(DATA_COMMENT))
        .map(|line| -> Result<(String, String)> {
            let (left, right) = split_tab(line)?;
            Ok((left.to_string(), right.to_string()))
        })
        .collect()
}

/// Render every entry, dropping exact duplicate lines.
pub fn render_entries(
    entries: &[(String, Vec<Phone>)],
    onsets: &HashSet<String>,
    compounds: &HashSet<(String, String)>,
) -> Vec<String> {
    let index = WordIndex::build(
        entries
            .iter()
            .map(|(word, phones)| (word.as_str(), phones.as_slice())),
    );
    let syllabifier = Syllabifier {
        onsets,
        compounds,
        index: &index,
    };

    let mut seen = HashSet::new();
    entries
        .iter()
        .map(|(word, phones)| format!("{word}{TAB}{}", syllabifier.construct_ipa(phones, word)))
        .filter(|line| seen.insert(line.clone()))
        .collect()
}

/// Convert the dictionary at `input` and write the result to `output`.
/// Returns the number of lines written.
pub fn run_cmudict(input: &Path, output: &Path, config: &CmudictConfig) -> Result<usize> {
    let table = load_phonemes(&config.phonemes.read().context("failed to load phoneme table")?)?;
    let onsets = load_onsets(&config.onsets.read().context("failed to load onsets")?);
    let compounds = load_compounds(&config.compounds.read().context("failed to load compounds")?)?;
    debug!(
        phonemes = table.len(),
        onsets = onsets.len(),
        compounds = compounds.len(),
        "loaded CMUdict tables"
    );

    let text = read_text(input, true)?;
    let entries = parse_dictionary(&text, &table)
        .with_context(|| format!("failed to parse {}", input.display()))?;
    info!("Read {} entries", entries.len());

    let lines = render_entries(&entries, &onsets, &compounds);

    let file =
        File::create(output).with_context(|| format!("failed to create {}", output.display()))?;
    let mut out = BufWriter::new(file);
    for line in &lines {
        writeln!(out, "{line}").with_context(|| format!("failed to write {}", output.display()))?;
    }
    out.flush()
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!("Done");
    Ok(lines.len())
}
