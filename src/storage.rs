use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::fs::ensure_dir;
use crate::query::Entry;

pub const TAB: char = '\t';

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// IPA transcriptions
    Ipa,
    /// Romanizations as written
    Romanization,
    /// Romanizations transliterated to plain lowercase ASCII
    Ascii,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Ipa, Category::Romanization, Category::Ascii];

    /// Name of the output subdirectory.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Ipa => "ipa",
            Category::Romanization => "roman",
            Category::Ascii => "ascii",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

type LanguageTable = BTreeMap<String, BTreeSet<(String, String)>>;

/// Deduplicated (word, pronunciation) pairs per category and language.
#[derive(Debug, Default)]
pub struct Storage {
    tables: BTreeMap<Category, LanguageTable>,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entry; an exact duplicate is a no-op.
    pub fn add(&mut self, category: Category, entry: &Entry) {
        self.tables
            .entry(category)
            .or_default()
            .entry(entry.language.clone())
            .or_default()
            .insert((entry.word.clone(), entry.pronunciation.clone()));
    }

    /// Stored pairs of one language, sorted.
    pub fn pairs(&self, category: Category, language: &str) -> Option<&BTreeSet<(String, String)>> {
        self.tables.get(&category)?.get(language)
    }

    /// Number of stored pairs in a category across all languages.
    pub fn count(&self, category: Category) -> usize {
        self.tables
            .get(&category)
            .map_or(0, |table| table.values().map(BTreeSet::len).sum())
    }

    /// Write every language of every category to
    /// `<output_dir>/<category>/<language>` as sorted `word<TAB>pronunciation`
    /// lines.
    pub fn dump(&self, output_dir: &Path) -> Result<()> {
        for category in Category::ALL {
            let category_dir = output_dir.join(category.dir_name());
            ensure_dir(&category_dir)?;
            let Some(table) = self.tables.get(&category) else {
                continue;
            };
            for (language, pairs) in table {
                if !is_file_name(language) {
                    warn!(%category, language = %language, "skipping language code that is not a file name");
                    continue;
                }
                info!("Dumping {category}/{language}...");
                write_pairs(&category_dir.join(language), pairs)?;
            }
        }
        Ok(())
    }
}

fn is_file_name(language: &str) -> bool {
    !language.is_empty()
        && language != "."
        && language != ".."
        && !language.contains(['/', '\\', '\0'])
}

fn write_pairs(path: &Path, pairs: &BTreeSet<(String, String)>) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for (word, pronunciation) in pairs {
        writeln!(out, "{word}{TAB}{pronunciation}")
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    out.flush()
        .with_context(|| format!("failed to write {}", path.display()))
}
