use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_yml::Value;

use crate::fs::{data_lines, read_text};

pub const DEFAULT_CONFIG_FILE: &str = "lexcollect.yml";

pub const DEFAULT_LOGGING_PERIOD: usize = 10_000;
pub const DEFAULT_MAX_NON_COMBINING_LENGTH: usize = 20;

const BUILTIN_LATIN: &str = include_str!("../../data/latin");
const BUILTIN_PHONEMES: &str = include_str!("../../data/phonemes");
const BUILTIN_ONSETS: &str = include_str!("../../data/onsets");
const BUILTIN_COMPOUNDS: &str = include_str!("../../data/compounds");

/// Where a data table comes from: the copy compiled into the binary, or a
/// file named in the config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Builtin(&'static str),
    File(PathBuf),
}

impl DataSource {
    pub fn read(&self) -> Result<Cow<'static, str>> {
        match self {
            DataSource::Builtin(text) => Ok(Cow::Borrowed(text)),
            DataSource::File(path) => read_text(path, false).map(Cow::Owned),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WiktionaryConfig {
    /// Log progress every this many lines; 0 disables progress logging.
    pub logging_period: usize,
    pub max_non_combining_length: usize,
    /// Languages written in Latin script. Romanizations are not collected for them.
    pub latin_languages: DataSource,
}

impl Default for WiktionaryConfig {
    fn default() -> Self {
        Self {
            logging_period: DEFAULT_LOGGING_PERIOD,
            max_non_combining_length: DEFAULT_MAX_NON_COMBINING_LENGTH,
            latin_languages: DataSource::Builtin(BUILTIN_LATIN),
        }
    }
}

impl WiktionaryConfig {
    pub fn load_latin_languages(&self) -> Result<HashSet<String>> {
        let text = self
            .latin_languages
            .read()
            .context("failed to load Latin-script language list")?;
        Ok(data_lines(&text, Some("#")).map(String::from).collect())
    }
}

#[derive(Debug, Clone)]
pub struct CmudictConfig {
    /// CMU phoneme<TAB>IPA
    pub phonemes: DataSource,
    /// IPA onsets, one per line
    pub onsets: DataSource,
    /// Known compound parts, left<TAB>right
    pub compounds: DataSource,
}

impl Default for CmudictConfig {
    fn default() -> Self {
        Self {
            phonemes: DataSource::Builtin(BUILTIN_PHONEMES),
            onsets: DataSource::Builtin(BUILTIN_ONSETS),
            compounds: DataSource::Builtin(BUILTIN_COMPOUNDS),
        }
    }
}

/// Resolved configuration from `lexcollect.yml`.
///
/// Data file paths are resolved relative to the directory holding the
/// config file.
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    config_dir: Option<PathBuf>,
    pub wiktionary: WiktionaryConfig,
    pub cmudict: CmudictConfig,
}

impl ResolvedConfig {
    pub fn config_dir(&self) -> Option<&Path> {
        self.config_dir.as_deref()
    }
}

/// Load config from the given path, or look for `lexcollect.yml` in the
/// current directory. Returns the defaults if the file doesn't exist.
pub fn load_config(path: Option<&Path>) -> Result<ResolvedConfig> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => Path::new(DEFAULT_CONFIG_FILE).to_path_buf(),
    };

    if !config_path.exists() {
        return Ok(ResolvedConfig::default());
    }

    let contents = std::fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read config {}", config_path.display()))?;
    let raw: Value = serde_yml::from_str(&contents)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;

    let base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let mut config = ResolvedConfig {
        config_dir: Some(base_dir.clone()),
        ..ResolvedConfig::default()
    };

    if let Some(section) = section(&raw, "Wiktionary") {
        if let Some(n) = get_usize(section, "LoggingPeriod") {
            config.wiktionary.logging_period = n;
        }
        if let Some(n) = get_usize(section, "MaxNonCombiningLength") {
            config.wiktionary.max_non_combining_length = n;
        }
        if let Some(path) = get_path(section, "LatinLanguages", &base_dir) {
            config.wiktionary.latin_languages = DataSource::File(path);
        }
    }

    if let Some(section) = section(&raw, "Cmudict") {
        if let Some(path) = get_path(section, "Phonemes", &base_dir) {
            config.cmudict.phonemes = DataSource::File(path);
        }
        if let Some(path) = get_path(section, "Onsets", &base_dir) {
            config.cmudict.onsets = DataSource::File(path);
        }
        if let Some(path) = get_path(section, "Compounds", &base_dir) {
            config.cmudict.compounds = DataSource::File(path);
        }
    }

    Ok(config)
}

fn section<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| v.is_mapping())
}

fn get_usize(section: &Value, key: &str) -> Option<usize> {
    section
        .get(key)?
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
}

fn get_path(section: &Value, key: &str, base_dir: &Path) -> Option<PathBuf> {
    section.get(key)?.as_str().map(|p| base_dir.join(p))
}
