use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

/// Non-empty trimmed lines of `text`, skipping lines that start with
/// `comment_prefix`.
pub fn data_lines<'a>(
    text: &'a str,
    comment_prefix: Option<&'a str>,
) -> impl Iterator<Item = &'a str> + 'a {
    text.lines().map(str::trim).filter(move |line| {
        !line.is_empty() && comment_prefix.is_none_or(|prefix| !line.starts_with(prefix))
    })
}

/// Read a whole text file. With `drop_invalid_utf8`, byte sequences that are
/// not valid UTF-8 are removed instead of failing the read.
pub fn read_text(path: &Path, drop_invalid_utf8: bool) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if drop_invalid_utf8 {
        Ok(String::from_utf8_lossy(&bytes)
            .chars()
            .filter(|&ch| ch != char::REPLACEMENT_CHARACTER)
            .collect())
    } else {
        String::from_utf8(bytes).with_context(|| format!("{} is not valid UTF-8", path.display()))
    }
}

/// Open a file for buffered line-by-line reading.
pub fn open_lines(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Create `dir` (and its parents) unless it already exists.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }
    Ok(())
}

/// Iterate over the lines of a reader, numbering them from 1.
pub fn numbered_lines<R: BufRead>(reader: R) -> impl Iterator<Item = (usize, std::io::Result<String>)> {
    reader.lines().enumerate().map(|(index, line)| (index + 1, line))
}
