//! Read the wanted-title list and snapshot the candidate files.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::matching::PickError;

/// One file in the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    /// File name with extension.
    pub name: String,
    /// File name without extension.
    pub stem: String,
}

impl CandidateFile {
    /// Create from a file path.
    /// Names are NFC normalized so that composed and decomposed characters compare equal.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        let (stem, extension) = crate::get_normalized_file_name_and_extension(&path)
            .unwrap_or_else(|_| (crate::path_to_file_stem_string(&path), String::new()));
        let name = if extension.is_empty() {
            stem.clone()
        } else {
            format!("{stem}.{extension}")
        };
        Self { path, name, stem }
    }
}

/// Collect regular files directly inside the source directory, sorted by file name.
/// Hidden files are skipped.
///
/// # Errors
/// Returns an error if the directory does not exist or cannot be read.
pub fn gather_candidates(source: &Path) -> Result<Vec<CandidateFile>, PickError> {
    if !source.is_dir() {
        return Err(PickError::MissingInput {
            what: "Source directory",
            path: source.to_path_buf(),
        });
    }

    // Surface permission errors instead of silently returning an empty list
    fs::read_dir(source).map_err(|error| PickError::UnreadableInput {
        what: "source directory",
        path: source.to_path_buf(),
        source: error,
    })?;

    let files = WalkDir::new(source)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !crate::is_hidden(entry))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| CandidateFile::new(entry.into_path()))
        .collect();

    Ok(files)
}

/// Read up to `limit` non-empty trimmed lines from the title list file.
///
/// # Errors
/// Returns an error if the file does not exist or cannot be read as UTF-8 text.
pub fn read_title_list(path: &Path, limit: usize) -> Result<Vec<String>, PickError> {
    if !path.is_file() {
        return Err(PickError::MissingInput {
            what: "Game list file",
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|error| PickError::UnreadableInput {
        what: "game list file",
        path: path.to_path_buf(),
        source: error,
    })?;

    Ok(parse_title_list(&content, limit))
}

/// Parse title list content, keeping the first `limit` non-empty lines.
#[must_use]
pub fn parse_title_list(content: &str, limit: usize) -> Vec<String> {
    content
        .trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}
