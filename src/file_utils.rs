use log::warn;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

use crate::errors::AppError;

// @module: File discovery and artifact path utilities

/// Longest filename segment treated as a language code
pub const MAX_LANGUAGE_SEGMENT_LEN: usize = 5;

const MARKDOWN_EXTENSION: &str = "md";

// @checks: Segment usable as the language part of `<stem>.<lang>.md`
pub fn is_translation_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.len() <= MAX_LANGUAGE_SEGMENT_LEN && !segment.contains('.')
}

/// Whether a filename looks like a translation artifact.
///
/// Purely syntactic: exactly three dot-separated segments, ending in `md`,
/// with a middle segment of at most five characters. The middle segment is
/// not checked against real language codes, so `notes.draft.md` counts as a
/// translation while `v1.2.guide.md` does not.
pub fn is_translation_filename(file_name: &str) -> bool {
    let segments: Vec<&str> = file_name.split('.').collect();
    segments.len() == 3
        && segments[2] == MARKDOWN_EXTENSION
        && segments[1].len() <= MAX_LANGUAGE_SEGMENT_LEN
}

// @checks: Dot-prefixed names, skipped during discovery
fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @generates: Artifact path for a translated document
    // @params: source_file, target_language
    pub fn artifact_path<P: AsRef<Path>>(source_file: P, target_language: &str) -> PathBuf {
        let source_file = source_file.as_ref();

        let stem = source_file.file_stem().unwrap_or_default();
        let mut file_name = stem.to_string_lossy().to_string();
        file_name.push('.');
        file_name.push_str(target_language);
        file_name.push('.');
        match source_file.extension() {
            Some(ext) => file_name.push_str(&ext.to_string_lossy()),
            None => file_name.push_str(MARKDOWN_EXTENSION),
        }

        source_file.with_file_name(file_name)
    }

    /// Find Markdown source documents under a root directory.
    ///
    /// Recurses into subdirectories and skips files named like translation
    /// artifacts, as well as hidden files and directories. Entries are
    /// visited in file-name order.
    pub fn find_markdown_sources<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>, AppError> {
        let root = root.as_ref();
        if !Self::dir_exists(root) {
            return Err(AppError::Discovery(format!(
                "Content directory does not exist: {:?}",
                root
            )));
        }

        let mut result = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != MARKDOWN_EXTENSION) {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            if is_translation_filename(&file_name) {
                continue;
            }

            result.push(path.to_path_buf());
        }

        Ok(result)
    }

    /// Drop sources that are the `target_language` artifact of another source.
    ///
    /// A source whose stem contains dots (`v1.2.guide.md`) gets an artifact
    /// with more than three segments (`v1.2.guide.en.md`), which the
    /// filename rule alone does not recognize.
    pub fn without_artifacts(sources: Vec<PathBuf>, target_language: &str) -> Vec<PathBuf> {
        let known: HashSet<PathBuf> = sources.iter().cloned().collect();
        let suffix = format!(".{}.{}", target_language, MARKDOWN_EXTENSION);

        sources
            .into_iter()
            .filter(|path| {
                let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                    return true;
                };
                match file_name.strip_suffix(&suffix) {
                    Some(stem) if !stem.is_empty() => {
                        let source = path.with_file_name(format!("{}.{}", stem, MARKDOWN_EXTENSION));
                        !known.contains(&source)
                    }
                    _ => true,
                }
            })
            .collect()
    }

    /// Read a file's raw bytes
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, AppError> {
        fs::read(&path).map_err(|source| AppError::Read {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    /// Read a file as text, replacing invalid UTF-8 sequences
    pub fn read_to_string_lossy<P: AsRef<Path>>(path: P) -> Result<String, AppError> {
        let bytes = Self::read_bytes(&path)?;
        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!("{:?} is not valid UTF-8, invalid bytes replaced", path.as_ref());
                Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
            }
        }
    }

    /// Write a string to a file, replacing any previous content
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<(), AppError> {
        fs::write(&path, content).map_err(|source| AppError::Write {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    /// Last modification time, if the platform reports one
    pub fn modified_time<P: AsRef<Path>>(path: P) -> Option<SystemTime> {
        fs::metadata(path).and_then(|meta| meta.modified()).ok()
    }
}
