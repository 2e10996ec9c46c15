/*!
 * Content fingerprints and provenance markers.
 *
 * A translation artifact records which version of its source it was made
 * from, either as a `source_hash` front-matter field (SHA-256 of the source
 * bytes) or as a leading `<!-- source_commit: <rev> -->` comment.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::front_matter::{self, FrontMatter};

/// Front-matter field holding the source fingerprint
pub const SOURCE_HASH_KEY: &str = "source_hash";

static COMMIT_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\x{FEFF}?<!--\s*source_commit:\s*(\S+?)\s*-->[ \t]*\r?(?:\n|$)")
        .expect("valid marker regex")
});

/// Marker to embed in an artifact after translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// Nothing is recorded
    None,
    /// Hex SHA-256 of the source bytes
    SourceHash(String),
    /// Revision that last touched the source
    SourceCommit(String),
}

/// Lowercase hex SHA-256 of raw bytes
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Read the `source_hash` field from an artifact's front-matter
pub fn read_source_hash(artifact: &str) -> Option<String> {
    front_matter::split(artifact)
        .front_matter
        .and_then(|fm| fm.get(SOURCE_HASH_KEY).map(str::to_string))
        .filter(|hash| !hash.is_empty())
}

/// Read the revision from a leading `source_commit` comment
pub fn read_source_commit(artifact: &str) -> Option<String> {
    COMMIT_MARKER_REGEX
        .captures(artifact)
        .map(|caps| caps[1].to_string())
}

/// Set `source_hash` in the text's front-matter, creating a block if needed
pub fn stamp_source_hash(text: &str, hash: &str) -> String {
    let doc = front_matter::split(text);
    let mut fm = doc.front_matter.unwrap_or_else(FrontMatter::new);
    fm.set(SOURCE_HASH_KEY, hash);
    front_matter::join(&fm, doc.body)
}

/// Prepend a `source_commit` comment, replacing an existing leading one
pub fn stamp_source_commit(text: &str, revision: &str) -> String {
    let body = match COMMIT_MARKER_REGEX.find(text) {
        Some(marker) => &text[marker.end()..],
        None => text,
    };
    format!("<!-- source_commit: {} -->\n{}", revision, body)
}

/// Embed a provenance marker into translated text
pub fn stamp(text: &str, provenance: &Provenance) -> String {
    match provenance {
        Provenance::None => text.to_string(),
        Provenance::SourceHash(hash) => stamp_source_hash(text, hash),
        Provenance::SourceCommit(revision) => stamp_source_commit(text, revision),
    }
}
