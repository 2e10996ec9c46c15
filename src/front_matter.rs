/*!
 * Front-matter parsing and serialization.
 *
 * A front-matter block is a leading line that is exactly `---`, followed by
 * metadata lines and a closing line that is exactly `---`. Only top-level
 * `key: value` lines are interpreted; everything else inside the block
 * (nested YAML, comments, blank lines) is carried through verbatim so that
 * setting one field never disturbs the rest of the block.
 */

use once_cell::sync::Lazy;
use regex::Regex;

const DELIMITER: &str = "---";

static FIELD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9_][A-Za-z0-9_-]*):(?:\s+(.*?))?\s*$").expect("valid field regex")
});

/// One line of a front-matter block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontMatterLine {
    /// A top-level `key: value` pair
    Field { key: String, value: String },
    /// Any other line, kept as written
    Raw(String),
}

/// Ordered front-matter fields
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrontMatter {
    lines: Vec<FrontMatterLine>,
}

/// A document split into its front-matter and the remaining body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitDocument<'a> {
    /// Parsed block, `None` when the document has no front-matter
    pub front_matter: Option<FrontMatter>,
    /// Everything after the closing delimiter line (or the whole text)
    pub body: &'a str,
}

impl FrontMatter {
    /// Create an empty block
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the inner lines of a block (without the delimiters)
    fn parse_block(block: &str) -> Self {
        let lines = block
            .lines()
            .map(|line| match FIELD_REGEX.captures(line) {
                Some(caps) => FrontMatterLine::Field {
                    key: caps[1].to_string(),
                    value: caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
                },
                None => FrontMatterLine::Raw(line.trim_end_matches('\r').to_string()),
            })
            .collect();

        Self { lines }
    }

    /// Value of the first field named `key`, with surrounding quotes removed
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            FrontMatterLine::Field { key: k, value } if k == key => Some(unquote(value)),
            _ => None,
        })
    }

    /// Set a field, replacing the first occurrence in place or inserting it
    /// as the first line. Later duplicates of the key are dropped.
    pub fn set(&mut self, key: &str, value: &str) {
        let mut seen = false;
        self.lines.retain_mut(|line| match line {
            FrontMatterLine::Field { key: k, value: v } if k == key => {
                if seen {
                    return false;
                }
                seen = true;
                *v = value.to_string();
                true
            }
            _ => true,
        });

        if !seen {
            self.lines.insert(
                0,
                FrontMatterLine::Field {
                    key: key.to_string(),
                    value: value.to_string(),
                },
            );
        }
    }

    /// Iterate over the parsed lines
    pub fn lines(&self) -> &[FrontMatterLine] {
        &self.lines
    }

    /// Serialize the block including both delimiter lines and a trailing newline
    pub fn to_block(&self) -> String {
        let mut out = String::from(DELIMITER);
        out.push('\n');
        for line in &self.lines {
            match line {
                FrontMatterLine::Field { key, value } if value.is_empty() => {
                    out.push_str(key);
                    out.push(':');
                }
                FrontMatterLine::Field { key, value } => {
                    out.push_str(key);
                    out.push_str(": ");
                    out.push_str(value);
                }
                FrontMatterLine::Raw(raw) => out.push_str(raw),
            }
            out.push('\n');
        }
        out.push_str(DELIMITER);
        out.push('\n');
        out
    }
}

/// Split a document into front-matter and body.
///
/// The first line must be exactly `---` and a later line exactly `---`;
/// otherwise the document has no front-matter and the body is the full text.
pub fn split(text: &str) -> SplitDocument<'_> {
    let no_front_matter = SplitDocument {
        front_matter: None,
        body: text,
    };

    let Some((first, rest)) = split_line(text) else {
        return no_front_matter;
    };
    if first != DELIMITER {
        return no_front_matter;
    }

    let mut offset = 0;
    let mut remaining = rest;
    while let Some((line, after)) = split_line(remaining) {
        if line == DELIMITER {
            let block = &rest[..offset];
            return SplitDocument {
                front_matter: Some(FrontMatter::parse_block(block)),
                body: after,
            };
        }
        offset += remaining.len() - after.len();
        remaining = after;
    }

    no_front_matter
}

/// Join a front-matter block and body back into one document
pub fn join(front_matter: &FrontMatter, body: &str) -> String {
    let mut out = front_matter.to_block();
    out.push_str(body);
    out
}

// Returns the first line without its terminator, and the text after it
fn split_line(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    match text.find('\n') {
        Some(idx) => Some((text[..idx].trim_end_matches('\r'), &text[idx + 1..])),
        None => Some((text.trim_end_matches('\r'), "")),
    }
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
