use isolang::Language;

/// Language utilities for ISO language code handling
///
/// Codes appear twice in this tool: as the artifact filename segment
/// (`guide.en.md`) and, as an English name, in the translation prompt.
/// Both ISO 639-1 (2-letter) and ISO 639-2 (3-letter) codes are accepted.

// ISO 639-2/B codes that differ from their 639-2/T counterpart
const BIBLIOGRAPHIC_CODES: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("per", "fas"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Resolve a 2- or 3-letter code to its isolang entry
fn lookup(code: &str) -> Option<Language> {
    let normalized = code.trim().to_lowercase();

    match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => {
            let part2t = BIBLIOGRAPHIC_CODES
                .iter()
                .find(|(bibliographic, _)| *bibliographic == normalized)
                .map(|(_, terminological)| *terminological)
                .unwrap_or(&normalized);
            Language::from_639_3(part2t)
        }
        _ => None,
    }
}

/// Check whether a code is a known ISO 639-1 or ISO 639-2 code
pub fn is_valid_language_code(code: &str) -> bool {
    lookup(code).is_some()
}

/// Get the English language name for a code, e.g. "zh" -> "Chinese"
pub fn get_language_name(code: &str) -> Option<String> {
    lookup(code).map(|lang| lang.to_name().to_string())
}
