/// Honorific stems dropped during normalization. Tokens are compared after
/// edge punctuation is stripped, so `Dr.` and `dr` both match `dr`.
const HONORIFICS: &[&str] = &["dr", "mr", "mrs", "miss", "ms"];

/// Normalize a display name for comparison: lowercase, strip `.,()` from
/// token edges, drop honorifics, and rejoin with single spaces.
///
/// An empty input normalizes to the empty string.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .map(|word| word.trim_matches(|c| matches!(c, '.' | ',' | '(' | ')')))
        .filter(|word| !word.is_empty() && !HONORIFICS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}
