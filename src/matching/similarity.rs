use strsim::levenshtein;

/// Levenshtein similarity ratio between two canonical strings.
///
/// Returns `1 - distance / max_length` counted in chars,
/// or zero if either string is empty.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_length = a.chars().count().max(b.chars().count());
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let distance = levenshtein(a, b);
    1.0 - distance as f64 / max_length as f64
}
