//! Substring search patterns for `ILIKE` filters.

/// Wraps `term` as a `%term%` pattern with `\`, `%` and `_` escaped, so user
/// input only ever matches literally. Relies on Postgres' default `\` escape.
#[must_use]
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
