//! Identifier sanitization and case folding for sample and label names.
//!
//! Prometheus names must match `[a-zA-Z_:][a-zA-Z0-9_:]*`; everything the
//! evaluation engine emits goes through [`safe_name`] first.

/// Replace every character outside `[A-Za-z0-9_:]` with `_`, collapsing
/// runs of replaced-or-underscore characters into a single `_`.
///
/// A leading digit gets a `_` prefix so the result is always a legal
/// metric name fragment.
///
/// # Example
///
/// ```
/// use mbean_collector::transformer::naming::safe_name;
///
/// assert_eq!(safe_name("java.lang_Memory"), "java_lang_Memory");
/// assert_eq!(safe_name("9area--used"), "_9area_used");
/// ```
pub fn safe_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 1);
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        out.push('_');
    }
    let mut prev_is_underscore = false;
    for c in name.chars() {
        if is_legal_character(c) && c != '_' {
            out.push(c);
            prev_is_underscore = false;
        } else if !prev_is_underscore {
            out.push('_');
            prev_is_underscore = true;
        }
    }
    out
}

fn is_legal_character(c: char) -> bool {
    c == ':' || c == '_' || c.is_ascii_alphanumeric()
}

/// Convert a camel-case attribute name to lowercase snake case.
///
/// An underscore is inserted at word boundaries: after a lowercase letter
/// that is followed by an uppercase one, and at the end of an uppercase
/// acronym run (`CPULoad` splits before `Load`). A leading uppercase
/// letter or an existing underscore already marks a boundary, so no
/// leading `_` is ever inserted.
pub fn snake_and_lower_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let after_lower = prev.is_lowercase();
            let acronym_end = prev.is_uppercase()
                && chars.get(i + 1).map_or(false, |next| next.is_lowercase());
            if prev != '_' && (after_lower || acronym_end) {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}
