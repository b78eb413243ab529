// src/jvm/names.rs
//! Qualified-name handling.
//!
//! Canonical names use '.' separators (`java.lang.String`); internal names
//! use '/' (`java/lang/String`). The two forms round-trip.

/// Translate a canonical name to its internal form.
pub fn canonical_to_internal(name: &str) -> String {
    name.replace('.', "/")
}

/// Translate an internal name to its canonical form.
pub fn internal_to_canonical(name: &str) -> String {
    name.replace('/', ".")
}

/// Last segment of a canonical name.
pub fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// Package part of a canonical name, empty for unqualified names.
pub fn package_of(qualified: &str) -> &str {
    match qualified.rfind('.') {
        Some(idx) => &qualified[..idx],
        None => "",
    }
}

/// Whether the string is a well-formed dotted qualified name: non-empty
/// segments, each starting with a letter or underscore.
pub fn is_valid_qualified_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_valid_segment)
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
