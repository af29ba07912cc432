/// Fold text for matching: trimmed and lowercased.
pub fn normalize(text: &str) -> Vec<char> {
    text.trim().chars().flat_map(char::to_lowercase).collect()
}

/// Whether `text` contains at least one letter or digit.
pub fn has_alphanumeric(text: &str) -> bool {
    text.chars().any(char::is_alphanumeric)
}

/// Strip the final extension from a file name, ignoring its case.
///
/// Only a trailing `.pdf` style suffix is removed; a name without a dot, or
/// a dotfile, is returned unchanged.
pub fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    }
}

/// Human-facing label for a document name: underscores read as spaces.
pub fn display_label(name: &str) -> String {
    name.replace('_', " ")
}

/// Case-insensitive substring containment.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Pluralize a count with a noun, e.g. `1 script`, `3 scripts`.
pub fn count_noun(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
