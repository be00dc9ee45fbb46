//! Output name rules
//!
//! Limits are counted in characters, not bytes, so truncation never splits a
//! multi-byte character.

/// Cut `name` down to at most `max_chars` characters
pub fn truncate_name(name: &str, max_chars: usize) -> String {
    match name.char_indices().nth(max_chars) {
        Some((cut, _)) => name[..cut].to_string(),
        None => name.to_string(),
    }
}

/// Suffix for the zero-based chunk `index`: `.001`, `.002`, ...
pub fn chunk_suffix(index: u64) -> String {
    format!(".{:03}", index + 1)
}

/// Name for chunk `index` of `name`, truncating the stem so the suffix survives
pub fn chunk_output_name(name: &str, index: u64, max_chars: usize) -> String {
    let suffix = chunk_suffix(index);
    let stem = truncate_name(name, max_chars.saturating_sub(suffix.chars().count()));
    format!("{}{}", stem, suffix)
}

/// Label for disk `number` (1-based) out of `total`
///
/// A single disk keeps the label as is; a set appends `" <number>"`.
pub fn numbered_label(label: &str, number: usize, total: usize, max_chars: usize) -> String {
    if total <= 1 {
        return truncate_name(label, max_chars);
    }

    let suffix = format!(" {}", number);
    let stem = truncate_name(label, max_chars.saturating_sub(suffix.chars().count()));
    format!("{}{}", stem.trim_end(), suffix)
}
