//! Legacy expense description encoding.
//!
//! Older expense rows carry the category inside the description as
//! `"<category> - <description>"`. Only the storage boundary reads or writes
//! this form; everything else works with the structured fields.

const SEPARATOR: &str = " - ";

/// Category assumed for rows stored without the prefix.
pub const FALLBACK_CATEGORY: &str = "Outros";

pub fn encode_description(category: &str, description: &str) -> String {
    format!("{}{SEPARATOR}{}", category.trim(), description.trim())
}

/// Split a stored description into (category, description). Only the first
/// separator splits, so descriptions may contain " - " themselves.
pub fn decode_description(stored: &str) -> (String, String) {
    match stored.split_once(SEPARATOR) {
        Some((category, description)) => (category.to_string(), description.to_string()),
        None => (FALLBACK_CATEGORY.to_string(), stored.to_string()),
    }
}
