use calamine::Data;

/// Join key for subject and district names: every whitespace char removed, Unicode uppercase.
pub fn normalize_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Trim whitespace (incl. NBSP) + strip outer quotes if present.
pub fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim()
    } else {
        trimmed
    }
}

/// Text of a string cell. Numbers, dates and errors are not text.
pub fn cell_text(cell: &Data) -> Option<&str> {
    match cell {
        Data::String(s) => Some(s.as_str()),
        _ => None,
    }
}

/// Substring predicate used by the anchor and footnote searches.
pub fn cell_contains(cell: &Data, needle: &str) -> bool {
    cell_text(cell).map(|s| s.contains(needle)).unwrap_or(false)
}
