// src/utils.rs
/// Length of generated section ids
pub const ID_LENGTH: usize = 7;

/// Short random identifier for sections (drag-and-drop list keys)
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..ID_LENGTH].to_string()
}

/// Collapse runs of whitespace (including newlines) into single spaces
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escape text for HTML text nodes and attribute values
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Case-insensitive substring test on a key name
pub fn key_contains(key: &str, needle: &str) -> bool {
    key.to_lowercase().contains(needle)
}

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}
