//! Helper functions and utilities
//! 
//! This module contains common helper functions used throughout the application.

use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

/// Generate a new UUID v4
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a UUID v4 without dashes, used for registration ids
pub fn generate_compact_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email.trim()))
}

/// Sanitize filename for safe storage
pub fn sanitize_filename(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    // Leading dots would produce hidden files or `..`
    let trimmed = sanitized.trim_start_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Split a trailing all-digit word off a display name.
///
/// Identity providers often hand back names like `"Jane Doe 2341567"` where the
/// last word is the student's register number. Returns the cleaned name and the
/// number, if one was found. Single-word names are never split.
pub fn split_register_number(name: &str) -> (String, Option<String>) {
    let parts: Vec<&str> = name.split_whitespace().collect();
    if parts.len() > 1 {
        let last = parts[parts.len() - 1];
        if last.chars().all(|c| c.is_ascii_digit()) {
            return (parts[..parts.len() - 1].join(" "), Some(last.to_string()));
        }
    }

    (name.to_string(), None)
}

/// Treat empty or whitespace-only strings as absent
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Convert bytes to human readable format
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;
    
    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }
    
    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
