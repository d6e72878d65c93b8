/*!
 * Utility functions for itemview
 */

/// Parse an attribute value as a hexadecimal 32-bit integer.
///
/// Mirrors how the item exports encode numbers: bare hex digits with no
/// `0x` prefix and no sign, optionally surrounded by whitespace. Values are
/// read as 32-bit two's complement, so `FFFFFFFF` yields `-1`. Anything that
/// does not fit in 32 bits is rejected.
pub fn parse_hex(raw: &str) -> Option<i32> {
    let digits = raw.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    u32::from_str_radix(digits, 16).ok().map(|v| v as i32)
}

/// Normalize a display name into the identifier form used by `item_basic`
pub fn sql_identifier(raw: &str) -> String {
    raw.to_lowercase().replace(' ', "_").replace('\'', "")
}

/// Case-insensitive substring test
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
