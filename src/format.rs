/*!

Rendering of raw values into report text.

*/

use std::collections::HashMap;
use std::fmt::Write;

use chrono::{DateTime, Local, TimeZone, Utc};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Shown for timestamps past the last date chrono can represent.
pub const OUT_OF_RANGE: &str = "(out of range)";

/// Render seconds since the epoch in local time.
///
/// The secret service uses 0 for "never", so that value yields `None`.
/// A time that does not exist locally is rendered in UTC instead.
pub fn format_timestamp(t: u64) -> Option<String> {
    if t == 0 {
        return None;
    }
    let Ok(secs) = i64::try_from(t) else {
        return Some(OUT_OF_RANGE.to_string());
    };
    let rendered = match Local.timestamp_opt(secs, 0).earliest() {
        Some(local) => local.format(TIMESTAMP_FORMAT).to_string(),
        None => match DateTime::<Utc>::from_timestamp(secs, 0) {
            Some(utc) => utc.format(TIMESTAMP_FORMAT).to_string(),
            None => OUT_OF_RANGE.to_string(),
        },
    };
    Some(rendered)
}

/// Lowercase hex, two digits per byte, no separators.
pub fn format_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        // writing to a String cannot fail
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Attribute pairs sorted by key, byte-wise.
pub fn format_attributes(attributes: &HashMap<String, String>) -> Vec<(&str, &str)> {
    let mut pairs: Vec<(&str, &str)> = attributes
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    pairs.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
    pairs
}

pub fn format_bool(b: bool) -> &'static str {
    if b { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timestamp_is_absent() {
        assert_eq!(format_timestamp(0), None);
    }

    #[test]
    fn timestamp_shape() {
        let s = format_timestamp(1_700_000_000).unwrap();
        assert_eq!(s.len(), 19);
        assert!(s.starts_with("2023-11-1"));
        let bytes = s.as_bytes();
        assert_eq!(bytes[4], b'-');
        assert_eq!(bytes[7], b'-');
        assert_eq!(bytes[10], b' ');
        assert_eq!(bytes[13], b':');
        assert_eq!(bytes[16], b':');
    }

    #[test]
    fn unrepresentable_timestamps_get_a_marker() {
        assert_eq!(format_timestamp(u64::MAX).as_deref(), Some(OUT_OF_RANGE));
        assert_eq!(
            format_timestamp(i64::MAX as u64).as_deref(),
            Some(OUT_OF_RANGE)
        );
    }

    #[test]
    fn hex_is_padded_and_lowercase() {
        assert_eq!(format_hex(&[0x00, 0xFF, 0x10]), "00ff10");
        assert_eq!(format_hex(&[]), "");
        assert_eq!(format_hex(&[0xAB, 0x0c]), "ab0c");
    }

    #[test]
    fn attributes_sorted_bytewise() {
        let attributes = HashMap::from([
            ("user".to_string(), "a".to_string()),
            ("Zeta".to_string(), "z".to_string()),
            ("service".to_string(), "imap".to_string()),
        ]);
        let keys: Vec<&str> = format_attributes(&attributes)
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, ["Zeta", "service", "user"]);
    }

    #[test]
    fn bools() {
        assert_eq!(format_bool(true), "true");
        assert_eq!(format_bool(false), "false");
    }
}
