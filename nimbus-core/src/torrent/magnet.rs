//! Magnet link validation and display-name extraction.
//!
//! Nimbus never contacts a swarm, so magnet handling is deliberately
//! string-level: a prefix check plus `dn=` extraction. Only `+` and `%20`
//! are decoded; anything else in the display name is taken literally.

use chrono::Local;

/// Returns true when the string carries the literal `magnet:?` prefix.
pub fn is_magnet_link(link: &str) -> bool {
    link.starts_with("magnet:?")
}

/// Extracts the display name (`dn=`) component of a magnet link.
///
/// Takes the value up to the next `&` and decodes `+` and `%20` sequences
/// to spaces. Returns `None` when the link has no `dn=` component or the
/// value is empty.
pub fn display_name(link: &str) -> Option<String> {
    let (_, rest) = link.split_once("dn=")?;
    let raw = rest.split('&').next().unwrap_or(rest);
    if raw.is_empty() {
        return None;
    }
    Some(raw.replace('+', " ").replace("%20", " "))
}

/// Synthesizes a timestamp-based name for torrents without a usable one.
///
/// Unique only insofar as two calls land in different seconds.
pub fn fallback_name() -> String {
    format!("Torrent_{}", Local::now().format("%Y%m%d_%H%M%S"))
}
