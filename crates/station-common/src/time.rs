//! Last-updated timestamp formatting for the map attribution.

use chrono::DateTime;
use tracing::warn;

/// Attribution HTML for the snapshot's `generatedAt` timestamp.
///
/// The time is shown on a 12-hour clock in the timestamp's own UTC offset,
/// e.g. `Updated 3:05 PM`. Returns `None` when there is nothing to show.
pub fn last_updated_label(generated_at: Option<&str>) -> Option<String> {
    let raw = generated_at?.trim();
    if raw.is_empty() {
        return None;
    }

    match DateTime::parse_from_rfc3339(raw) {
        Ok(timestamp) => Some(format!(
            "<span class=\"map-updated-time\">Updated {}</span>",
            timestamp.format("%-I:%M %p")
        )),
        Err(e) => {
            warn!(timestamp = %raw, error = %e, "Unparseable last-updated timestamp");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_afternoon_label() {
        let label = last_updated_label(Some("2024-03-01T15:05:00+01:00")).unwrap();
        assert_eq!(label, "<span class=\"map-updated-time\">Updated 3:05 PM</span>");
    }

    #[test]
    fn test_midnight_uses_twelve() {
        let label = last_updated_label(Some("2024-03-01T00:30:00Z")).unwrap();
        assert!(label.contains("Updated 12:30 AM"));
    }

    #[test]
    fn test_missing_or_invalid() {
        assert_eq!(last_updated_label(None), None);
        assert_eq!(last_updated_label(Some("  ")), None);
        assert_eq!(last_updated_label(Some("yesterday")), None);
    }
}
