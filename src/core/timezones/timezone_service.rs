use chrono::Utc;
use chrono_tz::Tz;

use crate::core::config::TimezoneEntry;

/// Renders the configured label/zone table as aligned text rows.
pub struct TimezoneService {
    entries: Vec<TimezoneEntry>,
}

impl TimezoneService {
    pub fn new(entries: Vec<TimezoneEntry>) -> Self {
        Self { entries }
    }

    /// One row per configured zone, like `USA:      Tue, Feb 03 13:44:55`.
    /// Unknown zone names fall back to UTC rather than dropping the row.
    pub fn current_rows(&self) -> Vec<String> {
        let utc_now = Utc::now();

        self.entries
            .iter()
            .map(|entry| {
                let tz: Tz = entry.zone.parse().unwrap_or(chrono_tz::UTC);
                let now = utc_now.with_timezone(&tz);
                format!(
                    "{:<10}{}",
                    format!("{}: ", entry.label),
                    now.format("%a, %b %d %H:%M:%S")
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, zone: &str) -> TimezoneEntry {
        TimezoneEntry {
            label: label.to_string(),
            zone: zone.to_string(),
        }
    }

    #[test]
    fn test_one_row_per_entry() {
        let service = TimezoneService::new(vec![
            entry("USA", "America/Chicago"),
            entry("Mexico", "America/Mexico_City"),
        ]);
        let rows = service.current_rows();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("USA: "));
        assert!(rows[1].starts_with("Mexico: "));
    }

    #[test]
    fn test_labels_are_left_aligned() {
        let service = TimezoneService::new(vec![entry("UK", "Europe/London")]);
        let row = &service.current_rows()[0];
        // "UK: " padded out to ten columns before the date begins.
        assert!(row.starts_with("UK:       "));
    }

    #[test]
    fn test_unknown_zone_falls_back_to_utc() {
        let service = TimezoneService::new(vec![entry("Nowhere", "Not/AZone")]);
        assert_eq!(service.current_rows().len(), 1);
    }
}
