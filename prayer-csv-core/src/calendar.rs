use chrono::{DateTime, Duration, NaiveDateTime};

use crate::{CalendarRow, CsvOptions, DailyTimingRecord, Error, PrayerEvent, Result};

/// Subject used for the derived midpoint event between consecutive days
pub const MIDNIGHT_EVENT_NAME: &str = "Midnight";

/// Description tag attached to every generated row
const ROW_DESCRIPTION: &str = "Auto-generated";

/// Header recognized by Google Calendar and Outlook CSV import
const CSV_HEADER: [&str; 6] = [
    "Subject",
    "Start Date",
    "Start Time",
    "End Date",
    "End Time",
    "Description",
];

const DATE_FORMAT: &str = "%m/%d/%Y";
const TIME_FORMAT: &str = "%I:%M:%S %p";

// Positions of Fajr and Maghrib in PrayerEvent::ALL
const FAJR_INDEX: usize = 0;
const MAGHRIB_INDEX: usize = 4;

/// Calendar CSV generator
pub struct CsvGenerator {
    options: CsvOptions,
}

impl CsvGenerator {
    pub fn new(options: CsvOptions) -> Self {
        Self { options }
    }

    /// Generate calendar rows for a run of day records.
    ///
    /// Records must span consecutive days in day order. From the second day
    /// onward a synthetic "Midnight" event is inserted before Fajr, at the
    /// midpoint between the previous day's Maghrib and the current day's
    /// Fajr. A missing or unparsable timing in any record fails the whole
    /// pass; no partial output is produced.
    pub fn generate_rows(&self, records: &[DailyTimingRecord]) -> Result<Vec<CalendarRow>> {
        let lead = Duration::minutes(self.options.lead_minutes);
        let lag = Duration::minutes(self.options.lag_minutes);

        let mut rows = Vec::with_capacity(records.len() * (PrayerEvent::ALL.len() + 1));
        let mut previous_maghrib: Option<NaiveDateTime> = None;

        for record in records {
            let mut events: Vec<(&str, NaiveDateTime)> =
                Vec::with_capacity(PrayerEvent::ALL.len() + 1);
            for event in PrayerEvent::ALL {
                events.push((event.name(), parse_event_time(record, event)?));
            }

            let today_maghrib = events[MAGHRIB_INDEX].1;

            if let Some(last_maghrib) = previous_maghrib {
                let today_fajr = events[FAJR_INDEX].1;
                let midnight = last_maghrib + (today_fajr - last_maghrib) / 2;
                events.insert(0, (MIDNIGHT_EVENT_NAME, midnight));
            }

            previous_maghrib = Some(today_maghrib);

            for (subject, instant) in events {
                rows.push(CalendarRow {
                    subject: subject.to_string(),
                    start: instant - lead,
                    end: instant + lag,
                    description: ROW_DESCRIPTION.to_string(),
                });
            }
        }

        Ok(rows)
    }

    /// Generate the complete CSV document, header included
    pub fn generate(&self, records: &[DailyTimingRecord]) -> Result<String> {
        let rows = self.generate_rows(records)?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;
        for row in &rows {
            writer.write_record([
                row.subject.clone(),
                row.start.format(DATE_FORMAT).to_string(),
                row.start.format(TIME_FORMAT).to_string(),
                row.end.format(DATE_FORMAT).to_string(),
                row.end.format(TIME_FORMAT).to_string(),
                row.description.clone(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Internal(format!("Failed to flush CSV buffer: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| Error::Internal(format!("CSV output is not UTF-8: {}", e)))
    }
}

impl Default for CsvGenerator {
    fn default() -> Self {
        Self::new(CsvOptions::default())
    }
}

/// Resolve one event's instant from a raw record.
///
/// Raw values are ISO-8601 timestamps, optionally followed by a timezone
/// abbreviation such as " (PST)". The abbreviation and any UTC offset are
/// dropped; the local wall-clock time is kept.
fn parse_event_time(record: &DailyTimingRecord, event: PrayerEvent) -> Result<NaiveDateTime> {
    let raw = record
        .timings
        .get(event.name())
        .ok_or_else(|| Error::MalformedTiming {
            date: record.date.clone(),
            message: format!("missing timing for {}", event),
        })?;

    let stamp = raw
        .split_whitespace()
        .next()
        .ok_or_else(|| Error::MalformedTiming {
            date: record.date.clone(),
            message: format!("empty timing for {}", event),
        })?;

    DateTime::parse_from_rfc3339(stamp)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(stamp, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| Error::MalformedTiming {
            date: record.date.clone(),
            message: format!("invalid timing for {}: {}: {}", event, stamp, e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, timings: &[(&str, &str)]) -> DailyTimingRecord {
        DailyTimingRecord {
            date: date.to_string(),
            timings: timings
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    fn day_one() -> DailyTimingRecord {
        record(
            "01 Jan 2024",
            &[
                ("Fajr", "2024-01-01T05:00:00"),
                ("Sunrise", "2024-01-01T07:20:00"),
                ("Dhuhr", "2024-01-01T12:10:00"),
                ("Asr", "2024-01-01T14:45:00"),
                ("Maghrib", "2024-01-01T17:30:00"),
                ("Isha", "2024-01-01T19:00:00"),
            ],
        )
    }

    fn day_two() -> DailyTimingRecord {
        record(
            "02 Jan 2024",
            &[
                ("Fajr", "2024-01-02T05:02:00"),
                ("Sunrise", "2024-01-02T07:21:00"),
                ("Dhuhr", "2024-01-02T12:11:00"),
                ("Asr", "2024-01-02T14:46:00"),
                ("Maghrib", "2024-01-02T17:31:00"),
                ("Isha", "2024-01-02T19:01:00"),
            ],
        )
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn exact_generator() -> CsvGenerator {
        CsvGenerator::new(CsvOptions {
            lead_minutes: 0,
            lag_minutes: 0,
        })
    }

    #[test]
    fn test_first_day_has_no_midnight() {
        let generator = CsvGenerator::default();
        let rows = generator.generate_rows(&[day_one()]).unwrap();

        assert_eq!(rows.len(), 6);
        let subjects: Vec<&str> = rows.iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(
            subjects,
            vec!["Fajr", "Sunrise", "Dhuhr", "Asr", "Maghrib", "Isha"]
        );
    }

    #[test]
    fn test_second_day_inserts_midnight_first() {
        let generator = CsvGenerator::default();
        let rows = generator.generate_rows(&[day_one(), day_two()]).unwrap();

        assert_eq!(rows.len(), 13);
        let day_two_subjects: Vec<&str> = rows[6..].iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(
            day_two_subjects,
            vec![
                "Midnight", "Fajr", "Sunrise", "Dhuhr", "Asr", "Maghrib", "Isha"
            ]
        );
    }

    #[test]
    fn test_midnight_is_exact_midpoint() {
        // Maghrib 17:30:00, next Fajr 05:02:00 -> halfway is 23:16:00
        let generator = exact_generator();
        let rows = generator.generate_rows(&[day_one(), day_two()]).unwrap();

        let midnight = &rows[6];
        assert_eq!(midnight.subject, MIDNIGHT_EVENT_NAME);
        assert_eq!(midnight.start, at("2024-01-01T23:16:00"));
        assert_eq!(midnight.end, at("2024-01-01T23:16:00"));
    }

    #[test]
    fn test_lead_lag_applied_to_every_row() {
        let generator = CsvGenerator::new(CsvOptions {
            lead_minutes: 10,
            lag_minutes: 5,
        });
        let rows = generator.generate_rows(&[day_one(), day_two()]).unwrap();

        for row in &rows {
            assert_eq!(row.end - row.start, Duration::minutes(15), "{}", row.subject);
        }

        // Spot-check an absolute window, Fajr of day one
        assert_eq!(rows[0].start, at("2024-01-01T04:50:00"));
        assert_eq!(rows[0].end, at("2024-01-01T05:05:00"));
    }

    #[test]
    fn test_missing_field_fails_whole_pass() {
        let mut broken = day_two();
        broken.timings.remove("Asr");

        let generator = CsvGenerator::default();
        let result = generator.generate_rows(&[day_one(), broken]);

        assert!(matches!(
            result,
            Err(Error::MalformedTiming { ref date, .. }) if date == "02 Jan 2024"
        ));
    }

    #[test]
    fn test_unparsable_field_fails_whole_pass() {
        let mut broken = day_one();
        broken
            .timings
            .insert("Dhuhr".to_string(), "not-a-timestamp".to_string());

        let generator = CsvGenerator::default();
        assert!(matches!(
            generator.generate_rows(&[broken]),
            Err(Error::MalformedTiming { .. })
        ));
    }

    #[test]
    fn test_timezone_suffix_and_offset_are_stripped() {
        let mut day = day_one();
        day.timings
            .insert("Fajr".to_string(), "2024-01-01T05:00:00-08:00 (PST)".to_string());

        let generator = exact_generator();
        let rows = generator.generate_rows(&[day]).unwrap();

        // Wall-clock time survives, the offset does not shift it
        assert_eq!(rows[0].start, at("2024-01-01T05:00:00"));
    }

    #[test]
    fn test_subsecond_midpoint_truncated_by_formatting() {
        // Maghrib 17:30:00, next Fajr 05:03:01 -> midpoint 23:16:30.5
        let mut second = day_two();
        second
            .timings
            .insert("Fajr".to_string(), "2024-01-02T05:03:01".to_string());

        let generator = exact_generator();
        let rows = generator.generate_rows(&[day_one(), second.clone()]).unwrap();
        assert_eq!(
            rows[6].start,
            at("2024-01-01T23:16:30") + Duration::milliseconds(500)
        );

        let csv = generator.generate(&[day_one(), second]).unwrap();
        assert!(csv.contains("Midnight,01/01/2024,11:16:30 PM"));
    }

    #[test]
    fn test_csv_document_format() {
        let generator = CsvGenerator::default();
        let csv = generator.generate(&[day_one()]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(
            lines[0],
            "Subject,Start Date,Start Time,End Date,End Time,Description"
        );
        assert_eq!(
            lines[1],
            "Fajr,01/01/2024,05:00:00 AM,01/01/2024,05:05:00 AM,Auto-generated"
        );
        assert_eq!(
            lines[5],
            "Maghrib,01/01/2024,05:30:00 PM,01/01/2024,05:35:00 PM,Auto-generated"
        );
    }

    #[test]
    fn test_generation_is_idempotent() {
        let generator = CsvGenerator::default();
        let records = [day_one(), day_two()];

        let first = generator.generate(&records).unwrap();
        let second = generator.generate(&records).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input_yields_header_only() {
        let generator = CsvGenerator::default();
        let csv = generator.generate(&[]).unwrap();
        assert_eq!(
            csv,
            "Subject,Start Date,Start Time,End Date,End Time,Description\n"
        );
    }
}
