use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The six canonical daily events, in the order they occur within a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrayerEvent {
    /// Dawn prayer
    Fajr,
    /// Sunrise marker (not a prayer, but part of the schedule)
    Sunrise,
    /// Noon prayer
    Dhuhr,
    /// Afternoon prayer
    Asr,
    /// Sunset prayer
    Maghrib,
    /// Night prayer
    Isha,
}

impl PrayerEvent {
    /// All events in canonical day order. This order is authoritative for
    /// output rows regardless of how a timing map iterates.
    pub const ALL: [PrayerEvent; 6] = [
        PrayerEvent::Fajr,
        PrayerEvent::Sunrise,
        PrayerEvent::Dhuhr,
        PrayerEvent::Asr,
        PrayerEvent::Maghrib,
        PrayerEvent::Isha,
    ];

    /// Event name, used both as timing map key and calendar subject
    pub fn name(self) -> &'static str {
        match self {
            PrayerEvent::Fajr => "Fajr",
            PrayerEvent::Sunrise => "Sunrise",
            PrayerEvent::Dhuhr => "Dhuhr",
            PrayerEvent::Asr => "Asr",
            PrayerEvent::Maghrib => "Maghrib",
            PrayerEvent::Isha => "Isha",
        }
    }
}

impl fmt::Display for PrayerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Juristic method used for the Asr calculation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsrMethod {
    /// Shafi'i, Maliki and Hanbali (shadow factor 1)
    #[default]
    Standard,
    /// Hanafi (shadow factor 2)
    Hanafi,
}

impl AsrMethod {
    /// School code expected by the calculation service
    pub fn school_code(self) -> u8 {
        match self {
            AsrMethod::Standard => 0,
            AsrMethod::Hanafi => 1,
        }
    }
}

/// One day's raw timings as returned by a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTimingRecord {
    /// Human-readable date of the record, used in error reporting
    pub date: String,
    /// Event name to raw timestamp string
    pub timings: HashMap<String, String>,
}

/// Timing query parameters for a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingRequest {
    /// Street address or free-form location the times are calculated for
    pub address: String,
    /// Target calendar year
    pub year: i32,
    /// Solar depression angle for Fajr, in degrees
    pub fajr_angle: f64,
    /// Solar depression angle for Isha, in degrees
    pub isha_angle: f64,
    /// Juristic method for Asr
    pub asr_method: AsrMethod,
    /// Number of months to fetch, starting from January (1..=12)
    pub months: u32,
}

/// CSV generation options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvOptions {
    /// Minutes an event block starts before the computed instant
    pub lead_minutes: i64,
    /// Minutes an event block ends after the computed instant
    pub lag_minutes: i64,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            lead_minutes: 0,
            lag_minutes: 5,
        }
    }
}

/// One calendar-import row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRow {
    /// Event name shown as the calendar entry subject
    pub subject: String,
    /// Block start, local wall-clock time
    pub start: NaiveDateTime,
    /// Block end, local wall-clock time
    pub end: NaiveDateTime,
    /// Description tag attached to the entry
    pub description: String,
}
