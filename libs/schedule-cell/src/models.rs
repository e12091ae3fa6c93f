use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ScheduleError;

/// Largest offsets in use world-wide: UTC-12:00 and UTC+14:00.
pub const MIN_UTC_OFFSET_MINUTES: i32 = -12 * 60;
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// One bookable time range of a doctor, as seen in a single fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub is_booked: bool,
}

impl ScheduleEntry {
    /// Calendar date of the start time in the viewer's offset.
    pub fn local_date(&self, offset: &FixedOffset) -> NaiveDate {
        self.start_date_time.with_timezone(offset).date_naive()
    }

    pub fn is_selectable(&self) -> bool {
        !self.is_booked
    }
}

// ==============================================================================
// BACKEND WIRE FORMAT
// ==============================================================================

/// Records stay raw so one malformed entry can be dropped on its own.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSchedulesResponse {
    pub doctor_schedules: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorScheduleRecord {
    pub schedule: ScheduleRecord,
    #[serde(default)]
    pub is_booked: bool,
    #[serde(default)]
    pub doctor: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecord {
    pub id: String,
    pub start_date_time: String,
    pub end_date_time: String,
}

impl DoctorScheduleRecord {
    pub fn from_value(raw: Value) -> Result<Self, ScheduleError> {
        serde_json::from_value(raw).map_err(|e| ScheduleError::MalformedRecord(e.to_string()))
    }
}

impl TryFrom<DoctorScheduleRecord> for ScheduleEntry {
    type Error = ScheduleError;

    fn try_from(record: DoctorScheduleRecord) -> Result<Self, Self::Error> {
        let start = parse_timestamp(&record.schedule.start_date_time)?;
        let end = parse_timestamp(&record.schedule.end_date_time)?;

        if start >= end {
            return Err(ScheduleError::InvalidTimeRange {
                schedule_id: record.schedule.id,
            });
        }

        Ok(ScheduleEntry {
            id: record.schedule.id,
            start_date_time: start,
            end_date_time: end,
            is_booked: record.is_booked,
        })
    }
}

/// Accepts RFC 3339 plus the shorter ISO 8601 forms the backend emits
/// (no seconds, or no offset at all, which is read as UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ScheduleError> {
    let trimmed = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let normalized = match trimmed.strip_suffix('Z') {
        Some(rest) => format!("{}+00:00", rest),
        None => trimmed.to_string(),
    };

    if let Ok(parsed) = DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M%:z") {
        return Ok(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| ScheduleError::InvalidTimestamp(raw.to_string()))
}

/// Viewer offset from minutes east of UTC.
pub fn utc_offset(minutes: i32) -> Result<FixedOffset, ScheduleError> {
    if !(MIN_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&minutes) {
        return Err(ScheduleError::InvalidUtcOffset(minutes));
    }

    FixedOffset::east_opt(minutes * 60).ok_or(ScheduleError::InvalidUtcOffset(minutes))
}
