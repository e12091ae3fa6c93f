use chrono::NaiveDate;
use thiserror::Error;

use shared_backend::BackendError;
use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Doctor id must not be empty")]
    InvalidDoctorId,

    #[error("UTC offset of {0} minutes is out of range")]
    InvalidUtcOffset(i32),

    #[error("Malformed schedule record: {0}")]
    MalformedRecord(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Schedule {schedule_id} does not start before it ends")]
    InvalidTimeRange { schedule_id: String },

    #[error("No schedule entries on {0}")]
    UnknownDate(NaiveDate),

    #[error("Failed to fetch doctor schedule: {0}")]
    Fetch(#[from] BackendError),
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::InvalidDoctorId | ScheduleError::InvalidUtcOffset(_) => {
                AppError::ValidationError(err.to_string())
            }
            ScheduleError::UnknownDate(_) => AppError::BadRequest(err.to_string()),
            ScheduleError::Fetch(BackendError::NotConfigured) => AppError::Internal(err.to_string()),
            ScheduleError::Fetch(_)
            | ScheduleError::MalformedRecord(_)
            | ScheduleError::InvalidTimestamp(_)
            | ScheduleError::InvalidTimeRange { .. } => AppError::ExternalService(err.to_string()),
        }
    }
}
