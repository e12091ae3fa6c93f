use thiserror::Error;
use uuid::Uuid;

use schedule_cell::ScheduleError;
use shared_backend::BackendError;
use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("No time slot selected")]
    NoSlotSelected,

    #[error("A booking submission is already in progress")]
    SubmissionInProgress,

    #[error("Doctor id must not be empty")]
    InvalidDoctorId,

    #[error("Failed to create appointment: {0}")]
    AppointmentCreation(#[source] BackendError),

    #[error("Appointment {appointment_id} was created but payment could not be initiated: {source}")]
    PaymentInitiation {
        appointment_id: String,
        #[source]
        source: BackendError,
    },

    #[error("Appointment {appointment_id} was created but the payment URL '{url}' is unusable")]
    InvalidPaymentUrl { appointment_id: String, url: String },

    #[error("Booking widget {0} not found")]
    WidgetNotFound(Uuid),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

impl BookingError {
    /// The appointment left behind when the payment step fails.
    pub fn orphaned_appointment(&self) -> Option<&str> {
        match self {
            BookingError::PaymentInitiation { appointment_id, .. }
            | BookingError::InvalidPaymentUrl { appointment_id, .. } => Some(appointment_id),
            _ => None,
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NoSlotSelected => AppError::BadRequest(err.to_string()),
            BookingError::SubmissionInProgress => AppError::Conflict(err.to_string()),
            BookingError::InvalidDoctorId => AppError::ValidationError(err.to_string()),
            BookingError::WidgetNotFound(_) => AppError::NotFound(err.to_string()),
            BookingError::AppointmentCreation(_)
            | BookingError::PaymentInitiation { .. }
            | BookingError::InvalidPaymentUrl { .. } => AppError::ExternalService(err.to_string()),
            BookingError::Schedule(inner) => inner.into(),
        }
    }
}
