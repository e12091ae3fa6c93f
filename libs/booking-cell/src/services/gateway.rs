use async_trait::async_trait;
use tracing::debug;

use shared_backend::{BackendClient, BackendError};
use shared_config::AppConfig;

use crate::models::{CreateAppointmentRequest, CreatedAppointment, PaymentSession};

pub const CREATE_APPOINTMENT_PATH: &str = "/appointment";
pub const INIT_PAYMENT_PATH: &str = "/payment/init-payment";

/// The two remote operations a booking runs through.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingBackend: Send + Sync {
    async fn create_appointment(
        &self,
        request: &CreateAppointmentRequest,
    ) -> Result<CreatedAppointment, BackendError>;

    async fn initiate_payment(&self, appointment_id: &str) -> Result<PaymentSession, BackendError>;
}

pub struct HttpBookingBackend {
    backend: BackendClient,
}

impl HttpBookingBackend {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            backend: BackendClient::new(config),
        }
    }
}

#[async_trait]
impl BookingBackend for HttpBookingBackend {
    async fn create_appointment(
        &self,
        request: &CreateAppointmentRequest,
    ) -> Result<CreatedAppointment, BackendError> {
        debug!(
            "Creating appointment for doctor {} on schedule {}",
            request.doctor_id, request.schedule_id
        );
        self.backend
            .post_json(CREATE_APPOINTMENT_PATH, Some(request))
            .await
    }

    async fn initiate_payment(&self, appointment_id: &str) -> Result<PaymentSession, BackendError> {
        debug!("Initiating payment for appointment {}", appointment_id);
        let path = format!("{}/{}", INIT_PAYMENT_PATH, appointment_id);
        self.backend.post_json::<PaymentSession, ()>(&path, None).await
    }
}
