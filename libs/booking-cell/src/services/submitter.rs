use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use reqwest::Url;
use tracing::{error, info, warn};

use schedule_cell::ScheduleEntry;

use crate::error::BookingError;
use crate::models::{CreateAppointmentRequest, Navigation};
use crate::services::gateway::BookingBackend;

/// Releases the in-flight flag when the submission ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs the create-appointment then initiate-payment sequence for one widget.
///
/// Neither step is retried. While a submission is pending, further calls are
/// refused with [`BookingError::SubmissionInProgress`].
pub struct BookingSubmitter {
    backend: Arc<dyn BookingBackend>,
    in_flight: AtomicBool,
}

impl BookingSubmitter {
    pub fn new(backend: Arc<dyn BookingBackend>) -> Self {
        Self {
            backend,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn submit(
        &self,
        doctor_id: &str,
        slot: Option<&ScheduleEntry>,
    ) -> Result<Navigation, BookingError> {
        let slot = slot.ok_or(BookingError::NoSlotSelected)?;

        let doctor_id = doctor_id.trim();
        if doctor_id.is_empty() {
            return Err(BookingError::InvalidDoctorId);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(BookingError::SubmissionInProgress);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let request = CreateAppointmentRequest {
            doctor_id: doctor_id.to_string(),
            schedule_id: slot.id.clone(),
        };

        let appointment = self
            .backend
            .create_appointment(&request)
            .await
            .map_err(|e| {
                error!("Appointment creation failed for schedule {}: {}", slot.id, e);
                BookingError::AppointmentCreation(e)
            })?;

        info!("Appointment {} created for schedule {}", appointment.id, slot.id);

        let payment = self
            .backend
            .initiate_payment(&appointment.id)
            .await
            .map_err(|e| {
                warn!(
                    "Appointment {} left without a payment session: {}",
                    appointment.id, e
                );
                BookingError::PaymentInitiation {
                    appointment_id: appointment.id.clone(),
                    source: e,
                }
            })?;

        if !is_navigable(&payment.payment_url) {
            warn!(
                "Appointment {} got unusable payment URL '{}'",
                appointment.id, payment.payment_url
            );
            return Err(BookingError::InvalidPaymentUrl {
                appointment_id: appointment.id,
                url: payment.payment_url,
            });
        }

        info!("Redirecting to payment for appointment {}", appointment.id);
        Ok(Navigation::Replace {
            url: payment.payment_url,
        })
    }
}

fn is_navigable(url: &str) -> bool {
    Url::parse(url)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
        .unwrap_or(false)
}
