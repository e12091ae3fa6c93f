use tracing::{debug, warn};

use shared_backend::BackendClient;
use shared_config::AppConfig;

use crate::error::ScheduleError;
use crate::models::{DoctorScheduleRecord, DoctorSchedulesResponse, ScheduleEntry};

pub const DOCTOR_SCHEDULE_PATH: &str = "/doctor-schedule";

/// Reads a doctor's schedule snapshot from the clinic backend.
#[derive(Clone)]
pub struct ScheduleFetcher {
    backend: BackendClient,
}

impl ScheduleFetcher {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            backend: BackendClient::new(config),
        }
    }

    pub fn with_client(backend: BackendClient) -> Self {
        Self { backend }
    }

    pub async fn fetch(&self, doctor_id: &str) -> Result<Vec<ScheduleEntry>, ScheduleError> {
        let doctor_id = doctor_id.trim();
        if doctor_id.is_empty() {
            return Err(ScheduleError::InvalidDoctorId);
        }

        debug!("Fetching schedule for doctor: {}", doctor_id);

        let response: DoctorSchedulesResponse = self
            .backend
            .get_json(DOCTOR_SCHEDULE_PATH, &[("doctorId", doctor_id)])
            .await?;

        let total = response.doctor_schedules.len();
        let entries: Vec<ScheduleEntry> = response
            .doctor_schedules
            .into_iter()
            .filter_map(|raw| {
                match DoctorScheduleRecord::from_value(raw).and_then(ScheduleEntry::try_from) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!("Dropping schedule record for doctor {}: {}", doctor_id, e);
                        None
                    }
                }
            })
            .collect();

        debug!("Fetched {} of {} schedule entries for doctor {}", entries.len(), total, doctor_id);

        Ok(entries)
    }
}
