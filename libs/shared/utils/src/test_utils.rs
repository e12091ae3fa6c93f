use std::sync::Arc;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;

pub struct TestConfig {
    pub backend_api_url: String,
    pub request_timeout_secs: u64,
    pub retry_backoff_ms: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            backend_api_url: "http://localhost:5000/api/v1".to_string(),
            request_timeout_secs: 2,
            retry_backoff_ms: 1,
        }
    }
}

impl TestConfig {
    /// Config aimed at a wiremock server.
    pub fn for_backend(uri: &str) -> Self {
        Self {
            backend_api_url: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            backend_api_url: self.backend_api_url.clone(),
            request_timeout_secs: self.request_timeout_secs,
            retry_backoff_ms: self.retry_backoff_ms,
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct MockBackendResponses;

impl MockBackendResponses {
    pub fn schedule_record(id: &str, start: &str, end: &str, is_booked: bool) -> Value {
        json!({
            "id": Uuid::new_v4(),
            "schedule": {
                "id": id,
                "startDateTime": start,
                "endDateTime": end
            },
            "isBooked": is_booked,
            "doctor": {
                "id": Uuid::new_v4(),
                "name": "Dr. Test",
                "designation": "MBBS"
            }
        })
    }

    pub fn doctor_schedules_response(records: Vec<Value>) -> Value {
        json!({
            "success": true,
            "message": "Doctor schedules retrieved successfully",
            "data": {
                "doctorSchedules": records
            }
        })
    }

    /// Three entries over two days: `a` open, `b` booked on 2024-06-01 and `c` open on 2024-06-02.
    pub fn sample_schedule_response() -> Value {
        Self::doctor_schedules_response(vec![
            Self::schedule_record("a", "2024-06-01T09:00:00Z", "2024-06-01T09:30:00Z", false),
            Self::schedule_record("b", "2024-06-01T10:00:00Z", "2024-06-01T10:30:00Z", true),
            Self::schedule_record("c", "2024-06-02T09:00:00Z", "2024-06-02T09:30:00Z", false),
        ])
    }

    pub fn appointment_created(appointment_id: &str) -> Value {
        json!({
            "success": true,
            "message": "Appointment booked successfully!",
            "data": {
                "id": appointment_id,
                "status": "SCHEDULED",
                "paymentStatus": "UNPAID"
            }
        })
    }

    pub fn payment_initiated(payment_url: &str) -> Value {
        json!({
            "success": true,
            "message": "Payment initiated successfully",
            "data": {
                "paymentUrl": payment_url
            }
        })
    }

    pub fn error_response(message: &str) -> Value {
        json!({
            "success": false,
            "message": message
        })
    }
}
