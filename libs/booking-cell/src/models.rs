use axum::response::{IntoResponse, Redirect, Response};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use schedule_cell::{ScheduleEntry, SlotRejection};

// ==============================================================================
// BACKEND REQUESTS / RESPONSES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub doctor_id: String,
    pub schedule_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAppointment {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSession {
    pub payment_url: String,
}

/// Where the browser goes after a successful booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Navigation {
    /// Full-page replace of the current location.
    Replace { url: String },
}

impl Navigation {
    pub fn url(&self) -> &str {
        match self {
            Navigation::Replace { url } => url,
        }
    }
}

impl IntoResponse for Navigation {
    fn into_response(self) -> Response {
        match self {
            Navigation::Replace { url } => Redirect::to(&url).into_response(),
        }
    }
}

// ==============================================================================
// WIDGET API
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct MountWidgetRequest {
    pub doctor_id: String,
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectDateRequest {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectSlotRequest {
    pub schedule_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum ScheduleStatus {
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotView {
    pub id: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub is_booked: bool,
    pub selectable: bool,
    pub is_selected: bool,
}

impl SlotView {
    pub fn from_entry(entry: &ScheduleEntry, selected_id: Option<&str>) -> Self {
        Self {
            id: entry.id.clone(),
            start_date_time: entry.start_date_time,
            end_date_time: entry.end_date_time,
            is_booked: entry.is_booked,
            selectable: entry.is_selectable(),
            is_selected: selected_id == Some(entry.id.as_str()),
        }
    }
}

/// Everything the browser needs to render the booking widget.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetView {
    pub widget_id: Uuid,
    pub doctor_id: String,
    pub utc_offset_minutes: i32,
    pub schedule_status: ScheduleStatus,
    pub load_error: Option<String>,
    pub available_dates: Vec<NaiveDate>,
    pub selected_date: Option<NaiveDate>,
    pub slots: Vec<SlotView>,
    pub selected_slot: Option<SlotView>,
    pub can_confirm: bool,
    pub is_submitting: bool,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotPickResponse {
    pub selected: bool,
    pub rejection: Option<SlotRejection>,
    pub widget: WidgetView,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};

    #[test]
    fn test_create_appointment_request_is_camel_case() {
        let request = CreateAppointmentRequest {
            doctor_id: "doc-1".into(),
            schedule_id: "a".into(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, serde_json::json!({"doctorId": "doc-1", "scheduleId": "a"}));
    }

    #[test]
    fn test_navigation_is_see_other_redirect() {
        let response = Navigation::Replace {
            url: "https://pay.example.com/session/42".into(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://pay.example.com/session/42"
        );
    }

    #[test]
    fn test_schedule_status_serialization() {
        assert_eq!(
            serde_json::to_value(ScheduleStatus::Ready).unwrap(),
            serde_json::json!({"status": "ready"})
        );
        assert_eq!(
            serde_json::to_value(ScheduleStatus::Failed("down".into())).unwrap(),
            serde_json::json!({"status": "failed", "message": "down"})
        );
    }
}
