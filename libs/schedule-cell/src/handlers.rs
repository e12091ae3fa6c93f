use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::utc_offset;
use crate::services::{GroupedSchedule, ScheduleFetcher};

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub utc_offset_minutes: Option<i32>,
}

/// Grouped, read-only schedule of a doctor.
#[axum::debug_handler]
pub async fn get_doctor_schedule(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<Value>, AppError> {
    let offset_minutes = query
        .utc_offset_minutes
        .unwrap_or(state.default_utc_offset_minutes);
    let offset = utc_offset(offset_minutes)?;

    let fetcher = ScheduleFetcher::new(&state);
    let entries = fetcher.fetch(&doctor_id).await?;
    let grouped = GroupedSchedule::new(&entries, offset);

    Ok(Json(json!({
        "doctor_id": doctor_id.trim(),
        "utc_offset_minutes": offset_minutes,
        "available_dates": grouped.available_dates(),
        "schedules_by_date": grouped.schedules_by_date(),
        "total_slots": grouped.total_slots()
    })))
}
