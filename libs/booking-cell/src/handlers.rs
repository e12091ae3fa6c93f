use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{
    MountWidgetRequest, Navigation, SelectDateRequest, SelectSlotRequest, SlotPickResponse,
    WidgetView,
};
use crate::services::BookingWidgetService;

#[axum::debug_handler]
pub async fn mount_widget(
    State(service): State<BookingWidgetService>,
    Json(request): Json<MountWidgetRequest>,
) -> Result<(StatusCode, Json<WidgetView>), AppError> {
    let view = service.mount(request).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[axum::debug_handler]
pub async fn get_widget(
    State(service): State<BookingWidgetService>,
    Path(widget_id): Path<Uuid>,
) -> Result<Json<WidgetView>, AppError> {
    Ok(Json(service.view(widget_id).await?))
}

#[axum::debug_handler]
pub async fn refresh_widget(
    State(service): State<BookingWidgetService>,
    Path(widget_id): Path<Uuid>,
) -> Result<Json<WidgetView>, AppError> {
    Ok(Json(service.refresh(widget_id).await?))
}

#[axum::debug_handler]
pub async fn select_date(
    State(service): State<BookingWidgetService>,
    Path(widget_id): Path<Uuid>,
    Json(request): Json<SelectDateRequest>,
) -> Result<Json<WidgetView>, AppError> {
    Ok(Json(service.select_date(widget_id, request.date).await?))
}

#[axum::debug_handler]
pub async fn select_slot(
    State(service): State<BookingWidgetService>,
    Path(widget_id): Path<Uuid>,
    Json(request): Json<SelectSlotRequest>,
) -> Result<Json<SlotPickResponse>, AppError> {
    Ok(Json(service.select_slot(widget_id, &request.schedule_id).await?))
}

#[axum::debug_handler]
pub async fn clear_selection(
    State(service): State<BookingWidgetService>,
    Path(widget_id): Path<Uuid>,
) -> Result<Json<WidgetView>, AppError> {
    Ok(Json(service.clear_selection(widget_id).await?))
}

/// Redirects the browser to the payment page on success.
#[axum::debug_handler]
pub async fn confirm_booking(
    State(service): State<BookingWidgetService>,
    Path(widget_id): Path<Uuid>,
) -> Result<Navigation, AppError> {
    info!("Booking confirmation for widget {}", widget_id);
    Ok(service.confirm(widget_id).await?)
}

#[axum::debug_handler]
pub async fn unmount_widget(
    State(service): State<BookingWidgetService>,
    Path(widget_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service.unmount(widget_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
