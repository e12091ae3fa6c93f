use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers;
use crate::services::BookingWidgetService;

pub fn booking_routes(service: BookingWidgetService) -> Router {
    Router::new()
        .route("/widgets", post(handlers::mount_widget))
        .route(
            "/widgets/{widget_id}",
            get(handlers::get_widget).delete(handlers::unmount_widget),
        )
        .route("/widgets/{widget_id}/refresh", post(handlers::refresh_widget))
        .route("/widgets/{widget_id}/date", put(handlers::select_date))
        .route("/widgets/{widget_id}/slot", put(handlers::select_slot))
        .route("/widgets/{widget_id}/selection", delete(handlers::clear_selection))
        .route("/widgets/{widget_id}/confirm", post(handlers::confirm_booking))
        .with_state(service)
}
