pub mod booking;
pub mod gateway;
pub mod submitter;
pub mod widget;

pub use booking::BookingWidgetService;
pub use gateway::{BookingBackend, HttpBookingBackend};
pub use submitter::BookingSubmitter;
pub use widget::{BookingWidget, WidgetStore};
