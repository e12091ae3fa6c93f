use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use schedule_cell::{utc_offset, ScheduleFetcher, SlotPick};
use shared_config::AppConfig;

use crate::error::BookingError;
use crate::models::{MountWidgetRequest, Navigation, SlotPickResponse, WidgetView};
use crate::services::gateway::{BookingBackend, HttpBookingBackend};
use crate::services::submitter::BookingSubmitter;
use crate::services::widget::{BookingWidget, WidgetStore};

/// Drives booking widgets: mount, load, select, confirm, unmount.
#[derive(Clone)]
pub struct BookingWidgetService {
    store: WidgetStore,
    fetcher: ScheduleFetcher,
    backend: Arc<dyn BookingBackend>,
    default_utc_offset_minutes: i32,
    widget_idle_ttl: Duration,
}

impl BookingWidgetService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_parts(
            ScheduleFetcher::new(config),
            Arc::new(HttpBookingBackend::new(config)),
            config.default_utc_offset_minutes,
            config.widget_idle_ttl(),
        )
    }

    pub fn with_parts(
        fetcher: ScheduleFetcher,
        backend: Arc<dyn BookingBackend>,
        default_utc_offset_minutes: i32,
        widget_idle_ttl: Duration,
    ) -> Self {
        Self {
            store: WidgetStore::new(),
            fetcher,
            backend,
            default_utc_offset_minutes,
            widget_idle_ttl,
        }
    }

    pub async fn mount(&self, request: MountWidgetRequest) -> Result<WidgetView, BookingError> {
        if request.doctor_id.trim().is_empty() {
            return Err(BookingError::InvalidDoctorId);
        }
        let offset = utc_offset(
            request
                .utc_offset_minutes
                .unwrap_or(self.default_utc_offset_minutes),
        )?;

        let submitter = Arc::new(BookingSubmitter::new(self.backend.clone()));
        let mut widget = BookingWidget::new(&request.doctor_id, offset, submitter);
        let fetched = self.fetcher.fetch(widget.doctor_id()).await;
        widget.load(fetched);

        let view = widget.view();
        let evicted = self.store.evict_idle(self.widget_idle_ttl).await;
        if evicted > 0 {
            info!("Evicted {} idle booking widgets", evicted);
        }
        self.store.insert(widget).await;

        info!("Booking widget {} mounted for doctor {}", view.widget_id, view.doctor_id);
        Ok(view)
    }

    pub async fn view(&self, id: Uuid) -> Result<WidgetView, BookingError> {
        self.store.with_widget(id, BookingWidget::view).await
    }

    /// Refetches the schedule; the store lock is not held across the fetch.
    pub async fn refresh(&self, id: Uuid) -> Result<WidgetView, BookingError> {
        let doctor_id = self
            .store
            .with_widget(id, |widget| widget.doctor_id().to_string())
            .await?;

        let fetched = self.fetcher.fetch(&doctor_id).await;

        self.store
            .with_widget_mut(id, |widget| {
                widget.load(fetched);
                widget.view()
            })
            .await
    }

    pub async fn select_date(&self, id: Uuid, date: NaiveDate) -> Result<WidgetView, BookingError> {
        self.store
            .with_widget_mut(id, |widget| {
                widget.select_date(date)?;
                Ok(widget.view())
            })
            .await?
    }

    pub async fn select_slot(&self, id: Uuid, slot_id: &str) -> Result<SlotPickResponse, BookingError> {
        self.store
            .with_widget_mut(id, |widget| {
                let pick = widget.select_slot(slot_id);
                SlotPickResponse {
                    selected: pick == SlotPick::Selected,
                    rejection: match pick {
                        SlotPick::Selected => None,
                        SlotPick::Ignored(reason) => Some(reason),
                    },
                    widget: widget.view(),
                }
            })
            .await
    }

    pub async fn clear_selection(&self, id: Uuid) -> Result<WidgetView, BookingError> {
        self.store
            .with_widget_mut(id, |widget| {
                widget.clear_selection();
                widget.view()
            })
            .await
    }

    /// Submits the selected slot. Failures leave the selection as it was.
    pub async fn confirm(&self, id: Uuid) -> Result<Navigation, BookingError> {
        let (doctor_id, slot, submitter) = self.store.with_widget(id, BookingWidget::submission).await?;

        let navigation = submitter.submit(&doctor_id, slot.as_ref()).await?;

        if let Some(slot) = slot {
            let completed = self
                .store
                .with_widget_mut(id, |widget| widget.complete_booking(&slot.id))
                .await;
            if completed.is_err() {
                warn!("Widget {} unmounted while its booking was in flight", id);
            }
        }

        Ok(navigation)
    }

    pub async fn unmount(&self, id: Uuid) -> Result<(), BookingError> {
        self.store.remove(id).await
    }
}
