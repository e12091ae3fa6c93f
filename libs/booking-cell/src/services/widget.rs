use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use schedule_cell::{GroupedSchedule, ScheduleEntry, ScheduleError, SlotPick, SlotSelection};

use crate::error::BookingError;
use crate::models::{ScheduleStatus, SlotView, WidgetView};
use crate::services::submitter::BookingSubmitter;

/// Server-side state of one mounted booking widget.
pub struct BookingWidget {
    id: Uuid,
    doctor_id: String,
    offset: FixedOffset,
    schedule: GroupedSchedule,
    status: ScheduleStatus,
    selection: SlotSelection,
    submitter: Arc<BookingSubmitter>,
    loaded_at: DateTime<Utc>,
    last_seen: Instant,
}

impl BookingWidget {
    pub fn new(doctor_id: &str, offset: FixedOffset, submitter: Arc<BookingSubmitter>) -> Self {
        Self {
            id: Uuid::new_v4(),
            doctor_id: doctor_id.trim().to_string(),
            offset,
            schedule: GroupedSchedule::empty(offset),
            status: ScheduleStatus::Ready,
            selection: SlotSelection::new(),
            submitter,
            loaded_at: Utc::now(),
            last_seen: Instant::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn doctor_id(&self) -> &str {
        &self.doctor_id
    }

    pub fn schedule(&self) -> &GroupedSchedule {
        &self.schedule
    }

    pub fn selection(&self) -> &SlotSelection {
        &self.selection
    }

    pub fn status(&self) -> &ScheduleStatus {
        &self.status
    }

    fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    /// A widget with a pending submission is never idle.
    fn is_idle(&self, max_idle: Duration) -> bool {
        !self.submitter.is_submitting() && self.last_seen.elapsed() > max_idle
    }

    /// Applies a fetch result as a fresh snapshot. A failed fetch shows no
    /// slots and carries the error for the banner.
    pub fn load(&mut self, fetched: Result<Vec<ScheduleEntry>, ScheduleError>) {
        match fetched {
            Ok(entries) => {
                self.schedule = GroupedSchedule::new(&entries, self.offset);
                self.status = ScheduleStatus::Ready;
            }
            Err(e) => {
                warn!("Schedule load failed for widget {}: {}", self.id, e);
                self.schedule = GroupedSchedule::empty(self.offset);
                self.status = ScheduleStatus::Failed(e.to_string());
            }
        }

        self.loaded_at = Utc::now();
        self.selection.reconcile(&self.schedule);
        self.selection.apply_default_date(&self.schedule);
    }

    pub fn select_date(&mut self, date: NaiveDate) -> Result<(), BookingError> {
        if !self.schedule.contains_date(date) {
            return Err(ScheduleError::UnknownDate(date).into());
        }
        self.selection.select_date(date);
        Ok(())
    }

    pub fn select_slot(&mut self, slot_id: &str) -> SlotPick {
        self.selection.select_slot(&self.schedule, slot_id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Inputs for a submission that runs outside the store lock.
    pub fn submission(&self) -> (String, Option<ScheduleEntry>, Arc<BookingSubmitter>) {
        (
            self.doctor_id.clone(),
            self.selection.selected_slot().cloned(),
            self.submitter.clone(),
        )
    }

    /// After a successful booking the slot shows as taken. The selection
    /// resets only if it still holds the booked slot.
    pub fn complete_booking(&mut self, slot_id: &str) {
        if !self.schedule.mark_booked(slot_id) {
            debug!("Booked slot {} no longer in widget {} snapshot", slot_id, self.id);
        }
        if self.selection.selected_slot().map(|slot| slot.id.as_str()) == Some(slot_id) {
            self.selection.clear();
        }
    }

    pub fn view(&self) -> WidgetView {
        let selected_slot = self.selection.selected_slot();
        let selected_id = selected_slot.map(|slot| slot.id.as_str());
        let selected_date = self.selection.selected_date();

        let slots = selected_date
            .map(|date| {
                self.schedule
                    .slots_on(date)
                    .iter()
                    .map(|entry| SlotView::from_entry(entry, selected_id))
                    .collect()
            })
            .unwrap_or_default();

        let is_submitting = self.submitter.is_submitting();
        let load_error = match &self.status {
            ScheduleStatus::Failed(message) => Some(message.clone()),
            ScheduleStatus::Ready => None,
        };

        WidgetView {
            widget_id: self.id,
            doctor_id: self.doctor_id.clone(),
            utc_offset_minutes: self.offset.local_minus_utc() / 60,
            schedule_status: self.status.clone(),
            load_error,
            available_dates: self.schedule.available_dates(),
            selected_date,
            slots,
            selected_slot: selected_slot.map(|slot| SlotView::from_entry(slot, selected_id)),
            can_confirm: selected_slot.is_some() && !is_submitting,
            is_submitting,
            loaded_at: self.loaded_at,
        }
    }
}

/// Mounted widgets keyed by id.
#[derive(Clone, Default)]
pub struct WidgetStore {
    widgets: Arc<RwLock<HashMap<Uuid, BookingWidget>>>,
}

impl WidgetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, widget: BookingWidget) -> Uuid {
        let id = widget.id();
        let mut widgets = self.widgets.write().await;
        widgets.insert(id, widget);
        debug!("Mounted booking widget {} ({} mounted)", id, widgets.len());
        id
    }

    /// Drops widgets nobody has touched for longer than `max_idle`.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut widgets = self.widgets.write().await;
        let before = widgets.len();
        widgets.retain(|id, widget| {
            let idle = widget.is_idle(max_idle);
            if idle {
                debug!("Evicting idle booking widget {}", id);
            }
            !idle
        });
        before - widgets.len()
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), BookingError> {
        let mut widgets = self.widgets.write().await;
        widgets
            .remove(&id)
            .map(|_| debug!("Unmounted booking widget {}", id))
            .ok_or(BookingError::WidgetNotFound(id))
    }

    pub async fn with_widget<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&BookingWidget) -> R,
    ) -> Result<R, BookingError> {
        let mut widgets = self.widgets.write().await;
        let widget = widgets.get_mut(&id).ok_or(BookingError::WidgetNotFound(id))?;
        widget.touch();
        Ok(f(&*widget))
    }

    pub async fn with_widget_mut<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut BookingWidget) -> R,
    ) -> Result<R, BookingError> {
        let mut widgets = self.widgets.write().await;
        let widget = widgets.get_mut(&id).ok_or(BookingError::WidgetNotFound(id))?;
        widget.touch();
        Ok(f(widget))
    }
}
