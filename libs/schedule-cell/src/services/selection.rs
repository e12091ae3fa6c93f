use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::models::ScheduleEntry;
use crate::services::grouping::GroupedSchedule;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    NoDate,
    DateOnly(NaiveDate),
    DateAndSlot(NaiveDate, ScheduleEntry),
}

/// Why a slot pick left the selection untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotRejection {
    NoDateSelected,
    NotOnSelectedDate,
    AlreadyBooked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPick {
    Selected,
    Ignored(SlotRejection),
}

/// Date/slot choice of one booking widget.
///
/// A selected slot always belongs to the selected date of the schedule it was
/// picked from; any date pick drops the slot.
#[derive(Debug, Clone, Default)]
pub struct SlotSelection {
    state: SelectionState,
}

impl SlotSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        match &self.state {
            SelectionState::NoDate => None,
            SelectionState::DateOnly(date) | SelectionState::DateAndSlot(date, _) => Some(*date),
        }
    }

    pub fn selected_slot(&self) -> Option<&ScheduleEntry> {
        match &self.state {
            SelectionState::DateAndSlot(_, slot) => Some(slot),
            _ => None,
        }
    }

    /// Re-picking the current date also clears the slot.
    pub fn select_date(&mut self, date: NaiveDate) {
        debug!("Selecting date {}", date);
        self.state = SelectionState::DateOnly(date);
    }

    /// Booked slots and slots from another date are ignored, mirroring a
    /// disabled button.
    pub fn select_slot(&mut self, schedule: &GroupedSchedule, slot_id: &str) -> SlotPick {
        let Some(date) = self.selected_date() else {
            return SlotPick::Ignored(SlotRejection::NoDateSelected);
        };

        let Some(slot) = schedule.find_slot(date, slot_id) else {
            debug!("Slot {} is not on {}, ignoring", slot_id, date);
            return SlotPick::Ignored(SlotRejection::NotOnSelectedDate);
        };

        if slot.is_booked {
            debug!("Slot {} is already booked, ignoring", slot_id);
            return SlotPick::Ignored(SlotRejection::AlreadyBooked);
        }

        self.state = SelectionState::DateAndSlot(date, slot.clone());
        SlotPick::Selected
    }

    pub fn clear(&mut self) {
        self.state = SelectionState::NoDate;
    }

    /// Picks the earliest date when nothing is selected yet. Callers apply this
    /// once per freshly loaded snapshot.
    pub fn apply_default_date(&mut self, schedule: &GroupedSchedule) -> bool {
        if self.state != SelectionState::NoDate {
            return false;
        }

        match schedule.first_date() {
            Some(first) => {
                debug!("Defaulting selection to first available date {}", first);
                self.state = SelectionState::DateOnly(first);
                true
            }
            None => false,
        }
    }

    /// Re-validates the selection against a newer snapshot.
    pub fn reconcile(&mut self, schedule: &GroupedSchedule) {
        self.state = match std::mem::take(&mut self.state) {
            SelectionState::NoDate => SelectionState::NoDate,
            SelectionState::DateOnly(date) if schedule.contains_date(date) => {
                SelectionState::DateOnly(date)
            }
            SelectionState::DateAndSlot(date, slot) if schedule.contains_date(date) => {
                match schedule.find_slot(date, &slot.id) {
                    Some(fresh) if !fresh.is_booked => SelectionState::DateAndSlot(date, fresh.clone()),
                    _ => {
                        debug!("Selected slot {} no longer available, dropping it", slot.id);
                        SelectionState::DateOnly(date)
                    }
                }
            }
            _ => SelectionState::NoDate,
        };
    }
}
