use std::collections::BTreeMap;

use chrono::{FixedOffset, NaiveDate};
use serde::Serialize;

use crate::models::ScheduleEntry;

/// Partitions entries by the viewer-local calendar date of their start time.
///
/// Entries are stably sorted by start time first, so each day lists its slots
/// chronologically while ties keep fetch order. `BTreeMap` keeps the date keys
/// ascending.
pub fn group_by_date(
    entries: &[ScheduleEntry],
    offset: &FixedOffset,
) -> BTreeMap<NaiveDate, Vec<ScheduleEntry>> {
    let mut sorted: Vec<&ScheduleEntry> = entries.iter().collect();
    sorted.sort_by_key(|entry| entry.start_date_time);

    let mut grouped: BTreeMap<NaiveDate, Vec<ScheduleEntry>> = BTreeMap::new();
    for entry in sorted {
        grouped
            .entry(entry.local_date(offset))
            .or_default()
            .push(entry.clone());
    }

    grouped
}

/// Grouping of one fetched snapshot. Built once per fetch and reused for every
/// view and selection against that snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct GroupedSchedule {
    #[serde(skip)]
    offset: FixedOffset,
    schedules_by_date: BTreeMap<NaiveDate, Vec<ScheduleEntry>>,
}

impl GroupedSchedule {
    pub fn new(entries: &[ScheduleEntry], offset: FixedOffset) -> Self {
        Self {
            schedules_by_date: group_by_date(entries, &offset),
            offset,
        }
    }

    pub fn empty(offset: FixedOffset) -> Self {
        Self {
            offset,
            schedules_by_date: BTreeMap::new(),
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn available_dates(&self) -> Vec<NaiveDate> {
        self.schedules_by_date.keys().copied().collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.schedules_by_date.keys().next().copied()
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.schedules_by_date.contains_key(&date)
    }

    pub fn slots_on(&self, date: NaiveDate) -> &[ScheduleEntry] {
        self.schedules_by_date
            .get(&date)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn find_slot(&self, date: NaiveDate, slot_id: &str) -> Option<&ScheduleEntry> {
        self.slots_on(date).iter().find(|slot| slot.id == slot_id)
    }

    pub fn schedules_by_date(&self) -> &BTreeMap<NaiveDate, Vec<ScheduleEntry>> {
        &self.schedules_by_date
    }

    pub fn is_empty(&self) -> bool {
        self.schedules_by_date.is_empty()
    }

    pub fn total_slots(&self) -> usize {
        self.schedules_by_date.values().map(Vec::len).sum()
    }

    /// Optimistically flags a slot as booked after this client reserved it.
    pub fn mark_booked(&mut self, slot_id: &str) -> bool {
        for slots in self.schedules_by_date.values_mut() {
            if let Some(slot) = slots.iter_mut().find(|slot| slot.id == slot_id) {
                slot.is_booked = true;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;

    fn entry(id: &str, day: u32, hour: u32, is_booked: bool) -> ScheduleEntry {
        let start = Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap();
        ScheduleEntry {
            id: id.to_string(),
            start_date_time: start,
            end_date_time: start + chrono::Duration::minutes(30),
            is_booked,
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    #[test]
    fn test_example_schedule_groups_into_two_days() {
        let entries = vec![entry("a", 1, 9, false), entry("b", 1, 10, true), entry("c", 2, 9, false)];
        let grouped = GroupedSchedule::new(&entries, utc());

        assert_eq!(grouped.available_dates(), vec![date(1), date(2)]);
        let first_day: Vec<&str> = grouped.slots_on(date(1)).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(first_day, vec!["a", "b"]);
        let second_day: Vec<&str> = grouped.slots_on(date(2)).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(second_day, vec!["c"]);
    }

    #[test]
    fn test_every_entry_lands_in_exactly_one_group() {
        let entries = vec![
            entry("e1", 3, 14, false),
            entry("e2", 1, 8, true),
            entry("e3", 3, 9, false),
            entry("e4", 2, 23, false),
            entry("e5", 1, 17, false),
        ];
        let grouped = group_by_date(&entries, &utc());

        let mut seen = HashSet::new();
        let mut total = 0;
        for (day, slots) in &grouped {
            for slot in slots {
                assert_eq!(slot.local_date(&utc()), *day);
                assert!(seen.insert(slot.id.clone()), "{} appears twice", slot.id);
                total += 1;
            }
        }
        assert_eq!(total, entries.len());
    }

    #[test]
    fn test_slots_within_day_are_chronological() {
        let entries = vec![entry("late", 1, 15, false), entry("early", 1, 8, false), entry("mid", 1, 11, true)];
        let grouped = GroupedSchedule::new(&entries, utc());

        let ids: Vec<&str> = grouped.slots_on(date(1)).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "mid", "late"]);
    }

    #[test]
    fn test_equal_start_times_keep_fetch_order() {
        let entries = vec![entry("first", 1, 9, false), entry("second", 1, 9, false)];
        let grouped = GroupedSchedule::new(&entries, utc());

        let ids: Vec<&str> = grouped.slots_on(date(1)).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_available_dates_sorted_and_unique() {
        let entries = vec![
            entry("x", 9, 9, false),
            entry("y", 2, 9, false),
            entry("z", 9, 12, false),
            entry("w", 5, 9, false),
        ];
        let dates = GroupedSchedule::new(&entries, utc()).available_dates();

        assert_eq!(dates, vec![date(2), date(5), date(9)]);
        let keys: Vec<String> = dates.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect();
        let mut sorted_keys = keys.clone();
        sorted_keys.sort();
        assert_eq!(keys, sorted_keys);
    }

    #[test]
    fn test_offset_moves_entry_to_next_day() {
        let entries = vec![entry("night", 1, 22, false)];
        let plus_three = FixedOffset::east_opt(3 * 3600).unwrap();

        let grouped = GroupedSchedule::new(&entries, plus_three);
        assert_eq!(grouped.available_dates(), vec![date(2)]);
    }

    #[test]
    fn test_empty_input_has_no_dates() {
        let grouped = GroupedSchedule::new(&[], utc());
        assert!(grouped.is_empty());
        assert_eq!(grouped.first_date(), None);
        assert!(grouped.slots_on(date(1)).is_empty());
    }

    #[test]
    fn test_mark_booked() {
        let entries = vec![entry("a", 1, 9, false)];
        let mut grouped = GroupedSchedule::new(&entries, utc());

        assert!(grouped.mark_booked("a"));
        assert!(grouped.find_slot(date(1), "a").unwrap().is_booked);
        assert!(!grouped.mark_booked("missing"));
    }
}
