pub mod fetcher;
pub mod grouping;
pub mod selection;

pub use fetcher::ScheduleFetcher;
pub use grouping::{group_by_date, GroupedSchedule};
pub use selection::{SelectionState, SlotPick, SlotRejection, SlotSelection};
