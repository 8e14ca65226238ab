//! Read-only views of a finished timetable.
//!
//! # Views
//!
//! | View | Shape | Use |
//! |------|-------|-----|
//! | Student | class → `[day][slot]` | class printouts |
//! | Teacher | teacher → `[day][slot]` + total hours | staff printouts |
//! | Combined | `(day, slot)` → assignments | clash review |
//! | Flat | one row per occupied cell | table widgets |
//!
//! [`ViewBuilder::report`] bundles all of them with the run's fitness.

mod builder;
mod slot;
pub mod statistics;

pub use builder::ViewBuilder;
pub use slot::{
    day_name, start_time, CombinedTimetable, FlatSlot, SlotInfo, StudentTimetable,
    TeacherTimetable, TimetableReport,
};
pub use statistics::{Breakdowns, Statistics, Summary};
