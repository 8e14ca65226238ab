//! View records.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::statistics::Statistics;
use crate::ga::PenaltyBreakdown;
use crate::models::{RoomId, SubjectId, SubjectType, TeacherId};

/// Weekday labels for the flat listing; later days become `Day-{n}`.
const DAY_NAMES: [&str; 6] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Hour of the first slot in the flat listing.
const FIRST_SLOT_HOUR: usize = 9;

/// One cell of a view.
///
/// Free cells carry only their position and `is_free = true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInfo {
    /// Subject id.
    pub subject_id: Option<SubjectId>,
    /// Subject display name.
    pub subject_name: Option<String>,
    /// Teacher id.
    pub teacher_id: Option<TeacherId>,
    /// Teacher display name.
    pub teacher_name: Option<String>,
    /// Room id.
    pub room_id: Option<RoomId>,
    /// Room display name.
    pub room_name: Option<String>,
    /// Class index.
    pub class_id: Option<usize>,
    /// Class display name.
    pub class_name: Option<String>,
    /// Day index.
    pub day: usize,
    /// Slot index within the day.
    pub slot: usize,
    /// Whether nothing is scheduled here.
    pub is_free: bool,
    /// Lab or lecture; absent for free cells.
    pub session_type: Option<SubjectType>,
}

impl SlotInfo {
    /// A free cell.
    pub fn free(day: usize, slot: usize) -> Self {
        Self {
            subject_id: None,
            subject_name: None,
            teacher_id: None,
            teacher_name: None,
            room_id: None,
            room_name: None,
            class_id: None,
            class_name: None,
            day,
            slot,
            is_free: true,
            session_type: None,
        }
    }
}

/// Weekly grid of one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentTimetable {
    /// Class index.
    pub class_id: usize,
    /// Class display name.
    pub class_name: String,
    /// `[day][slot]` cells, free cells included.
    pub timetable: Vec<Vec<SlotInfo>>,
}

/// Weekly grid of one teacher across all classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherTimetable {
    /// Teacher id.
    pub teacher_id: TeacherId,
    /// Teacher display name.
    pub teacher_name: String,
    /// Assigned cells, double-bookings counted separately.
    pub total_hours: usize,
    /// `[day][slot]` cells; `None` where the teacher is not assigned.
    pub timetable: Vec<Vec<Option<SlotInfo>>>,
}

/// Every class's assignment at one moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedTimetable {
    /// Day index.
    pub day: usize,
    /// Slot index within the day.
    pub slot: usize,
    /// Occupied cells in class order.
    pub assignments: Vec<SlotInfo>,
}

/// One occupied cell as a table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatSlot {
    /// Class index.
    pub class_id: usize,
    /// Weekday label.
    pub day: String,
    /// Start time label (`"9:00"` for slot 0).
    pub start_time: String,
    /// Subject id.
    pub subject_id: SubjectId,
    /// Teacher id.
    pub teacher_id: TeacherId,
    /// Room id.
    pub room_id: RoomId,
    /// Lab or lecture.
    #[serde(rename = "type")]
    pub session_type: SubjectType,
}

/// Complete output of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimetableReport {
    /// Always `true`; failures surface as errors instead.
    pub success: bool,
    /// Fitness of the timetable (`0.0` is perfect).
    pub fitness_score: f64,
    /// Generations the engine completed.
    pub generation_count: usize,
    /// Penalty terms behind the fitness.
    pub penalties: PenaltyBreakdown,
    /// Per-class grids.
    pub student_timetables: Vec<StudentTimetable>,
    /// Per-teacher grids.
    pub teacher_timetables: Vec<TeacherTimetable>,
    /// Per-moment assignment lists.
    pub combined_view: Vec<CombinedTimetable>,
    /// Occupancy counts.
    pub statistics: Statistics,
}

/// Weekday label of a day index.
pub fn day_name(day: usize) -> Cow<'static, str> {
    match DAY_NAMES.get(day) {
        Some(&name) => Cow::Borrowed(name),
        None => Cow::Owned(format!("Day-{}", day + 1)),
    }
}

/// Start time label of a slot index.
pub fn start_time(slot: usize) -> String {
    format!("{}:00", FIRST_SLOT_HOUR + slot)
}
