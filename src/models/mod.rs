//! Timetable problem models.
//!
//! Provides the input types for a timetabling problem: the raw request
//! as callers send it, and the validated configuration the engine runs on.
//!
//! # Domain Mappings
//!
//! | timetable-ga | School | University | Training Center |
//! |--------------|--------|------------|-----------------|
//! | Class | Form/Grade Section | Student Group | Cohort |
//! | Subject | Course | Module | Session Type |
//! | Teacher | Teacher | Lecturer | Trainer |
//! | Room | Classroom/Lab | Hall/Lab | Room |

mod config;

pub use config::{
    GaSettings, ProblemConfig, RoomId, SubjectId, SubjectType, TeacherId, TimetableRequest,
};
