//! GA-based timetable optimization.
//!
//! # Encoding
//!
//! A [`Chromosome`] is a dense grid of `(class, day, slot)` cells, each
//! empty or holding a subject/teacher/room [`Assignment`]. Outside data in
//! looser shapes enters through [`Chromosome::from_raw`], which repairs
//! out-of-range ids instead of rejecting them.
//!
//! # Submodules
//!
//! - [`operators`]: Class-axis crossover and lab-pair preserving mutation
//! - [`fitness`]: Weighted penalty terms and their breakdown
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization, and Machine Learning"
//! - Abramson & Abela (1991), "A parallel genetic algorithm for solving the school
//!   timetabling problem"

mod chromosome;
mod engine;
pub mod fitness;
pub mod operators;

pub use chromosome::{
    Assignment, CellIndex, Chromosome, RawCell, RawTimetable, LAB_PLACEMENT_ATTEMPTS,
};
pub use engine::{EngineState, GaEngine, GaProgress, GaResult, ELITE_COUNT};
pub use fitness::{FitnessEvaluator, PenaltyBreakdown};
