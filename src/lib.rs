//! Class timetable construction with a genetic algorithm.
//!
//! Assigns subjects, teachers, and rooms into a grid of
//! (class × day × slot) cells and searches for the assignment with the
//! fewest constraint violations.
//!
//! # Modules
//!
//! - **`models`**: Problem input: `TimetableRequest`, the validated
//!   `ProblemConfig`, `SubjectType`, `GaSettings`
//! - **`ga`**: The search: `Chromosome` encoding and repair, the penalty
//!   `FitnessEvaluator`, lab-pair aware crossover/mutation, `GaEngine`
//! - **`views`**: Read-only projections of a finished timetable:
//!   per-class, per-teacher, cross-class, flat listing, statistics
//! - **`validation`**: Input integrity checks (dimensions, id references)
//!
//! # Example
//!
//! ```no_run
//! use timetable_ga::ga::GaEngine;
//! use timetable_ga::models::{ProblemConfig, SubjectType, TimetableRequest};
//! use timetable_ga::views::ViewBuilder;
//!
//! let request = TimetableRequest::new(3, 5, 6, 6, 8)
//!     .with_subject(0, 4, vec![0, 1], SubjectType::Lecture)
//!     .with_subject(1, 2, vec![2], SubjectType::Lab);
//! let config = ProblemConfig::new(request).unwrap();
//!
//! let result = GaEngine::new(&config).run();
//! let views = ViewBuilder::new(&config);
//! let classes = views.student_view(&result.best);
//! println!("fitness {} over {} classes", result.fitness, classes.len());
//! ```
//!
//! # References
//!
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"
//! - Colorni, Dorigo & Maniezzo (1998), "Metaheuristics for High School Timetabling"

pub mod error;
pub mod ga;
pub mod models;
pub mod validation;
pub mod views;

pub use error::TimetableError;
