//! Occupancy statistics.
//!
//! Counts over a finished timetable: how many cells are used, and how the
//! used cells spread over teachers, subjects, and rooms.

use serde::{Deserialize, Serialize};

use crate::ga::{Assignment, Chromosome};

/// Cell occupancy counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// `num_classes * days * slots_per_day`.
    pub total_slots: usize,
    /// Cells holding an assignment.
    pub occupied_slots: usize,
    /// `total_slots - occupied_slots`.
    pub free_slots: usize,
}

impl Statistics {
    /// Counts the cells of a chromosome.
    pub fn from_chromosome(chromosome: &Chromosome) -> Self {
        let total_slots = chromosome.len();
        let occupied_slots = chromosome.occupied_count();
        Self {
            total_slots,
            occupied_slots,
            free_slots: total_slots - occupied_slots,
        }
    }
}

/// Per-resource hour counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdowns {
    /// Hours per teacher id.
    pub teacher_workload: Vec<usize>,
    /// Hours per subject id, summed over classes.
    pub subject_distribution: Vec<usize>,
    /// Hours per room id.
    pub room_utilization: Vec<usize>,
}

/// Statistics with optional breakdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Occupancy counts.
    pub basic: Statistics,
    /// Per-resource counts, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdowns: Option<Breakdowns>,
}

/// Hours per teacher; ids at or above `total_teachers` are not counted.
pub fn teacher_workload(chromosome: &Chromosome, total_teachers: usize) -> Vec<usize> {
    tally(chromosome, total_teachers, |a| a.teacher)
}

/// Hours per subject; ids at or above `num_subjects` are not counted.
pub fn subject_distribution(chromosome: &Chromosome, num_subjects: usize) -> Vec<usize> {
    tally(chromosome, num_subjects, |a| a.subject)
}

/// Hours per room; ids at or above `total_rooms` are not counted.
pub fn room_utilization(chromosome: &Chromosome, total_rooms: usize) -> Vec<usize> {
    tally(chromosome, total_rooms, |a| a.room)
}

fn tally(chromosome: &Chromosome, size: usize, key: impl Fn(&Assignment) -> usize) -> Vec<usize> {
    let mut counts = vec![0; size];
    for (_, cell) in chromosome.iter() {
        if let Some(count) = cell.as_ref().map(&key).and_then(|id| counts.get_mut(id)) {
            *count += 1;
        }
    }
    counts
}
