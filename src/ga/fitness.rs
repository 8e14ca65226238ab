//! Penalty-based fitness evaluation.
//!
//! Fitness is the negated sum of weighted constraint violations, so `0.0`
//! is a timetable that breaks nothing and every other value is negative.
//!
//! # Penalty Terms
//!
//! | Term | Weight | Counted per |
//! |------|--------|-------------|
//! | Teacher clash | 50 | repeat of a teacher within one (day, slot) |
//! | Room clash | 50 | repeat of a room within one (day, slot) |
//! | Qualification | 20 | cell whose teacher is not listed for its subject |
//! | Lab adjacency | 100 | odd-length lab run in a class/day |
//! | Weekly overload | 10 | hour above the weekly ceiling, per teacher |
//! | Daily overload | 8 | hour above the daily ceiling, per teacher and day |
//! | Hour mismatch | 5 | hour of shortfall or excess, per class and required subject |

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use super::chromosome::{CellIndex, Chromosome};
use crate::models::ProblemConfig;

/// Penalty per repeated teacher in one time slot.
pub const TEACHER_CLASH_WEIGHT: f64 = 50.0;
/// Penalty per repeated room in one time slot.
pub const ROOM_CLASH_WEIGHT: f64 = 50.0;
/// Penalty per unqualified teacher assignment.
pub const QUALIFICATION_WEIGHT: f64 = 20.0;
/// Penalty per odd-length lab run.
pub const LAB_ADJACENCY_WEIGHT: f64 = 100.0;
/// Penalty per hour above the weekly ceiling.
pub const WEEKLY_OVERLOAD_WEIGHT: f64 = 10.0;
/// Penalty per hour above the daily ceiling.
pub const DAILY_OVERLOAD_WEIGHT: f64 = 8.0;
/// Penalty per hour of curriculum mismatch.
pub const HOUR_MISMATCH_WEIGHT: f64 = 5.0;

/// Seed of the repair pass applied to chromosomes that do not fit the config.
const REPAIR_SEED: u64 = 0;

/// Weighted penalty of each constraint family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PenaltyBreakdown {
    /// Teacher double-bookings.
    pub teacher_clashes: f64,
    /// Room double-bookings.
    pub room_clashes: f64,
    /// Unqualified teacher assignments.
    pub qualification: f64,
    /// Broken lab pairs.
    pub lab_adjacency: f64,
    /// Teacher hours above the weekly ceiling.
    pub weekly_overload: f64,
    /// Teacher hours above the daily ceiling.
    pub daily_overload: f64,
    /// Curriculum hours missing or in excess.
    pub hour_mismatch: f64,
}

impl PenaltyBreakdown {
    /// Sum of all terms.
    pub fn total(&self) -> f64 {
        self.teacher_clashes
            + self.room_clashes
            + self.qualification
            + self.lab_adjacency
            + self.weekly_overload
            + self.daily_overload
            + self.hour_mismatch
    }

    /// Fitness value (`-total`).
    pub fn fitness(&self) -> f64 {
        -self.total()
    }
}

/// Scores chromosomes against one problem.
///
/// A chromosome of the wrong shape or with out-of-range ids is scored as
/// its [`Chromosome::normalize`]d form, repaired with a fixed seed so the
/// same input always gets the same score.
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator<'a> {
    config: &'a ProblemConfig,
}

impl<'a> FitnessEvaluator<'a> {
    /// Creates an evaluator for `config`.
    pub fn new(config: &'a ProblemConfig) -> Self {
        Self { config }
    }

    /// Fitness of a chromosome; higher is better, `0.0` is perfect.
    pub fn fitness(&self, chromosome: &Chromosome) -> f64 {
        self.breakdown(chromosome).fitness()
    }

    /// Per-term penalties of a chromosome.
    pub fn breakdown(&self, chromosome: &Chromosome) -> PenaltyBreakdown {
        if chromosome.is_valid(self.config) {
            self.score(chromosome)
        } else {
            let mut rng = SmallRng::seed_from_u64(REPAIR_SEED);
            self.score(&chromosome.normalize(self.config, &mut rng))
        }
    }

    fn score(&self, chromosome: &Chromosome) -> PenaltyBreakdown {
        let config = self.config;
        let (num_classes, days, slots) = chromosome.shape();
        let teachers = config.total_teachers();

        let mut teacher_clashes = 0u64;
        let mut room_clashes = 0u64;
        let mut unqualified = 0u64;

        // Slot stamps avoid clearing the seen-sets between time slots
        let mut teacher_seen = vec![0usize; teachers];
        let mut room_seen = vec![0usize; config.total_rooms()];
        let mut weekly = vec![0u32; teachers];
        let mut daily = vec![0u32; teachers * days];

        for day in 0..days {
            for slot in 0..slots {
                let stamp = day * slots + slot + 1;
                for class in 0..num_classes {
                    let Some(a) = chromosome.get(CellIndex::new(class, day, slot)) else {
                        continue;
                    };

                    if teacher_seen[a.teacher] == stamp {
                        teacher_clashes += 1;
                    }
                    teacher_seen[a.teacher] = stamp;

                    if room_seen[a.room] == stamp {
                        room_clashes += 1;
                    }
                    room_seen[a.room] = stamp;

                    weekly[a.teacher] += 1;
                    daily[a.teacher * days + day] += 1;

                    if !config.is_qualified(a.subject, a.teacher) {
                        unqualified += 1;
                    }
                }
            }
        }

        let odd_runs: usize = (0..num_classes)
            .flat_map(|class| (0..days).map(move |day| (class, day)))
            .map(|(class, day)| chromosome.odd_lab_runs(class, day, config))
            .sum();

        let weekly_excess: u32 = weekly
            .iter()
            .map(|&h| h.saturating_sub(config.max_hours_per_week()))
            .sum();
        let daily_excess: u32 = daily
            .iter()
            .map(|&h| h.saturating_sub(config.max_hours_per_day()))
            .sum();

        let mismatch: u64 = (0..num_classes)
            .map(|class| self.hour_mismatch(chromosome, class))
            .sum();

        PenaltyBreakdown {
            teacher_clashes: teacher_clashes as f64 * TEACHER_CLASH_WEIGHT,
            room_clashes: room_clashes as f64 * ROOM_CLASH_WEIGHT,
            qualification: unqualified as f64 * QUALIFICATION_WEIGHT,
            lab_adjacency: odd_runs as f64 * LAB_ADJACENCY_WEIGHT,
            weekly_overload: f64::from(weekly_excess) * WEEKLY_OVERLOAD_WEIGHT,
            daily_overload: f64::from(daily_excess) * DAILY_OVERLOAD_WEIGHT,
            hour_mismatch: mismatch as f64 * HOUR_MISMATCH_WEIGHT,
        }
    }

    /// Absolute hour difference summed over the required subjects of a class.
    fn hour_mismatch(&self, chromosome: &Chromosome, class: usize) -> u64 {
        let mut assigned = vec![0i64; self.config.num_subjects()];
        for a in chromosome.class_grid(class).iter().flatten() {
            assigned[a.subject] += 1;
        }
        self.config
            .subject_hours()
            .iter()
            .map(|(&subject, &required)| (assigned[subject] - i64::from(required)).unsigned_abs())
            .sum()
    }
}
