//! Genetic operators for timetable chromosomes.
//!
//! Both operators keep lab pairs intact:
//!
//! - **Crossover** cuts along the class axis only, so every class grid is
//!   inherited whole from one parent.
//! - **Mutation** never overwrites one half of a pair, places new lab
//!   pairs atomically, and moves pairs as 2-cell blocks.
//!
//! # Usage
//!
//! ```
//! use timetable_ga::ga::operators::GeneticOperators;
//! use timetable_ga::models::{ProblemConfig, SubjectType, TimetableRequest};
//!
//! let request = TimetableRequest::new(2, 5, 6, 4, 4)
//!     .with_subject(0, 4, vec![0, 1], SubjectType::Lecture);
//! let config = ProblemConfig::new(request).unwrap();
//!
//! let ops = GeneticOperators::new(&config);
//! assert_eq!(ops.replace_probability(), 0.6);
//! ```

use rand::seq::IndexedRandom;
use rand::Rng;

use super::chromosome::{draw_assignment, Assignment, CellIndex, Chromosome};
use crate::models::{ProblemConfig, SubjectId};

/// Default share of mutation attempts that replace a cell rather than swap.
pub const DEFAULT_REPLACE_PROBABILITY: f64 = 0.6;

/// Crossover and mutation bound to one problem.
#[derive(Debug, Clone, Copy)]
pub struct GeneticOperators<'a> {
    config: &'a ProblemConfig,
    replace_probability: f64,
}

impl<'a> GeneticOperators<'a> {
    /// Creates operators with the default replace/swap split.
    pub fn new(config: &'a ProblemConfig) -> Self {
        Self {
            config,
            replace_probability: DEFAULT_REPLACE_PROBABILITY,
        }
    }

    /// Sets the probability that a mutation attempt is a replacement.
    pub fn with_replace_probability(mut self, p: f64) -> Self {
        self.replace_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Probability that a mutation attempt is a replacement.
    pub fn replace_probability(&self) -> f64 {
        self.replace_probability
    }

    /// Produces a child by class-axis crossover.
    pub fn crossover<R: Rng>(&self, p1: &Chromosome, p2: &Chromosome, rng: &mut R) -> Chromosome {
        class_crossover(p1, p2, rng)
    }

    /// Mutates a chromosome in place.
    ///
    /// Runs [`mutation_attempts`] attempts, each a replacement with
    /// probability [`Self::replace_probability`] and a swap otherwise.
    /// Attempts that would break a lab pair are skipped.
    ///
    /// Works in place; clone first when the parent must be kept.
    pub fn mutate<R: Rng>(&self, chromosome: &mut Chromosome, rng: &mut R) {
        if chromosome.is_empty() {
            return;
        }
        for _ in 0..mutation_attempts(self.config) {
            let target = random_cell(chromosome, rng);
            if rng.random_bool(self.replace_probability) {
                self.replace(chromosome, target, rng);
            } else {
                let other = random_cell(chromosome, rng);
                self.swap(chromosome, target, other);
            }
        }
    }

    fn replace<R: Rng>(&self, chromosome: &mut Chromosome, target: CellIndex, rng: &mut R) {
        let Some(&subject) = self.config.required_subjects().choose(rng) else {
            return;
        };

        if self.config.is_lab(subject) {
            self.place_lab_pair_near(chromosome, target, subject, rng);
        } else {
            let assignment = draw_assignment(subject, self.config, rng);
            self.overwrite(chromosome, target, assignment);
        }
    }

    /// Writes a lecture over a cell outside any lab pair.
    ///
    /// Undone when it raises the number of odd lab runs in the row.
    fn overwrite(
        &self,
        chromosome: &mut Chromosome,
        target: CellIndex,
        assignment: Assignment,
    ) -> bool {
        if chromosome.lab_pair_start(target, self.config).is_some() {
            return false;
        }

        let before = self.odd_runs_in_rows(chromosome, target, target);
        let previous = chromosome.get(target);
        chromosome.set(target, Some(assignment));
        if self.odd_runs_in_rows(chromosome, target, target) > before {
            chromosome.set(target, previous);
            return false;
        }
        true
    }

    /// Places a lab pair on two free cells of the target's class and day.
    ///
    /// Tries the pair starting at the target, then the one ending at it,
    /// then every other start of that day.
    fn place_lab_pair_near<R: Rng>(
        &self,
        chromosome: &mut Chromosome,
        target: CellIndex,
        subject: SubjectId,
        rng: &mut R,
    ) -> bool {
        let slots = chromosome.slots_per_day();
        if slots < 2 {
            return false;
        }

        let preferred = [Some(target.slot), target.slot.checked_sub(1)];
        let starts = preferred
            .into_iter()
            .flatten()
            .chain(0..slots - 1)
            .filter(|&start| start + 1 < slots);

        for start in starts {
            let first = CellIndex::new(target.class, target.day, start);
            let second = CellIndex::new(target.class, target.day, start + 1);
            if chromosome.is_free(first) && chromosome.is_free(second) {
                let assignment = draw_assignment(subject, self.config, rng);
                chromosome.set(first, Some(assignment));
                chromosome.set(second, Some(assignment));
                return true;
            }
        }
        false
    }

    /// Swaps two plain cells or two lab pairs; mixed swaps are skipped.
    ///
    /// A swap that raises the number of odd lab runs in the touched rows
    /// is undone.
    fn swap(&self, chromosome: &mut Chromosome, a: CellIndex, b: CellIndex) -> bool {
        if a == b {
            return false;
        }

        let config = self.config;
        let moves: Vec<(CellIndex, CellIndex)> = match (
            chromosome.lab_pair_start(a, config),
            chromosome.lab_pair_start(b, config),
        ) {
            (None, None) => vec![(a, b)],
            (Some(sa), Some(sb)) => {
                if (a.class, a.day, sa) == (b.class, b.day, sb) {
                    return false;
                }
                vec![
                    (
                        CellIndex::new(a.class, a.day, sa),
                        CellIndex::new(b.class, b.day, sb),
                    ),
                    (
                        CellIndex::new(a.class, a.day, sa + 1),
                        CellIndex::new(b.class, b.day, sb + 1),
                    ),
                ]
            }
            _ => return false,
        };

        let before = self.odd_runs_in_rows(chromosome, a, b);
        for &(x, y) in &moves {
            chromosome.swap(x, y);
        }
        if self.odd_runs_in_rows(chromosome, a, b) > before {
            for &(x, y) in moves.iter().rev() {
                chromosome.swap(x, y);
            }
            return false;
        }
        true
    }

    fn odd_runs_in_rows(&self, chromosome: &Chromosome, a: CellIndex, b: CellIndex) -> usize {
        let mut count = chromosome.odd_lab_runs(a.class, a.day, self.config);
        if (a.class, a.day) != (b.class, b.day) {
            count += chromosome.odd_lab_runs(b.class, b.day, self.config);
        }
        count
    }
}

/// Single-point crossover along the class axis.
///
/// The cut is drawn from `[1, num_classes - 1]`; classes before it come
/// from `p1`, the rest from `p2`. With fewer than two classes there is no
/// cut point and a random parent is cloned.
pub fn class_crossover<R: Rng>(p1: &Chromosome, p2: &Chromosome, rng: &mut R) -> Chromosome {
    let num_classes = p1.num_classes();
    if num_classes < 2 {
        return if rng.random_bool(0.5) {
            p1.clone()
        } else {
            p2.clone()
        };
    }

    let cut = rng.random_range(1..num_classes);
    let mut child = p1.clone();
    for class in cut..num_classes {
        child.class_grid_mut(class).copy_from_slice(p2.class_grid(class));
    }
    child
}

/// Mutation attempts per chromosome: `max(1, round(rate * total_cells))`.
pub fn mutation_attempts(config: &ProblemConfig) -> usize {
    let scaled = (config.ga().mutation_rate * config.total_cells() as f64).round() as usize;
    scaled.max(1)
}

fn random_cell<R: Rng>(chromosome: &Chromosome, rng: &mut R) -> CellIndex {
    CellIndex::new(
        rng.random_range(0..chromosome.num_classes()),
        rng.random_range(0..chromosome.days()),
        rng.random_range(0..chromosome.slots_per_day()),
    )
}
