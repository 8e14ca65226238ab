//! Projections of a finished timetable.
//!
//! Every view is a pure function of a chromosome and the config it was
//! built for. Names come from the config's name lists, falling back to
//! synthesized names (`Class-1`, `Subject-0`, ...).

use super::slot::{
    day_name, start_time, CombinedTimetable, FlatSlot, SlotInfo, StudentTimetable,
    TeacherTimetable, TimetableReport,
};
use super::statistics::{
    room_utilization, subject_distribution, teacher_workload, Breakdowns, Statistics, Summary,
};
use crate::ga::{Assignment, CellIndex, Chromosome, FitnessEvaluator, GaResult};
use crate::models::ProblemConfig;

/// Builds views for chromosomes of one problem.
///
/// # Example
///
/// ```
/// use timetable_ga::ga::Chromosome;
/// use timetable_ga::models::{ProblemConfig, SubjectType, TimetableRequest};
/// use timetable_ga::views::ViewBuilder;
///
/// let request = TimetableRequest::new(3, 5, 6, 6, 8)
///     .with_subject(0, 4, vec![0, 1], SubjectType::Lecture);
/// let config = ProblemConfig::new(request).unwrap();
/// let empty = Chromosome::empty(&config);
///
/// let stats = ViewBuilder::new(&config).statistics(&empty);
/// assert_eq!(stats.free_slots, 90);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ViewBuilder<'a> {
    config: &'a ProblemConfig,
}

impl<'a> ViewBuilder<'a> {
    /// Creates a builder for `config`.
    pub fn new(config: &'a ProblemConfig) -> Self {
        Self { config }
    }

    /// Describes an occupied cell.
    pub fn slot_info(&self, at: CellIndex, assignment: &Assignment) -> SlotInfo {
        let config = self.config;
        SlotInfo {
            subject_id: Some(assignment.subject),
            subject_name: Some(config.subject_name(assignment.subject).into_owned()),
            teacher_id: Some(assignment.teacher),
            teacher_name: Some(config.teacher_name(assignment.teacher).into_owned()),
            room_id: Some(assignment.room),
            room_name: Some(config.room_name(assignment.room).into_owned()),
            class_id: Some(at.class),
            class_name: Some(config.class_name(at.class).into_owned()),
            day: at.day,
            slot: at.slot,
            is_free: false,
            session_type: Some(config.subject_type(assignment.subject)),
        }
    }

    /// Describes any cell, free or occupied.
    fn cell_info(&self, chromosome: &Chromosome, at: CellIndex) -> SlotInfo {
        match chromosome.get(at) {
            Some(a) => self.slot_info(at, &a),
            None => SlotInfo::free(at.day, at.slot),
        }
    }

    /// One full weekly grid per class.
    pub fn student_view(&self, chromosome: &Chromosome) -> Vec<StudentTimetable> {
        let (num_classes, days, slots) = chromosome.shape();
        (0..num_classes)
            .map(|class| StudentTimetable {
                class_id: class,
                class_name: self.config.class_name(class).into_owned(),
                timetable: (0..days)
                    .map(|day| {
                        (0..slots)
                            .map(|slot| {
                                self.cell_info(chromosome, CellIndex::new(class, day, slot))
                            })
                            .collect()
                    })
                    .collect(),
            })
            .collect()
    }

    /// One weekly grid per teacher.
    ///
    /// A teacher double-booked in one slot shows the highest-numbered
    /// class there; `total_hours` still counts every booking.
    pub fn teacher_view(&self, chromosome: &Chromosome) -> Vec<TeacherTimetable> {
        let (_, days, slots) = chromosome.shape();
        let mut views: Vec<TeacherTimetable> = (0..self.config.total_teachers())
            .map(|teacher| TeacherTimetable {
                teacher_id: teacher,
                teacher_name: self.config.teacher_name(teacher).into_owned(),
                total_hours: 0,
                timetable: vec![vec![None; slots]; days],
            })
            .collect();

        for (at, cell) in chromosome.iter() {
            let Some(a) = cell else { continue };
            if let Some(view) = views.get_mut(a.teacher) {
                view.timetable[at.day][at.slot] = Some(self.slot_info(at, &a));
                view.total_hours += 1;
            }
        }

        views
    }

    /// Occupied cells of every class, per (day, slot).
    pub fn combined_view(&self, chromosome: &Chromosome) -> Vec<CombinedTimetable> {
        let (num_classes, days, slots) = chromosome.shape();
        let mut combined = Vec::with_capacity(days * slots);

        for day in 0..days {
            for slot in 0..slots {
                let assignments = (0..num_classes)
                    .map(|class| CellIndex::new(class, day, slot))
                    .filter_map(|at| chromosome.get(at).map(|a| self.slot_info(at, &a)))
                    .collect();
                combined.push(CombinedTimetable {
                    day,
                    slot,
                    assignments,
                });
            }
        }

        combined
    }

    /// Occupied cells as table rows, class-major.
    pub fn flat_view(&self, chromosome: &Chromosome) -> Vec<FlatSlot> {
        chromosome
            .iter()
            .filter_map(|(at, cell)| {
                cell.map(|a| FlatSlot {
                    class_id: at.class,
                    day: day_name(at.day).into_owned(),
                    start_time: start_time(at.slot),
                    subject_id: a.subject,
                    teacher_id: a.teacher,
                    room_id: a.room,
                    session_type: self.config.subject_type(a.subject),
                })
            })
            .collect()
    }

    /// Occupancy counts.
    pub fn statistics(&self, chromosome: &Chromosome) -> Statistics {
        Statistics::from_chromosome(chromosome)
    }

    /// Occupancy counts, with per-teacher/subject/room hours if requested.
    pub fn summarize(&self, chromosome: &Chromosome, include_breakdowns: bool) -> Summary {
        let breakdowns = include_breakdowns.then(|| Breakdowns {
            teacher_workload: teacher_workload(chromosome, self.config.total_teachers()),
            subject_distribution: subject_distribution(chromosome, self.config.num_subjects()),
            room_utilization: room_utilization(chromosome, self.config.total_rooms()),
        });
        Summary {
            basic: self.statistics(chromosome),
            breakdowns,
        }
    }

    /// Bundles a run result with every view.
    pub fn report(&self, result: &GaResult) -> TimetableReport {
        let best = &result.best;
        TimetableReport {
            success: true,
            fitness_score: result.fitness,
            generation_count: result.generations,
            penalties: FitnessEvaluator::new(self.config).breakdown(best),
            student_timetables: self.student_view(best),
            teacher_timetables: self.teacher_view(best),
            combined_view: self.combined_view(best),
            statistics: self.statistics(best),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SubjectType, TimetableRequest};

    fn sample_config() -> ProblemConfig {
        let request = TimetableRequest::new(2, 2, 3, 3, 3)
            .with_subject(0, 2, vec![0], SubjectType::Lecture)
            .with_subject(1, 2, vec![1], SubjectType::Lab)
            .with_class_names(vec!["7A".to_string()])
            .with_teacher_names(vec!["Ada".to_string(), "Grace".to_string()]);
        ProblemConfig::new(request).unwrap()
    }

    fn sample_chromosome(config: &ProblemConfig) -> Chromosome {
        let mut ch = Chromosome::empty(config);
        ch.set(CellIndex::new(0, 0, 0), Some(Assignment::new(0, 0, 0)));
        ch.set(CellIndex::new(0, 1, 1), Some(Assignment::new(1, 1, 2)));
        ch.set(CellIndex::new(0, 1, 2), Some(Assignment::new(1, 1, 2)));
        ch.set(CellIndex::new(1, 0, 0), Some(Assignment::new(0, 2, 1)));
        ch
    }

    #[test]
    fn test_student_view() {
        let config = sample_config();
        let views = ViewBuilder::new(&config).student_view(&sample_chromosome(&config));

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].class_name, "7A");
        assert_eq!(views[1].class_name, "Class-2");
        assert_eq!(views[0].timetable.len(), 2);
        assert_eq!(views[0].timetable[0].len(), 3);

        let first = &views[0].timetable[0][0];
        assert!(!first.is_free);
        assert_eq!(first.teacher_name.as_deref(), Some("Ada"));
        assert_eq!(first.subject_name.as_deref(), Some("Subject-0"));
        assert_eq!(first.session_type, Some(SubjectType::Lecture));

        let lab = &views[0].timetable[1][1];
        assert_eq!(lab.session_type, Some(SubjectType::Lab));
        assert_eq!(lab.room_name.as_deref(), Some("Room-2"));

        let free = &views[0].timetable[0][1];
        assert_eq!(*free, SlotInfo::free(0, 1));
    }

    #[test]
    fn test_teacher_view() {
        let config = sample_config();
        let views = ViewBuilder::new(&config).teacher_view(&sample_chromosome(&config));

        assert_eq!(views.len(), 3);
        assert_eq!(views[1].teacher_name, "Grace");
        assert_eq!(views[1].total_hours, 2);
        assert!(views[1].timetable[1][1].is_some());
        assert!(views[1].timetable[0][0].is_none());
        assert_eq!(views[2].teacher_name, "Teacher-2");
        let cell = views[2].timetable[0][0].as_ref().unwrap();
        assert_eq!(cell.class_id, Some(1));
    }

    #[test]
    fn test_teacher_view_counts_double_bookings() {
        let config = sample_config();
        let mut ch = Chromosome::empty(&config);
        ch.set(CellIndex::new(0, 0, 0), Some(Assignment::new(0, 0, 0)));
        ch.set(CellIndex::new(1, 0, 0), Some(Assignment::new(0, 0, 1)));

        let views = ViewBuilder::new(&config).teacher_view(&ch);
        assert_eq!(views[0].total_hours, 2);
        let shown = views[0].timetable[0][0].as_ref().unwrap();
        assert_eq!(shown.class_id, Some(1));
    }

    #[test]
    fn test_combined_view() {
        let config = sample_config();
        let combined = ViewBuilder::new(&config).combined_view(&sample_chromosome(&config));

        assert_eq!(combined.len(), 6);
        assert_eq!((combined[0].day, combined[0].slot), (0, 0));
        let classes: Vec<_> = combined[0].assignments.iter().map(|s| s.class_id).collect();
        assert_eq!(classes, vec![Some(0), Some(1)]);
        assert!(combined[1].assignments.is_empty());
        assert_eq!(combined[5].assignments.len(), 1);
    }

    #[test]
    fn test_flat_view() {
        let config = sample_config();
        let flat = ViewBuilder::new(&config).flat_view(&sample_chromosome(&config));

        assert_eq!(flat.len(), 4);
        assert_eq!(flat[0].day, "Monday");
        assert_eq!(flat[0].start_time, "9:00");
        assert_eq!(flat[1].day, "Tuesday");
        assert_eq!(flat[1].start_time, "10:00");
        assert_eq!(flat[1].session_type, SubjectType::Lab);
        assert_eq!(flat[3].class_id, 1);
    }

    #[test]
    fn test_summarize() {
        let config = sample_config();
        let builder = ViewBuilder::new(&config);
        let ch = sample_chromosome(&config);

        let summary = builder.summarize(&ch, true);
        assert_eq!(summary.basic.occupied_slots, 4);
        assert_eq!(summary.basic.free_slots, 8);
        let breakdowns = summary.breakdowns.unwrap();
        assert_eq!(breakdowns.teacher_workload, vec![1, 2, 1]);
        assert_eq!(breakdowns.subject_distribution, vec![2, 2]);
        assert_eq!(breakdowns.room_utilization, vec![1, 1, 2]);

        assert!(builder.summarize(&ch, false).breakdowns.is_none());
    }

    #[test]
    fn test_report() {
        let config = sample_config();
        let best = sample_chromosome(&config);
        let fitness = FitnessEvaluator::new(&config).fitness(&best);
        let result = GaResult {
            best,
            fitness,
            generations: 3,
            history: vec![fitness],
            cancelled: false,
            elapsed: std::time::Duration::ZERO,
        };

        let report = ViewBuilder::new(&config).report(&result);
        assert!(report.success);
        assert_eq!(report.generation_count, 3);
        assert_eq!(report.fitness_score, -report.penalties.total());
        assert_eq!(report.student_timetables.len(), 2);
        assert_eq!(report.teacher_timetables.len(), 3);
        assert_eq!(report.combined_view.len(), 6);
        assert_eq!(report.statistics.total_slots, 12);
    }
}
