//! Problem definition: dimensions, curriculum, and GA hyperparameters.
//!
//! A [`TimetableRequest`] is the loosely-checked input record, shaped like
//! the JSON body callers send. [`ProblemConfig::new`] validates it and
//! freezes it into the immutable form the engine and views consume.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TimetableError;
use crate::validation::validate_request;

/// Subject identifier (0-based).
pub type SubjectId = usize;
/// Teacher identifier (0-based).
pub type TeacherId = usize;
/// Room identifier (0-based).
pub type RoomId = usize;

/// How a subject is taught.
///
/// Lab subjects must be scheduled as two adjacent slots on the same day
/// with the same teacher and room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SubjectType {
    /// Single-slot teaching unit.
    #[default]
    Lecture,
    /// Double-slot teaching unit (adjacent slots, shared teacher and room).
    Lab,
}

impl From<String> for SubjectType {
    fn from(tag: String) -> Self {
        if tag.trim().eq_ignore_ascii_case("lab") {
            SubjectType::Lab
        } else {
            SubjectType::Lecture
        }
    }
}

/// Genetic algorithm hyperparameters.
///
/// # Defaults
///
/// ```
/// use timetable_ga::models::GaSettings;
///
/// let settings = GaSettings::default();
/// assert_eq!(settings.population_size, 60);
/// assert_eq!(settings.generations, 80);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaSettings {
    /// Number of timetables per generation. Must be at least 2.
    pub population_size: usize,
    /// Number of generations to evolve. Zero evaluates the initial
    /// population only.
    pub generations: usize,
    /// Fraction of grid cells considered for mutation per child (0.0–1.0).
    pub mutation_rate: f64,
    /// Random seed for reproducible runs. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Whether to evaluate and breed individuals on the rayon pool.
    pub parallel: bool,
}

impl Default for GaSettings {
    fn default() -> Self {
        Self {
            population_size: 60,
            generations: 80,
            mutation_rate: 0.02,
            seed: None,
            parallel: true,
        }
    }
}

impl GaSettings {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Timetable generation request.
///
/// Mirrors the JSON body accepted by the generation service. Subject-keyed
/// maps accept string keys (`{"0": 4}`).
///
/// # Example
///
/// ```
/// use timetable_ga::models::{SubjectType, TimetableRequest};
///
/// let request = TimetableRequest::new(2, 5, 6, 4, 6)
///     .with_subject(0, 4, vec![0, 1], SubjectType::Lecture)
///     .with_subject(1, 2, vec![2], SubjectType::Lab)
///     .with_class_names(vec!["A".into(), "B".into()]);
/// assert_eq!(request.subject_hours.len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableRequest {
    /// Number of classes (student groups).
    pub num_classes: usize,
    /// Teaching days per week.
    pub days: usize,
    /// Slots per teaching day.
    pub slots_per_day: usize,
    /// Number of rooms available.
    pub total_rooms: usize,
    /// Number of teachers available.
    pub total_teachers: usize,
    /// Required weekly hours per subject, for every class.
    pub subject_hours: BTreeMap<SubjectId, u32>,
    /// Qualified teachers per subject.
    #[serde(default)]
    pub subject_teachers: BTreeMap<SubjectId, Vec<TeacherId>>,
    /// Subject kinds. Subjects not listed are lectures.
    #[serde(default)]
    pub subject_types: BTreeMap<SubjectId, SubjectType>,
    /// Soft ceiling on a teacher's hours per day.
    #[serde(default = "default_max_hours_per_day")]
    pub max_hours_per_day: u32,
    /// Soft ceiling on a teacher's hours per week.
    #[serde(default = "default_max_hours_per_week")]
    pub max_hours_per_week: u32,
    /// Display names for classes.
    #[serde(default)]
    pub class_names: Option<Vec<String>>,
    /// Display names for subjects.
    #[serde(default)]
    pub subject_names: Option<Vec<String>>,
    /// Display names for teachers.
    #[serde(default)]
    pub teacher_names: Option<Vec<String>>,
    /// Display names for rooms.
    #[serde(default)]
    pub room_names: Option<Vec<String>>,
    /// GA hyperparameters.
    #[serde(flatten)]
    pub ga: GaSettings,
}

fn default_max_hours_per_day() -> u32 {
    6
}

fn default_max_hours_per_week() -> u32 {
    20
}

impl TimetableRequest {
    /// Creates a request with the given grid and resource counts and an
    /// empty curriculum.
    pub fn new(
        num_classes: usize,
        days: usize,
        slots_per_day: usize,
        total_rooms: usize,
        total_teachers: usize,
    ) -> Self {
        Self {
            num_classes,
            days,
            slots_per_day,
            total_rooms,
            total_teachers,
            subject_hours: BTreeMap::new(),
            subject_teachers: BTreeMap::new(),
            subject_types: BTreeMap::new(),
            max_hours_per_day: default_max_hours_per_day(),
            max_hours_per_week: default_max_hours_per_week(),
            class_names: None,
            subject_names: None,
            teacher_names: None,
            room_names: None,
            ga: GaSettings::default(),
        }
    }

    /// Parses a request from JSON.
    pub fn from_json(json: &str) -> Result<Self, TimetableError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a request from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TimetableError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Adds a subject with its weekly hours, qualified teachers, and kind.
    pub fn with_subject(
        mut self,
        subject: SubjectId,
        hours: u32,
        teachers: Vec<TeacherId>,
        kind: SubjectType,
    ) -> Self {
        self.subject_hours.insert(subject, hours);
        if !teachers.is_empty() {
            self.subject_teachers.insert(subject, teachers);
        }
        self.subject_types.insert(subject, kind);
        self
    }

    /// Sets the teacher load ceilings.
    pub fn with_max_hours(mut self, per_day: u32, per_week: u32) -> Self {
        self.max_hours_per_day = per_day;
        self.max_hours_per_week = per_week;
        self
    }

    /// Sets the class display names.
    pub fn with_class_names(mut self, names: Vec<String>) -> Self {
        self.class_names = Some(names);
        self
    }

    /// Sets the subject display names.
    pub fn with_subject_names(mut self, names: Vec<String>) -> Self {
        self.subject_names = Some(names);
        self
    }

    /// Sets the teacher display names.
    pub fn with_teacher_names(mut self, names: Vec<String>) -> Self {
        self.teacher_names = Some(names);
        self
    }

    /// Sets the room display names.
    pub fn with_room_names(mut self, names: Vec<String>) -> Self {
        self.room_names = Some(names);
        self
    }

    /// Sets the GA hyperparameters.
    pub fn with_ga(mut self, ga: GaSettings) -> Self {
        self.ga = ga;
        self
    }

    /// Number of subjects implied by the curriculum (`max id + 1`).
    pub fn num_subjects(&self) -> usize {
        self.subject_hours
            .keys()
            .next_back()
            .map_or(0, |&max| max + 1)
    }
}

/// Validated, immutable timetable problem.
///
/// Built once from a [`TimetableRequest`] and shared read-only by the
/// engine, the fitness evaluator, and the view builder.
#[derive(Debug, Clone)]
pub struct ProblemConfig {
    num_classes: usize,
    days: usize,
    slots_per_day: usize,
    total_rooms: usize,
    total_teachers: usize,
    num_subjects: usize,
    subject_hours: BTreeMap<SubjectId, u32>,
    required_subjects: Vec<SubjectId>,
    subject_teachers: BTreeMap<SubjectId, Vec<TeacherId>>,
    subject_types: BTreeMap<SubjectId, SubjectType>,
    max_hours_per_day: u32,
    max_hours_per_week: u32,
    class_names: Vec<String>,
    subject_names: Vec<String>,
    teacher_names: Vec<String>,
    room_names: Vec<String>,
    ga: GaSettings,
}

impl ProblemConfig {
    /// Validates a request and freezes it.
    ///
    /// # Errors
    /// [`TimetableError::InvalidConfig`] listing every problem found.
    pub fn new(request: TimetableRequest) -> Result<Self, TimetableError> {
        validate_request(&request)?;

        let num_subjects = request.num_subjects();
        let required_subjects = request.subject_hours.keys().copied().collect();
        let subject_teachers = request
            .subject_teachers
            .into_iter()
            .map(|(subject, mut teachers)| {
                teachers.sort_unstable();
                teachers.dedup();
                (subject, teachers)
            })
            .collect();

        Ok(Self {
            num_classes: request.num_classes,
            days: request.days,
            slots_per_day: request.slots_per_day,
            total_rooms: request.total_rooms,
            total_teachers: request.total_teachers,
            num_subjects,
            subject_hours: request.subject_hours,
            required_subjects,
            subject_teachers,
            subject_types: request.subject_types,
            max_hours_per_day: request.max_hours_per_day,
            max_hours_per_week: request.max_hours_per_week,
            class_names: request.class_names.unwrap_or_default(),
            subject_names: request.subject_names.unwrap_or_default(),
            teacher_names: request.teacher_names.unwrap_or_default(),
            room_names: request.room_names.unwrap_or_default(),
            ga: request.ga,
        })
    }

    /// Number of classes.
    #[inline]
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Teaching days per week.
    #[inline]
    pub fn days(&self) -> usize {
        self.days
    }

    /// Slots per day.
    #[inline]
    pub fn slots_per_day(&self) -> usize {
        self.slots_per_day
    }

    /// Number of rooms.
    #[inline]
    pub fn total_rooms(&self) -> usize {
        self.total_rooms
    }

    /// Number of teachers.
    #[inline]
    pub fn total_teachers(&self) -> usize {
        self.total_teachers
    }

    /// Number of subject ids (`max required id + 1`).
    #[inline]
    pub fn num_subjects(&self) -> usize {
        self.num_subjects
    }

    /// Cells in one class grid (`days * slots_per_day`).
    #[inline]
    pub fn cells_per_class(&self) -> usize {
        self.days * self.slots_per_day
    }

    /// Cells in the whole timetable.
    #[inline]
    pub fn total_cells(&self) -> usize {
        self.num_classes * self.cells_per_class()
    }

    /// Required weekly hours per subject.
    pub fn subject_hours(&self) -> &BTreeMap<SubjectId, u32> {
        &self.subject_hours
    }

    /// Subjects with an hour requirement, in ascending id order.
    pub fn required_subjects(&self) -> &[SubjectId] {
        &self.required_subjects
    }

    /// Qualified teachers for a subject (sorted, de-duplicated).
    ///
    /// Empty when none are configured.
    pub fn qualified_teachers(&self, subject: SubjectId) -> &[TeacherId] {
        self.subject_teachers
            .get(&subject)
            .map_or(&[], |t| t.as_slice())
    }

    /// Whether `teacher` is listed for `subject`.
    ///
    /// A subject with no list has no qualified teachers.
    pub fn is_qualified(&self, subject: SubjectId, teacher: TeacherId) -> bool {
        self.qualified_teachers(subject)
            .binary_search(&teacher)
            .is_ok()
    }

    /// Kind of a subject (lecture unless tagged otherwise).
    pub fn subject_type(&self, subject: SubjectId) -> SubjectType {
        self.subject_types
            .get(&subject)
            .copied()
            .unwrap_or_default()
    }

    /// Whether a subject must be taught in adjacent pairs.
    #[inline]
    pub fn is_lab(&self, subject: SubjectId) -> bool {
        self.subject_type(subject) == SubjectType::Lab
    }

    /// Daily teacher hour ceiling.
    #[inline]
    pub fn max_hours_per_day(&self) -> u32 {
        self.max_hours_per_day
    }

    /// Weekly teacher hour ceiling.
    #[inline]
    pub fn max_hours_per_week(&self) -> u32 {
        self.max_hours_per_week
    }

    /// GA hyperparameters.
    pub fn ga(&self) -> &GaSettings {
        &self.ga
    }

    /// Display name of a class (`Class-{i+1}` when not supplied).
    pub fn class_name(&self, class: usize) -> Cow<'_, str> {
        lookup_name(&self.class_names, class, || format!("Class-{}", class + 1))
    }

    /// Display name of a subject (`Subject-{i}` when not supplied).
    pub fn subject_name(&self, subject: SubjectId) -> Cow<'_, str> {
        lookup_name(&self.subject_names, subject, || format!("Subject-{subject}"))
    }

    /// Display name of a teacher (`Teacher-{i}` when not supplied).
    pub fn teacher_name(&self, teacher: TeacherId) -> Cow<'_, str> {
        lookup_name(&self.teacher_names, teacher, || format!("Teacher-{teacher}"))
    }

    /// Display name of a room (`Room-{i}` when not supplied).
    pub fn room_name(&self, room: RoomId) -> Cow<'_, str> {
        lookup_name(&self.room_names, room, || format!("Room-{room}"))
    }
}

fn lookup_name<'a>(
    names: &'a [String],
    idx: usize,
    fallback: impl FnOnce() -> String,
) -> Cow<'a, str> {
    match names.get(idx) {
        Some(name) => Cow::Borrowed(name.as_str()),
        None => Cow::Owned(fallback()),
    }
}
