//! Input validation for timetable requests.
//!
//! Checks structural integrity of a request before the engine runs.
//! Detects:
//! - Zero-sized grid or resource dimensions
//! - Empty curriculum
//! - GA settings the loop cannot run with (population < 2, bad rate)
//! - Subject and teacher references outside their id ranges
//!
//! Every problem is collected so callers can report them together.

use crate::models::TimetableRequest;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A grid or resource count is zero.
    NonPositiveDimension,
    /// No subject has an hour requirement.
    NoSubjects,
    /// Fewer than two individuals; crossover needs two parents.
    PopulationTooSmall,
    /// Mutation rate is not a finite value in `[0, 1]`.
    InvalidMutationRate,
    /// A subject id lies outside `[0, num_subjects)`.
    UnknownSubject,
    /// A qualified-teacher id lies outside `[0, total_teachers)`.
    UnknownTeacher,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a timetable request.
///
/// Checks:
/// 1. All grid and resource counts are positive
/// 2. At least one subject has an hour requirement
/// 3. Population size is at least 2
/// 4. Mutation rate is finite and within `[0, 1]`
/// 5. Subjects named in teacher lists and type tags are within range
/// 6. Qualified teachers are within range
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_request(request: &TimetableRequest) -> ValidationResult {
    let mut errors = Vec::new();

    let dimensions = [
        ("num_classes", request.num_classes),
        ("days", request.days),
        ("slots_per_day", request.slots_per_day),
        ("total_rooms", request.total_rooms),
        ("total_teachers", request.total_teachers),
    ];
    for (name, value) in dimensions {
        if value == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveDimension,
                format!("{name} must be at least 1"),
            ));
        }
    }

    let num_subjects = request.num_subjects();
    if num_subjects == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoSubjects,
            "subject_hours must name at least one subject",
        ));
    }

    if request.ga.population_size < 2 {
        errors.push(ValidationError::new(
            ValidationErrorKind::PopulationTooSmall,
            format!(
                "population_size must be at least 2, got {}",
                request.ga.population_size
            ),
        ));
    }

    let rate = request.ga.mutation_rate;
    if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidMutationRate,
            format!("mutation_rate must be within [0, 1], got {rate}"),
        ));
    }

    // Subject references
    for (&subject, teachers) in &request.subject_teachers {
        if subject >= num_subjects {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownSubject,
                format!("subject_teachers references unknown subject {subject}"),
            ));
        }
        for &teacher in teachers {
            if teacher >= request.total_teachers {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownTeacher,
                    format!("subject {subject} lists unknown teacher {teacher}"),
                ));
            }
        }
    }
    for &subject in request.subject_types.keys() {
        if subject >= num_subjects {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownSubject,
                format!("subject_types references unknown subject {subject}"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GaSettings, SubjectType};

    fn sample_request() -> TimetableRequest {
        TimetableRequest::new(3, 5, 6, 6, 8)
            .with_subject(0, 4, vec![0, 1], SubjectType::Lecture)
            .with_subject(1, 3, vec![2, 3], SubjectType::Lab)
            .with_subject(2, 3, vec![4, 5], SubjectType::Lecture)
    }

    #[test]
    fn test_valid_request() {
        assert!(validate_request(&sample_request()).is_ok());
    }

    #[test]
    fn test_zero_dimension() {
        let mut request = sample_request();
        request.days = 0;
        request.total_rooms = 0;

        let errors = validate_request(&request).unwrap_err();
        let dims: Vec<_> = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::NonPositiveDimension)
            .collect();
        assert_eq!(dims.len(), 2);
        assert!(dims.iter().any(|e| e.message.contains("days")));
    }

    #[test]
    fn test_no_subjects() {
        let request = TimetableRequest::new(1, 1, 1, 1, 1);
        let errors = validate_request(&request).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::NoSubjects));
    }

    #[test]
    fn test_population_too_small() {
        let request = sample_request().with_ga(GaSettings::default().with_population_size(1));
        let errors = validate_request(&request).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::PopulationTooSmall));
    }

    #[test]
    fn test_invalid_mutation_rate() {
        let mut request = sample_request();
        request.ga.mutation_rate = f64::NAN;
        let errors = validate_request(&request).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidMutationRate));
    }

    #[test]
    fn test_unknown_subject_reference() {
        let mut request = sample_request();
        request.subject_teachers.insert(9, vec![0]);
        request.subject_types.insert(7, SubjectType::Lab);

        let errors = validate_request(&request).unwrap_err();
        let unknown = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::UnknownSubject)
            .count();
        assert_eq!(unknown, 2);
    }

    #[test]
    fn test_unknown_teacher_reference() {
        let request = sample_request().with_subject(3, 1, vec![8], SubjectType::Lecture);
        let errors = validate_request(&request).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownTeacher && e.message.contains('8')));
    }

    #[test]
    fn test_multiple_errors() {
        let mut request = TimetableRequest::new(0, 0, 1, 1, 1);
        request.ga.population_size = 0;

        let errors = validate_request(&request).unwrap_err();
        assert!(errors.len() >= 4);
    }
}
