//! Input validation for assignment problems.
//!
//! Checks structural integrity of the loaded datasets before searching:
//! - Duplicate TA or section IDs
//! - Preference vectors whose length disagrees with the section count
//! - Empty datasets
//!
//! Plus the matrix shape check: a matrix whose dimensions disagree with
//! the datasets is a fatal error surfaced before any scoring.

use std::collections::HashSet;
use std::fmt;

use crate::models::{AssignmentMatrix, Section, Ta};

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
    /// Two entities share the same ID.
    DuplicateId,
    /// A TA's preference vector length differs from the section count.
    PreferenceLengthMismatch,
    /// A dataset has no records.
    EmptyDataset,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// A matrix whose dimensions disagree with the dataset sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMismatch {
    /// Actual matrix (rows, cols).
    pub matrix: (usize, usize),
    /// Expected (TA count, section count).
    pub expected: (usize, usize),
}

impl fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matrix shape {}x{} does not match datasets ({} TAs x {} sections)",
            self.matrix.0, self.matrix.1, self.expected.0, self.expected.1
        )
    }
}

impl std::error::Error for ShapeMismatch {}

/// Validates the loaded datasets.
///
/// Checks:
/// 1. Both datasets are non-empty
/// 2. No duplicate TA IDs
/// 3. No duplicate section IDs
/// 4. Every TA carries one preference per section
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(tas: &[Ta], sections: &[Section]) -> ValidationResult {
    let mut errors = Vec::new();

    if tas.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyDataset,
            "TA dataset has no records",
        ));
    }
    if sections.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyDataset,
            "section dataset has no records",
        ));
    }

    let mut ta_ids = HashSet::new();
    for ta in tas {
        if !ta_ids.insert(ta.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate TA ID: {}", ta.id),
            ));
        }
        if ta.preferences.len() != sections.len() {
            errors.push(ValidationError::new(
                ValidationErrorKind::PreferenceLengthMismatch,
                format!(
                    "TA '{}' has {} preference labels for {} sections",
                    ta.id,
                    ta.preferences.len(),
                    sections.len()
                ),
            ));
        }
    }

    let mut section_ids = HashSet::new();
    for section in sections {
        if !section_ids.insert(section.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate section ID: {}", section.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks a matrix's dimensions against the dataset sizes.
pub fn check_matrix_shape(
    matrix: &AssignmentMatrix,
    tas: &[Ta],
    sections: &[Section],
) -> Result<(), ShapeMismatch> {
    let expected = (tas.len(), sections.len());
    let actual = (matrix.rows(), matrix.cols());
    if actual == expected {
        Ok(())
    } else {
        Err(ShapeMismatch {
            matrix: actual,
            expected,
        })
    }
}
