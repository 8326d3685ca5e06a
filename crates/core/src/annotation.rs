//! Timestamped bout annotations: categories, records, and validation.
//!
//! The store calls the validators here on every append and update, so an
//! annotation that made it into a session always has a finite non-negative
//! time and non-blank text.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{AnnotationId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of an annotation note, in characters.
pub const MAX_TEXT_LENGTH: usize = 2_000;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// What aspect of the bout an annotation is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationCategory {
    Offense,
    Defense,
    Timing,
    Distance,
    Strategy,
    Error,
}

/// All valid category strings, in legend order.
const VALID_CATEGORY_STRINGS: &[&str] = &[
    "offense", "defense", "timing", "distance", "strategy", "error",
];

impl AnnotationCategory {
    /// Every category, in legend order.
    pub const ALL: [AnnotationCategory; 6] = [
        Self::Offense,
        Self::Defense,
        Self::Timing,
        Self::Distance,
        Self::Strategy,
        Self::Error,
    ];

    /// Return the category as a lowercase string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offense => "offense",
            Self::Defense => "defense",
            Self::Timing => "timing",
            Self::Distance => "distance",
            Self::Strategy => "strategy",
            Self::Error => "error",
        }
    }

    /// Capitalized name for legends and badges.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Offense => "Offense",
            Self::Defense => "Defense",
            Self::Timing => "Timing",
            Self::Distance => "Distance",
            Self::Strategy => "Strategy",
            Self::Error => "Error",
        }
    }

    /// Parse a category from a string slice, ignoring case and surrounding
    /// whitespace.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offense" => Ok(Self::Offense),
            "defense" => Ok(Self::Defense),
            "timing" => Ok(Self::Timing),
            "distance" => Ok(Self::Distance),
            "strategy" => Ok(Self::Strategy),
            "error" => Ok(Self::Error),
            _ => Err(CoreError::Validation(format!(
                "Invalid annotation category '{s}'. Must be one of: {}",
                VALID_CATEGORY_STRINGS.join(", ")
            ))),
        }
    }
}

impl Default for AnnotationCategory {
    fn default() -> Self {
        Self::Offense
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A user-authored note pinned to a moment in the bout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub id: AnnotationId,
    /// Seconds from the start of the video.
    pub time: f64,
    pub category: AnnotationCategory,
    pub text: String,
    pub created_at: Timestamp,
}

/// Fields supplied when appending an annotation; id and creation time are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnnotation {
    pub time: f64,
    pub category: AnnotationCategory,
    pub text: String,
}

/// Partial update merged into an existing annotation. `None` leaves the
/// field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationPatch {
    pub time: Option<f64>,
    pub category: Option<AnnotationCategory>,
    pub text: Option<String>,
}

impl AnnotationPatch {
    pub fn is_empty(&self) -> bool {
        self.time.is_none() && self.category.is_none() && self.text.is_none()
    }
}

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate an annotation time offset.
///
/// Must be finite and non-negative. Times past the end of the video are
/// accepted; the timeline clamps them when rendering.
pub fn validate_annotation_time(time: f64) -> Result<(), CoreError> {
    if !time.is_finite() {
        return Err(CoreError::Validation(
            "annotation time must be a finite number".to_string(),
        ));
    }
    if time < 0.0 {
        return Err(CoreError::Validation(format!(
            "annotation time must not be negative, got {time}"
        )));
    }
    Ok(())
}

/// Validate annotation text and return it trimmed.
pub fn validate_annotation_text(text: &str) -> Result<String, CoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "annotation text must not be empty".to_string(),
        ));
    }
    let len = trimmed.chars().count();
    if len > MAX_TEXT_LENGTH {
        return Err(CoreError::Validation(format!(
            "annotation text is {len} characters, maximum is {MAX_TEXT_LENGTH}"
        )));
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// Annotations in display order: ascending by time, ties in insertion order.
///
/// Returns a new vector of references; the caller's slice is not reordered.
pub fn sorted_by_time(annotations: &[Annotation]) -> Vec<&Annotation> {
    let mut sorted: Vec<&Annotation> = annotations.iter().collect();
    sorted.sort_by(|a, b| a.time.total_cmp(&b.time));
    sorted
}

/// Number of annotations per category, for the legend.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub category: AnnotationCategory,
    pub label: &'static str,
    pub count: usize,
}

/// Count annotations per category. Every category is listed, including
/// those with zero annotations.
pub fn count_by_category(annotations: &[Annotation]) -> Vec<CategoryCount> {
    AnnotationCategory::ALL
        .iter()
        .map(|&category| CategoryCount {
            category,
            label: category.label(),
            count: annotations.iter().filter(|a| a.category == category).count(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
