//! Annotation editor: the form behind "Add Annotation" / "Edit Annotation".
//!
//! The editor holds the raw `M:SS` text separately from the last time that
//! parsed, so a half-typed timestamp never loses the previous value. It does
//! not talk to the session store; callers persist what [`AnnotationEditor::submit`]
//! returns.

use crate::annotation::{validate_annotation_text, Annotation, AnnotationCategory, NewAnnotation};
use crate::error::CoreError;
use crate::timecode::{format_timestamp, parse_timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit,
}

#[derive(Debug, Clone)]
pub struct AnnotationEditor {
    mode: EditorMode,
    time: f64,
    time_input: String,
    category: AnnotationCategory,
    text: String,
    /// Upper bound for the time, when the video duration is known.
    max_time: Option<f64>,
}

impl AnnotationEditor {
    /// Open the editor at `current_time`, or pre-filled from `initial` when
    /// editing an existing annotation.
    pub fn open(current_time: f64, initial: Option<&Annotation>) -> Self {
        match initial {
            Some(annotation) => Self {
                mode: EditorMode::Edit,
                time: annotation.time,
                time_input: format_timestamp(annotation.time),
                category: annotation.category,
                text: annotation.text.clone(),
                max_time: None,
            },
            None => {
                let time = if current_time.is_finite() {
                    current_time.max(0.0)
                } else {
                    0.0
                };
                Self {
                    mode: EditorMode::Create,
                    time,
                    time_input: format_timestamp(time),
                    category: AnnotationCategory::default(),
                    text: String::new(),
                    max_time: None,
                }
            }
        }
    }

    /// Bound submitted times to the video's duration.
    pub fn with_max_time(mut self, duration: f64) -> Self {
        if duration.is_finite() && duration > 0.0 {
            self.max_time = Some(duration);
        }
        self
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            EditorMode::Create => "Add Annotation",
            EditorMode::Edit => "Edit Annotation",
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn time_input(&self) -> &str {
        &self.time_input
    }

    pub fn category(&self) -> AnnotationCategory {
        self.category
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the save button is enabled.
    pub fn can_submit(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Replace the timestamp text. The numeric time only follows when the
    /// text parses.
    pub fn set_time_input(&mut self, value: impl Into<String>) {
        self.time_input = value.into();
        if let Ok(secs) = parse_timestamp(&self.time_input) {
            self.time = f64::from(secs);
        }
    }

    /// Set the numeric time directly, e.g. from the player position.
    pub fn set_time(&mut self, time: f64) {
        if time.is_finite() && time >= 0.0 {
            self.time = time;
            self.time_input = format_timestamp(time);
        }
    }

    pub fn set_category(&mut self, category: AnnotationCategory) {
        self.category = category;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Produce the annotation to save.
    ///
    /// Refuses blank text. The timestamp text is parsed once more; if it
    /// does not parse, the last valid time is used.
    pub fn submit(&self) -> Result<NewAnnotation, CoreError> {
        let text = validate_annotation_text(&self.text)?;

        let mut time = parse_timestamp(&self.time_input)
            .map(f64::from)
            .unwrap_or(self.time);
        if let Some(max) = self.max_time {
            time = time.min(max);
        }

        Ok(NewAnnotation {
            time,
            category: self.category,
            text,
        })
    }
}
