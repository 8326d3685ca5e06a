//! Playback state and timeline geometry for the bout player.
//!
//! The tracker never polls the media element. It only moves when the client
//! reports a [`MediaEvent`], mirroring the element's own events
//! (`canplay`, `waiting`, `playing`, `pause`, `ended`, `durationchange`,
//! `timeupdate`).
//!
//! Timeline positions are percentages of the track width. Marker positions
//! and seek targets are both clamped to the track, so an annotation placed
//! after the end of the video sits at 100% rather than off the track.

use serde::{Deserialize, Serialize};

use crate::annotation::{Annotation, AnnotationCategory};
use crate::timecode::format_timestamp;
use crate::touch::{Scorer, Touch};
use crate::types::AnnotationId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Duration assumed until the media reports its real one.
pub const DEFAULT_DURATION_SECS: f64 = 180.0;

/// Distance covered by the skip back / skip forward controls.
pub const SKIP_SECS: f64 = 5.0;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Horizontal marker position for `time`, as a percentage of the track.
///
/// Clamped to `0..=100`. A non-positive or non-finite duration puts every
/// marker at 0.
pub fn marker_position(time: f64, duration: f64) -> f64 {
    if !duration.is_finite() || duration <= 0.0 || !time.is_finite() {
        return 0.0;
    }
    (time / duration).clamp(0.0, 1.0) * 100.0
}

/// Seek target for a click `offset_x` pixels into a track `track_width`
/// pixels wide.
pub fn seek_time(offset_x: f64, track_width: f64, duration: f64) -> f64 {
    if !track_width.is_finite() || track_width <= 0.0 || !offset_x.is_finite() {
        return 0.0;
    }
    if !duration.is_finite() || duration <= 0.0 {
        return 0.0;
    }
    (offset_x / track_width).clamp(0.0, 1.0) * duration
}

// ---------------------------------------------------------------------------
// Markers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Touch,
    Annotation,
}

/// A clickable point on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineMarker {
    pub kind: MarkerKind,
    pub time: f64,
    pub position_percent: f64,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation_id: Option<AnnotationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<AnnotationCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scorer: Option<Scorer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Build timeline markers: touches first, then annotations, each in the
/// order given.
pub fn markers(touches: &[Touch], annotations: &[Annotation], duration: f64) -> Vec<TimelineMarker> {
    let touch_markers = touches.iter().map(|touch| TimelineMarker {
        kind: MarkerKind::Touch,
        time: touch.time,
        position_percent: marker_position(touch.time, duration),
        label: format_timestamp(touch.time),
        annotation_id: None,
        category: None,
        scorer: Some(touch.scorer),
        text: None,
    });

    let annotation_markers = annotations.iter().map(|annotation| TimelineMarker {
        kind: MarkerKind::Annotation,
        time: annotation.time,
        position_percent: marker_position(annotation.time, duration),
        label: format_timestamp(annotation.time),
        annotation_id: Some(annotation.id),
        category: Some(annotation.category),
        scorer: None,
        text: Some(annotation.text.clone()),
    });

    touch_markers.chain(annotation_markers).collect()
}

// ---------------------------------------------------------------------------
// Playback state machine
// ---------------------------------------------------------------------------

/// What the player is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    NoSource,
    Loading,
    Buffering,
    Ready,
    Playing,
    Paused,
}

/// Events reported by the client's media element.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MediaEvent {
    /// A playable source was attached and loading began.
    SourceBound,
    CanPlay,
    Waiting,
    Playing,
    Pause,
    Ended,
    DurationChange { duration: f64 },
    TimeUpdate { time: f64 },
}

/// Direction of a skip button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipDirection {
    Backward,
    Forward,
}

/// Per-session playback position, duration and view state.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackTracker {
    state: PlaybackState,
    current_time: f64,
    duration: f64,
    /// Whether playback should resume once a stall clears.
    resume_playing: bool,
}

/// Serializable snapshot of a [`PlaybackTracker`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackView {
    pub state: PlaybackState,
    pub current_time: f64,
    pub duration: f64,
    pub progress_percent: f64,
    /// `"M:SS / M:SS"` overlay text.
    pub overlay: String,
}

impl PlaybackTracker {
    /// A tracker with no source bound and the given fallback duration.
    pub fn new(duration: f64) -> Self {
        let duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            DEFAULT_DURATION_SECS
        };
        Self {
            state: PlaybackState::NoSource,
            current_time: 0.0,
            duration,
            resume_playing: false,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Apply one media event and return the resulting state.
    ///
    /// Before a source is bound only [`MediaEvent::SourceBound`] has an
    /// effect.
    pub fn apply(&mut self, event: MediaEvent) -> PlaybackState {
        if self.state == PlaybackState::NoSource && event != MediaEvent::SourceBound {
            return self.state;
        }

        match event {
            MediaEvent::SourceBound => {
                self.state = PlaybackState::Loading;
                self.current_time = 0.0;
                self.resume_playing = false;
            }
            MediaEvent::CanPlay => match self.state {
                PlaybackState::Loading => self.state = PlaybackState::Ready,
                PlaybackState::Buffering => {
                    self.state = if self.resume_playing {
                        PlaybackState::Playing
                    } else {
                        PlaybackState::Ready
                    };
                    self.resume_playing = false;
                }
                _ => {}
            },
            MediaEvent::Waiting => {
                if self.state != PlaybackState::Buffering {
                    self.resume_playing = self.state == PlaybackState::Playing;
                }
                self.state = PlaybackState::Buffering;
            }
            MediaEvent::Playing => {
                self.state = PlaybackState::Playing;
                self.resume_playing = false;
            }
            MediaEvent::Pause => {
                self.state = PlaybackState::Paused;
                self.resume_playing = false;
            }
            MediaEvent::Ended => {
                self.state = PlaybackState::Paused;
                self.current_time = self.duration;
                self.resume_playing = false;
            }
            MediaEvent::DurationChange { duration } => {
                if duration.is_finite() && duration > 0.0 {
                    self.duration = duration;
                    self.current_time = self.current_time.min(duration);
                }
            }
            MediaEvent::TimeUpdate { time } => {
                if time.is_finite() {
                    self.current_time = time.clamp(0.0, self.duration);
                }
            }
        }
        self.state
    }

    /// Seek to the position under a timeline click and return the new time.
    pub fn seek_to_offset(&mut self, offset_x: f64, track_width: f64) -> f64 {
        self.current_time = seek_time(offset_x, track_width, self.duration);
        self.current_time
    }

    /// Seek directly to `time`, clamped to the video.
    pub fn seek_to(&mut self, time: f64) -> f64 {
        if time.is_finite() {
            self.current_time = time.clamp(0.0, self.duration);
        }
        self.current_time
    }

    pub fn skip_backward(&mut self) -> f64 {
        self.seek_to(self.current_time - SKIP_SECS)
    }

    pub fn skip_forward(&mut self) -> f64 {
        self.seek_to(self.current_time + SKIP_SECS)
    }

    pub fn skip(&mut self, direction: SkipDirection) -> f64 {
        match direction {
            SkipDirection::Backward => self.skip_backward(),
            SkipDirection::Forward => self.skip_forward(),
        }
    }

    pub fn view(&self) -> PlaybackView {
        PlaybackView {
            state: self.state,
            current_time: self.current_time,
            duration: self.duration,
            progress_percent: marker_position(self.current_time, self.duration),
            overlay: format!(
                "{} / {}",
                format_timestamp(self.current_time),
                format_timestamp(self.duration)
            ),
        }
    }
}

impl Default for PlaybackTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_SECS)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
