//! In-memory store of uploaded bouts and their annotations.
//!
//! The store is an ordinary value: construct one, wrap it in `Arc`, and hand
//! it to whoever needs it. Each operation takes the lock exactly once, so
//! concurrent callers never observe a half-applied mutation. Reads return
//! cloned snapshots; the only way to change a session is through the methods
//! below.
//!
//! Mutations on an unknown session or annotation fail with
//! [`CoreError::NotFound`], naming which of the two was missing.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::annotation::{
    sorted_by_time, validate_annotation_text, validate_annotation_time, Annotation,
    AnnotationPatch, NewAnnotation,
};
use crate::error::CoreError;
use crate::media::{MediaRegistry, MediaUpload};
use crate::timeline::{
    markers, MediaEvent, PlaybackTracker, PlaybackView, SkipDirection, TimelineMarker,
};
use crate::touch::Touch;
use crate::types::{AnnotationId, MediaRef, SessionId, Timestamp};
use crate::upload::{display_date, normalize_opponent};

const SESSION_ENTITY: &str = "VideoSession";
const ANNOTATION_ENTITY: &str = "Annotation";

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One uploaded bout.
#[derive(Debug, Clone, Serialize)]
pub struct VideoSession {
    pub id: SessionId,
    #[serde(rename = "media_ref")]
    pub media: MediaRef,
    pub file_name: String,
    pub playable_url: String,
    pub opponent: String,
    /// Display date, e.g. `Mar 15, 2025`.
    pub date: String,
    pub created_at: Timestamp,
    /// Annotations in insertion order.
    pub annotations: Vec<Annotation>,
    pub touches: Vec<Touch>,
    #[serde(skip)]
    pub playback: PlaybackTracker,
}

impl VideoSession {
    /// Annotations in display order. The stored order is left alone.
    pub fn annotations_by_time(&self) -> Vec<&Annotation> {
        sorted_by_time(&self.annotations)
    }

    pub fn duration(&self) -> f64 {
        self.playback.duration()
    }

    /// Touch and annotation markers positioned against the current duration.
    pub fn timeline_markers(&self) -> Vec<TimelineMarker> {
        markers(&self.touches, &self.annotations, self.playback.duration())
    }

    pub fn find_annotation(&self, annotation_id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == annotation_id)
    }

    fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            opponent: self.opponent.clone(),
            date: self.date.clone(),
            created_at: self.created_at,
            playable_url: self.playable_url.clone(),
            duration_secs: self.playback.duration(),
            annotation_count: self.annotations.len(),
        }
    }
}

/// Listing entry for the recent-bouts view.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub opponent: String,
    pub date: String,
    pub created_at: Timestamp,
    pub playable_url: String,
    pub duration_secs: f64,
    pub annotation_count: usize,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, VideoSession>>,
    media: Arc<MediaRegistry>,
    default_duration: f64,
}

impl SessionStore {
    /// Create an empty store backed by `media`. New sessions assume
    /// `default_duration` seconds until the player reports the real length.
    pub fn new(media: Arc<MediaRegistry>, default_duration: f64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            media,
            default_duration,
        }
    }

    pub fn media(&self) -> &Arc<MediaRegistry> {
        &self.media
    }

    /// Register an upload and open a new session for it.
    ///
    /// The upload is expected to have passed `upload::validate_media_type`
    /// already; only the opponent label is checked here.
    pub async fn create_session(
        &self,
        upload: MediaUpload,
        opponent: Option<&str>,
    ) -> Result<VideoSession, CoreError> {
        let opponent = normalize_opponent(opponent)?;
        let file_name = upload.file_name.clone();

        let media = self.media.register(upload).await;
        let created_at = chrono::Utc::now();

        let mut playback = PlaybackTracker::new(self.default_duration);
        playback.apply(MediaEvent::SourceBound);

        let session = VideoSession {
            id: SessionId::new(),
            media,
            file_name,
            playable_url: self.media.playable_url(media),
            opponent,
            date: display_date(created_at),
            created_at,
            annotations: Vec::new(),
            touches: Vec::new(),
            playback,
        };

        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        Ok(session)
    }

    pub async fn get_session(&self, id: SessionId) -> Option<VideoSession> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// All sessions, newest first.
    pub async fn list_sessions(&self) -> Vec<SessionSummary> {
        let mut summaries: Vec<SessionSummary> = self
            .sessions
            .read()
            .await
            .values()
            .map(VideoSession::summary)
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        summaries
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Append an annotation, assigning its id and creation time.
    pub async fn append_annotation(
        &self,
        session_id: SessionId,
        input: NewAnnotation,
    ) -> Result<Annotation, CoreError> {
        validate_annotation_time(input.time)?;
        let text = validate_annotation_text(&input.text)?;

        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| CoreError::not_found(SESSION_ENTITY, session_id))?;

        let annotation = Annotation {
            id: AnnotationId::new(),
            time: input.time,
            category: input.category,
            text,
            created_at: chrono::Utc::now(),
        };
        session.annotations.push(annotation.clone());
        Ok(annotation)
    }

    /// Merge `patch` into an existing annotation and return the result.
    pub async fn update_annotation(
        &self,
        session_id: SessionId,
        annotation_id: AnnotationId,
        patch: AnnotationPatch,
    ) -> Result<Annotation, CoreError> {
        if let Some(time) = patch.time {
            validate_annotation_time(time)?;
        }
        let text = patch
            .text
            .as_deref()
            .map(validate_annotation_text)
            .transpose()?;

        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| CoreError::not_found(SESSION_ENTITY, session_id))?;
        let annotation = session
            .annotations
            .iter_mut()
            .find(|a| a.id == annotation_id)
            .ok_or_else(|| CoreError::not_found(ANNOTATION_ENTITY, annotation_id))?;

        if let Some(time) = patch.time {
            annotation.time = time;
        }
        if let Some(category) = patch.category {
            annotation.category = category;
        }
        if let Some(text) = text {
            annotation.text = text;
        }
        Ok(annotation.clone())
    }

    /// Remove an annotation and return it.
    pub async fn delete_annotation(
        &self,
        session_id: SessionId,
        annotation_id: AnnotationId,
    ) -> Result<Annotation, CoreError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| CoreError::not_found(SESSION_ENTITY, session_id))?;
        let index = session
            .annotations
            .iter()
            .position(|a| a.id == annotation_id)
            .ok_or_else(|| CoreError::not_found(ANNOTATION_ENTITY, annotation_id))?;
        Ok(session.annotations.remove(index))
    }

    /// Remove a session and release its media.
    pub async fn remove_session(&self, id: SessionId) -> Result<VideoSession, CoreError> {
        let session = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| CoreError::not_found(SESSION_ENTITY, id))?;
        self.media.revoke(session.media).await;
        Ok(session)
    }

    /// Drop every session and release its media. Returns the number of
    /// sessions removed. Sessions created while this runs keep their media.
    pub async fn clear(&self) -> usize {
        let released: Vec<MediaRef> = self
            .sessions
            .write()
            .await
            .drain()
            .map(|(_, session)| session.media)
            .collect();
        for media in &released {
            self.media.revoke(*media).await;
        }
        released.len()
    }

    /// Feed a media element event into the session's playback tracker.
    pub async fn apply_playback_event(
        &self,
        id: SessionId,
        event: MediaEvent,
    ) -> Result<PlaybackView, CoreError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found(SESSION_ENTITY, id))?;
        session.playback.apply(event);
        Ok(session.playback.view())
    }

    /// Seek to the time under a click on the timeline track.
    pub async fn seek(
        &self,
        id: SessionId,
        offset_x: f64,
        track_width: f64,
    ) -> Result<PlaybackView, CoreError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found(SESSION_ENTITY, id))?;
        session.playback.seek_to_offset(offset_x, track_width);
        Ok(session.playback.view())
    }

    /// Jump five seconds backward or forward.
    pub async fn skip(
        &self,
        id: SessionId,
        direction: SkipDirection,
    ) -> Result<PlaybackView, CoreError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found(SESSION_ENTITY, id))?;
        session.playback.skip(direction);
        Ok(session.playback.view())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
