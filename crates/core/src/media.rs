//! Registry of uploaded media and the playable references handed out for it.
//!
//! A [`MediaRef`] plays the role of a browser object URL: it is derived from
//! an upload, resolves to the bytes while registered, and stops resolving
//! once revoked. The session store revokes a session's reference when the
//! session is removed.

use std::collections::HashMap;

use bytes::Bytes;
use tokio::sync::RwLock;

use crate::types::MediaRef;

/// An uploaded video as received from the client.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// A registered media blob. Cloning and slicing share the underlying bytes.
#[derive(Debug, Clone)]
pub struct MediaBlob {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl MediaBlob {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Holds media bytes for every live reference.
pub struct MediaRegistry {
    url_prefix: String,
    blobs: RwLock<HashMap<MediaRef, MediaBlob>>,
}

impl MediaRegistry {
    /// Create an empty registry whose playable URLs start with `url_prefix`.
    pub fn new(url_prefix: impl Into<String>) -> Self {
        Self {
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Take ownership of an upload and return a fresh reference to it.
    pub async fn register(&self, upload: MediaUpload) -> MediaRef {
        let media_ref = MediaRef::new();
        let blob = MediaBlob {
            file_name: upload.file_name,
            content_type: upload.content_type,
            data: upload.data,
        };
        self.blobs.write().await.insert(media_ref, blob);
        media_ref
    }

    /// Look up the bytes behind a reference. `None` once revoked.
    pub async fn resolve(&self, media_ref: MediaRef) -> Option<MediaBlob> {
        self.blobs.read().await.get(&media_ref).cloned()
    }

    /// Release the bytes behind a reference. Returns `false` if the reference
    /// was unknown or already revoked.
    pub async fn revoke(&self, media_ref: MediaRef) -> bool {
        self.blobs.write().await.remove(&media_ref).is_some()
    }

    /// Number of live references.
    pub async fn live_count(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// The URL a player uses to fetch the media behind `media_ref`.
    pub fn playable_url(&self, media_ref: MediaRef) -> String {
        format!("{}/{media_ref}", self.url_prefix)
    }
}
