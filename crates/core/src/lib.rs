//! Domain logic for bout video review.
//!
//! Everything here is transport-agnostic: the HTTP layer in `riposte-api`
//! wraps these types and never reaches into session records directly.

pub mod annotation;
pub mod editor;
pub mod error;
pub mod media;
pub mod store;
pub mod timecode;
pub mod timeline;
pub mod touch;
pub mod types;
pub mod upload;
