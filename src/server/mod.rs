//! Reference media server
//!
//! Serves files from the media root over HTTP, with every request passing
//! through the enforcement gate first.

pub mod media;

pub use media::{MediaState, enforce_media_access, media_router, run_server};
