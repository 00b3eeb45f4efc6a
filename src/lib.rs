//! Secure Media
//!
//! Path-prefix access policies for serving private media files.
//!
//! ## Features
//!
//! - **Prefix policies** mapping media directories to access checks
//! - **First-match resolution** in registration order, with a registry-wide default
//! - **Enforcement gate** that answers denied requests exactly like missing files
//! - **Auto-discovery** of policies declared with `#[media_policy]`
//! - **Reference media server** (axum) configured via TOML files and environment variables
//!
//! ## Access Control Model
//!
//! ```text
//! request path → first policy whose prefix matches → checker decides
//!             ↘ no policy matches → default_allow decides
//! ```
//!
//! A denied request never learns that the file exists: the gate fails with
//! [`AccessError::NotFound`], which the server turns into `404 Not Found`.
//!
//! ## Example Configuration
//!
//! ```toml
//! [server]
//! media_url = "/media"
//! media_root = "/srv/media"
//!
//! [registry]
//! default_allow = true
//!
//! [[policies]]
//! name = "previews"
//! prefixes = ["images/previews/"]
//! rule = "allow"                  # Listed first, so it wins over "members"
//!
//! [[policies]]
//! name = "members"
//! prefixes = ["images/", "profiles/"]
//! rule = "authenticated"
//!
//! [[auth.tokens]]
//! token = "change-me"
//! principal = "alice"
//! groups = ["staff"]
//! ```

// Lets `#[media_policy]` expansions refer to `::secure_media` inside this crate too
extern crate self as secure_media;

pub mod access_control;
pub mod auth;
pub mod config;
pub mod discovery;
pub mod error;
pub mod gate;
pub mod server;
pub mod util;

#[doc(hidden)]
pub use inventory;

// Re-export main types
pub use config::{AppConfig, load_config};
pub use discovery::{
    autodiscover, autodiscover_into, default_registry, register, set_default_registry,
};
pub use error::{AccessError, AppError, ConfigError, PredicateError, Result};
pub use gate::{Gate, Gated, gate};
pub use secure_media_macros::media_policy;
