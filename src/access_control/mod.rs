//! Access control module
//!
//! Path-prefix access policies for media files.
//!
//! ## Access Control Model
//!
//! A [`PolicyRegistry`] holds [`AccessPolicy`] values in registration order.
//! For a given media path:
//!
//! 1. The **first** registered policy whose prefixes match the path governs it
//! 2. That policy's [`AccessChecker`] decides allow/deny for the request
//! 3. If no policy matches, the registry's `default_allow` decides
//!
//! Prefix matching is literal: `images` matches `imagesecret/x` as well as
//! `images/x`. Text prefixes match both text and raw byte paths.
//!
//! ## Example
//!
//! ```rust
//! use secure_media::access_control::{
//!     AccessPolicy, Anonymous, Authenticated, PolicyRegistry, Principal,
//! };
//!
//! let registry = PolicyRegistry::with_policies(
//!     [AccessPolicy::new(["images/", "profiles/"], Authenticated)],
//!     true,
//! );
//!
//! assert!(registry.is_allowed(&Principal::new("alice"), "images/x.png").unwrap());
//! assert!(!registry.is_allowed(&Anonymous, "images/x.png").unwrap());
//! assert!(registry.is_allowed(&Anonymous, "general/x.png").unwrap());
//! ```

pub mod checker;
pub mod context;
pub mod path;
pub mod policy;
pub mod registry;

pub use checker::{
    AccessChecker, AllowAll, Authenticated, DenyAll, Groups, Principals, from_fn, try_fn,
};
pub use context::{Anonymous, Principal, RequestContext};
pub use path::MediaPath;
pub use policy::AccessPolicy;
pub use registry::PolicyRegistry;
