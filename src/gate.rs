//! Enforcement gate
//!
//! Wraps a media-serving operation so that it only runs when the policy
//! registry allows the request. Denied requests fail with
//! [`AccessError::NotFound`], the same outcome as a missing file.
//!
//! ```rust
//! use std::sync::Arc;
//! use secure_media::{AccessError, gate};
//! use secure_media::access_control::{AccessPolicy, Anonymous, DenyAll, PolicyRegistry};
//!
//! let registry = Arc::new(PolicyRegistry::with_policies(
//!     [AccessPolicy::new(["images/"], DenyAll)],
//!     true,
//! ));
//!
//! let serve = gate(
//!     |_ctx, path, _args: ()| {
//!         Ok::<_, AccessError>(format!("contents of {path}"))
//!     },
//!     Some(registry),
//! );
//!
//! assert!(serve.call(&Anonymous, "general/a.txt", ()).is_ok());
//! assert!(serve.call(&Anonymous, "images/a.jpg", ()).unwrap_err().is_not_found());
//! ```

use crate::access_control::{MediaPath, PolicyRegistry, RequestContext};
use crate::discovery::default_registry;
use crate::error::AccessError;
use std::sync::Arc;
use tracing::debug;

/// Decision point consulted before serving a media path
///
/// Holds nothing but the registry to consult. When no registry is given,
/// the process-wide default registry is used.
#[derive(Debug, Clone, Default)]
pub struct Gate {
    registry: Option<Arc<PolicyRegistry>>,
}

impl Gate {
    pub fn new(registry: Option<Arc<PolicyRegistry>>) -> Self {
        Self { registry }
    }

    /// The registry this gate consults
    pub fn registry(&self) -> Arc<PolicyRegistry> {
        self.registry.clone().unwrap_or_else(default_registry)
    }

    /// Authorize a single access.
    ///
    /// Every call is decided afresh; nothing is cached between calls.
    pub fn authorize<'p>(
        &self,
        ctx: &dyn RequestContext,
        path: impl Into<MediaPath<'p>>,
    ) -> Result<(), AccessError> {
        let path = path.into();
        if self.registry().is_allowed(ctx, path)? {
            Ok(())
        } else {
            debug!(
                path = %path,
                authenticated = ctx.is_authenticated(),
                "Media access denied"
            );
            Err(AccessError::not_found(path.to_string_lossy()))
        }
    }

    /// Wrap `operation` so that it only runs for authorized requests
    pub fn wrap<F>(self, operation: F) -> Gated<F> {
        Gated {
            gate: self,
            operation,
        }
    }
}

/// Wrap a media-serving operation with access enforcement.
///
/// `registry` takes precedence over the process-wide default registry.
pub fn gate<F, A, T, E>(operation: F, registry: Option<Arc<PolicyRegistry>>) -> Gated<F>
where
    F: for<'p> Fn(&dyn RequestContext, MediaPath<'p>, A) -> Result<T, E>,
    E: From<AccessError>,
{
    Gate::new(registry).wrap(operation)
}

/// A media-serving operation guarded by a [`Gate`]
#[derive(Debug, Clone)]
pub struct Gated<F> {
    gate: Gate,
    operation: F,
}

impl<F> Gated<F> {
    /// Invoke the operation if the request is allowed to access `path`.
    ///
    /// Allowed calls are forwarded unchanged and return the operation's own
    /// result. Denied calls never reach the operation.
    pub fn call<'p, A, T, E>(
        &self,
        ctx: &dyn RequestContext,
        path: impl Into<MediaPath<'p>>,
        args: A,
    ) -> Result<T, E>
    where
        F: Fn(&dyn RequestContext, MediaPath<'p>, A) -> Result<T, E>,
        E: From<AccessError>,
    {
        let path = path.into();
        self.gate.authorize(ctx, path)?;
        (self.operation)(ctx, path, args)
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    pub fn into_inner(self) -> F {
        self.operation
    }
}
