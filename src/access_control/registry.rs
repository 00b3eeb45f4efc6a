//! Media access policy registry
//!
//! Holds policies in registration order and resolves a path to the first
//! policy that matches it. Paths no policy matches fall back to the
//! registry's `default_allow` decision.

use crate::access_control::context::RequestContext;
use crate::access_control::path::MediaPath;
use crate::access_control::policy::AccessPolicy;
use crate::error::CheckResult;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, trace};

/// Ordered, append-only collection of access policies
///
/// Safe to share across request handlers. Registration appends under a write
/// lock, so concurrent lookups see the list either before or after a
/// registration, never in between. Checkers always run outside the lock.
#[derive(Debug)]
pub struct PolicyRegistry {
    policies: RwLock<Vec<Arc<AccessPolicy>>>,
    default_allow: bool,
}

impl PolicyRegistry {
    /// Create an empty registry
    pub fn new(default_allow: bool) -> Self {
        Self {
            policies: RwLock::new(Vec::new()),
            default_allow,
        }
    }

    /// Create a registry pre-populated with `policies`, in order
    pub fn with_policies<I, P>(policies: I, default_allow: bool) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Arc<AccessPolicy>>,
    {
        Self {
            policies: RwLock::new(policies.into_iter().map(Into::into).collect()),
            default_allow,
        }
    }

    /// Decision used for paths no policy matches
    pub fn default_allow(&self) -> bool {
        self.default_allow
    }

    /// Append a policy. Earlier policies keep precedence.
    pub fn register(&self, policy: impl Into<Arc<AccessPolicy>>) {
        let policy = policy.into();
        let mut policies = self.policies.write();
        debug!(
            policy = policy.name().unwrap_or("<unnamed>"),
            prefixes = ?policy.restricted_prefixes(),
            position = policies.len(),
            "Registered media access policy"
        );
        policies.push(policy);
    }

    /// Return the first registered policy matching the path
    pub fn get_policy_for_path<'p>(
        &self,
        path: impl Into<MediaPath<'p>>,
    ) -> Option<Arc<AccessPolicy>> {
        let path = path.into();
        let policies = self.policies.read();
        let policy = policies.iter().find(|policy| policy.matches(path)).cloned();

        match &policy {
            Some(p) => trace!(
                path = %path,
                policy = p.name().unwrap_or("<unnamed>"),
                prefix = ?p.matching_prefix(path),
                "Matched media access policy"
            ),
            None => trace!(path = %path, "No media access policy matched"),
        }

        policy
    }

    /// Check whether the request may access the path.
    ///
    /// Uses the governing policy's checker, or `default_allow` when no policy
    /// matches. Checker failures are returned as-is.
    pub fn is_allowed<'p>(
        &self,
        ctx: &dyn RequestContext,
        path: impl Into<MediaPath<'p>>,
    ) -> CheckResult {
        let path = path.into();

        let Some(policy) = self.get_policy_for_path(path) else {
            debug!(
                path = %path,
                allowed = self.default_allow,
                "Unmanaged media path, using registry default"
            );
            return Ok(self.default_allow);
        };

        let allowed = policy.is_allowed(ctx, path)?;
        debug!(
            path = %path,
            policy = policy.name().unwrap_or("<unnamed>"),
            authenticated = ctx.is_authenticated(),
            allowed,
            "Checked media access"
        );
        Ok(allowed)
    }

    /// Snapshot of the registered policies, in order
    pub fn policies(&self) -> Vec<Arc<AccessPolicy>> {
        self.policies.read().clone()
    }

    pub fn len(&self) -> usize {
        self.policies.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.read().is_empty()
    }
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access_control::checker::{AllowAll, Authenticated, DenyAll};
    use crate::access_control::context::{Anonymous, Principal};

    #[test]
    fn test_empty_registry() {
        let registry = PolicyRegistry::default();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.default_allow());
        assert!(registry.get_policy_for_path("anything").is_none());
    }

    #[test]
    fn test_default_decision_for_unmatched_paths() {
        let open = PolicyRegistry::new(true);
        let closed = PolicyRegistry::new(false);
        assert!(open.is_allowed(&Anonymous, "general/x.png").unwrap());
        assert!(!closed.is_allowed(&Anonymous, "general/x.png").unwrap());
    }

    #[test]
    fn test_first_registered_wins() {
        let first = Arc::new(AccessPolicy::new(["images/"], DenyAll).with_name("first"));
        let second = Arc::new(AccessPolicy::new(["images/a"], AllowAll).with_name("second"));
        let registry = PolicyRegistry::with_policies([first.clone(), second], true);

        let found = registry.get_policy_for_path("images/a.jpg").unwrap();
        assert!(Arc::ptr_eq(&found, &first));
        assert!(!registry.is_allowed(&Anonymous, "images/a.jpg").unwrap());
    }

    #[test]
    fn test_register_appends() {
        let registry = PolicyRegistry::new(true);
        registry.register(AccessPolicy::new(["images/"], Authenticated).with_name("members"));
        registry.register(AccessPolicy::new(["reports/"], DenyAll).with_name("locked"));

        let names: Vec<_> = registry
            .policies()
            .iter()
            .map(|p| p.name().unwrap_or_default().to_string())
            .collect();
        assert_eq!(names, ["members", "locked"]);
    }

    #[test]
    fn test_policy_decides_matched_paths() {
        let registry = PolicyRegistry::with_policies(
            [AccessPolicy::new(["images/", "profiles/"], Authenticated)],
            true,
        );
        let alice = Principal::new("alice");

        assert!(registry.is_allowed(&alice, "images/x.png").unwrap());
        assert!(!registry.is_allowed(&Anonymous, "images/x.png").unwrap());
        assert!(!registry.is_allowed(&Anonymous, "profiles/x.png").unwrap());
        assert!(registry.is_allowed(&Anonymous, "general/x.png").unwrap());
    }
}
