//! Media access policy
//!
//! A policy pairs a set of path prefixes with an [`AccessChecker`]. The
//! prefixes decide whether the policy governs a path; the checker decides
//! whether a given request may access it.

use crate::access_control::checker::AccessChecker;
use crate::access_control::context::RequestContext;
use crate::access_control::path::MediaPath;
use crate::error::CheckResult;
use std::fmt;
use std::sync::Arc;

/// Immutable rule restricting access to paths under its prefixes
#[derive(Clone)]
pub struct AccessPolicy {
    name: Option<String>,
    restricted_prefixes: Vec<String>,
    checker: Arc<dyn AccessChecker>,
}

impl AccessPolicy {
    /// Create a policy over `prefixes`, decided by `checker`
    pub fn new<I, S, C>(prefixes: I, checker: C) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        C: AccessChecker + 'static,
    {
        Self::with_shared_checker(prefixes, Arc::new(checker))
    }

    /// Create a policy around a checker shared with other policies
    pub fn with_shared_checker<I, S>(prefixes: I, checker: Arc<dyn AccessChecker>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            restricted_prefixes: prefixes.into_iter().map(Into::into).collect(),
            checker,
        }
    }

    /// Attach a name used in logs
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn restricted_prefixes(&self) -> &[String] {
        &self.restricted_prefixes
    }

    /// Check if the path falls under any of this policy's prefixes
    pub fn matches<'p>(&self, path: impl Into<MediaPath<'p>>) -> bool {
        self.matching_prefix(path).is_some()
    }

    /// Return the first prefix the path falls under
    pub fn matching_prefix<'p>(&self, path: impl Into<MediaPath<'p>>) -> Option<&str> {
        let path = path.into();
        self.restricted_prefixes
            .iter()
            .find(|prefix| path.starts_with(prefix))
            .map(String::as_str)
    }

    /// Ask the checker whether the request may access the path.
    ///
    /// Not cached: the checker runs on every call.
    pub fn is_allowed<'p>(
        &self,
        ctx: &dyn RequestContext,
        path: impl Into<MediaPath<'p>>,
    ) -> CheckResult {
        self.checker.check(ctx, path.into())
    }
}

impl fmt::Debug for AccessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessPolicy")
            .field("name", &self.name)
            .field("restricted_prefixes", &self.restricted_prefixes)
            .finish_non_exhaustive()
    }
}
