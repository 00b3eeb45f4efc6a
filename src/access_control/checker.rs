//! Access checkers
//!
//! An [`AccessChecker`] is the decision half of a policy: given the request
//! context and the path, it says yes or no. Checkers are evaluated fresh on
//! every request and may depend on live state (sessions, databases).

use crate::access_control::context::RequestContext;
use crate::access_control::path::MediaPath;
use crate::error::CheckResult;
use std::collections::HashSet;
use std::fmt;

/// Decides whether a request may access a path
pub trait AccessChecker: Send + Sync {
    /// Return `Ok(true)` to allow, `Ok(false)` to deny.
    ///
    /// Errors propagate to the caller unchanged; they are never treated as
    /// a denial.
    fn check(&self, ctx: &dyn RequestContext, path: MediaPath<'_>) -> CheckResult;
}

/// Build a checker from an infallible closure
pub fn from_fn<F>(f: F) -> FnChecker<F>
where
    F: Fn(&dyn RequestContext, MediaPath<'_>) -> bool + Send + Sync,
{
    FnChecker(f)
}

/// Build a checker from a fallible closure
pub fn try_fn<F>(f: F) -> TryFnChecker<F>
where
    F: Fn(&dyn RequestContext, MediaPath<'_>) -> CheckResult + Send + Sync,
{
    TryFnChecker(f)
}

/// Checker returned by [`from_fn`]
#[derive(Clone)]
pub struct FnChecker<F>(F);

impl<F> AccessChecker for FnChecker<F>
where
    F: Fn(&dyn RequestContext, MediaPath<'_>) -> bool + Send + Sync,
{
    fn check(&self, ctx: &dyn RequestContext, path: MediaPath<'_>) -> CheckResult {
        Ok((self.0)(ctx, path))
    }
}

impl<F> fmt::Debug for FnChecker<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnChecker")
    }
}

/// Checker returned by [`try_fn`]
#[derive(Clone)]
pub struct TryFnChecker<F>(F);

impl<F> AccessChecker for TryFnChecker<F>
where
    F: Fn(&dyn RequestContext, MediaPath<'_>) -> CheckResult + Send + Sync,
{
    fn check(&self, ctx: &dyn RequestContext, path: MediaPath<'_>) -> CheckResult {
        (self.0)(ctx, path)
    }
}

impl<F> fmt::Debug for TryFnChecker<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TryFnChecker")
    }
}

/// Allows every request
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessChecker for AllowAll {
    fn check(&self, _ctx: &dyn RequestContext, _path: MediaPath<'_>) -> CheckResult {
        Ok(true)
    }
}

/// Denies every request
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl AccessChecker for DenyAll {
    fn check(&self, _ctx: &dyn RequestContext, _path: MediaPath<'_>) -> CheckResult {
        Ok(false)
    }
}

/// Allows any authenticated request
#[derive(Debug, Clone, Copy, Default)]
pub struct Authenticated;

impl AccessChecker for Authenticated {
    fn check(&self, ctx: &dyn RequestContext, _path: MediaPath<'_>) -> CheckResult {
        Ok(ctx.is_authenticated())
    }
}

/// Allows the listed principals
#[derive(Debug, Clone)]
pub struct Principals {
    names: HashSet<String>,
}

impl Principals {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl AccessChecker for Principals {
    fn check(&self, ctx: &dyn RequestContext, _path: MediaPath<'_>) -> CheckResult {
        Ok(ctx
            .principal()
            .is_some_and(|name| self.names.contains(name)))
    }
}

/// Allows authenticated principals belonging to any of the listed groups
#[derive(Debug, Clone)]
pub struct Groups {
    groups: HashSet<String>,
}

impl Groups {
    pub fn new<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }
}

impl AccessChecker for Groups {
    fn check(&self, ctx: &dyn RequestContext, _path: MediaPath<'_>) -> CheckResult {
        if !ctx.is_authenticated() {
            return Ok(false);
        }
        Ok(ctx.groups().iter().any(|g| self.groups.contains(g)))
    }
}
