//! Request context
//!
//! The access layer never authenticates anyone itself. It consumes whatever
//! identity the surrounding application has already established, through the
//! [`RequestContext`] trait.

/// Identity information for the request being authorized
pub trait RequestContext {
    /// Authenticated principal name, `None` for anonymous requests
    fn principal(&self) -> Option<&str>;

    /// Groups the principal belongs to
    fn groups(&self) -> &[String] {
        &[]
    }

    fn is_authenticated(&self) -> bool {
        self.principal().is_some()
    }
}

/// An unauthenticated request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Anonymous;

impl RequestContext for Anonymous {
    fn principal(&self) -> Option<&str> {
        None
    }
}

/// An authenticated identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    name: String,
    groups: Vec<String>,
}

impl Principal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: Vec::new(),
        }
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}

impl RequestContext for Principal {
    fn principal(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn groups(&self) -> &[String] {
        &self.groups
    }
}

/// `None` is an anonymous request
impl<C: RequestContext> RequestContext for Option<C> {
    fn principal(&self) -> Option<&str> {
        self.as_ref().and_then(|ctx| ctx.principal())
    }

    fn groups(&self) -> &[String] {
        self.as_ref().map(|ctx| ctx.groups()).unwrap_or(&[])
    }
}
