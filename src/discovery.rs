//! Registry bootstrap and policy discovery
//!
//! Most applications construct a [`PolicyRegistry`] at startup and hand it to
//! the gate explicitly. For simple setups a process-wide default registry is
//! available: it is created on first use, and may be replaced by a custom
//! registry only before that happens.
//!
//! Policies declared with `#[media_policy]` anywhere in the binary are
//! collected at link time and registered by [`autodiscover`].

use crate::access_control::{AccessPolicy, PolicyRegistry};
use crate::error::ConfigError;
use std::sync::{Arc, Once, OnceLock};
use tracing::{debug, info};

static DEFAULT_REGISTRY: OnceLock<Arc<PolicyRegistry>> = OnceLock::new();
static AUTODISCOVER: Once = Once::new();

/// Compile-time policy registration entry for auto-discovery
///
/// This struct is submitted via `inventory::submit!` by the `#[media_policy]`
/// macro, so policies register themselves without explicit calls.
pub struct PolicyRegistration {
    /// Policy name, also the tie-break between equal `order` values
    pub name: &'static str,
    /// Registration position; lower values are registered (and matched) first
    pub order: i32,
    /// Builds the policy
    pub build: fn() -> AccessPolicy,
}

impl PolicyRegistration {
    pub const fn new(name: &'static str, order: i32, build: fn() -> AccessPolicy) -> Self {
        Self { name, order, build }
    }
}

inventory::collect!(PolicyRegistration);

/// Get the process-wide default registry, creating it on first use.
///
/// The lazily created registry has no policies and allows unmatched paths.
pub fn default_registry() -> Arc<PolicyRegistry> {
    DEFAULT_REGISTRY
        .get_or_init(|| {
            debug!("Initializing default media access policy registry");
            Arc::new(PolicyRegistry::default())
        })
        .clone()
}

/// Install a custom default registry.
///
/// Must run before anything touches the default registry.
pub fn set_default_registry(registry: Arc<PolicyRegistry>) -> Result<(), ConfigError> {
    DEFAULT_REGISTRY
        .set(registry)
        .map_err(|_| ConfigError::DefaultRegistryInitialized)
}

/// Register a policy with `registry`, or with the default registry when none
/// is given.
pub fn register(policy: impl Into<Arc<AccessPolicy>>, registry: Option<&PolicyRegistry>) {
    match registry {
        Some(registry) => registry.register(policy),
        None => default_registry().register(policy),
    }
}

/// Register every discovered policy with the default registry.
///
/// Runs once per process; later calls register nothing and return 0.
pub fn autodiscover() -> usize {
    let mut count = 0;
    AUTODISCOVER.call_once(|| {
        count = autodiscover_into(&default_registry());
    });
    count
}

/// Register every discovered policy with `registry`.
///
/// Policies are registered by ascending `order`, then by name, so the result
/// does not depend on link order.
pub fn autodiscover_into(registry: &PolicyRegistry) -> usize {
    let registrations = sorted_registrations();

    for registration in &registrations {
        debug!(
            policy = registration.name,
            order = registration.order,
            "Discovered media access policy"
        );
        registry.register((registration.build)());
    }

    info!(
        count = registrations.len(),
        "Registered discovered media access policies"
    );
    registrations.len()
}

/// Names of all discovered policies, in registration order
pub fn discovered_policies() -> Vec<&'static str> {
    sorted_registrations().into_iter().map(|r| r.name).collect()
}

fn sorted_registrations() -> Vec<&'static PolicyRegistration> {
    let mut registrations: Vec<&'static PolicyRegistration> =
        inventory::iter::<PolicyRegistration>.into_iter().collect();
    registrations.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(b.name)));
    registrations
}
