//! Policy discovery and default registry tests
//!
//! The default registry is process-wide, so only
//! `test_default_registry_lifecycle` touches it; every other test works on
//! its own registry.

use secure_media::access_control::{
    AccessChecker, AccessPolicy, Anonymous, MediaPath, PolicyRegistry, Principal, RequestContext,
};
use secure_media::discovery::discovered_policies;
use secure_media::error::CheckResult;
use secure_media::{
    ConfigError, Gate, autodiscover, autodiscover_into, default_registry, media_policy, register,
    set_default_registry,
};
use std::sync::Arc;

#[media_policy(name = "members", prefixes = ["images/", "profiles/"], order = 10)]
#[derive(Default)]
struct MembersOnly;

impl AccessChecker for MembersOnly {
    fn check(&self, ctx: &dyn RequestContext, _path: MediaPath<'_>) -> CheckResult {
        Ok(ctx.is_authenticated())
    }
}

#[media_policy(prefixes = ["images/previews/"])]
#[derive(Default)]
struct PublicPreviews;

impl AccessChecker for PublicPreviews {
    fn check(&self, _ctx: &dyn RequestContext, _path: MediaPath<'_>) -> CheckResult {
        Ok(true)
    }
}

#[media_policy(name = "admin-exports", prefixes = ["exports/"], order = 10)]
#[derive(Default)]
struct AdminExports {
    admins: Vec<String>,
}

impl AccessChecker for AdminExports {
    fn check(&self, ctx: &dyn RequestContext, _path: MediaPath<'_>) -> CheckResult {
        Ok(ctx
            .principal()
            .is_some_and(|name| name == "root" || self.admins.iter().any(|a| a == name)))
    }
}

#[test]
fn test_discovered_policies_sorted_by_order_then_name() {
    assert_eq!(
        discovered_policies(),
        ["PublicPreviews", "admin-exports", "members"]
    );
}

#[test]
fn test_autodiscover_into_registers_all() {
    let registry = PolicyRegistry::new(false);
    assert_eq!(autodiscover_into(&registry), 3);
    assert_eq!(registry.len(), 3);

    let names: Vec<_> = registry
        .policies()
        .iter()
        .map(|p| p.name().map(str::to_string))
        .collect();
    assert_eq!(
        names,
        [
            Some("PublicPreviews".to_string()),
            Some("admin-exports".to_string()),
            Some("members".to_string()),
        ]
    );
}

#[test]
fn test_discovered_policies_decide_access() {
    let registry = PolicyRegistry::new(true);
    autodiscover_into(&registry);

    // Order 0 previews policy is registered ahead of the members policy
    assert!(registry.is_allowed(&Anonymous, "images/previews/a.jpg").unwrap());
    assert!(!registry.is_allowed(&Anonymous, "images/a.jpg").unwrap());
    assert!(registry.is_allowed(&Principal::new("alice"), "profiles/a.png").unwrap());

    assert!(!registry.is_allowed(&Principal::new("alice"), "exports/q3.csv").unwrap());
    assert!(registry.is_allowed(&Principal::new("root"), "exports/q3.csv").unwrap());

    assert!(registry.is_allowed(&Anonymous, "general/readme.txt").unwrap());
}

#[test]
fn test_autodiscover_into_appends_after_existing() {
    let registry = PolicyRegistry::new(true);
    register(
        AccessPolicy::new(["images/"], MembersOnly).with_name("explicit"),
        Some(&registry),
    );
    autodiscover_into(&registry);

    assert_eq!(registry.len(), 4);
    let first = registry.get_policy_for_path("images/previews/a.jpg").unwrap();
    assert_eq!(first.name(), Some("explicit"));
}

#[test]
fn test_default_registry_lifecycle() {
    let custom = Arc::new(PolicyRegistry::new(false));
    set_default_registry(custom.clone()).unwrap();
    assert!(Arc::ptr_eq(&default_registry(), &custom));

    // Too late once the default exists
    let err = set_default_registry(Arc::new(PolicyRegistry::default())).unwrap_err();
    assert!(matches!(err, ConfigError::DefaultRegistryInitialized));

    // Discovery runs once per process
    assert_eq!(autodiscover(), 3);
    assert_eq!(autodiscover(), 0);
    assert_eq!(custom.len(), 3);

    register(AccessPolicy::new(["tmp/"], PublicPreviews), None);
    assert_eq!(custom.len(), 4);

    // A gate without a registry consults the default
    let gate = Gate::default();
    assert!(gate.authorize(&Anonymous, "tmp/x").is_ok());
    assert!(gate.authorize(&Anonymous, "images/a.jpg").unwrap_err().is_not_found());
    assert!(gate.authorize(&Anonymous, "unmanaged/x").unwrap_err().is_not_found());
}
