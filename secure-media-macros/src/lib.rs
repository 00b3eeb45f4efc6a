//! Procedural macros for secure-media
//!
//! This crate provides the `#[media_policy]` attribute macro for declaring media
//! access policies that register themselves through auto-discovery.

use darling::{FromMeta, ast::NestedMeta};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, Expr, Lit, LitStr, parse_macro_input};

/// Arguments for the `#[media_policy]` attribute
#[derive(Debug, FromMeta)]
struct MediaPolicyArgs {
    /// Path prefixes governed by the policy, e.g. `["images/", "profiles/"]`
    prefixes: Expr,
    /// Policy name (defaults to the type name)
    #[darling(default)]
    name: Option<String>,
    /// Registration order, lower first (default: 0)
    #[darling(default)]
    order: i32,
}

/// Declare a media access policy for auto-discovery.
///
/// Apply to a type that implements `AccessChecker` and `Default`. This macro
/// generates:
/// - A builder producing an `AccessPolicy` over the given prefixes
/// - An `inventory` submission picked up by `secure_media::autodiscover()`
///
/// # Example
///
/// ```ignore
/// #[media_policy(name = "members", prefixes = ["images/", "profiles/"], order = 10)]
/// #[derive(Default)]
/// pub struct MembersOnly;
///
/// impl AccessChecker for MembersOnly {
///     fn check(&self, ctx: &dyn RequestContext, _path: MediaPath<'_>) -> CheckResult {
///         Ok(ctx.is_authenticated())
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn media_policy(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr_args = match NestedMeta::parse_meta_list(attr.into()) {
        Ok(v) => v,
        Err(e) => return TokenStream::from(e.to_compile_error()),
    };

    let args = match MediaPolicyArgs::from_list(&attr_args) {
        Ok(v) => v,
        Err(e) => return TokenStream::from(e.write_errors()),
    };

    let input = parse_macro_input!(item as DeriveInput);
    let expanded = impl_media_policy(&args, &input);

    TokenStream::from(expanded)
}

fn impl_media_policy(args: &MediaPolicyArgs, input: &DeriveInput) -> TokenStream2 {
    let type_name = &input.ident;

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            &input.generics,
            "media_policy does not support generic types",
        )
        .to_compile_error();
    }

    let prefixes = match parse_prefixes(&args.prefixes) {
        Ok(prefixes) => prefixes,
        Err(e) => return e.to_compile_error(),
    };

    let policy_name = args
        .name
        .clone()
        .unwrap_or_else(|| type_name.to_string());
    let order = args.order;
    let prefix_count = prefixes.len();

    quote! {
        #input

        const _: () = {
            fn build() -> ::secure_media::access_control::AccessPolicy {
                let prefixes: [&'static str; #prefix_count] = [#(#prefixes),*];
                ::secure_media::access_control::AccessPolicy::new(
                    prefixes,
                    <#type_name as ::core::default::Default>::default(),
                )
                .with_name(#policy_name)
            }

            ::secure_media::inventory::submit! {
                ::secure_media::discovery::PolicyRegistration::new(#policy_name, #order, build)
            }
        };
    }
}

/// Accept `prefixes = ["a/", "b/"]`, string literals only
fn parse_prefixes(expr: &Expr) -> syn::Result<Vec<LitStr>> {
    let Expr::Array(array) = expr else {
        return Err(syn::Error::new_spanned(
            expr,
            "prefixes must be an array of string literals, e.g. [\"images/\"]",
        ));
    };

    array
        .elems
        .iter()
        .map(|elem| match elem {
            Expr::Lit(lit) => match &lit.lit {
                Lit::Str(s) => Ok(s.clone()),
                other => Err(syn::Error::new_spanned(other, "prefix must be a string literal")),
            },
            other => Err(syn::Error::new_spanned(other, "prefix must be a string literal")),
        })
        .collect()
}
