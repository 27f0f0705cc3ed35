//! Procedural macros for mockwright
//!
//! This crate provides the `#[mockwright::mockable]` attribute, which
//! implements a trait for `mockwright::mock::MockObject` by forwarding every
//! method to the mock's member registry.
//!
//! # Example
//!
//! ```rust,ignore
//! use mockwright::prelude::*;
//!
//! #[mockwright::mockable]
//! trait Store {
//!     fn load(&self, key: &str) -> Option<String>;
//!     fn save(&self, key: &str, value: String);
//! }
//!
//! let mocked = Mock::create();
//! mocked.setup([setup_function("load").returning("cached"), setup_function("save")])?;
//!
//! let store: &dyn Store = &mocked.mock();
//! assert_eq!(store.load("a"), Some("cached".to_string()));
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, FnArg, Ident, ItemTrait, Lit, Pat, PatIdent, ReturnType, Token, TraitItem,
    TraitItemFn, Type,
};

/// Configuration options for the mockable macro.
struct MockableConfig {
    /// Path of the mockwright crate in generated code
    path: syn::Path,
}

impl Default for MockableConfig {
    fn default() -> Self {
        Self {
            path: syn::parse_quote!(::mockwright),
        }
    }
}

impl Parse for MockableConfig {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut config = MockableConfig::default();

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "path" => {
                    let lit: Lit = input.parse()?;
                    match lit {
                        Lit::Str(s) => config.path = s.parse()?,
                        other => {
                            return Err(syn::Error::new_spanned(
                                other,
                                "expected a string literal path",
                            ));
                        }
                    }
                }
                _ => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {ident}"),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(config)
    }
}

/// Implement a trait for `MockObject`.
///
/// The trait is emitted unchanged, followed by an implementation for
/// `mockwright::mock::MockObject`. Each method records a call of the
/// function with the same name, converting every argument with
/// `Value::from` and the returned value with `FromValue`.
///
/// A call on a member without setup, or a return value of the wrong type,
/// panics with the error message.
///
/// # Requirements
///
/// - every method takes a `self` receiver
/// - no generic parameters on the trait
/// - no associated types or constants
/// - no `async fn`
///
/// # Configuration Options
///
/// - `path = "crate::reexported::mockwright"` - Path of the mockwright crate
///
/// ```rust,ignore
/// #[mockwright::mockable(path = "my_support::mockwright")]
/// trait Clock {
///     fn now(&self) -> i64;
/// }
/// ```
#[proc_macro_attribute]
pub fn mockable(attr: TokenStream, item: TokenStream) -> TokenStream {
    let config = parse_macro_input!(attr as MockableConfig);
    let input = parse_macro_input!(item as ItemTrait);

    expand_mockable(&config, &input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_mockable(config: &MockableConfig, input: &ItemTrait) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "mockable traits cannot have generic parameters",
        ));
    }

    let path = &config.path;
    let methods = input
        .items
        .iter()
        .map(|item| match item {
            TraitItem::Fn(method) => expand_method(path, method),
            TraitItem::Type(item) => Err(syn::Error::new_spanned(
                item,
                "mockable traits cannot have associated types",
            )),
            TraitItem::Const(item) => Err(syn::Error::new_spanned(
                item,
                "mockable traits cannot have associated constants",
            )),
            other => Err(syn::Error::new_spanned(other, "unsupported trait item")),
        })
        .collect::<syn::Result<Vec<_>>>()?;

    let name = &input.ident;
    let unsafety = &input.unsafety;

    Ok(quote! {
        #input

        #unsafety impl #name for #path::mock::MockObject {
            #(#methods)*
        }
    })
}

fn expand_method(path: &syn::Path, method: &TraitItemFn) -> syn::Result<TokenStream2> {
    let mut sig = method.sig.clone();

    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "mockable methods cannot be async",
        ));
    }
    if sig.receiver().is_none() {
        return Err(syn::Error::new_spanned(
            &sig,
            "mockable methods must take a self receiver",
        ));
    }

    // Arguments are re-bound to plain identifiers so patterns in the trait
    // declaration need no special handling.
    let mut arguments = Vec::new();
    for (index, input) in sig.inputs.iter_mut().enumerate() {
        if let FnArg::Typed(pat_type) = input {
            let ident = match &*pat_type.pat {
                Pat::Ident(pat) if pat.by_ref.is_none() && pat.subpat.is_none() => {
                    pat.ident.clone()
                }
                _ => format_ident!("__mockwright_arg{}", index),
            };
            pat_type.pat = Box::new(Pat::Ident(PatIdent {
                attrs: Vec::new(),
                by_ref: None,
                mutability: None,
                ident: ident.clone(),
                subpat: None,
            }));
            arguments.push(ident);
        }
    }

    let member = sig.ident.to_string();
    let output = match &sig.output {
        ReturnType::Default => quote! { () },
        ReturnType::Type(_, ty) => output_type(ty),
    };

    Ok(quote! {
        #sig {
            let __mockwright_arguments = ::std::vec![#(#path::Value::from(#arguments)),*];
            match #path::mock::MockObject::call(&self, #member, __mockwright_arguments)
                .and_then(<#output as #path::FromValue>::from_value)
            {
                ::std::result::Result::Ok(value) => value,
                ::std::result::Result::Err(err) => ::std::panic!("{}", err),
            }
        }
    })
}

fn output_type(ty: &Type) -> TokenStream2 {
    match ty {
        Type::Paren(inner) => output_type(&inner.elem),
        other => quote! { #other },
    }
}

#[cfg(test)]
mod tests {
    use super::{expand_mockable, MockableConfig};
    use quote::quote;
    use syn::ItemTrait;

    fn expand(config: &str, item: &str) -> syn::Result<String> {
        let config: MockableConfig = syn::parse_str(config)?;
        let item: ItemTrait = syn::parse_str(item)?;
        expand_mockable(&config, &item).map(|tokens| tokens.to_string())
    }

    #[test]
    fn test_config_parse_empty() {
        let config: MockableConfig = syn::parse_str("").unwrap();
        let path = &config.path;
        assert_eq!(quote!(#path).to_string(), ":: mockwright");
    }

    #[test]
    fn test_config_parse_path() {
        let config: MockableConfig = syn::parse_str("path = \"crate::support::mocks\"").unwrap();
        let path = &config.path;
        assert_eq!(quote!(#path).to_string(), "crate :: support :: mocks");
    }

    #[test]
    fn test_config_rejects_unknown_option() {
        assert!(syn::parse_str::<MockableConfig>("name = \"store\"").is_err());
        assert!(syn::parse_str::<MockableConfig>("path = 3").is_err());
    }

    #[test]
    fn test_expand_forwards_methods() {
        let output = expand(
            "",
            "trait Store { fn load(&self, key: &str) -> Option<String>; fn clear(&self); }",
        )
        .unwrap();

        assert!(output.contains("impl Store for :: mockwright :: mock :: MockObject"));
        assert!(output.contains("\"load\""));
        assert!(output.contains(":: mockwright :: Value :: from (key)"));
        assert!(output.contains("< Option < String > as :: mockwright :: FromValue >"));
        assert!(output.contains("< () as :: mockwright :: FromValue >"));
    }

    #[test]
    fn test_expand_rebinds_patterns() {
        let output = expand("", "trait Pair { fn sum(&self, (a, b): (i32, i32)) -> i32; }").unwrap();
        assert!(output.contains("__mockwright_arg1"));
    }

    #[test]
    fn test_expand_rejects_receiverless_method() {
        let err = expand("", "trait Factory { fn create() -> Self; }").unwrap_err();
        assert!(err.to_string().contains("self receiver"));
    }

    #[test]
    fn test_expand_rejects_associated_type() {
        let err = expand("", "trait Iter { type Item; fn next(&self); }").unwrap_err();
        assert!(err.to_string().contains("associated types"));
    }

    #[test]
    fn test_expand_rejects_generic_trait() {
        assert!(expand("", "trait Sink<T> { fn push(&self, item: T); }").is_err());
    }
}
