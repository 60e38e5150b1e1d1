//! Procedural macros for on-device testing in esp32-lowpower.
//!
//! Provides `#[tap_test]`, which registers a function with the TAP runner in
//! `esp32_lowpower::testing` so the same test can run on the host or on an
//! ESP32 through the `device-tests` binary.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Expr, ExprLit, ItemFn, Lit, Meta, ReturnType};

/// Mark a function as a TAP test.
///
/// Tests either return nothing (a panic is a failure) or return
/// `Result<(), E>` (an `Err` is a failure).
///
/// # Attributes
///
/// - `#[tap_test]` - regular test
/// - `#[tap_test(should_panic)]` - test that must panic
/// - `#[tap_test(should_panic = "text")]` - must panic with a message containing `text`
///
/// # Example
///
/// ```ignore
/// use esp32_lowpower_macros::tap_test;
///
/// #[tap_test]
/// fn first_preset_is_shortest_window() {
///     assert_eq!(PM_PRESETS[0].wake_window_ms, 75);
/// }
///
/// #[tap_test(should_panic = "must not be empty")]
/// fn empty_cycle_panics() {
///     PowerCycle::new(&[], PM_DWELL);
/// }
/// ```
#[proc_macro_attribute]
pub fn tap_test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input_fn = parse_macro_input!(item as ItemFn);

    let expectation = match parse_expectation(attr) {
        Ok(expectation) => expectation,
        Err(err) => return err.to_compile_error().into(),
    };

    let fn_name = &input_fn.sig.ident;
    let fn_name_str = fn_name.to_string();
    let returns_result = matches!(input_fn.sig.output, ReturnType::Type(_, _));

    let register_call = match expectation {
        Expectation::Pass if returns_result => quote! {
            runner.run(#fn_name_str, #fn_name);
        },
        Expectation::Pass => quote! {
            runner.run_assert(#fn_name_str, #fn_name);
        },
        Expectation::Panic(None) => quote! {
            runner.run_should_panic(#fn_name_str, #fn_name, None);
        },
        Expectation::Panic(Some(msg)) => quote! {
            runner.run_should_panic(#fn_name_str, #fn_name, Some(#msg));
        },
    };

    let expanded = quote! {
        #input_fn

        ::inventory::submit! {
            ::esp32_lowpower::testing::TapTestEntry::new(
                #fn_name_str,
                |runner: &mut ::esp32_lowpower::testing::TestRunner| {
                    #register_call
                }
            )
        }
    };

    TokenStream::from(expanded)
}

enum Expectation {
    Pass,
    Panic(Option<String>),
}

fn parse_expectation(attr: TokenStream) -> syn::Result<Expectation> {
    if attr.is_empty() {
        return Ok(Expectation::Pass);
    }

    let meta: Meta = syn::parse(attr)?;
    if !meta.path().is_ident("should_panic") {
        return Err(syn::Error::new_spanned(
            meta.path(),
            "tap_test: unknown attribute, expected `should_panic` or `should_panic = \"message\"`",
        ));
    }

    match meta {
        Meta::Path(_) => Ok(Expectation::Panic(None)),
        Meta::NameValue(nv) => match nv.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) => Ok(Expectation::Panic(Some(s.value()))),
            other => Err(syn::Error::new_spanned(
                other,
                "tap_test: should_panic expects a string literal",
            )),
        },
        Meta::List(list) => Err(syn::Error::new_spanned(
            list,
            "tap_test: use `should_panic` or `should_panic = \"message\"`",
        )),
    }
}
