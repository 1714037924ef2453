use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{spanned::Spanned, Ident, ItemFn};

/// Proc macro to denote a Benchmark
///
/// Turns an `async fn` taking no arguments and returning `Result<(), E>` into a function
/// returning a configurable benchmark of that workload, named after the function. `E` only needs
/// to implement `Display`.
///
/// See the `Benchmark` struct for the builder methods available on the result.
///
/// # Example
/// ```ignore
/// use stampede::prelude::*;
///
/// #[benchmark]
/// async fn my_benchmark() -> Result<(), MyError> {
///     ...
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let summary = my_benchmark().threads(8).await.unwrap();
/// }
/// ```
#[proc_macro_attribute]
pub fn benchmark(attr: TokenStream, item: TokenStream) -> TokenStream {
    benchmark_internal(attr.into(), item.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn benchmark_internal(attr: TokenStream2, item: TokenStream2) -> syn::Result<TokenStream2> {
    if !attr.is_empty() {
        return Err(syn::Error::new(
            attr.span(),
            "#[benchmark] does not take any arguments",
        ));
    }

    let input = syn::parse2::<ItemFn>(item)?;

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = input;

    if sig.asyncness.is_none() {
        return Err(syn::Error::new(
            sig.fn_token.span,
            "#[benchmark] can only be used on async functions",
        ));
    }
    if !sig.inputs.is_empty() {
        return Err(syn::Error::new(
            sig.inputs.span(),
            "#[benchmark] functions cannot take arguments",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new(
            sig.generics.span(),
            "#[benchmark] functions cannot be generic",
        ));
    }

    let bench_name = sig.ident.clone();
    let workload_name = Ident::new(&format!("__stampede_{}", sig.ident), Span::call_site());

    let mut workload_sig = sig.clone();
    workload_sig.ident = workload_name.clone();

    let mut bench_sig = sig;
    bench_sig.asyncness = None;
    bench_sig.output = syn::parse2(quote! {
        -> impl ::stampede::benchmark::ConfigurableBenchmark
    })?;

    Ok(quote! {
        #(#attrs)* #vis #bench_sig {
            ::stampede::benchmark::Benchmark::new(stringify!(#bench_name), #workload_name)
        }

        #[doc(hidden)]
        #vis #workload_sig #block
    })
}
