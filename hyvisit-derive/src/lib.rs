//! Procedural macros backing `hyvisit`.
//!
//! - `#[derive(Variant)]` turns an enum of single-field variants into a closed variant: it
//!   implements the alternative list, indexed access and the three dispatch tables.
//! - `visitor! { ... }` composes single-argument closures into one handler bundle.
//!
//! Generated code refers to the runtime crate as `::hyvisit`.
use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod variant;
mod visitor;

/// Derive `Variant`, `Alternative<I>`, `DynVariant` and the `Visit*` dispatch tables.
///
/// Every variant of the enum must carry exactly one unnamed field, and no two variants may
/// carry the same type. Types are compared as spelled: `i32` and `core::primitive::i32`, or
/// a type and its alias, are not recognised as equal. Such a pair still dispatches by index,
/// both positions reaching the same handler.
#[proc_macro_derive(Variant)]
pub fn derive_variant(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    variant::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Compose closures into a handler bundle.
///
/// Each closure takes one argument annotated with the alternative it accepts: `&T` (shared
/// and mutable visits), `&mut T` (mutable visits) or `T` (owning visits).
///
/// The bundle is a struct declared inside the expansion, so the annotated types cannot name
/// generic parameters of the enclosing function (`error[E0401]`). In generic code, write a
/// bundle type implementing `Handle<T>` for each alternative instead.
#[proc_macro]
pub fn visitor(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as visitor::HandlerList);
    visitor::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
