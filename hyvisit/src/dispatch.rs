//! Trampolines and the per-pair dispatch tables built from them.
//!
//! A trampoline is a plain function pointer bound to one alternative index `I`: it extracts
//! alternative `I` from the variant and forwards it to the bundle. For every
//! `(bundle type, variant type)` pair, `#[derive(Variant)]` emits impls of [`Visit`],
//! [`VisitMut`] and [`VisitOwned`] whose associated `TABLE` holds one trampoline per
//! alternative in declaration order, so that
//!
//! `TABLE[i](bundle, variant) == bundle.handle(<variant as Alternative<i>>::get())`.
//!
//! The tables are `const` items: they are built by the compiler, once per pair, and a visit
//! reduces to one indexed load and one indirect call.
//!
//! Validation lives in the where-clauses of those impls. For a variant over `T0, T1, ...`:
//! - `H: Handle<T0>` fixes the canonical result `R = <H as Handle<T0>>::Output`;
//! - every other alternative requires `H: Handle<Ti, Output = R>`.
//!
//! A bundle missing an alternative fails the first kind of bound; a bundle whose handlers
//! disagree on the result fails the second, naming the alternative and both types.
use crate::{
    handler::{Handle, HandleMut, HandleOwned},
    variant::{Alternative, Variant},
};

/// Trampoline used by [`crate::visit`].
pub type Trampoline<H, V, R> = fn(&mut H, &V) -> R;

/// Trampoline used by [`crate::visit_mut`].
pub type TrampolineMut<H, V, R> = fn(&mut H, &mut V) -> R;

/// Trampoline used by [`crate::visit_owned`].
pub type TrampolineOwned<H, V, R> = fn(&mut H, V) -> R;

/// Dispatch table of a variant for bundles lending `&T` to their handlers.
pub trait Visit<H>: Variant {
    /// Result shared by every handler of the bundle.
    type Output;

    /// Storage of the table, `[Trampoline<H, Self, Self::Output>; Self::COUNT]`.
    type Table: AsRef<[Trampoline<H, Self, <Self as Visit<H>>::Output>]>;

    /// One trampoline per alternative, indexed by discriminant.
    const TABLE: Self::Table;
}

/// Dispatch table of a variant for bundles lending `&mut T` to their handlers.
pub trait VisitMut<H>: Variant {
    /// Result shared by every handler of the bundle.
    type Output;

    /// Storage of the table, `[TrampolineMut<H, Self, Self::Output>; Self::COUNT]`.
    type Table: AsRef<[TrampolineMut<H, Self, <Self as VisitMut<H>>::Output>]>;

    /// One trampoline per alternative, indexed by discriminant.
    const TABLE: Self::Table;
}

/// Dispatch table of a variant for bundles taking `T` by value.
pub trait VisitOwned<H>: Variant {
    /// Result shared by every handler of the bundle.
    type Output;

    /// Storage of the table, `[TrampolineOwned<H, Self, Self::Output>; Self::COUNT]`.
    type Table: AsRef<[TrampolineOwned<H, Self, <Self as VisitOwned<H>>::Output>]>;

    /// One trampoline per alternative, indexed by discriminant.
    const TABLE: Self::Table;
}

/// Forward alternative `I` of `variant`, borrowed, to the bundle.
#[inline]
pub fn trampoline<H, V, const I: usize>(
    handlers: &mut H,
    variant: &V,
) -> <H as Handle<<V as Alternative<I>>::Type>>::Output
where
    V: Alternative<I>,
    H: Handle<<V as Alternative<I>>::Type>,
{
    handlers.handle(variant.get())
}

/// Forward alternative `I` of `variant`, mutably borrowed, to the bundle.
#[inline]
pub fn trampoline_mut<H, V, const I: usize>(
    handlers: &mut H,
    variant: &mut V,
) -> <H as HandleMut<<V as Alternative<I>>::Type>>::Output
where
    V: Alternative<I>,
    H: HandleMut<<V as Alternative<I>>::Type>,
{
    handlers.handle_mut(variant.get_mut())
}

/// Move alternative `I` out of `variant` and into the bundle.
#[inline]
pub fn trampoline_owned<H, V, const I: usize>(
    handlers: &mut H,
    variant: V,
) -> <H as HandleOwned<<V as Alternative<I>>::Type>>::Output
where
    V: Alternative<I>,
    H: HandleOwned<<V as Alternative<I>>::Type>,
{
    handlers.handle_owned(variant.into_alternative())
}
