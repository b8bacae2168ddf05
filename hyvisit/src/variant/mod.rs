//! Closed tagged unions as seen by the visitation engine.
//!
//! Role
//! - [`Variant`] exposes the ordered alternative list and the live discriminant.
//! - [`Alternative`] gives indexed access to one alternative, assuming it is live.
//! - [`DynVariant`] adds the `TypeId`-level view needed by runtime-checked dispatch.
//! - [`OneOf1`] .. [`OneOf8`] are generic unions for when declaring an enum is overkill.
//!
//! Invariants
//! - The alternative list is fixed when the type is defined and holds at least one type.
//! - The discriminant always names the alternative currently stored. The only way to build
//!   or reassign a variant is through a whole alternative ([`Alternative::from_alternative`],
//!   [`Variant::emplace`]), so tag and payload cannot disagree.
//!
//! All three traits are normally implemented by `#[derive(Variant)]` on an enum whose
//! variants each carry a single unnamed field of a distinct type.
use std::any::{Any, TypeId, type_name};

use crate::dispatch::{Visit, VisitMut, VisitOwned};

mod union;

pub use union::*;

/// A closed tagged union over an ordered list of alternative types.
pub trait Variant: Sized {
    /// Names of the alternative types, in declaration order.
    ///
    /// Names are the types as spelled in the enum declaration. For the generic unions
    /// ([`OneOf2`] ..) that is the type parameter, `"A"`, `"B"`, ..., not the instantiated
    /// type; [`DynVariant::alternative_types`] carries the concrete names.
    const ALTERNATIVES: &'static [&'static str];

    /// Number of alternatives.
    const COUNT: usize = Self::ALTERNATIVES.len();

    /// Index of the live alternative, in `0..Self::COUNT`.
    fn discriminant(&self) -> usize;

    /// Name of the live alternative type.
    #[inline]
    fn alternative_name(&self) -> &'static str {
        Self::ALTERNATIVES[self.discriminant()]
    }

    /// Return `true` if alternative `I` is live.
    #[inline]
    fn holds<const I: usize>(&self) -> bool
    where
        Self: Alternative<I>,
    {
        self.discriminant() == I
    }

    /// Replace the current value by alternative `I`.
    ///
    /// The previous payload is dropped before the method returns.
    #[inline]
    fn emplace<const I: usize>(&mut self, value: <Self as Alternative<I>>::Type)
    where
        Self: Alternative<I>,
    {
        *self = <Self as Alternative<I>>::from_alternative(value);
    }

    /// Method form of [`crate::visit`].
    #[inline]
    fn visit<H>(&self, handlers: &mut H) -> <Self as Visit<H>>::Output
    where
        Self: Visit<H>,
    {
        crate::visit(handlers, self)
    }

    /// Method form of [`crate::visit_mut`].
    #[inline]
    fn visit_mut<H>(&mut self, handlers: &mut H) -> <Self as VisitMut<H>>::Output
    where
        Self: VisitMut<H>,
    {
        crate::visit_mut(handlers, self)
    }

    /// Method form of [`crate::visit_owned`].
    #[inline]
    fn visit_owned<H>(self, handlers: &mut H) -> <Self as VisitOwned<H>>::Output
    where
        Self: VisitOwned<H>,
    {
        crate::visit_owned(handlers, self)
    }
}

/// Indexed access to alternative `I` of a variant.
///
/// The checked accessors (`try_*`) are the primitive operations; the unchecked ones assume
/// alternative `I` is live and panic through [`mismatched_alternative`] otherwise. Dispatch
/// only ever calls them with the live discriminant.
pub trait Alternative<const I: usize>: Variant {
    /// Type stored by alternative `I`.
    type Type;

    /// Build the variant holding alternative `I`.
    fn from_alternative(value: Self::Type) -> Self;

    /// Borrow alternative `I` if it is live.
    fn try_get(&self) -> Option<&Self::Type>;

    /// Mutably borrow alternative `I` if it is live.
    fn try_get_mut(&mut self) -> Option<&mut Self::Type>;

    /// Move alternative `I` out, or give the variant back if another alternative is live.
    fn try_into_alternative(self) -> Result<Self::Type, Self>;

    /// Borrow alternative `I`.
    ///
    /// # Panics
    /// If alternative `I` is not live.
    #[inline]
    #[track_caller]
    fn get(&self) -> &Self::Type {
        match self.try_get() {
            Some(value) => value,
            None => mismatched_alternative(I, self.discriminant()),
        }
    }

    /// Mutably borrow alternative `I`.
    ///
    /// # Panics
    /// If alternative `I` is not live.
    #[inline]
    #[track_caller]
    fn get_mut(&mut self) -> &mut Self::Type {
        let live = self.discriminant();
        match self.try_get_mut() {
            Some(value) => value,
            None => mismatched_alternative(I, live),
        }
    }

    /// Move alternative `I` out of the variant.
    ///
    /// # Panics
    /// If alternative `I` is not live.
    #[inline]
    #[track_caller]
    fn into_alternative(self) -> Self::Type {
        match self.try_into_alternative() {
            Ok(value) => value,
            Err(this) => mismatched_alternative(I, this.discriminant()),
        }
    }
}

/// Runtime identity of one alternative type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlternativeType {
    /// `TypeId` of the alternative.
    pub id: TypeId,
    /// Fully qualified type name, for diagnostics.
    pub name: &'static str,
}

impl AlternativeType {
    /// Describe `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

/// Type-erased view of a variant, used by runtime-checked dispatch.
///
/// Derived for enums without lifetime parameters; type parameters must be `'static`.
pub trait DynVariant: Variant + 'static {
    /// Alternative types, in declaration order.
    fn alternative_types() -> Vec<AlternativeType>;

    /// Borrow the live payload.
    fn payload(&self) -> &dyn Any;

    /// Mutably borrow the live payload.
    fn payload_mut(&mut self) -> &mut dyn Any;
}

/// Abort an extraction that assumed the wrong alternative.
///
/// Reaching this is a bug in the caller: dispatch indexes with the live discriminant, so
/// it never requests an alternative that is not live.
#[cold]
#[inline(never)]
#[track_caller]
pub fn mismatched_alternative(expected: usize, live: usize) -> ! {
    panic!("alternative {expected} was requested but alternative {live} is live")
}
