//! Runtime-checked dispatch for handler sets assembled at runtime.
//!
//! The static path proves coverage and uniformity with trait bounds. When handlers are only
//! known at runtime (collected from a registry, chosen by configuration, ...) the same two
//! properties are checked once, by [`DispatchBuilder::build`], and the resulting
//! [`DynDispatch`] is then reused for every visit.
//!
//! Role
//! - [`DispatchBuilder::on`] registers a handler for one alternative type.
//! - [`DispatchBuilder::on_erased`] registers a handler whose result is boxed as `dyn Any`;
//!   the declared result types are then compared across alternatives.
//! - [`DispatchBuilder::build`] validates the set against [`DynVariant::alternative_types`]
//!   and builds an index -> handler table. Any defect is reported as a [`VisitError`]
//!   before the first visit, never during one.
//!
//! Example
//! ```
//! use hyvisit::prelude::*;
//!
//! #[derive(Variant)]
//! enum Reading {
//!     Celsius(f32),
//!     Raw(u16),
//! }
//!
//! let mut dispatch = DispatchBuilder::<Reading, String>::new()
//!     .on(|c: &mut f32| format!("{c:.1}C"))
//!     .on(|r: &mut u16| format!("raw {r}"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(dispatch.visit(&mut Reading::Celsius(21.04)), "21.0C");
//! assert_eq!(dispatch.visit(&mut Reading::Raw(7)), "raw 7");
//!
//! let missing = DispatchBuilder::<Reading, String>::new()
//!     .on(|c: &mut f32| c.to_string())
//!     .build();
//! assert!(missing.unwrap_err().is_incomplete_coverage());
//! ```
mod error;

pub use error::{VisitError, VisitResult};

use std::{
    any::{Any, type_name},
    fmt,
    marker::PhantomData,
};

use log::{debug, trace};
use smallvec::{SmallVec, smallvec};

use crate::variant::{AlternativeType, DynVariant};

/// Handler with its argument type erased. The table only routes payloads of the accepted
/// type to it.
type ErasedHandler<'a, R> = Box<dyn FnMut(&mut dyn Any) -> R + 'a>;

struct Registration<'a, R> {
    accepts: AlternativeType,
    /// Declared result type, for handlers registered through `on_erased`.
    returns: Option<AlternativeType>,
    handler: ErasedHandler<'a, R>,
}

/// Collects handlers for variant `V`, then validates them into a [`DynDispatch`].
pub struct DispatchBuilder<'a, V, R> {
    registrations: SmallVec<[Registration<'a, R>; 8]>,
    _variant: PhantomData<fn(&mut V) -> R>,
}

impl<'a, V: DynVariant, R> Default for DispatchBuilder<'a, V, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, V: DynVariant, R> DispatchBuilder<'a, V, R> {
    /// Start an empty handler set.
    pub fn new() -> Self {
        Self {
            registrations: SmallVec::new(),
            _variant: PhantomData,
        }
    }

    /// Register the handler for alternative `T`.
    pub fn on<T: 'static>(self, mut handler: impl FnMut(&mut T) -> R + 'a) -> Self {
        self.register(
            AlternativeType::of::<T>(),
            None,
            Box::new(move |payload: &mut dyn Any| handler(downcast::<T>(payload))),
        )
    }

    fn register(
        mut self,
        accepts: AlternativeType,
        returns: Option<AlternativeType>,
        handler: ErasedHandler<'a, R>,
    ) -> Self {
        trace!(
            "Registering handler for `{}` on variant `{}`",
            accepts.name,
            type_name::<V>()
        );
        self.registrations.push(Registration {
            accepts,
            returns,
            handler,
        });
        self
    }

    /// Validate the handler set and build the dispatch table.
    ///
    /// Checks, in order: every handler accepts an alternative of `V`, no alternative is
    /// accepted twice, every alternative is accepted, and, as soon as one handler declares
    /// its result type, every handler declares that same type. A plain [`Self::on`] handler
    /// mixed into a [`DispatchBuilder::on_erased`] set is rejected, since its boxed result may not
    /// downcast to [`DynDispatch::result_type`].
    pub fn build(self) -> VisitResult<DynDispatch<'a, V, R>> {
        let variant = type_name::<V>();
        let alternatives = V::alternative_types();

        let mut slots: SmallVec<[Option<usize>; 8]> = smallvec![None; alternatives.len()];
        for (index, registration) in self.registrations.iter().enumerate() {
            let mut matched = false;
            for (slot, alternative) in slots.iter_mut().zip(&alternatives) {
                if alternative.id != registration.accepts.id {
                    continue;
                }
                if slot.is_some() {
                    return Err(VisitError::AmbiguousCoverage {
                        variant,
                        alternative: alternative.name,
                    });
                }
                *slot = Some(index);
                matched = true;
            }

            if !matched {
                return Err(VisitError::UnknownAlternative {
                    variant,
                    handler: registration.accepts.name,
                });
            }
        }

        let mut table: SmallVec<[usize; 8]> = SmallVec::with_capacity(alternatives.len());
        for (slot, alternative) in slots.iter().zip(&alternatives) {
            match slot {
                Some(index) => table.push(*index),
                None => {
                    return Err(VisitError::IncompleteCoverage {
                        variant,
                        alternative: alternative.name,
                    });
                }
            }
        }

        // Once one handler declares its result type, every handler must declare the same one.
        let canonical = table
            .iter()
            .find_map(|&index| self.registrations[index].returns);
        if let Some(expected) = canonical {
            for (&index, alternative) in table.iter().zip(&alternatives) {
                let found = match self.registrations[index].returns {
                    Some(found) if found.id == expected.id => continue,
                    Some(found) => found.name,
                    None => type_name::<R>(),
                };
                return Err(VisitError::InconsistentResultType {
                    variant,
                    alternative: alternative.name,
                    expected: expected.name,
                    found,
                });
            }
        }

        let handlers = self
            .registrations
            .into_iter()
            .map(|registration| registration.handler)
            .collect();

        debug!(
            "Built dispatch table for variant `{}` over {} alternatives.",
            variant,
            table.len()
        );
        Ok(DynDispatch {
            handlers,
            table,
            result: canonical,
            _variant: PhantomData,
        })
    }
}

impl<'a, V: DynVariant> DispatchBuilder<'a, V, Box<dyn Any>> {
    /// Register the handler for alternative `T`, boxing its result.
    ///
    /// `O` is recorded as the declared result type. Every other handler of the set must be
    /// registered through `on_erased` with the same `O`.
    pub fn on_erased<T: 'static, O: 'static>(
        self,
        mut handler: impl FnMut(&mut T) -> O + 'a,
    ) -> Self {
        self.register(
            AlternativeType::of::<T>(),
            Some(AlternativeType::of::<O>()),
            Box::new(move |payload: &mut dyn Any| {
                Box::new(handler(downcast::<T>(payload))) as Box<dyn Any>
            }),
        )
    }
}

/// Validated handler set of variant `V`, indexed by discriminant.
pub struct DynDispatch<'a, V, R> {
    handlers: SmallVec<[ErasedHandler<'a, R>; 8]>,
    /// Discriminant -> index into `handlers`.
    table: SmallVec<[usize; 8]>,
    result: Option<AlternativeType>,
    _variant: PhantomData<fn(&mut V) -> R>,
}

impl<'a, V: DynVariant, R> DynDispatch<'a, V, R> {
    /// Invoke the handler of the live alternative of `variant`.
    #[inline]
    pub fn visit(&mut self, variant: &mut V) -> R {
        let handler = self.table[variant.discriminant()];
        (self.handlers[handler])(variant.payload_mut())
    }

    /// Result type shared by the erased handlers, if any were registered.
    ///
    /// Boxed results of [`DispatchBuilder::on_erased`] handlers downcast to this type.
    pub fn result_type(&self) -> Option<AlternativeType> {
        self.result
    }
}

impl<V, R> fmt::Debug for DynDispatch<'_, V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynDispatch")
            .field("variant", &type_name::<V>())
            .field("table", &self.table)
            .field("result", &self.result.map(|ty| ty.name))
            .finish()
    }
}

#[track_caller]
fn downcast<T: 'static>(payload: &mut dyn Any) -> &mut T {
    match payload.downcast_mut::<T>() {
        Some(value) => value,
        None => panic!(
            "dispatch table routed a payload that is not `{}` to its handler",
            type_name::<T>()
        ),
    }
}
