use crate::dispatch::{Visit, VisitMut, VisitOwned};

/// Invoke the handler of `handlers` matching the live alternative of `variant`.
///
/// Exactly one handler runs; the handlers of the other alternatives are never evaluated.
/// Visiting does not change which alternative is live.
///
/// ```
/// use hyvisit::prelude::*;
///
/// let v: OneOf2<u32, &str> = OneOf2::B("seven");
/// let mut handlers = visitor! {
///     |n: &u32| *n as usize,
///     |s: &&str| s.len(),
/// };
/// assert_eq!(visit(&mut handlers, &v), 5);
/// ```
#[inline]
pub fn visit<V, H>(handlers: &mut H, variant: &V) -> <V as Visit<H>>::Output
where
    V: Visit<H>,
{
    let table = <V as Visit<H>>::TABLE;
    let table = table.as_ref();
    debug_assert_eq!(table.len(), V::COUNT);
    table[variant.discriminant()](handlers, variant)
}

/// Invoke the handler of `handlers` matching the live alternative of `variant`, lending it
/// mutably.
///
/// Mutations performed by the handler land in the caller's variant storage.
#[inline]
pub fn visit_mut<V, H>(handlers: &mut H, variant: &mut V) -> <V as VisitMut<H>>::Output
where
    V: VisitMut<H>,
{
    let table = <V as VisitMut<H>>::TABLE;
    let table = table.as_ref();
    debug_assert_eq!(table.len(), V::COUNT);
    table[variant.discriminant()](handlers, variant)
}

/// Move the live alternative of `variant` into the matching handler of `handlers`.
#[inline]
pub fn visit_owned<V, H>(handlers: &mut H, variant: V) -> <V as VisitOwned<H>>::Output
where
    V: VisitOwned<H>,
{
    let table = <V as VisitOwned<H>>::TABLE;
    let table = table.as_ref();
    debug_assert_eq!(table.len(), V::COUNT);
    let index = variant.discriminant();
    table[index](handlers, variant)
}
