//! Handler traits implemented by visitor bundles.
//!
//! A bundle covers a variant when it implements the trait matching the visit's value
//! category for every alternative type:
//!
//! | visit           | variant argument | handler trait      | handler receives |
//! |-----------------|------------------|--------------------|------------------|
//! | [`crate::visit`]       | `&V`      | [`Handle<T>`]      | `&T`             |
//! | [`crate::visit_mut`]   | `&mut V`  | [`HandleMut<T>`]   | `&mut T`         |
//! | [`crate::visit_owned`] | `V`       | [`HandleOwned<T>`] | `T`              |
//!
//! Handlers take `&mut self`, so a bundle can keep state and be reused across calls.
//! Trait coherence already guarantees at most one impl per `(bundle, T)`; the `visitor!`
//! macro reports duplicate closures before they reach that point.
//!
//! Example: a hand-written bundle
//! ```
//! use hyvisit::prelude::*;
//!
//! #[derive(Variant)]
//! enum Token {
//!     Number(i64),
//!     Word(String),
//! }
//!
//! #[derive(Default)]
//! struct Counter {
//!     numbers: usize,
//!     letters: usize,
//! }
//!
//! impl Handle<i64> for Counter {
//!     type Output = usize;
//!     fn handle(&mut self, _: &i64) -> usize {
//!         self.numbers += 1;
//!         self.numbers
//!     }
//! }
//!
//! impl Handle<String> for Counter {
//!     type Output = usize;
//!     fn handle(&mut self, word: &String) -> usize {
//!         self.letters += word.len();
//!         self.letters
//!     }
//! }
//!
//! let mut counter = Counter::default();
//! Token::Number(4).visit(&mut counter);
//! assert_eq!(Token::Word("abc".into()).visit(&mut counter), 3);
//! assert_eq!(counter.numbers, 1);
//! ```

/// Handler for alternative `T`, borrowed immutably.
#[diagnostic::on_unimplemented(
    message = "`{Self}` has no handler for alternative `{T}`",
    label = "no handler accepts `&{T}`",
    note = "a visitor must handle every alternative of the variant exactly once"
)]
pub trait Handle<T> {
    /// Result of the handler. Must be the same type for every alternative of a variant.
    type Output;

    /// Handle a shared reference to the live payload.
    fn handle(&mut self, value: &T) -> Self::Output;
}

/// Handler for alternative `T`, borrowed mutably.
#[diagnostic::on_unimplemented(
    message = "`{Self}` has no mutable handler for alternative `{T}`",
    label = "no handler accepts `&mut {T}`",
    note = "a visitor must handle every alternative of the variant exactly once"
)]
pub trait HandleMut<T> {
    /// Result of the handler. Must be the same type for every alternative of a variant.
    type Output;

    /// Handle a mutable reference to the live payload. Mutations are visible to the caller.
    fn handle_mut(&mut self, value: &mut T) -> Self::Output;
}

/// Handler for alternative `T`, taken by value.
#[diagnostic::on_unimplemented(
    message = "`{Self}` has no owning handler for alternative `{T}`",
    label = "no handler accepts `{T}` by value",
    note = "a visitor must handle every alternative of the variant exactly once"
)]
pub trait HandleOwned<T> {
    /// Result of the handler. Must be the same type for every alternative of a variant.
    type Output;

    /// Handle the payload moved out of the variant.
    fn handle_owned(&mut self, value: T) -> Self::Output;
}
