//! Hyvisit: table-driven visitation of closed tagged unions.
//!
//! A visit routes the live alternative of a variant to the one handler of a bundle that
//! accepts its type, and returns that handler's result. Everything that can go wrong is
//! decided before a value exists:
//!  - coverage: the bundle must accept every alternative type, exactly once;
//!  - uniformity: every handler must return the exact same type.
//!
//! Both properties are trait bounds on the dispatch impls generated by
//! `#[derive(Variant)]`, so an incomplete or inconsistent bundle is a build error rather
//! than a runtime fallback.
//!
//! Dispatch shape
//!  - Each `(bundle, variant)` type pair owns a `const` table of trampolines, one per
//!    alternative in declaration order (see [`dispatch`]).
//!  - A visit reads the discriminant, indexes the table and calls the trampoline. There is no
//!    type-matching cascade and no allocation.
//!  - The value category of the variant is preserved: [`visit`] lends `&T`, [`visit_mut`]
//!    lends `&mut T` and [`visit_owned`] moves `T` into the handler.
//!
//! Example
//! ```
//! use hyvisit::prelude::*;
//!
//! #[derive(Debug, Variant)]
//! enum Value {
//!     Int(i32),
//!     Double(f64),
//!     Text(String),
//! }
//!
//! let mut handlers = visitor! {
//!     |i: &i32| format!("int {i}"),
//!     |d: &mut f64| { *d *= 2.0; format!("double {d}") },
//!     |s: &String| format!("text {s}"),
//! };
//!
//! let mut value = Value::Double(1.5);
//! assert_eq!(visit_mut(&mut handlers, &mut value), "double 3");
//! assert!(matches!(value, Value::Double(d) if d == 3.0));
//!
//! value.emplace::<2>("hi".to_owned());
//! assert_eq!(value.visit_mut(&mut handlers), "text hi");
//! ```
//!
//! A bundle that misses an alternative does not build:
//! ```compile_fail
//! use hyvisit::prelude::*;
//!
//! #[derive(Variant)]
//! enum Shape {
//!     Circle(f64),
//!     Square(u32),
//!     Label(String),
//! }
//!
//! let mut handlers = visitor! {
//!     |r: &f64| 1,
//!     |s: &u32| 2,
//! };
//! visit(&mut handlers, &Shape::Circle(1.0));
//! ```
//!
//! Neither does a bundle whose handlers disagree on the result type:
//! ```compile_fail
//! use hyvisit::prelude::*;
//!
//! #[derive(Variant)]
//! enum Shape {
//!     Circle(f64),
//!     Square(u32),
//! }
//!
//! let mut handlers = visitor! {
//!     |r: &f64| 1u8,
//!     |s: &u32| "two",
//! };
//! visit(&mut handlers, &Shape::Square(2));
//! ```
//!
//! Nor one where two handlers claim the same alternative:
//! ```compile_fail
//! use hyvisit::prelude::*;
//!
//! let mut handlers = visitor! {
//!     |a: &i32| 1,
//!     |b: &i32| 2,
//! };
//! ```

// Lets the derive macros refer to `::hyvisit` from inside this crate as well.
extern crate self as hyvisit;

/// Trampolines and per-pair dispatch tables.
pub mod dispatch;
/// Runtime-checked dispatch for handler sets assembled at runtime.
#[cfg(feature = "dynamic")]
pub mod dynamic;
/// Handler traits, one per value category.
pub mod handler;
/// Variant traits and ready-made generic unions.
pub mod variant;
mod visit;

pub use hyvisit_derive::{Variant, visitor};
pub use variant::Variant;
pub use visit::{visit, visit_mut, visit_owned};

pub mod prelude {
    //! Convenient re-exports for end users.
    //!
    //! - `Variant` trait and derive, `visitor!` macro
    //! - Entry points `visit`, `visit_mut`, `visit_owned`
    //! - Handler traits and the generic `OneOfN` unions
    //! - Runtime-checked builder (feature `dynamic`)
    pub use crate::handler::{Handle, HandleMut, HandleOwned};
    pub use crate::variant::{
        Alternative, AlternativeType, DynVariant, OneOf1, OneOf2, OneOf3, OneOf4, OneOf5, OneOf6,
        OneOf7, OneOf8,
    };
    pub use crate::{Variant, visit, visit_mut, visit_owned, visitor};

    #[cfg(feature = "dynamic")]
    pub use crate::dynamic::{DispatchBuilder, DynDispatch, VisitError, VisitResult};
}
