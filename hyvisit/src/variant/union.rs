//! Generic unions over up to eight alternatives.
//!
//! `OneOfN<A, B, ...>` plays the part of a standard-library variant: the alternatives are the
//! type parameters, in order, and the enum variant carrying each one is named after it.
//! [`Variant::ALTERNATIVES`] therefore lists the parameter names (`"A"`, `"B"`, ...).
//! Distinctness of the alternatives cannot be checked for type parameters; instantiating
//! the same type twice still dispatches by index, so both positions reach the same handler.
use strum::EnumIs;

use crate::Variant;

macro_rules! one_of {
    ($(#[$meta:meta])* $name:ident { $($alt:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIs, Variant)]
        pub enum $name<$($alt),+> {
            $(
                #[doc = concat!("Alternative `", stringify!($alt), "`.")]
                $alt($alt),
            )+
        }
    };
}

one_of! {
    /// Union with a single alternative.
    OneOf1 { A }
}
one_of! {
    /// Union over two alternatives.
    OneOf2 { A, B }
}
one_of! {
    /// Union over three alternatives.
    OneOf3 { A, B, C }
}
one_of! {
    /// Union over four alternatives.
    OneOf4 { A, B, C, D }
}
one_of! {
    /// Union over five alternatives.
    OneOf5 { A, B, C, D, E }
}
one_of! {
    /// Union over six alternatives.
    OneOf6 { A, B, C, D, E, F }
}
one_of! {
    /// Union over seven alternatives.
    OneOf7 { A, B, C, D, E, F, G }
}
one_of! {
    /// Union over eight alternatives.
    OneOf8 { A, B, C, D, E, F, G, H }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Alternative;

    #[test]
    fn discriminant_follows_declaration_order() {
        let values: [OneOf3<u8, char, &str>; 3] =
            [OneOf3::A(1), OneOf3::B('x'), OneOf3::C("three")];
        let indices: Vec<_> = values.iter().map(Variant::discriminant).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(<OneOf3<u8, char, &str> as Variant>::COUNT, 3);
        assert_eq!(<OneOf3<u8, char, &str>>::ALTERNATIVES, &["A", "B", "C"]);
    }

    #[test]
    fn strum_predicates_track_the_live_alternative() {
        let mut v: OneOf2<i32, String> = OneOf2::A(3);
        assert!(v.is_a());
        v.emplace::<1>("now a string".to_owned());
        assert!(v.is_b());
        assert!(v.holds::<1>());
        assert_eq!(v.alternative_name(), "B");
    }

    #[test]
    fn checked_access_rejects_the_other_alternatives() {
        let mut v = <OneOf2<i32, f64> as Alternative<1>>::from_alternative(2.5);
        assert_eq!(<OneOf2<i32, f64> as Alternative<0>>::try_get(&v), None);
        assert_eq!(<OneOf2<i32, f64> as Alternative<1>>::try_get(&v), Some(&2.5));
        *<OneOf2<i32, f64> as Alternative<1>>::get_mut(&mut v) += 1.0;
        assert_eq!(v, OneOf2::B(3.5));
        let back = <OneOf2<i32, f64> as Alternative<0>>::try_into_alternative(v);
        assert_eq!(back, Err(OneOf2::B(3.5)));
    }

    #[test]
    #[should_panic(expected = "alternative 0 was requested but alternative 1 is live")]
    fn unchecked_access_panics_on_mismatch() {
        let v: OneOf2<i32, f64> = OneOf2::B(1.0);
        let _ = <OneOf2<i32, f64> as Alternative<0>>::get(&v);
    }
}
