//! The four-alternative walkthrough: an int, a float, a double and a text value visited in
//! turn by one bundle that logs a tagged line and returns a short type tag.
use std::cell::RefCell;

use hyvisit::prelude::*;

type Value = OneOf4<i32, f32, f64, String>;

#[test]
fn tagged_walkthrough_with_closure_bundle() {
    let lines = RefCell::new(Vec::new());
    let mut handlers = visitor! {
        |i: &i32| {
            lines.borrow_mut().push(format!("Int: {i}"));
            "int"
        },
        |f: &f32| {
            lines.borrow_mut().push(format!("Float: {f}"));
            "float"
        },
        |d: &mut f64| {
            lines.borrow_mut().push(format!("Double: {d}"));
            *d *= 2.0;
            "double"
        },
        |s: &String| {
            lines.borrow_mut().push(format!("String: {s}"));
            "text"
        },
    };

    let mut v: Value = OneOf4::A(0);
    let mut tags = Vec::new();
    for round in 0..4 {
        match round {
            0 => v.emplace::<0>(12),
            1 => v.emplace::<1>(3.2),
            2 => v.emplace::<2>(10.0),
            _ => v.emplace::<3>("Aloha".to_owned()),
        }

        tags.push(visit_mut(&mut handlers, &mut v));
        if round == 2 {
            assert_eq!(v, OneOf4::C(20.0));
        }
    }

    assert_eq!(
        *lines.borrow(),
        vec!["Int: 12", "Float: 3.2", "Double: 10", "String: Aloha"]
    );
    assert_eq!(tags, vec!["int", "float", "double", "text"]);
}

/// The same walkthrough with an explicit dispatch object instead of closures.
#[derive(Default)]
struct Tagger {
    lines: Vec<String>,
}

impl HandleMut<i32> for Tagger {
    type Output = &'static str;
    fn handle_mut(&mut self, value: &mut i32) -> &'static str {
        self.lines.push(format!("Int: {value}"));
        "int"
    }
}

impl HandleMut<f32> for Tagger {
    type Output = &'static str;
    fn handle_mut(&mut self, value: &mut f32) -> &'static str {
        self.lines.push(format!("Float: {value}"));
        "float"
    }
}

impl HandleMut<f64> for Tagger {
    type Output = &'static str;
    fn handle_mut(&mut self, value: &mut f64) -> &'static str {
        self.lines.push(format!("Double: {value}"));
        *value *= 2.0;
        "double"
    }
}

impl HandleMut<String> for Tagger {
    type Output = &'static str;
    fn handle_mut(&mut self, value: &mut String) -> &'static str {
        self.lines.push(format!("String: {value}"));
        "text"
    }
}

#[derive(Debug, PartialEq, Variant)]
enum Sample {
    Int(i32),
    Float(f32),
    Double(f64),
    Text(String),
}

#[test]
fn tagged_walkthrough_with_dispatch_object() {
    let mut tagger = Tagger::default();
    let mut samples = [
        Sample::Int(12),
        Sample::Float(3.2),
        Sample::Double(10.0),
        Sample::Text("Aloha".into()),
    ];

    let tags: Vec<_> = samples
        .iter_mut()
        .map(|sample| sample.visit_mut(&mut tagger))
        .collect();

    assert_eq!(tags, ["int", "float", "double", "text"]);
    assert_eq!(
        tagger.lines,
        ["Int: 12", "Float: 3.2", "Double: 10", "String: Aloha"]
    );
    assert_eq!(samples[2], Sample::Double(20.0));
}
