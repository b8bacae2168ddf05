use std::cell::{Cell, RefCell};

use hyvisit::prelude::*;

#[derive(Debug, Clone, PartialEq, Variant)]
enum Shape {
    Circle(f64),
    Square(u32),
    Label(String),
}

/// Records which handler ran.
#[derive(Default)]
struct Recorder {
    calls: Vec<&'static str>,
}

impl Handle<f64> for Recorder {
    type Output = usize;
    fn handle(&mut self, _: &f64) -> usize {
        self.calls.push("circle");
        0
    }
}

impl Handle<u32> for Recorder {
    type Output = usize;
    fn handle(&mut self, _: &u32) -> usize {
        self.calls.push("square");
        1
    }
}

impl Handle<String> for Recorder {
    type Output = usize;
    fn handle(&mut self, _: &String) -> usize {
        self.calls.push("label");
        2
    }
}

#[test]
fn exactly_the_live_handler_runs() {
    let shapes = [
        Shape::Circle(1.0),
        Shape::Square(2),
        Shape::Label("three".into()),
    ];
    for (index, shape) in shapes.iter().enumerate() {
        let mut recorder = Recorder::default();
        assert_eq!(visit(&mut recorder, shape), index);
        assert_eq!(recorder.calls.len(), 1);
        assert_eq!(recorder.calls[0], ["circle", "square", "label"][index]);
    }
}

#[test]
fn closures_of_inactive_alternatives_are_never_called() {
    let circle = Cell::new(0);
    let square = Cell::new(0);
    let label = Cell::new(0);
    let mut handlers = visitor! {
        |_r: &f64| circle.set(circle.get() + 1),
        |_s: &u32| square.set(square.get() + 1),
        |_l: &String| label.set(label.get() + 1),
    };

    visit(&mut handlers, &Shape::Square(4));
    visit(&mut handlers, &Shape::Square(5));
    visit(&mut handlers, &Shape::Label("x".into()));

    assert_eq!(circle.get(), 0);
    assert_eq!(square.get(), 2);
    assert_eq!(label.get(), 1);
}

#[test]
fn mutation_reaches_the_caller_storage() {
    let mut handlers = visitor! {
        |r: &mut f64| *r *= 2.0,
        |s: &mut u32| *s *= 2,
        |l: &mut String| l.push_str(l.clone().as_str()),
    };

    let mut shape = Shape::Circle(1.25);
    visit_mut(&mut handlers, &mut shape);
    assert_eq!(shape, Shape::Circle(2.5));

    let mut shape = Shape::Label("ab".into());
    shape.visit_mut(&mut handlers);
    assert_eq!(shape, Shape::Label("abab".into()));
}

#[test]
fn visiting_never_changes_the_live_alternative() {
    let mut handlers = visitor! {
        |_r: &mut f64| (),
        |s: &mut u32| *s += 1,
        |_l: &mut String| (),
    };
    let mut shape = Shape::Square(0);
    for _ in 0..3 {
        visit_mut(&mut handlers, &mut shape);
        assert_eq!(shape.discriminant(), 1);
    }
    assert_eq!(shape, Shape::Square(3));
}

#[test]
fn fixed_literal_result_is_passed_through() {
    let mut handlers = visitor! {
        |_r: &f64| "same",
        |_s: &u32| "same",
        |_l: &String| "same",
    };
    for shape in [
        Shape::Circle(0.5),
        Shape::Square(9),
        Shape::Label(String::new()),
    ] {
        assert_eq!(visit(&mut handlers, &shape), "same");
    }
}

#[test]
fn repeated_visits_reuse_the_same_handler() {
    let mut recorder = Recorder::default();
    let shape = Shape::Circle(3.0);
    let first = shape.visit(&mut recorder);
    let second = shape.visit(&mut recorder);
    let third = shape.visit(&mut recorder);
    assert_eq!((first, second, third), (0, 0, 0));
    assert_eq!(recorder.calls, vec!["circle"; 3]);
}

#[test]
fn shared_handlers_also_serve_mutable_visits() {
    let mut handlers = visitor! {
        |r: &f64| r.to_string(),
        |s: &mut u32| {
            *s += 1;
            s.to_string()
        },
        |l: &String| l.to_uppercase(),
    };
    let mut shape = Shape::Square(41);
    assert_eq!(visit_mut(&mut handlers, &mut shape), "42");
    let mut shape = Shape::Label("loud".into());
    assert_eq!(visit_mut(&mut handlers, &mut shape), "LOUD");
}

#[test]
fn owned_visit_moves_the_payload() {
    let mut handlers = visitor! {
        |r: f64| vec![r.to_string()],
        |s: u32| vec![s.to_string(); s as usize],
        |l: String| -> Vec<String> { l.split(' ').map(str::to_owned).collect() },
    };
    assert_eq!(
        visit_owned(&mut handlers, Shape::Label("a b c".into())),
        vec!["a", "b", "c"]
    );
    assert_eq!(Shape::Square(2).visit_owned(&mut handlers), vec!["2", "2"]);
}

#[test]
fn borrowed_results_flow_through_dispatch() {
    let names = [String::from("round"), String::from("boxy"), String::from("text")];
    let mut handlers = visitor! {
        |_r: &f64| names[0].as_str(),
        |_s: &u32| names[1].as_str(),
        |_l: &String| names[2].as_str(),
    };
    let name: &str = visit(&mut handlers, &Shape::Square(1));
    assert!(std::ptr::eq(name, names[1].as_str()));
}

#[test]
fn mutation_through_a_returned_reference_is_visible_to_its_owner() {
    let int_log = RefCell::new(String::new());
    let text_log = RefCell::new(String::new());
    let mut handlers = visitor! {
        |_i: &i32| &int_log,
        |_s: &String| &text_log,
    };

    let v: OneOf2<i32, String> = OneOf2::B("payload".into());
    let log: &RefCell<String> = visit(&mut handlers, &v);
    log.borrow_mut().push_str("touched");

    assert_eq!(text_log.borrow().as_str(), "touched");
    assert!(int_log.borrow().is_empty());
}

#[test]
fn a_single_generic_handler_covers_every_alternative() {
    struct Debugger;

    impl<T: std::fmt::Debug> Handle<T> for Debugger {
        type Output = String;
        fn handle(&mut self, value: &T) -> String {
            format!("{value:?}")
        }
    }

    let v: OneOf3<u8, &str, Option<bool>> = OneOf3::C(Some(true));
    assert_eq!(visit(&mut Debugger, &v), "Some(true)");
    assert_eq!(OneOf3::<u8, &str, Option<bool>>::B("q").visit(&mut Debugger), "\"q\"");
}

#[test]
fn elided_lifetimes_in_alternatives_are_accepted() {
    let v: OneOf2<&str, (u8, &str)> = OneOf2::B((3, "abc"));
    let mut handlers = visitor! {
        |s: &&str| s.len(),
        |pair: &(u8, &str)| pair.0 as usize + pair.1.len(),
    };
    assert_eq!(visit(&mut handlers, &v), 6);
    assert_eq!(visit(&mut handlers, &OneOf2::<&str, (u8, &str)>::A("four")), 4);
}

#[test]
fn generic_functions_visit_through_a_handler_type() {
    struct Show;

    impl<T: std::fmt::Debug> Handle<T> for Show {
        type Output = String;
        fn handle(&mut self, value: &T) -> String {
            format!("{value:?}")
        }
    }

    fn show<T: std::fmt::Debug>(v: &OneOf2<T, u8>) -> String {
        visit(&mut Show, v)
    }

    assert_eq!(show(&OneOf2::<&str, u8>::A("left")), "\"left\"");
    assert_eq!(show(&OneOf2::<Vec<i8>, u8>::B(9)), "9");
}
