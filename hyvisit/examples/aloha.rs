use clap::Parser;
use hyvisit::prelude::*;

/// Visit an int, a float, a double and a text value in turn, printing a tagged line
/// for each and the tag returned by its handler
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Number of times to cycle through the four alternatives
    #[arg(short, long, default_value_t = 1)]
    pub rounds: usize,
}

fn main() {
    let args = Args::parse();

    let mut handlers = visitor! {
        |i: &i32| {
            println!("Int: {i}");
            "int"
        },
        |f: &f32| {
            println!("Float: {f}");
            "float"
        },
        |d: &mut f64| {
            println!("Double: {d}");
            *d *= 2.0;
            "double"
        },
        |s: &String| {
            println!("String: {s}");
            "text"
        },
    };

    let mut value: OneOf4<i32, f32, f64, String> = OneOf4::A(0);
    for _ in 0..args.rounds {
        for index in 0..OneOf4::<i32, f32, f64, String>::COUNT {
            match index {
                0 => value.emplace::<0>(12),
                1 => value.emplace::<1>(3.2),
                2 => value.emplace::<2>(10.0),
                _ => value.emplace::<3>("Aloha".to_owned()),
            }

            let tag = visit_mut(&mut handlers, &mut value);
            if let OneOf4::C(double) = value {
                println!("Double is {double} now");
            }
            println!("Return: {tag}");
        }
    }
}
