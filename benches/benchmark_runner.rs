/// Benchmark runner for attribute resolution.
///
/// Times the hot paths of `ResolutionEngine::get` and the script interpreter.
extern crate attr_resolve;

use attr_resolve::runner::ds::class::ClassId;
use attr_resolve::runner::ds::instance::Instance;
use attr_resolve::runner::ds::slot::{FieldDecl, SlotDecl};
use attr_resolve::runner::ds::value::Value;
use attr_resolve::runner::engine::ResolutionEngine;
use attr_resolve::runner::eval::Interpreter;
use attr_resolve::runner::plugin::registry::NativeRegistry;
use std::time::{Duration, Instant};

const DEPTH: usize = 32;

/// Run `body` `iterations` times and return the elapsed time.
fn run_benchmark<F: FnMut()>(iterations: u32, mut body: F) -> Duration {
    let start = Instant::now();
    for _ in 0..iterations {
        body();
    }
    start.elapsed()
}

/// A single-inheritance chain `C0 <- C1 <- ... <- C{DEPTH-1}` with a plain value on the
/// root and a lazy attribute and a field on the leaf.
fn build_engine() -> (ResolutionEngine, ClassId) {
    let natives = NativeRegistry::with_core();
    let mut engine = ResolutionEngine::new();
    let mut parent = engine
        .register_class("C0", &[], vec![SlotDecl::plain("root_value", 7i64)])
        .expect("register root");
    for depth in 1..DEPTH {
        let mut slots = vec![];
        if depth == DEPTH - 1 {
            slots.push(SlotDecl::Field(
                FieldDecl::new("number")
                    .with_validator(natives.validator("one_digit").expect("one_digit"))
                    .with_default(Value::Integer(0)),
            ));
            slots.push(SlotDecl::lazy(
                "long_fn",
                natives.compute("slow_greeting").expect("slow_greeting"),
            ));
        }
        parent = engine
            .register_class(&format!("C{}", depth), &[parent], slots)
            .expect("register chain");
    }
    (engine, parent)
}

const BENCH_SCRIPT: &str = r#"
class Base { nd = nondata(get: non_data_greeting); }
class NumericalC(Base) { number = field(check: one_digit, default: 0); }
let c = new NumericalC;
c.number = 4;
print c.number;
print c.nd;
try c.number = 15;
"#;

fn main() {
    println!("=======================================================");
    println!("  attr-resolve - Resolution Benchmarks");
    println!("=======================================================\n");

    let (engine, leaf) = build_engine();
    let mut instance: Instance = engine.create_instance(leaf).expect("instance");
    engine
        .set(&mut instance, "number", Value::Integer(4))
        .expect("set number");
    engine.get(&mut instance, "long_fn").expect("warm lazy");

    let mut benchmarks: Vec<(&str, u32, Duration)> = vec![];

    benchmarks.push((
        "Data descriptor get",
        100_000,
        run_benchmark(100_000, || {
            let _ = engine.get(&mut instance, "number");
        }),
    ));
    benchmarks.push((
        "Cached lazy get",
        100_000,
        run_benchmark(100_000, || {
            let _ = engine.get(&mut instance, "long_fn");
        }),
    ));
    benchmarks.push((
        "Plain value, deep MRO",
        100_000,
        run_benchmark(100_000, || {
            let _ = engine.get(&mut instance, "root_value");
        }),
    ));
    benchmarks.push((
        "Missing attribute",
        100_000,
        run_benchmark(100_000, || {
            let _ = engine.get(&mut instance, "missing");
        }),
    ));
    benchmarks.push((
        "Validated set",
        100_000,
        run_benchmark(100_000, || {
            let _ = engine.set(&mut instance, "number", Value::Integer(5));
        }),
    ));
    benchmarks.push((
        "Parse + run script",
        1_000,
        run_benchmark(1_000, || {
            let mut interpreter = Interpreter::new();
            let _ = interpreter.run_source(BENCH_SCRIPT);
        }),
    ));

    println!("{:<30} {:>10} {:>14} {:>12}", "Benchmark", "Iterations", "Total", "Per op");
    println!("{}", "-".repeat(70));
    for (name, iterations, duration) in &benchmarks {
        println!(
            "{:<30} {:>10} {:>12.2?} {:>10.2?}",
            name,
            iterations,
            duration,
            *duration / *iterations
        );
    }

    // Verify correctness
    println!("\n=======================================================");
    println!("  Correctness Verification");
    println!("=======================================================\n");

    let verifications: Vec<(&str, &str, Value)> = vec![
        ("number", "number", Value::Integer(5)),
        ("long_fn", "long_fn", Value::str("Urgh!!")),
        ("root_value", "root_value", Value::Integer(7)),
    ];
    for (label, name, expected) in verifications {
        let actual = engine.get(&mut instance, name);
        let status = if actual.as_ref() == Ok(&expected) { "✓" } else { "✗" };
        println!("{:<20} {:>12} {:>4}", label, expected, status);
    }
}
