//! Tests for lazily computed attributes.

extern crate attr_resolve;

mod engine_util;

use std::cell::Cell;
use std::rc::Rc;

use attr_resolve::runner::ds::error::AttrErrorType;
use attr_resolve::runner::ds::instance::Instance;
use attr_resolve::runner::ds::slot::{ComputeFn, SlotDecl, SlotKind};
use attr_resolve::runner::ds::value::Value;
use attr_resolve::runner::engine::ResolutionEngine;
use engine_util::counting_compute;
use pretty_assertions::assert_eq;

fn lazy_class(engine: &mut ResolutionEngine, compute: ComputeFn) -> Instance {
    let some = engine
        .register_class("Some", &[], vec![SlotDecl::lazy("long_fn", compute)])
        .unwrap();
    engine.create_instance(some).unwrap()
}

#[test]
fn test_computes_once_per_instance() {
    let calls = Rc::new(Cell::new(0));
    let mut engine = ResolutionEngine::new();
    let mut instance = lazy_class(&mut engine, counting_compute("Urgh!!", calls.clone()));

    for _ in 0..3 {
        assert_eq!(engine.get(&mut instance, "long_fn"), Ok(Value::str("Urgh!!")));
    }
    assert_eq!(calls.get(), 1);
    assert_eq!(instance.store().get("long_fn"), Some(&Value::str("Urgh!!")));
}

#[test]
fn test_each_instance_computes_its_own_value() {
    let calls = Rc::new(Cell::new(0));
    let mut engine = ResolutionEngine::new();
    let mut first = lazy_class(&mut engine, counting_compute("Urgh!!", calls.clone()));
    let id = first.class_id();
    let mut second = engine.create_instance(id).unwrap();

    engine.get(&mut first, "long_fn").unwrap();
    engine.get(&mut first, "long_fn").unwrap();
    engine.get(&mut second, "long_fn").unwrap();
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_deleting_the_cached_value_recomputes() {
    let calls = Rc::new(Cell::new(0));
    let mut engine = ResolutionEngine::new();
    let mut instance = lazy_class(&mut engine, counting_compute("Urgh!!", calls.clone()));

    engine.get(&mut instance, "long_fn").unwrap();
    engine.delete(&mut instance, "long_fn").unwrap();
    assert!(instance.store().is_empty());
    engine.get(&mut instance, "long_fn").unwrap();
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_assignment_replaces_the_cached_value() {
    let calls = Rc::new(Cell::new(0));
    let mut engine = ResolutionEngine::new();
    let mut instance = lazy_class(&mut engine, counting_compute("Urgh!!", calls.clone()));

    engine
        .set(&mut instance, "long_fn", Value::str("assigned"))
        .unwrap();
    assert_eq!(
        engine.get(&mut instance, "long_fn"),
        Ok(Value::str("assigned"))
    );
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_lazy_slot_is_a_non_data_descriptor() {
    let calls = Rc::new(Cell::new(0));
    let mut engine = ResolutionEngine::new();
    let instance = lazy_class(&mut engine, counting_compute("Urgh!!", calls));
    let class = engine.class(instance.class_id()).unwrap();
    assert_eq!(
        class.own_slot("long_fn").unwrap().kind(),
        SlotKind::NonDataDescriptor
    );
}

#[test]
fn test_failed_computation_is_not_cached() {
    let attempts = Rc::new(Cell::new(0));
    let counter = attempts.clone();
    let compute: ComputeFn = Rc::new(move |_: &Instance| -> Result<Value, AttrErrorType> {
        counter.set(counter.get() + 1);
        Err(AttrErrorType::NotFound("upstream".to_string()))
    });
    let mut engine = ResolutionEngine::new();
    let mut instance = lazy_class(&mut engine, compute);

    assert_eq!(
        engine.get(&mut instance, "long_fn"),
        Err(AttrErrorType::NotFound("upstream".to_string()))
    );
    assert!(engine.get(&mut instance, "long_fn").is_err());
    assert_eq!(attempts.get(), 2);
    assert!(instance.store().is_empty());
}

#[test]
fn test_private_lazy_attribute_caches_under_scoped_key() {
    let calls = Rc::new(Cell::new(0));
    let mut engine = ResolutionEngine::new();
    let some = engine
        .register_class(
            "Some",
            &[],
            vec![SlotDecl::lazy("__secret", counting_compute("hidden", calls.clone()))],
        )
        .unwrap();
    let mut instance = engine.create_instance(some).unwrap();
    assert_eq!(
        engine.get_in(some, &mut instance, "__secret"),
        Ok(Value::str("hidden"))
    );
    assert_eq!(instance.store().keys(), vec!["_Some__secret"]);
    engine.get(&mut instance, "_Some__secret").unwrap();
    assert_eq!(calls.get(), 1);
}
