#![allow(dead_code)]

extern crate attr_resolve;

use std::cell::Cell;
use std::rc::Rc;

use attr_resolve::runner::ds::error::AttrErrorType;
use attr_resolve::runner::ds::instance::Instance;
use attr_resolve::runner::ds::slot::{ComputeFn, GetterFn, SetterFn, ValidatorFn};
use attr_resolve::runner::ds::value::Value;

/// Getter that always answers `value`.
pub fn constant(value: &str) -> GetterFn {
    let value = Value::str(value);
    Rc::new(move |_: &mut Instance| -> Result<Value, AttrErrorType> { Ok(value.clone()) })
}

/// Getter that always answers `value` and counts its invocations.
pub fn counting_constant(value: &str, calls: Rc<Cell<u32>>) -> GetterFn {
    let value = Value::str(value);
    Rc::new(move |_: &mut Instance| -> Result<Value, AttrErrorType> {
        calls.set(calls.get() + 1);
        Ok(value.clone())
    })
}

/// Getter that reads `key` from the instance store.
pub fn read_store(key: &str) -> GetterFn {
    let key = key.to_string();
    Rc::new(move |instance: &mut Instance| -> Result<Value, AttrErrorType> {
        instance
            .store()
            .get(&key)
            .cloned()
            .ok_or_else(|| AttrErrorType::NotFound(key.clone()))
    })
}

/// Setter that writes to `key` in the instance store.
pub fn write_store(key: &str) -> SetterFn {
    let key = key.to_string();
    Rc::new(
        move |instance: &mut Instance, value: Value| -> Result<(), AttrErrorType> {
            instance.store_mut().insert(key.clone(), value);
            Ok(())
        },
    )
}

pub fn one_digit() -> ValidatorFn {
    Rc::new(attr_resolve::runner::std_lib::digits::one_digit)
}

/// Compute function answering `value` and counting its invocations.
pub fn counting_compute(value: &str, calls: Rc<Cell<u32>>) -> ComputeFn {
    let value = Value::str(value);
    Rc::new(move |_: &Instance| -> Result<Value, AttrErrorType> {
        calls.set(calls.get() + 1);
        Ok(value.clone())
    })
}
