//! Lazily computed attributes.
//!
//! A lazy attribute is a non-data descriptor: its getter computes the value, writes it into
//! the instance store under the attribute's own key and returns it. Instance storage shadows
//! non-data descriptors on reads, so every later read is answered from the store and the
//! compute function is never invoked again for that instance. Declared as a data descriptor
//! the getter would run on every read and the cached value would never be observed.

use std::rc::Rc;

use tracing::debug;

use crate::runner::ds::error::AttrErrorType;
use crate::runner::ds::instance::Instance;
use crate::runner::ds::slot::{ComputeFn, SlotDescriptor};
use crate::runner::ds::value::Value;

pub(crate) fn lazy_descriptor(key: String, compute: ComputeFn) -> SlotDescriptor {
    SlotDescriptor::NonData {
        getter: Rc::new(move |instance: &mut Instance| -> Result<Value, AttrErrorType> {
            debug!(attribute = %key, instance = %instance.id(), "materializing lazy attribute");
            let value = compute(&*instance)?;
            instance.store_mut().insert(key.clone(), value.clone());
            Ok(value)
        }),
    }
}
