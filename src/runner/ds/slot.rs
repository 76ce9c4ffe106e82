use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::runner::ds::error::AttrErrorType;
use crate::runner::ds::instance::Instance;
use crate::runner::ds::lazy_cache;
use crate::runner::ds::value::Value;

/// Reads an attribute for an instance.
pub type GetterFn = Rc<dyn Fn(&mut Instance) -> Result<Value, AttrErrorType>>;
/// Writes an attribute for an instance.
pub type SetterFn = Rc<dyn Fn(&mut Instance, Value) -> Result<(), AttrErrorType>>;
/// Deletes an attribute for an instance.
pub type DeleterFn = Rc<dyn Fn(&mut Instance) -> Result<(), AttrErrorType>>;
/// Accepts a value or explains why it is rejected.
pub type ValidatorFn = Rc<dyn Fn(&Value) -> Result<(), String>>;
/// Produces the value of a lazily cached attribute.
pub type ComputeFn = Rc<dyn Fn(&Instance) -> Result<Value, AttrErrorType>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    DataDescriptor,
    NonDataDescriptor,
    PlainValue,
}

/// How a slot reads, writes and deletes its attribute.
pub enum SlotDescriptor {
    /// Shadows instance storage on reads.
    Data {
        getter: GetterFn,
        setter: Option<SetterFn>,
        deleter: Option<DeleterFn>,
    },
    /// Shadowed by instance storage on reads.
    NonData { getter: GetterFn },
    Plain { value: Value },
}

impl SlotDescriptor {
    pub fn kind(&self) -> SlotKind {
        match self {
            SlotDescriptor::Data { .. } => SlotKind::DataDescriptor,
            SlotDescriptor::NonData { .. } => SlotKind::NonDataDescriptor,
            SlotDescriptor::Plain { .. } => SlotKind::PlainValue,
        }
    }

    pub fn is_data_descriptor(&self) -> bool {
        self.kind() == SlotKind::DataDescriptor
    }
}

impl fmt::Debug for SlotDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotDescriptor::Data {
                setter, deleter, ..
            } => write!(
                f,
                "Data {{ setter: {}, deleter: {} }}",
                setter.is_some(),
                deleter.is_some()
            ),
            SlotDescriptor::NonData { .. } => write!(f, "NonData"),
            SlotDescriptor::Plain { value } => write!(f, "Plain({:?})", value),
        }
    }
}

/// A named attribute declared directly on one class. Immutable once registered.
#[derive(Debug)]
pub struct AttributeSlot {
    name: String,
    descriptor: SlotDescriptor,
}

impl AttributeSlot {
    pub fn new(name: String, descriptor: SlotDescriptor) -> Self {
        AttributeSlot { name, descriptor }
    }

    /// The scoped key this slot is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SlotKind {
        self.descriptor.kind()
    }

    pub fn descriptor(&self) -> &SlotDescriptor {
        &self.descriptor
    }
}

/// A per-instance field: a data descriptor backed by a key in the instance store.
pub struct FieldDecl {
    pub(crate) name: String,
    pub(crate) store: Option<String>,
    pub(crate) validator: Option<ValidatorFn>,
    pub(crate) default: Option<Value>,
}

impl FieldDecl {
    pub fn new<S: Into<String>>(name: S) -> Self {
        FieldDecl {
            name: name.into(),
            store: None,
            validator: None,
            default: None,
        }
    }

    /// Keep the value under `key` instead of the attribute's own name.
    pub fn with_store<S: Into<String>>(mut self, key: S) -> Self {
        self.store = Some(key.into());
        self
    }

    pub fn with_validator(mut self, validator: ValidatorFn) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Value read while the backing key is absent.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// A data descriptor whose value lives on the slot itself, so every instance sees it.
pub struct SharedDecl {
    pub(crate) name: String,
    pub(crate) validator: Option<ValidatorFn>,
    pub(crate) initial: Value,
}

impl SharedDecl {
    pub fn new<S: Into<String>>(name: S, initial: Value) -> Self {
        SharedDecl {
            name: name.into(),
            validator: None,
            initial,
        }
    }

    pub fn with_validator(mut self, validator: ValidatorFn) -> Self {
        self.validator = Some(validator);
        self
    }
}

/// A slot as written in a class declaration, before names are scoped to the class.
pub enum SlotDecl {
    Data {
        name: String,
        getter: GetterFn,
        setter: Option<SetterFn>,
        deleter: Option<DeleterFn>,
    },
    NonData {
        name: String,
        getter: GetterFn,
    },
    Plain {
        name: String,
        value: Value,
    },
    Lazy {
        name: String,
        compute: ComputeFn,
    },
    Field(FieldDecl),
    Shared(SharedDecl),
}

impl SlotDecl {
    pub fn data<S: Into<String>>(
        name: S,
        getter: GetterFn,
        setter: Option<SetterFn>,
        deleter: Option<DeleterFn>,
    ) -> Self {
        SlotDecl::Data {
            name: name.into(),
            getter,
            setter,
            deleter,
        }
    }

    pub fn non_data<S: Into<String>>(name: S, getter: GetterFn) -> Self {
        SlotDecl::NonData {
            name: name.into(),
            getter,
        }
    }

    pub fn plain<S: Into<String>, V: Into<Value>>(name: S, value: V) -> Self {
        SlotDecl::Plain {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn lazy<S: Into<String>>(name: S, compute: ComputeFn) -> Self {
        SlotDecl::Lazy {
            name: name.into(),
            compute,
        }
    }

    /// The name as written in the declaration.
    pub fn surface_name(&self) -> &str {
        match self {
            SlotDecl::Data { name, .. }
            | SlotDecl::NonData { name, .. }
            | SlotDecl::Plain { name, .. }
            | SlotDecl::Lazy { name, .. } => name,
            SlotDecl::Field(field) => &field.name,
            SlotDecl::Shared(shared) => &shared.name,
        }
    }

    /// Build the slot, scoping every declared name through `scope`.
    pub(crate) fn into_slot<F: Fn(&str) -> String>(self, scope: F) -> AttributeSlot {
        let key = scope(self.surface_name());
        let descriptor = match self {
            SlotDecl::Data {
                getter,
                setter,
                deleter,
                ..
            } => SlotDescriptor::Data {
                getter,
                setter,
                deleter,
            },
            SlotDecl::NonData { getter, .. } => SlotDescriptor::NonData { getter },
            SlotDecl::Plain { value, .. } => SlotDescriptor::Plain { value },
            SlotDecl::Lazy { compute, .. } => lazy_cache::lazy_descriptor(key.clone(), compute),
            SlotDecl::Field(field) => {
                let store_key = match &field.store {
                    Some(store) => scope(store),
                    None => key.clone(),
                };
                field_descriptor(key.clone(), store_key, field.validator, field.default)
            }
            SlotDecl::Shared(shared) => {
                shared_descriptor(key.clone(), shared.validator, shared.initial)
            }
        };
        AttributeSlot::new(key, descriptor)
    }
}

fn validate(
    name: &str,
    validator: &Option<ValidatorFn>,
    value: &Value,
) -> Result<(), AttrErrorType> {
    match validator {
        Some(check) => check(value).map_err(|reason| AttrErrorType::Validation {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

fn field_descriptor(
    name: String,
    store_key: String,
    validator: Option<ValidatorFn>,
    default: Option<Value>,
) -> SlotDescriptor {
    let get_key = store_key.clone();
    let set_key = store_key.clone();
    let delete_key = store_key;
    SlotDescriptor::Data {
        getter: Rc::new(move |instance: &mut Instance| -> Result<Value, AttrErrorType> {
            match instance.store().get(&get_key) {
                Some(value) => Ok(value.clone()),
                None => default
                    .clone()
                    .ok_or_else(|| AttrErrorType::NotFound(get_key.clone())),
            }
        }),
        setter: Some(Rc::new(
            move |instance: &mut Instance, value: Value| -> Result<(), AttrErrorType> {
                validate(&name, &validator, &value)?;
                instance.store_mut().insert(set_key.clone(), value);
                Ok(())
            },
        )),
        deleter: Some(Rc::new(move |instance: &mut Instance| -> Result<(), AttrErrorType> {
            match instance.store_mut().remove(&delete_key) {
                Some(_) => Ok(()),
                None => Err(AttrErrorType::NotFound(delete_key.clone())),
            }
        })),
    }
}

fn shared_descriptor(
    name: String,
    validator: Option<ValidatorFn>,
    initial: Value,
) -> SlotDescriptor {
    let cell = Rc::new(RefCell::new(initial));
    let read = Rc::clone(&cell);
    SlotDescriptor::Data {
        getter: Rc::new(move |_: &mut Instance| -> Result<Value, AttrErrorType> {
            Ok(read.borrow().clone())
        }),
        setter: Some(Rc::new(move |_: &mut Instance, value: Value| -> Result<(), AttrErrorType> {
            validate(&name, &validator, &value)?;
            *cell.borrow_mut() = value;
            Ok(())
        })),
        deleter: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ds::class::ClassId;

    fn one_digit() -> ValidatorFn {
        Rc::new(|value: &Value| match value.as_integer() {
            Some(0..=9) => Ok(()),
            _ => Err(format!("{} is not a single digit", value)),
        })
    }

    #[test]
    fn test_kinds() {
        let getter: GetterFn =
            Rc::new(|_: &mut Instance| -> Result<Value, AttrErrorType> { Ok(Value::None) });
        let data = SlotDecl::data("a", getter.clone(), None, None).into_slot(|n| n.to_string());
        let non_data = SlotDecl::non_data("b", getter).into_slot(|n| n.to_string());
        let plain = SlotDecl::plain("c", Value::Integer(1)).into_slot(|n| n.to_string());
        assert_eq!(data.kind(), SlotKind::DataDescriptor);
        assert_eq!(non_data.kind(), SlotKind::NonDataDescriptor);
        assert_eq!(plain.kind(), SlotKind::PlainValue);
    }

    #[test]
    fn test_field_keeps_previous_value_on_rejection() {
        let slot = SlotDecl::Field(
            FieldDecl::new("number")
                .with_validator(one_digit())
                .with_default(Value::Integer(0)),
        )
        .into_slot(|n| n.to_string());
        let mut instance = Instance::new(ClassId(0));
        if let SlotDescriptor::Data {
            getter,
            setter: Some(setter),
            ..
        } = slot.descriptor()
        {
            assert_eq!(getter(&mut instance), Ok(Value::Integer(0)));
            setter(&mut instance, Value::Integer(4)).unwrap();
            let err = setter(&mut instance, Value::Integer(15)).unwrap_err();
            assert!(matches!(err, AttrErrorType::Validation { .. }));
            assert_eq!(getter(&mut instance), Ok(Value::Integer(4)));
        } else {
            panic!("field must be a writable data descriptor");
        }
    }

    #[test]
    fn test_field_store_key_is_scoped() {
        let slot = SlotDecl::Field(FieldDecl::new("dd").with_store("__dd"))
            .into_slot(|n| crate::runner::ds::mangle::mangle("A", n));
        let mut instance = Instance::new(ClassId(0));
        if let SlotDescriptor::Data {
            setter: Some(setter),
            ..
        } = slot.descriptor()
        {
            setter(&mut instance, Value::str("v")).unwrap();
        }
        assert_eq!(instance.store().keys(), vec!["_A__dd"]);
    }
}
