//! Lowering of parsed class declarations into engine registrations.
//!
//! Native names are resolved against a [`NativeRegistry`]; base names against the classes
//! already registered with the engine. Names are passed through unscoped, the engine
//! applies private-name mangling when it registers the class.

use std::collections::HashMap;

use tracing::trace;

use crate::parser::ast::{
    ArgumentData, ArgumentValue, ClassDeclData, DescriptorKind, HookKind, LiteralData,
    LiteralType, MemberType, SlotValueType,
};
use crate::runner::ds::class::ClassDecl;
use crate::runner::ds::slot::{FieldDecl, SharedDecl, SlotDecl};
use crate::runner::ds::value::Value;
use crate::runner::engine::ResolutionEngine;
use crate::runner::plugin::registry::NativeRegistry;
use crate::runner::plugin::types::NativeKind;

use super::types::EvalError;

pub fn literal_value(literal: &LiteralData) -> Value {
    match &literal.value {
        LiteralType::NoneLiteral => Value::None,
        LiteralType::BooleanLiteral(b) => Value::Boolean(*b),
        LiteralType::IntegerLiteral(i) => Value::Integer(*i),
        LiteralType::FloatLiteral(f) => Value::Float(*f),
        LiteralType::StringLiteral(s) => Value::Str(s.clone()),
    }
}

/// Turn a parsed class declaration into a [`ClassDecl`] ready for registration.
pub fn lower_class(
    class: &ClassDeclData,
    engine: &ResolutionEngine,
    natives: &NativeRegistry,
) -> Result<ClassDecl, EvalError> {
    let class_name = class.name.name.as_str();
    let mut bases = Vec::with_capacity(class.bases.len());
    for base in &class.bases {
        bases.push(engine.lookup_class(&base.name)?);
    }

    let mut decl = ClassDecl::new(class_name).with_bases(bases);
    let mut intercept_declared = false;
    let mut fallback_declared = false;
    for member in &class.members {
        match member {
            MemberType::Hook { kind, native, .. } => {
                let declared = match kind {
                    HookKind::Intercept => &mut intercept_declared,
                    HookKind::Fallback => &mut fallback_declared,
                };
                if *declared {
                    return Err(EvalError::InvalidDeclaration {
                        class: class_name.to_string(),
                        slot: hook_keyword(*kind).to_string(),
                        reason: "hook declared twice".to_string(),
                    });
                }
                *declared = true;
                decl = match kind {
                    HookKind::Intercept => decl.with_intercept(
                        natives
                            .intercept(&native.name)
                            .ok_or_else(|| unknown(NativeKind::Intercept, &native.name))?,
                    ),
                    HookKind::Fallback => decl.with_fallback(
                        natives
                            .fallback(&native.name)
                            .ok_or_else(|| unknown(NativeKind::Fallback, &native.name))?,
                    ),
                };
            }
            MemberType::Slot { name, value, .. } => {
                let slot = match value {
                    SlotValueType::Literal(literal) => {
                        SlotDecl::plain(name.name.as_str(), literal_value(literal))
                    }
                    SlotValueType::Descriptor {
                        kind, arguments, ..
                    } => {
                        let mut args = Arguments::new(class_name, &name.name, natives, arguments)?;
                        let slot = lower_descriptor(*kind, &name.name, &mut args, natives)?;
                        args.finish(*kind)?;
                        slot
                    }
                };
                trace!(class = %class_name, slot = %name.name, "lowered slot");
                decl = decl.with_slot(slot);
            }
        }
    }
    Ok(decl)
}

fn lower_descriptor(
    kind: DescriptorKind,
    name: &str,
    args: &mut Arguments<'_>,
    natives: &NativeRegistry,
) -> Result<SlotDecl, EvalError> {
    Ok(match kind {
        DescriptorKind::Data => {
            let getter = args.required_native("get", NativeKind::Getter, |n| {
                natives.getter(n)
            })?;
            let setter = args.native("set", NativeKind::Setter, |n| natives.setter(n))?;
            let deleter = args.native("delete", NativeKind::Deleter, |n| natives.deleter(n))?;
            SlotDecl::data(name, getter, setter, deleter)
        }
        DescriptorKind::NonData => {
            let getter = args.required_native("get", NativeKind::Getter, |n| {
                natives.getter(n)
            })?;
            SlotDecl::non_data(name, getter)
        }
        DescriptorKind::Lazy => {
            let compute = args.required_native("compute", NativeKind::Compute, |n| {
                natives.compute(n)
            })?;
            SlotDecl::lazy(name, compute)
        }
        DescriptorKind::Field => {
            let mut field = FieldDecl::new(name);
            if let Some(store) = args.name_or_string("store")? {
                field = field.with_store(store);
            }
            if let Some(validator) =
                args.native("check", NativeKind::Validator, |n| natives.validator(n))?
            {
                field = field.with_validator(validator);
            }
            if let Some(default) = args.literal("default")? {
                field = field.with_default(default);
            }
            SlotDecl::Field(field)
        }
        DescriptorKind::Shared => {
            let initial = match args.literal("initial")? {
                Some(initial) => initial,
                None => return Err(args.invalid("missing required argument 'initial'")),
            };
            let mut shared = SharedDecl::new(name, initial);
            if let Some(validator) =
                args.native("check", NativeKind::Validator, |n| natives.validator(n))?
            {
                shared = shared.with_validator(validator);
            }
            SlotDecl::Shared(shared)
        }
    })
}

fn hook_keyword(kind: HookKind) -> &'static str {
    match kind {
        HookKind::Intercept => "intercept",
        HookKind::Fallback => "fallback",
    }
}

fn unknown(kind: NativeKind, name: &str) -> EvalError {
    EvalError::UnknownNative {
        kind,
        name: name.to_string(),
    }
}

/// Descriptor arguments, consumed one by one; whatever is left over is unknown.
struct Arguments<'a> {
    class: &'a str,
    slot: &'a str,
    natives: &'a NativeRegistry,
    values: HashMap<&'a str, &'a ArgumentValue>,
}

impl<'a> Arguments<'a> {
    fn new(
        class: &'a str,
        slot: &'a str,
        natives: &'a NativeRegistry,
        arguments: &'a [ArgumentData],
    ) -> Result<Self, EvalError> {
        let mut args = Arguments {
            class,
            slot,
            natives,
            values: HashMap::new(),
        };
        for argument in arguments {
            let key = argument.name.name.as_str();
            if args.values.insert(key, &argument.value).is_some() {
                return Err(args.invalid(&format!("argument '{}' given twice", key)));
            }
        }
        Ok(args)
    }

    fn invalid(&self, reason: &str) -> EvalError {
        EvalError::InvalidDeclaration {
            class: self.class.to_string(),
            slot: self.slot.to_string(),
            reason: reason.to_string(),
        }
    }

    fn native<T, F>(&mut self, key: &str, kind: NativeKind, find: F) -> Result<Option<T>, EvalError>
    where
        F: Fn(&str) -> Option<T>,
    {
        match self.values.remove(key) {
            None => Ok(None),
            Some(ArgumentValue::Identifier(native)) => match find(&native.name) {
                Some(f) => Ok(Some(f)),
                None => match self.natives.kind_of(&native.name) {
                    Some(actual) => Err(self.invalid(&format!(
                        "'{}' is a {}, not a {}",
                        native.name, actual, kind
                    ))),
                    None => Err(unknown(kind, &native.name)),
                },
            },
            Some(ArgumentValue::Literal(_)) => {
                Err(self.invalid(&format!("'{}' expects the name of a {}", key, kind)))
            }
        }
    }

    fn required_native<T, F>(&mut self, key: &str, kind: NativeKind, find: F) -> Result<T, EvalError>
    where
        F: Fn(&str) -> Option<T>,
    {
        match self.native(key, kind, find)? {
            Some(f) => Ok(f),
            None => Err(self.invalid(&format!("missing required argument '{}'", key))),
        }
    }

    fn literal(&mut self, key: &str) -> Result<Option<Value>, EvalError> {
        match self.values.remove(key) {
            None => Ok(None),
            Some(ArgumentValue::Literal(literal)) => Ok(Some(literal_value(literal))),
            Some(ArgumentValue::Identifier(_)) => {
                Err(self.invalid(&format!("'{}' expects a literal", key)))
            }
        }
    }

    /// A key name, written bare (`store: _number`) or quoted (`store: '_number'`).
    fn name_or_string(&mut self, key: &str) -> Result<Option<String>, EvalError> {
        match self.values.remove(key) {
            None => Ok(None),
            Some(ArgumentValue::Identifier(name)) => Ok(Some(name.name.clone())),
            Some(ArgumentValue::Literal(LiteralData {
                value: LiteralType::StringLiteral(s),
                ..
            })) => Ok(Some(s.clone())),
            Some(ArgumentValue::Literal(_)) => {
                Err(self.invalid(&format!("'{}' expects a key name", key)))
            }
        }
    }

    fn finish(self, kind: DescriptorKind) -> Result<(), EvalError> {
        let mut leftover: Vec<&str> = self.values.keys().copied().collect();
        if leftover.is_empty() {
            return Ok(());
        }
        leftover.sort();
        Err(self.invalid(&format!(
            "unknown argument '{}' for {}",
            leftover[0],
            kind.keyword()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::ItemType;
    use crate::parser::parse_to_ast;
    use crate::runner::ds::error::AttrErrorType;

    fn lower_source(source: &str, engine: &ResolutionEngine) -> Result<ClassDecl, EvalError> {
        let program = parse_to_ast(source).unwrap();
        match &program.body[0] {
            ItemType::Class(class) => lower_class(class, engine, &NativeRegistry::with_core()),
            other => panic!("expected a class, got {:?}", other),
        }
    }

    fn reason_of(result: Result<ClassDecl, EvalError>) -> String {
        match result {
            Err(EvalError::InvalidDeclaration { reason, .. }) => reason,
            Err(other) => panic!("unexpected error {}", other),
            Ok(decl) => panic!("{} lowered without error", decl.name()),
        }
    }

    #[test]
    fn test_lowers_every_descriptor_kind() {
        let engine = ResolutionEngine::new();
        let decl = lower_source(
            "class A {
                x = 1;
                atr = data(get: verbose_eighty);
                nd = nondata(get: non_data_greeting);
                long_fn = lazy(compute: slow_greeting);
                number = field(check: one_digit, default: 0, store: _number);
                counter = shared(initial: 0, check: one_digit);
                fallback: fallback_dd_nd;
            }",
            &engine,
        )
        .unwrap();
        assert_eq!(decl.name(), "A");
    }

    #[test]
    fn test_unknown_native() {
        let engine = ResolutionEngine::new();
        match lower_source("class A { x = data(get: nothing_here); }", &engine) {
            Err(EvalError::UnknownNative { kind, name }) => {
                assert_eq!(kind, NativeKind::Getter);
                assert_eq!(name, "nothing_here");
            }
            other => panic!("unexpected {:?}", other.map(|d| d.name().to_string())),
        }
    }

    #[test]
    fn test_native_of_the_wrong_kind() {
        let engine = ResolutionEngine::new();
        let reason = reason_of(lower_source("class A { x = data(get: one_digit); }", &engine));
        assert_eq!(reason, "'one_digit' is a validator, not a getter");
    }

    #[test]
    fn test_argument_errors() {
        let engine = ResolutionEngine::new();
        assert_eq!(
            reason_of(lower_source("class A { x = nondata(); }", &engine)),
            "missing required argument 'get'"
        );
        assert_eq!(
            reason_of(lower_source(
                "class A { x = field(default: 1, default: 2); }",
                &engine
            )),
            "argument 'default' given twice"
        );
        assert_eq!(
            reason_of(lower_source("class A { x = field(colour: 1); }", &engine)),
            "unknown argument 'colour' for field"
        );
        assert_eq!(
            reason_of(lower_source("class A { x = shared(check: one_digit); }", &engine)),
            "missing required argument 'initial'"
        );
        assert_eq!(
            reason_of(lower_source("class A { x = field(default: one_digit); }", &engine)),
            "'default' expects a literal"
        );
        assert_eq!(
            reason_of(lower_source(
                "class A { fallback: fallback_dd_nd; fallback: fallback_dd_nd; }",
                &engine
            )),
            "hook declared twice"
        );
    }

    #[test]
    fn test_unknown_base() {
        let engine = ResolutionEngine::new();
        match lower_source("class B(Missing) { }", &engine) {
            Err(EvalError::Attr(AttrErrorType::UnknownClass(name))) => assert_eq!(name, "Missing"),
            other => panic!("unexpected {:?}", other.map(|d| d.name().to_string())),
        }
    }
}
