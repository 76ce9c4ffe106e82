//! Attribute resolution engine.
//!
//! The engine owns every registered class and answers get, set and delete requests for
//! instances of them.
//!
//! ## Get
//!
//! ```text
//! intercept hook anywhere in the MRO?  → the hook alone decides (then fallback on a miss)
//! data descriptor found in the MRO?    → its getter
//! key present in the instance store?   → the stored value
//! non-data descriptor found?           → its getter
//! plain value found?                   → the value
//! fallback hook anywhere in the MRO?   → the hook
//! otherwise                            → NotFound
//! ```
//!
//! A data descriptor always wins over instance storage, a non-data descriptor always
//! loses to it. Lazy attributes depend on that asymmetry (see [`lazy_cache`]).
//!
//! [`lazy_cache`]: crate::runner::ds::lazy_cache

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::runner::config::EngineConfig;
use crate::runner::ds::class::{linearize, ClassDecl, ClassId, ClassModel};
use crate::runner::ds::error::AttrErrorType;
use crate::runner::ds::hooks::{Access, FallbackFn, HookOutcome, InterceptFn};
use crate::runner::ds::instance::Instance;
use crate::runner::ds::mangle::mangle;
use crate::runner::ds::slot::{AttributeSlot, SlotDecl, SlotDescriptor};
use crate::runner::ds::value::Value;

pub struct ResolutionEngine {
    config: EngineConfig,
    /// Class arena; a `ClassId` is an index into it.
    classes: Vec<ClassModel>,
    names: HashMap<String, ClassId>,
}

impl ResolutionEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        ResolutionEngine {
            config,
            classes: Vec::new(),
            names: HashMap::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a class. Its slot table and MRO are fixed from here on.
    pub fn register(&mut self, decl: ClassDecl) -> Result<ClassId, AttrErrorType> {
        let ClassDecl {
            name,
            bases,
            slots,
            hooks,
        } = decl;

        if !self.config.can_register(self.classes.len()) {
            return Err(AttrErrorType::ClassLimitReached(self.classes.len()));
        }
        if self.names.contains_key(&name) {
            return Err(AttrErrorType::DuplicateClass(name));
        }
        if let Some(unknown) = bases.iter().find(|b| b.index() >= self.classes.len()) {
            return Err(AttrErrorType::UnknownClass(unknown.to_string()));
        }

        let id = ClassId(self.classes.len() as u32);
        let mro = linearize(&self.classes, id, &name, &bases)?;

        let mangle_names = self.config.mangle_private_names;
        let mut table: HashMap<String, AttributeSlot> = HashMap::new();
        for slot_decl in slots {
            let slot = slot_decl.into_slot(|n| {
                if mangle_names {
                    mangle(&name, n)
                } else {
                    n.to_string()
                }
            });
            if table.contains_key(slot.name()) {
                warn!(class = %name, slot = %slot.name(), "slot declared twice, keeping the last one");
            }
            table.insert(slot.name().to_string(), slot);
        }

        self.names.insert(name.clone(), id);
        self.classes
            .push(ClassModel::new(id, name, bases, mro, table, hooks));
        debug!(
            class = %self.classes[id.index()].name(),
            mro = ?self.mro_names(id),
            "registered class"
        );
        Ok(id)
    }

    /// Register a class without hooks.
    pub fn register_class(
        &mut self,
        name: &str,
        bases: &[ClassId],
        slots: Vec<SlotDecl>,
    ) -> Result<ClassId, AttrErrorType> {
        self.register(
            ClassDecl::new(name)
                .with_bases(bases.to_vec())
                .with_slots(slots),
        )
    }

    pub fn class(&self, id: ClassId) -> Option<&ClassModel> {
        self.classes.get(id.index())
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.names.get(name).copied()
    }

    pub fn lookup_class(&self, name: &str) -> Result<ClassId, AttrErrorType> {
        self.class_id(name)
            .ok_or_else(|| AttrErrorType::UnknownClass(name.to_string()))
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Names of the classes in `id`'s MRO, in order.
    pub fn mro_names(&self, id: ClassId) -> Vec<&str> {
        match self.class(id) {
            Some(class) => class
                .mro()
                .iter()
                .map(|c| self.classes[c.index()].name())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn create_instance(&self, id: ClassId) -> Result<Instance, AttrErrorType> {
        let class = self.model(id)?;
        trace!(class = %class.name(), "creating instance");
        Ok(Instance::new(id))
    }

    /// The key `name` refers to when written inside the declaration of `scope`.
    pub fn scoped_name(&self, scope: ClassId, name: &str) -> Result<String, AttrErrorType> {
        let class = self.model(scope)?;
        Ok(if self.config.mangle_private_names {
            mangle(class.name(), name)
        } else {
            name.to_string()
        })
    }

    #[tracing::instrument(level = "trace", skip(self, instance))]
    pub fn get(&self, instance: &mut Instance, name: &str) -> Result<Value, AttrErrorType> {
        let class = self.model(instance.class_id())?;
        if let Some(intercept) = self.intercept_for(class) {
            trace!(class = %class.name(), "get intercepted");
            match intercept(self, instance, name, Access::Get) {
                Ok(HookOutcome::Handled(value)) => return Ok(value),
                Ok(HookOutcome::NotHandled) => {}
                Err(error) if error.is_not_found() => {}
                Err(error) => return Err(error),
            }
            return self.run_fallback(class, instance, name);
        }
        match self.lookup(instance, name, class.mro()) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => self.run_fallback(class, instance, name),
            Err(error) if error.is_not_found() && self.fallback_for(class).is_some() => {
                self.run_fallback(class, instance, name)
            }
            Err(error) => Err(error),
        }
    }

    #[tracing::instrument(level = "trace", skip(self, instance))]
    pub fn set(
        &self,
        instance: &mut Instance,
        name: &str,
        value: Value,
    ) -> Result<(), AttrErrorType> {
        let class = self.model(instance.class_id())?;
        if let Some(intercept) = self.intercept_for(class) {
            trace!(class = %class.name(), "set intercepted");
            return match intercept(self, instance, name, Access::Set(value))? {
                HookOutcome::Handled(_) => Ok(()),
                HookOutcome::NotHandled => Err(AttrErrorType::ImmutableAttribute(name.to_string())),
            };
        }
        self.raw_set(instance, name, value)
    }

    #[tracing::instrument(level = "trace", skip(self, instance))]
    pub fn delete(&self, instance: &mut Instance, name: &str) -> Result<(), AttrErrorType> {
        let class = self.model(instance.class_id())?;
        if let Some(intercept) = self.intercept_for(class) {
            trace!(class = %class.name(), "delete intercepted");
            return match intercept(self, instance, name, Access::Delete)? {
                HookOutcome::Handled(_) => Ok(()),
                HookOutcome::NotHandled => Err(AttrErrorType::NotFound(name.to_string())),
            };
        }
        self.raw_delete(instance, name)
    }

    /// Get `name` as written inside the declaration of `scope`.
    pub fn get_in(
        &self,
        scope: ClassId,
        instance: &mut Instance,
        name: &str,
    ) -> Result<Value, AttrErrorType> {
        let key = self.scoped_name(scope, name)?;
        self.get(instance, &key)
    }

    pub fn set_in(
        &self,
        scope: ClassId,
        instance: &mut Instance,
        name: &str,
        value: Value,
    ) -> Result<(), AttrErrorType> {
        let key = self.scoped_name(scope, name)?;
        self.set(instance, &key, value)
    }

    pub fn delete_in(
        &self,
        scope: ClassId,
        instance: &mut Instance,
        name: &str,
    ) -> Result<(), AttrErrorType> {
        let key = self.scoped_name(scope, name)?;
        self.delete(instance, &key)
    }

    /// Generic get: slots and instance storage only, no hooks.
    pub fn raw_get(&self, instance: &mut Instance, name: &str) -> Result<Value, AttrErrorType> {
        let class = self.model(instance.class_id())?;
        self.lookup(instance, name, class.mro())?
            .ok_or_else(|| AttrErrorType::NotFound(name.to_string()))
    }

    /// Generic set: data descriptor setter, else instance storage. No hooks.
    pub fn raw_set(
        &self,
        instance: &mut Instance,
        name: &str,
        value: Value,
    ) -> Result<(), AttrErrorType> {
        let class = self.model(instance.class_id())?;
        match self
            .find_slot(class.mro(), name)
            .map(AttributeSlot::descriptor)
        {
            Some(SlotDescriptor::Data {
                setter: Some(setter),
                ..
            }) => setter(instance, value),
            Some(SlotDescriptor::Data { setter: None, .. }) => {
                Err(AttrErrorType::ImmutableAttribute(name.to_string()))
            }
            Some(SlotDescriptor::NonData { .. }) | Some(SlotDescriptor::Plain { .. }) | None => {
                instance.store_mut().insert(name, value);
                Ok(())
            }
        }
    }

    /// Generic delete: data descriptor deleter, else instance storage. No hooks.
    pub fn raw_delete(&self, instance: &mut Instance, name: &str) -> Result<(), AttrErrorType> {
        let class = self.model(instance.class_id())?;
        match self
            .find_slot(class.mro(), name)
            .map(AttributeSlot::descriptor)
        {
            Some(SlotDescriptor::Data {
                deleter: Some(deleter),
                ..
            }) => deleter(instance),
            Some(SlotDescriptor::Data { deleter: None, .. }) => {
                Err(AttrErrorType::ImmutableAttribute(name.to_string()))
            }
            Some(SlotDescriptor::NonData { .. }) | Some(SlotDescriptor::Plain { .. }) | None => {
                match instance.store_mut().remove(name) {
                    Some(_) => Ok(()),
                    None => Err(AttrErrorType::NotFound(name.to_string())),
                }
            }
        }
    }

    pub(crate) fn model(&self, id: ClassId) -> Result<&ClassModel, AttrErrorType> {
        self.class(id)
            .ok_or_else(|| AttrErrorType::UnknownClass(id.to_string()))
    }

    /// First slot named `name` along `mro`.
    pub(crate) fn find_slot(&self, mro: &[ClassId], name: &str) -> Option<&AttributeSlot> {
        mro.iter()
            .find_map(|class| self.classes[class.index()].own_slot(name))
    }

    /// Slot and instance-storage resolution along `mro`. `None` when nothing provides
    /// `name`.
    pub(crate) fn lookup(
        &self,
        instance: &mut Instance,
        name: &str,
        mro: &[ClassId],
    ) -> Result<Option<Value>, AttrErrorType> {
        let slot = self.find_slot(mro, name);
        if let Some(SlotDescriptor::Data { getter, .. }) = slot.map(AttributeSlot::descriptor) {
            return getter(instance).map(Some);
        }
        if let Some(value) = instance.store().get(name) {
            return Ok(Some(value.clone()));
        }
        match slot.map(AttributeSlot::descriptor) {
            Some(SlotDescriptor::NonData { getter }) => getter(instance).map(Some),
            Some(SlotDescriptor::Plain { value }) => Ok(Some(value.clone())),
            Some(SlotDescriptor::Data { .. }) | None => Ok(None),
        }
    }

    fn intercept_for(&self, class: &ClassModel) -> Option<&InterceptFn> {
        class
            .mro()
            .iter()
            .find_map(|c| self.classes[c.index()].hooks().intercept.as_ref())
    }

    fn fallback_for(&self, class: &ClassModel) -> Option<&FallbackFn> {
        class
            .mro()
            .iter()
            .find_map(|c| self.classes[c.index()].hooks().fallback.as_ref())
    }

    fn run_fallback(
        &self,
        class: &ClassModel,
        instance: &mut Instance,
        name: &str,
    ) -> Result<Value, AttrErrorType> {
        match self.fallback_for(class) {
            Some(fallback) => {
                trace!(class = %class.name(), attribute = %name, "falling back");
                match fallback(self, instance, name) {
                    Ok(HookOutcome::Handled(value)) => Ok(value),
                    Ok(HookOutcome::NotHandled) => Err(AttrErrorType::NotFound(name.to_string())),
                    Err(error) if error.is_not_found() => {
                        Err(AttrErrorType::NotFound(name.to_string()))
                    }
                    Err(error) => Err(error),
                }
            }
            None => Err(AttrErrorType::NotFound(name.to_string())),
        }
    }
}

impl Default for ResolutionEngine {
    fn default() -> Self {
        Self::new()
    }
}
