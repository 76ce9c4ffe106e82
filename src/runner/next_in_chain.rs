//! Cooperative delegation: resolve a name as the class after `start` in an instance's MRO
//! would provide it.
//!
//! Resolution starts immediately after `start` and only looks at slots and instance
//! storage. Interception and fallback hooks are never consulted, whichever class defines
//! them.

use tracing::trace;

use crate::runner::ds::class::ClassId;
use crate::runner::ds::error::AttrErrorType;
use crate::runner::ds::instance::Instance;
use crate::runner::ds::value::Value;
use crate::runner::engine::ResolutionEngine;

pub struct NextInChainAccessor<'e> {
    engine: &'e ResolutionEngine,
    start: ClassId,
}

impl<'e> NextInChainAccessor<'e> {
    pub fn new(engine: &'e ResolutionEngine, start: ClassId) -> Self {
        NextInChainAccessor { engine, start }
    }

    pub fn start(&self) -> ClassId {
        self.start
    }

    pub fn get(&self, instance: &mut Instance, name: &str) -> Result<Value, AttrErrorType> {
        let class = self.engine.model(instance.class_id())?;
        let mro = class.mro();
        let position = mro
            .iter()
            .position(|c| *c == self.start)
            .ok_or_else(|| AttrErrorType::UnrelatedClass {
                class: match self.engine.class(self.start) {
                    Some(start) => start.name().to_string(),
                    None => self.start.to_string(),
                },
                instance_class: class.name().to_string(),
            })?;
        trace!(
            class = %class.name(),
            after = position,
            attribute = %name,
            "resolving from next in chain"
        );
        self.engine
            .lookup(instance, name, &mro[position + 1..])?
            .ok_or_else(|| AttrErrorType::NotFound(name.to_string()))
    }
}

impl ResolutionEngine {
    pub fn next_in_chain(&self, start: ClassId) -> NextInChainAccessor<'_> {
        NextInChainAccessor::new(self, start)
    }

    /// Resolve `name` starting after `start` in the instance's MRO.
    pub fn resolve_from(
        &self,
        start: ClassId,
        instance: &mut Instance,
        name: &str,
    ) -> Result<Value, AttrErrorType> {
        self.next_in_chain(start).get(instance, name)
    }
}
