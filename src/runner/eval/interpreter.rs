//! Statement execution.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::parser::ast::{
    AttributeRefData, ExpressionType, ItemType, ProgramData, StatementType,
};
use crate::parser::parse_to_ast;
use crate::runner::config::EngineConfig;
use crate::runner::ds::instance::Instance;
use crate::runner::ds::value::Value;
use crate::runner::engine::ResolutionEngine;
use crate::runner::plugin::registry::NativeRegistry;

use super::lower::{literal_value, lower_class};
use super::types::EvalError;

/// Runs programs against one engine. Classes and variables persist between runs, so a
/// REPL can feed it one line at a time.
pub struct Interpreter {
    engine: ResolutionEngine,
    natives: NativeRegistry,
    variables: HashMap<String, Instance>,
    output: Vec<String>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_registry(NativeRegistry::with_core())
    }

    pub fn with_registry(natives: NativeRegistry) -> Self {
        Self::with_parts(ResolutionEngine::new(), natives)
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_parts(ResolutionEngine::with_config(config), NativeRegistry::with_core())
    }

    pub fn with_parts(engine: ResolutionEngine, natives: NativeRegistry) -> Self {
        Interpreter {
            engine,
            natives,
            variables: HashMap::new(),
            output: Vec::new(),
        }
    }

    pub fn engine(&self) -> &ResolutionEngine {
        &self.engine
    }

    pub fn natives_mut(&mut self) -> &mut NativeRegistry {
        &mut self.natives
    }

    pub fn variable(&self, name: &str) -> Option<&Instance> {
        self.variables.get(name)
    }

    /// Lines printed so far.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Lines printed so far, leaving the buffer empty.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    pub fn run_source(&mut self, source: &str) -> Result<(), EvalError> {
        let program = parse_to_ast(source)?;
        self.run(&program)
    }

    /// Execute every item in order, stopping at the first error.
    pub fn run(&mut self, program: &ProgramData) -> Result<(), EvalError> {
        for item in &program.body {
            match item {
                ItemType::Class(class) => {
                    let decl = lower_class(class, &self.engine, &self.natives)?;
                    let id = self.engine.register(decl)?;
                    debug!(class = %class.name.name, id = %id, "declared class");
                }
                ItemType::Statement(statement) => self.execute(statement)?,
            }
        }
        Ok(())
    }

    fn execute(&mut self, statement: &StatementType) -> Result<(), EvalError> {
        match statement {
            StatementType::Let {
                variable, class, ..
            } => {
                let id = self.engine.lookup_class(&class.name)?;
                let instance = self.engine.create_instance(id)?;
                trace!(variable = %variable.name, instance = %instance.id(), "bound instance");
                self.variables.insert(variable.name.clone(), instance);
            }
            StatementType::Assign { target, value, .. } => {
                let value = evaluate(&self.engine, &mut self.variables, value)?;
                let instance = instance_of(&mut self.variables, target)?;
                self.engine
                    .set(instance, &target.attribute.name, value)?;
            }
            StatementType::Delete { target, .. } => {
                let instance = instance_of(&mut self.variables, target)?;
                self.engine.delete(instance, &target.attribute.name)?;
            }
            StatementType::Print { value, .. } => {
                let value = evaluate(&self.engine, &mut self.variables, value)?;
                self.output.push(value.to_string());
            }
            StatementType::Try { statement, .. } => match self.execute(statement) {
                Ok(()) => {}
                Err(EvalError::Attr(error)) => {
                    debug!(%error, "statement failed inside try");
                    self.output.push(format!("error: {}", error));
                }
                Err(other) => return Err(other),
            },
        }
        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn instance_of<'v>(
    variables: &'v mut HashMap<String, Instance>,
    target: &AttributeRefData,
) -> Result<&'v mut Instance, EvalError> {
    variables
        .get_mut(&target.object.name)
        .ok_or_else(|| EvalError::UnknownVariable(target.object.name.clone()))
}

fn evaluate(
    engine: &ResolutionEngine,
    variables: &mut HashMap<String, Instance>,
    expression: &ExpressionType,
) -> Result<Value, EvalError> {
    Ok(match expression {
        ExpressionType::Literal(literal) => literal_value(literal),
        ExpressionType::Attribute(reference) => {
            let instance = instance_of(variables, reference)?;
            engine.get(instance, &reference.attribute.name)?
        }
        ExpressionType::Super {
            class,
            object,
            attribute,
            ..
        } => {
            let start = engine.lookup_class(&class.name)?;
            let instance = variables
                .get_mut(&object.name)
                .ok_or_else(|| EvalError::UnknownVariable(object.name.clone()))?;
            engine.resolve_from(start, instance, &attribute.name)?
        }
    })
}
