//! Type environment
//!
//! Scoped identifier-to-type bindings plus the function signatures and
//! imports visible to the code being translated.

use crate::target::{CppExpr, ParamType};
use log::trace;
use pyplus_common::StaticType;
use pyplus_frontend::NodeId;
use std::collections::{HashMap, HashSet};

/// Result of binding an identifier in the current scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    Accepted,
    Conflict {
        previous: StaticType,
        new: StaticType,
    },
}

/// Parameter of a hoisted function signature
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureParam {
    pub name: String,
    pub param_type: ParamType,
    pub default: Option<CppExpr>,
}

/// Declared shape of a module-level function
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub name: String,
    /// Node of the definition this signature was hoisted from
    pub node_id: NodeId,
    pub params: Vec<SignatureParam>,
    pub return_type: StaticType,
    /// Return type came from an annotation rather than inference
    pub annotated_return: bool,
}

/// Functions and math imports shared by every scope of one program
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Globals {
    pub functions: HashMap<String, FunctionSignature>,
    /// `import math` seen
    pub math_module: bool,
    /// Functions imported by name via `from math import ...`
    pub math_functions: HashSet<String>,
}

/// Stack of scope frames mapping identifiers to static types
#[derive(Debug, Clone)]
pub struct TypeEnvironment {
    scopes: Vec<HashMap<String, StaticType>>,
    globals: Globals,
}

impl TypeEnvironment {
    pub fn new() -> Self {
        Self::with_globals(Globals::default())
    }

    /// Fresh environment (one empty frame) seeing the given functions and imports
    pub fn with_globals(globals: Globals) -> Self {
        Self {
            scopes: vec![HashMap::new()],
            globals,
        }
    }

    /// Enter a new scope
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
        trace!("Entered scope {}", self.depth());
    }

    /// Exit current scope, discarding its bindings
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            if let Some(frame) = self.scopes.pop() {
                trace!("Left scope {} ({} bindings dropped)", self.depth() + 1, frame.len());
            }
        }
    }

    /// Number of frames above the outermost one
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Look up an identifier from the current scope outward
    pub fn lookup(&self, name: &str) -> Option<StaticType> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name).copied())
    }

    /// Type of an identifier, `Unresolved` when it is not bound anywhere
    pub fn resolve(&self, name: &str) -> StaticType {
        self.lookup(name).unwrap_or(StaticType::Unresolved)
    }

    pub fn exists_in_current_scope(&self, name: &str) -> bool {
        self.scopes.last().is_some_and(|scope| scope.contains_key(name))
    }

    /// Bind an identifier in the current scope.
    ///
    /// A rebinding is accepted only when the type is unchanged; a conflict
    /// leaves the existing binding untouched.
    pub fn bind(&mut self, name: &str, ty: StaticType) -> BindOutcome {
        let depth = self.depth();
        let Some(scope) = self.scopes.last_mut() else {
            return BindOutcome::Accepted;
        };
        match scope.get(name) {
            Some(&previous) if previous != ty => {
                trace!("Rejected rebinding of '{}' from {} to {}", name, previous, ty);
                BindOutcome::Conflict { previous, new: ty }
            }
            Some(_) => BindOutcome::Accepted,
            None => {
                trace!("Bound '{}' as {} in scope {}", name, ty, depth);
                scope.insert(name.to_string(), ty);
                BindOutcome::Accepted
            }
        }
    }

    pub fn globals(&self) -> &Globals {
        &self.globals
    }

    pub fn function(&self, name: &str) -> Option<&FunctionSignature> {
        self.globals.functions.get(name)
    }

    pub fn declare_function(&mut self, signature: FunctionSignature) {
        trace!("Declared function '{}' returning {}", signature.name, signature.return_type);
        self.globals.functions.insert(signature.name.clone(), signature);
    }

    pub fn import_math_module(&mut self) {
        self.globals.math_module = true;
    }

    pub fn import_math_function(&mut self, name: &str) {
        self.globals.math_functions.insert(name.to_string());
    }

    pub fn has_math_module(&self) -> bool {
        self.globals.math_module
    }

    pub fn has_math_function(&self, name: &str) -> bool {
        self.globals.math_functions.contains(name)
    }
}

impl Default for TypeEnvironment {
    fn default() -> Self {
        Self::new()
    }
}
