//! Operator registry consulted by the type-checking pass.
//!
//! The registry is built explicitly and deterministically at startup and is
//! read-only afterwards, so concurrent lookups from parallel type-checking
//! need no synchronization.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::attrs::OpAttrs;
use crate::relation::{
    TypeCheckResult, TypeRelation, UnaryElementwiseRelation, UNARY_ELEMENTWISE_INPUT_ROLES,
};
use crate::spec::{InputRole, TensorType};

/// Registered name of the unary elementwise entry.
pub const UNARY_ELEMENTWISE: &str = "aeon.unary_elementwise";

/// Support classification advertised for NPU-offloaded operators.
pub const DEFAULT_SUPPORT_LEVEL: u8 = 11;

/// Static metadata binding an operator name to its type relation.
pub struct OperatorEntry {
    pub name: &'static str,
    pub input_roles: &'static [InputRole],
    pub support_level: u8,
    relation: &'static dyn TypeRelation,
}

impl OperatorEntry {
    /// Number of typed inputs the operator expects.
    pub fn arity(&self) -> usize {
        self.input_roles.len()
    }

    pub fn relation_name(&self) -> &'static str {
        self.relation.name()
    }

    /// Runs the entry's type relation against the supplied inputs.
    pub fn infer(&self, inputs: &[TensorType], attrs: &OpAttrs) -> TypeCheckResult<TensorType> {
        self.relation.infer(inputs, attrs)
    }
}

/// Read-only operator table keyed by namespaced operator name.
pub struct Registry {
    entries: BTreeMap<&'static str, OperatorEntry>,
}

impl Registry {
    /// Builds the registry containing every built-in Aeon operator.
    ///
    /// Construction order is fixed; no static-initializer side effects are
    /// involved, so two calls always produce identical tables.
    pub fn with_builtin_operators() -> Self {
        static UNARY_ELEMENTWISE_RELATION: UnaryElementwiseRelation = UnaryElementwiseRelation;

        let mut entries = BTreeMap::new();
        entries.insert(
            UNARY_ELEMENTWISE,
            OperatorEntry {
                name: UNARY_ELEMENTWISE,
                input_roles: UNARY_ELEMENTWISE_INPUT_ROLES,
                support_level: DEFAULT_SUPPORT_LEVEL,
                relation: &UNARY_ELEMENTWISE_RELATION,
            },
        );
        Self { entries }
    }

    pub fn lookup(&self, name: &str) -> Option<&OperatorEntry> {
        self.entries.get(name)
    }

    /// Registered names in deterministic (sorted) order.
    pub fn operator_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Process-wide registry, constructed on first use and read-only afterwards.
pub fn global() -> &'static Registry {
    static GLOBAL: OnceLock<Registry> = OnceLock::new();
    GLOBAL.get_or_init(Registry::with_builtin_operators)
}
