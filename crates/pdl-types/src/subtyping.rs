//! Subtyping rules for the PDL type system
//!
//! Implements the subtyping relation T <: U (T is a subtype of U).

use crate::ty::{FunctionType, PromptType, RecordType, Type};

/// Default recursion limit for structural comparisons
pub const MAX_SUBTYPE_DEPTH: usize = 128;

/// Context for checking subtyping relationships
///
/// Tracks the recursion depth so that deeply nested (or adversarial) types
/// cannot exhaust the stack. A check that exceeds the limit answers `false`.
#[derive(Debug, Clone)]
pub struct SubtypingContext {
    /// Current recursion depth
    depth: usize,

    /// Maximum recursion depth
    max_depth: usize,
}

impl Default for SubtypingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SubtypingContext {
    /// Create a new subtyping context with the default depth limit
    pub fn new() -> Self {
        Self::with_max_depth(MAX_SUBTYPE_DEPTH)
    }

    /// Create a subtyping context with a custom depth limit
    pub fn with_max_depth(max_depth: usize) -> Self {
        SubtypingContext { depth: 0, max_depth }
    }

    /// Check if `sub` is a subtype of `sup` (sub <: sup)
    ///
    /// Returns true if a value of type `sub` can be used where `sup` is expected.
    pub fn is_subtype(&mut self, sub: &Type, sup: &Type) -> bool {
        if self.depth >= self.max_depth {
            return false;
        }
        self.depth += 1;
        let result = self.check(sub, sup);
        self.depth -= 1;
        result
    }

    fn check(&mut self, sub: &Type, sup: &Type) -> bool {
        match (sub, sup) {
            // Everything is a subtype of Any
            (_, Type::Any) => true,

            // Never is a subtype of everything
            (Type::Never, _) => true,

            // Dynamic is consistent with everything, in both directions
            (Type::Dynamic(_), _) | (_, Type::Dynamic(_)) => true,

            // Primitive subtyping (only reflexive)
            (Type::Primitive(p1), Type::Primitive(p2)) => p1 == p2,

            // list[T] <: list[U] if T <: U
            (Type::List(l1), Type::List(l2)) => self.is_subtype(&l1.element, &l2.element),

            // T1 | ... | Tn <: U if Ti <: U for all i
            (Type::Union(members), _) => members.iter().all(|member| self.is_subtype(member, sup)),

            (Type::Record(r1), Type::Record(r2)) => self.record_subtype(r1, r2),

            (Type::Function(f1), Type::Function(f2)) => self.function_subtype(f1, f2),

            (Type::Prompt(p1), Type::Prompt(p2)) => self.prompt_subtype(p1, p2),

            // T <: U1 | ... | Un if T <: Ui for some i
            (_, Type::Union(members)) => members.iter().any(|member| self.is_subtype(sub, member)),

            // T <: U1 & ... & Un if T <: Ui for all i
            (_, Type::Intersection(members)) => {
                members.iter().all(|member| self.is_subtype(sub, member))
            }

            // T1 & ... & Tn <: U if Ti <: U for some i
            (Type::Intersection(members), _) => {
                members.iter().any(|member| self.is_subtype(member, sup))
            }

            _ => false,
        }
    }

    /// Width and depth subtyping: every field declared in `sup` is either
    /// optional or present in `sub` with a compatible type. Extra fields in
    /// `sub` are ignored.
    fn record_subtype(&mut self, sub: &RecordType, sup: &RecordType) -> bool {
        sup.fields.iter().all(|expected| match sub.field(&expected.name) {
            Some(actual) => self.is_subtype(&actual.ty, &expected.ty),
            None => expected.optional,
        })
    }

    /// Contravariant parameters, covariant return
    fn function_subtype(&mut self, sub: &FunctionType, sup: &FunctionType) -> bool {
        if sub.params.len() != sup.params.len() {
            return false;
        }

        let params_match = sub.params.iter().zip(&sup.params).all(|(p1, p2)| {
            // A caller of `sup` may omit this argument, so `sub` must allow that too
            (!p2.optional || p1.optional) && self.is_subtype(&p2.ty, &p1.ty)
        });

        params_match && self.is_subtype(&sub.return_type, &sup.return_type)
    }

    fn prompt_subtype(&mut self, sub: &PromptType, sup: &PromptType) -> bool {
        if let Some(model) = &sup.model {
            if sub.model.as_ref() != Some(model) {
                return false;
            }
        }
        self.is_subtype(&sup.input, &sub.input) && self.is_subtype(&sub.output, &sup.output)
    }
}

/// Check `sub <: sup` with a fresh context
pub fn is_subtype(sub: &Type, sup: &Type) -> bool {
    SubtypingContext::new().is_subtype(sub, sup)
}
