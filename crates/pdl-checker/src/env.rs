//! Type environment with scope management
//!
//! Scopes live in an arena and point at their parent by index, forming a
//! chain that lookup walks outward. The checker allocates a child scope for
//! every lambda body and every let body and never writes to an ancestor.

use pdl_types::Type;
use rustc_hash::FxHashMap;

/// Scope identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

/// Scope in the scope tree
#[derive(Debug, Clone)]
pub struct Scope {
    /// Scope ID
    pub id: ScopeId,
    /// Parent scope (None for global scope)
    pub parent: Option<ScopeId>,
    /// Bindings introduced in this scope
    bindings: FxHashMap<String, Type>,
}

impl Scope {
    fn new(id: ScopeId, parent: Option<ScopeId>) -> Self {
        Scope {
            id,
            parent,
            bindings: FxHashMap::default(),
        }
    }

    /// Look up a name in this scope only
    pub fn get(&self, name: &str) -> Option<&Type> {
        self.bindings.get(name)
    }

    /// Number of bindings in this scope
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether this scope has no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Mapping from names to types, organised as a tree of scopes
///
/// `TypeEnv::new()` starts with a single global scope in which callers place
/// the signatures of host-provided functions.
#[derive(Debug, Clone)]
pub struct TypeEnv {
    /// All scopes (indexed by ScopeId)
    scopes: Vec<Scope>,
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeEnv {
    /// The global scope every environment starts with
    pub const GLOBAL: ScopeId = ScopeId(0);

    /// Create a new environment with an empty global scope
    pub fn new() -> Self {
        TypeEnv {
            scopes: vec![Scope::new(Self::GLOBAL, None)],
        }
    }

    /// Add a global binding, builder style
    pub fn with(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.define(Self::GLOBAL, name, ty);
        self
    }

    /// Get the number of scopes
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Allocate a new scope whose parent is `parent`
    pub fn push_scope(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(id, Some(parent)));
        id
    }

    /// Bind `name` in `scope`, replacing an earlier binding of the same name
    /// in that scope
    pub fn define(&mut self, scope: ScopeId, name: impl Into<String>, ty: Type) {
        if let Some(target) = self.scopes.get_mut(scope.0 as usize) {
            target.bindings.insert(name.into(), ty);
        }
    }

    /// Resolve a name starting at `scope` and walking up the parent chain
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Type> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scopes.get(id.0 as usize)?;
            if let Some(ty) = scope.get(name) {
                return Some(ty);
            }
            current = scope.parent;
        }
        None
    }

    /// Get a scope by ID
    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0 as usize)
    }

    /// Get the global scope
    pub fn global_scope(&self) -> &Scope {
        &self.scopes[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_parents() {
        let mut env = TypeEnv::new().with("upper", Type::string());
        let child = env.push_scope(TypeEnv::GLOBAL);
        let grandchild = env.push_scope(child);
        env.define(child, "x", Type::number());

        assert_eq!(env.lookup(grandchild, "x"), Some(&Type::number()));
        assert_eq!(env.lookup(grandchild, "upper"), Some(&Type::string()));
        assert_eq!(env.lookup(TypeEnv::GLOBAL, "x"), None);
    }

    #[test]
    fn test_shadowing_does_not_touch_parent() {
        let mut env = TypeEnv::new().with("x", Type::string());
        let child = env.push_scope(TypeEnv::GLOBAL);
        env.define(child, "x", Type::boolean());

        assert_eq!(env.lookup(child, "x"), Some(&Type::boolean()));
        assert_eq!(env.lookup(TypeEnv::GLOBAL, "x"), Some(&Type::string()));
    }

    #[test]
    fn test_sibling_scopes_are_isolated() {
        let mut env = TypeEnv::new();
        let a = env.push_scope(TypeEnv::GLOBAL);
        let b = env.push_scope(TypeEnv::GLOBAL);
        env.define(a, "only_a", Type::null());

        assert!(env.lookup(b, "only_a").is_none());
        assert_eq!(env.scope_count(), 3);
        assert_eq!(env.scope(a).map(Scope::len), Some(1));
    }

    #[test]
    fn test_unknown_scope_lookup() {
        let env = TypeEnv::new();
        assert!(env.lookup(ScopeId(42), "x").is_none());
        assert!(env.global_scope().is_empty());
    }
}
