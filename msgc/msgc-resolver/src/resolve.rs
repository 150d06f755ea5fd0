//! Resolution of one root type against a frozen [`TypeTable`].
//!
//! # Lookup strategy for nested references
//!
//! 1. **Exact match**: the reference as written (or as qualified by the
//!    parser) is in the table.
//! 2. **Search path**, only for package-less references: find the types with
//!    the same name in the search-path packages. One candidate resolves, more
//!    than one is ambiguous.
//! 3. **Error**: otherwise the reference is unresolved.

use std::{collections::BTreeMap, sync::Arc};

use msgc_core::{CompilerConfig, Declaration, FieldType, ResolveError, TypeRef};

use crate::{graph::DependencyGraph, table::TypeTable};

/// A root declaration together with everything it transitively needs.
#[derive(Debug, Clone)]
pub struct Resolution {
    root: TypeRef,
    graph: DependencyGraph,
    /// Resolved declarations: every nested reference points at a key of this map.
    closure: BTreeMap<TypeRef, Arc<Declaration>>,
}

impl Resolution {
    pub fn root(&self) -> &TypeRef {
        &self.root
    }

    pub fn root_declaration(&self) -> &Declaration {
        &self.closure[&self.root]
    }

    pub fn declaration(&self, type_ref: &TypeRef) -> Option<&Declaration> {
        self.closure.get(type_ref).map(Arc::as_ref)
    }

    /// Shared handle to a resolved declaration.
    pub fn shared_declaration(&self, type_ref: &TypeRef) -> Option<Arc<Declaration>> {
        self.closure.get(type_ref).cloned()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Transitive dependencies of the root, depth-first in first-appearance order.
    pub fn dependency_order(&self) -> Vec<TypeRef> {
        self.graph.dependency_order(&self.root)
    }

    /// The root and its dependencies, every type after its own dependencies.
    pub fn bottom_up(&self) -> Vec<TypeRef> {
        self.graph.bottom_up(&self.root)
    }

    pub fn len(&self) -> usize {
        self.closure.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closure.is_empty()
    }
}

impl TypeTable {
    /// Resolve `root` and all of its transitive dependencies.
    ///
    /// Takes `&self`: the table must be fully populated beforehand.
    pub fn resolve(
        &self,
        root: &TypeRef,
        config: &CompilerConfig,
    ) -> Result<Resolution, ResolveError> {
        if !self.contains(root) {
            return Err(ResolveError::UnknownRoot(root.clone()));
        }
        let mut state = ResolveState {
            table: self,
            config,
            stack: Vec::new(),
            graph: DependencyGraph::default(),
            closure: BTreeMap::new(),
        };
        state.visit(root)?;
        Ok(Resolution {
            root: root.clone(),
            graph: state.graph,
            closure: state.closure,
        })
    }
}

struct ResolveState<'a> {
    table: &'a TypeTable,
    config: &'a CompilerConfig,
    /// Types currently being visited, root first.
    stack: Vec<TypeRef>,
    graph: DependencyGraph,
    closure: BTreeMap<TypeRef, Arc<Declaration>>,
}

impl ResolveState<'_> {
    fn visit(&mut self, node: &TypeRef) -> Result<(), ResolveError> {
        if self.closure.contains_key(node) {
            return Ok(());
        }
        if let Some(pos) = self.stack.iter().position(|r| r == node) {
            let mut cycle = self.stack[pos..].to_vec();
            cycle.push(node.clone());
            return Err(ResolveError::CyclicDependency { cycle });
        }
        let Some(decl) = self.table.get(node) else {
            return Err(ResolveError::UnresolvedType {
                reference: node.clone(),
                chain: self.stack.clone(),
            });
        };
        let decl = Arc::clone(decl);

        self.stack.push(node.clone());
        let mut deps: Vec<TypeRef> = Vec::new();
        let mut rewritten: Option<Declaration> = None;
        for (idx, field) in decl.fields.iter().enumerate() {
            let FieldType::Nested(target) = &field.ty else {
                continue;
            };
            let resolved = self.lookup(target, field.implicit_package)?;
            self.visit(&resolved)?;
            if resolved != *target {
                let copy = rewritten.get_or_insert_with(|| decl.as_ref().clone());
                copy.fields[idx].ty = FieldType::Nested(resolved.clone());
            }
            if !deps.contains(&resolved) {
                deps.push(resolved);
            }
        }
        self.stack.pop();

        let resolved_decl = rewritten.map(Arc::new).unwrap_or(decl);
        self.graph.insert(node.clone(), deps);
        self.closure.insert(node.clone(), resolved_decl);
        Ok(())
    }

    fn lookup(&self, target: &TypeRef, implicit: bool) -> Result<TypeRef, ResolveError> {
        if self.table.is_failed(target) {
            return Err(self.dependency_failed(target));
        }
        if self.table.contains(target) {
            return Ok(target.clone());
        }
        if !implicit {
            return Err(self.unresolved(target));
        }

        let candidates = self.table.candidates(&target.name, self.config);
        match candidates.as_slice() {
            [] => Err(self.unresolved(target)),
            [only] if self.table.is_failed(only) => Err(self.dependency_failed(only)),
            [only] => Ok(only.clone()),
            _ => Err(ResolveError::AmbiguousType {
                name: target.name.clone(),
                candidates,
                chain: self.stack.clone(),
            }),
        }
    }

    fn unresolved(&self, target: &TypeRef) -> ResolveError {
        ResolveError::UnresolvedType {
            reference: target.clone(),
            chain: self.stack.clone(),
        }
    }

    fn dependency_failed(&self, target: &TypeRef) -> ResolveError {
        ResolveError::DependencyFailed {
            reference: target.clone(),
            chain: self.stack.clone(),
        }
    }
}
