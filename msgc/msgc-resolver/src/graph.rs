//! Directed graph of direct nested-type dependencies.

use std::collections::BTreeMap;

use msgc_core::TypeRef;

/// Maps each type to its direct nested dependencies, in first-appearance
/// order of the referencing fields and without repeats. Always acyclic: the
/// resolver refuses to build a graph with a cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    edges: BTreeMap<TypeRef, Vec<TypeRef>>,
}

impl DependencyGraph {
    pub(crate) fn insert(&mut self, node: TypeRef, deps: Vec<TypeRef>) {
        self.edges.insert(node, deps);
    }

    pub fn contains(&self, node: &TypeRef) -> bool {
        self.edges.contains_key(node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &TypeRef> {
        self.edges.keys()
    }

    pub fn direct_dependencies(&self, node: &TypeRef) -> &[TypeRef] {
        self.edges.get(node).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every transitive dependency of `root`, depth-first in first-appearance
    /// order, each listed once. `root` itself is not included.
    ///
    /// This is the order in which dependency blocks are appended to the
    /// canonical text and the full definition.
    pub fn dependency_order(&self, root: &TypeRef) -> Vec<TypeRef> {
        let mut out = Vec::new();
        self.preorder(root, &mut out);
        out
    }

    fn preorder(&self, node: &TypeRef, out: &mut Vec<TypeRef>) {
        for dep in self.direct_dependencies(node) {
            if !out.contains(dep) {
                out.push(dep.clone());
                self.preorder(dep, out);
            }
        }
    }

    /// `root` and its transitive dependencies with every type after all of
    /// its dependencies.
    pub fn bottom_up(&self, root: &TypeRef) -> Vec<TypeRef> {
        let mut out = Vec::new();
        self.postorder(root, &mut out);
        out
    }

    fn postorder(&self, node: &TypeRef, out: &mut Vec<TypeRef>) {
        if out.contains(node) {
            return;
        }
        for dep in self.direct_dependencies(node) {
            self.postorder(dep, out);
        }
        out.push(node.clone());
    }
}
