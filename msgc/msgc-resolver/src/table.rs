//! The type table: every known declaration, keyed by its [`TypeRef`].
//!
//! Building the table is the only mutating phase. [`TypeTable::populate`]
//! pulls missing definitions from a [`DefinitionSource`]; after that the table
//! is only read, so [`TypeTable::resolve`] may run for many roots in parallel.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use msgc_core::{CompileError, CompilerConfig, Declaration, ResolveError, TypeRef};
use msgc_parser::parse_message;
use tracing::debug;

use crate::source::DefinitionSource;

#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    decls: BTreeMap<TypeRef, Arc<Declaration>>,
    failed: BTreeMap<TypeRef, CompileError>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from parsed declarations. Keys must be unique.
    pub fn from_declarations(
        decls: impl IntoIterator<Item = Declaration>,
    ) -> Result<Self, ResolveError> {
        let mut table = Self::new();
        for decl in decls {
            table.insert(decl)?;
        }
        Ok(table)
    }

    pub fn insert(&mut self, decl: Declaration) -> Result<(), ResolveError> {
        let key = decl.type_ref.clone();
        if self.decls.contains_key(&key) || self.failed.contains_key(&key) {
            return Err(ResolveError::DuplicateType(key));
        }
        self.decls.insert(key, Arc::new(decl));
        Ok(())
    }

    /// Record a type whose unit failed to compile, so dependents report
    /// [`ResolveError::DependencyFailed`] instead of an unresolved reference.
    pub fn mark_failed(&mut self, type_ref: TypeRef, error: CompileError) {
        self.failed.insert(type_ref, error);
    }

    pub fn get(&self, type_ref: &TypeRef) -> Option<&Arc<Declaration>> {
        self.decls.get(type_ref)
    }

    pub fn contains(&self, type_ref: &TypeRef) -> bool {
        self.decls.contains_key(type_ref)
    }

    pub fn failure(&self, type_ref: &TypeRef) -> Option<&CompileError> {
        self.failed.get(type_ref)
    }

    pub fn type_refs(&self) -> impl Iterator<Item = &TypeRef> {
        self.decls.keys()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Known (or failed) types named `name` in a package on the search path.
    pub(crate) fn candidates(&self, name: &str, config: &CompilerConfig) -> Vec<TypeRef> {
        let mut out: Vec<TypeRef> = self
            .decls
            .keys()
            .chain(self.failed.keys())
            .filter(|r| r.name == name && config.searches(&r.package))
            .cloned()
            .collect();
        out.sort();
        out
    }

    pub(crate) fn is_failed(&self, type_ref: &TypeRef) -> bool {
        self.failed.contains_key(type_ref)
    }

    /// Fetch every referenced type missing from the table from `source`,
    /// transitively.
    ///
    /// A package-less reference whose exact type is neither in the table nor
    /// in the source is then looked up in the search-path packages (the
    /// configured `search_path`, or else every package the source reports).
    /// Fetched text that fails to parse is recorded as failed and returned.
    pub fn populate<S>(
        &mut self,
        source: &S,
        config: &CompilerConfig,
    ) -> Vec<(TypeRef, CompileError)>
    where
        S: DefinitionSource + ?Sized,
    {
        let search_packages = if config.search_path.is_empty() {
            source.packages()
        } else {
            config.search_path.clone()
        };
        let mut fetch = Fetch {
            pending: self.decls.values().flat_map(|d| pending_refs(d)).collect(),
            ..Fetch::default()
        };

        while let Some((target, implicit)) = fetch.pending.pop() {
            if self.load(&target, source, config, &mut fetch) || !implicit {
                continue;
            }
            for package in search_packages.iter().filter(|p| **p != target.package) {
                self.load(&TypeRef::new(package, &target.name), source, config, &mut fetch);
            }
        }
        fetch.errors
    }

    /// Make sure `type_ref` is known, fetching it from `source` once. Returns
    /// whether the table now holds it, parsed or failed.
    fn load<S>(
        &mut self,
        type_ref: &TypeRef,
        source: &S,
        config: &CompilerConfig,
        fetch: &mut Fetch,
    ) -> bool
    where
        S: DefinitionSource + ?Sized,
    {
        if self.decls.contains_key(type_ref) || self.failed.contains_key(type_ref) {
            return true;
        }
        if !fetch.attempted.insert(type_ref.clone()) {
            return false;
        }
        let Some(text) = source.find(&type_ref.package, &type_ref.name) else {
            return false;
        };
        debug!(type_ref = %type_ref, "loaded definition from source");
        match parse_message(type_ref, &text, config) {
            Ok(decl) => {
                fetch.pending.extend(pending_refs(&decl));
                self.decls.insert(type_ref.clone(), Arc::new(decl));
            }
            Err(e) => {
                let e = CompileError::from(e);
                self.failed.insert(type_ref.clone(), e.clone());
                fetch.errors.push((type_ref.clone(), e));
            }
        }
        true
    }
}

#[derive(Default)]
struct Fetch {
    pending: Vec<(TypeRef, bool)>,
    attempted: BTreeSet<TypeRef>,
    errors: Vec<(TypeRef, CompileError)>,
}

fn pending_refs(decl: &Declaration) -> Vec<(TypeRef, bool)> {
    decl.fields
        .iter()
        .filter_map(|f| f.ty.as_nested().map(|r| (r.clone(), f.implicit_package)))
        .collect()
}
