use std::collections::{BTreeMap, BTreeSet, HashMap};

use msgc_core::TypeRef;

/// Lookup collaborator that locates definition text by package and name.
///
/// Supplied by the file-discovery layer. The resolver only asks for types
/// that are not already in its table.
pub trait DefinitionSource {
    /// Return the `.msg` text for `package/name`, if known.
    fn find(&self, package: &str, name: &str) -> Option<String>;

    /// Packages this source can look into. Used when a package-less reference
    /// falls back to the search path and no explicit search path is configured.
    fn packages(&self) -> Vec<String> {
        Vec::new()
    }
}

/// A source that knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSource;

impl DefinitionSource for NoSource {
    fn find(&self, _package: &str, _name: &str) -> Option<String> {
        None
    }
}

impl DefinitionSource for BTreeMap<TypeRef, String> {
    fn find(&self, package: &str, name: &str) -> Option<String> {
        self.get(&TypeRef::new(package, name)).cloned()
    }

    fn packages(&self) -> Vec<String> {
        let set: BTreeSet<&String> = self.keys().map(|r| &r.package).collect();
        set.into_iter().cloned().collect()
    }
}

impl DefinitionSource for HashMap<TypeRef, String> {
    fn find(&self, package: &str, name: &str) -> Option<String> {
        self.get(&TypeRef::new(package, name)).cloned()
    }

    fn packages(&self) -> Vec<String> {
        let set: BTreeSet<&String> = self.keys().map(|r| &r.package).collect();
        set.into_iter().cloned().collect()
    }
}
