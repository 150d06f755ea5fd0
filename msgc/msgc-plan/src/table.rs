use std::{collections::BTreeMap, sync::Arc};

use msgc_core::{CompilerConfig, ResolveError, TypeRef};
use msgc_resolver::Resolution;

use crate::plan::SerializationPlan;

/// Plans for a root type and every type it depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanTable {
    root: TypeRef,
    plans: BTreeMap<TypeRef, Arc<SerializationPlan>>,
}

impl PlanTable {
    /// Plan the resolution's root and all of its dependencies, each after
    /// the types it embeds.
    pub fn build(resolution: &Resolution, config: &CompilerConfig) -> Result<Self, ResolveError> {
        let mut plans: BTreeMap<TypeRef, Arc<SerializationPlan>> = BTreeMap::new();
        for type_ref in resolution.bottom_up() {
            let Some(decl) = resolution.declaration(&type_ref) else {
                return Err(ResolveError::UnknownRoot(type_ref));
            };
            if let Some(missing) = decl
                .nested_refs()
                .into_iter()
                .find(|r| !plans.contains_key(*r))
            {
                return Err(ResolveError::UnresolvedType {
                    reference: missing.clone(),
                    chain: vec![type_ref],
                });
            }
            let plan = SerializationPlan::new(
                type_ref.clone(),
                &decl.fields,
                &config.header_type,
                |r| plans.get(r).and_then(|p| p.fixed_size_bytes),
            );
            plans.insert(type_ref, Arc::new(plan));
        }
        Ok(Self {
            root: resolution.root().clone(),
            plans,
        })
    }

    pub fn root(&self) -> &TypeRef {
        &self.root
    }

    pub fn root_plan(&self) -> Option<&SerializationPlan> {
        self.get(&self.root)
    }

    pub fn get(&self, type_ref: &TypeRef) -> Option<&SerializationPlan> {
        self.plans.get(type_ref).map(Arc::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeRef, &SerializationPlan)> {
        self.plans.iter().map(|(r, p)| (r, p.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}
