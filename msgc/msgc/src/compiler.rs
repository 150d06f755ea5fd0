//! Batch compilation of message and service definitions.
//!
//! Compilation runs in two phases separated by a single barrier:
//!
//! 1. every unit is parsed in parallel, the [`TypeTable`] is built from the
//!    results and missing dependencies are pulled from the
//!    [`DefinitionSource`];
//! 2. with the table frozen, every unit is resolved, hashed and planned in
//!    parallel.

use std::{collections::BTreeMap, sync::Arc};

use msgc_core::{
    CompileError, CompilerConfig, Declaration, ParseError, ResolveError, ServiceDeclaration,
    TypeRef,
};
use msgc_hash::{DigestAlgorithm, Md5, compute_digest, full_definition, service_digest};
use msgc_parser::{parse_message, parse_service, service_halves};
use msgc_plan::PlanTable;
use msgc_resolver::{DefinitionSource, Resolution, TypeTable};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::{
    compiled::{CompiledMessage, CompiledService},
    error::UnitError,
    unit::{SourceUnit, UnitKind},
};

/// Compiles batches of [`SourceUnit`]s.
pub struct Compiler {
    config: CompilerConfig,
    algorithm: Arc<dyn DigestAlgorithm>,
}

/// Builder for configuring [`Compiler`].
pub struct CompilerBuilder {
    config: CompilerConfig,
    algorithm: Arc<dyn DigestAlgorithm>,
}

/// Result of one [`Compiler::compile`] call. Every unit ends up either in
/// `messages`/`services` or in `errors`.
#[derive(Debug, Default)]
pub struct CompileReport {
    pub messages: BTreeMap<TypeRef, CompiledMessage>,
    pub services: BTreeMap<TypeRef, CompiledService>,
    /// Sorted by type.
    pub errors: Vec<UnitError>,
}

impl CompileReport {
    pub fn message(&self, type_ref: &TypeRef) -> Option<&CompiledMessage> {
        self.messages.get(type_ref)
    }

    pub fn service(&self, type_ref: &TypeRef) -> Option<&CompiledService> {
        self.services.get(type_ref)
    }

    pub fn error(&self, type_ref: &TypeRef) -> Option<&UnitError> {
        self.errors.iter().find(|e| e.type_ref == *type_ref)
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn fail(&mut self, type_ref: TypeRef, error: impl Into<CompileError>) {
        let error = UnitError::new(type_ref, error);
        warn!(type_ref = %error.type_ref, error = %error.source, "unit failed to compile");
        self.errors.push(error);
    }
}

enum Parsed {
    Message(Declaration),
    Service(ServiceDeclaration),
}

impl Compiler {
    /// Create a builder for [`Compiler`].
    pub fn builder() -> CompilerBuilder {
        CompilerBuilder {
            config: CompilerConfig::default(),
            algorithm: Arc::new(Md5),
        }
    }

    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile `units`, loading referenced types that are not among them
    /// from `source`.
    pub fn compile<S>(&self, units: &[SourceUnit], source: &S) -> CompileReport
    where
        S: DefinitionSource + ?Sized,
    {
        let parsed: Vec<(&SourceUnit, Result<Parsed, ParseError>)> = units
            .par_iter()
            .map(|unit| (unit, self.parse(unit)))
            .collect();

        let mut report = CompileReport::default();
        let mut table = TypeTable::new();
        let mut messages = Vec::new();
        let mut services = Vec::new();
        for (unit, result) in parsed {
            let type_ref = unit.type_ref.clone();
            match result {
                Ok(Parsed::Message(decl)) => match table.insert(decl) {
                    Ok(()) => messages.push(type_ref),
                    Err(e) => report.fail(type_ref, e),
                },
                Ok(Parsed::Service(srv)) => {
                    let inserted = table
                        .insert(srv.request.clone())
                        .and_then(|()| table.insert(srv.response.clone()));
                    match inserted {
                        Ok(()) => services.push(srv),
                        Err(e) => report.fail(type_ref, e),
                    }
                }
                Err(e) => {
                    if unit.kind == UnitKind::Service {
                        let (request, response) = service_halves(&type_ref);
                        table.mark_failed(request, e.clone().into());
                        table.mark_failed(response, e.clone().into());
                    }
                    table.mark_failed(type_ref.clone(), e.clone().into());
                    report.fail(type_ref, e);
                }
            }
        }
        for (type_ref, e) in table.populate(source, &self.config) {
            report.fail(type_ref, e);
        }
        debug!(types = table.len(), "type table complete");

        let table = &table;
        let compiled_messages: Vec<_> = messages
            .par_iter()
            .map(|r| (r.clone(), self.compile_message(table, r)))
            .collect();
        let compiled_services: Vec<_> = services
            .par_iter()
            .map(|s| (s.type_ref.clone(), self.compile_service(table, s)))
            .collect();

        for (type_ref, result) in compiled_messages {
            match result {
                Ok(msg) => {
                    debug!(type_ref = %type_ref, md5sum = %msg.digest, "compiled message");
                    report.messages.insert(type_ref, msg);
                }
                Err(e) => report.fail(type_ref, e),
            }
        }
        for (type_ref, result) in compiled_services {
            match result {
                Ok(srv) => {
                    debug!(type_ref = %type_ref, md5sum = %srv.digest, "compiled service");
                    report.services.insert(type_ref, srv);
                }
                Err(e) => report.fail(type_ref, e),
            }
        }
        report.errors.sort_by(|a, b| a.type_ref.cmp(&b.type_ref));
        report
    }

    fn parse(&self, unit: &SourceUnit) -> Result<Parsed, ParseError> {
        match unit.kind {
            UnitKind::Message => {
                parse_message(&unit.type_ref, &unit.text, &self.config).map(Parsed::Message)
            }
            UnitKind::Service => {
                parse_service(&unit.type_ref, &unit.text, &self.config).map(Parsed::Service)
            }
        }
    }

    fn compile_message(
        &self,
        table: &TypeTable,
        root: &TypeRef,
    ) -> Result<CompiledMessage, CompileError> {
        let resolution = table.resolve(root, &self.config)?;
        self.compile_resolved(&resolution)
    }

    fn compile_service(
        &self,
        table: &TypeTable,
        srv: &ServiceDeclaration,
    ) -> Result<CompiledService, CompileError> {
        let request = table.resolve(&srv.request.type_ref, &self.config)?;
        let response = table.resolve(&srv.response.type_ref, &self.config)?;
        Ok(CompiledService {
            type_ref: srv.type_ref.clone(),
            digest: service_digest(&request, &response, self.algorithm.as_ref())?,
            request: self.compile_resolved(&request)?,
            response: self.compile_resolved(&response)?,
        })
    }

    fn compile_resolved(&self, resolution: &Resolution) -> Result<CompiledMessage, CompileError> {
        let root = resolution.root();
        let declaration = resolution
            .shared_declaration(root)
            .ok_or_else(|| ResolveError::UnknownRoot(root.clone()))?;
        let plans = PlanTable::build(resolution, &self.config)?;
        let plan = plans
            .root_plan()
            .cloned()
            .ok_or_else(|| ResolveError::UnknownRoot(root.clone()))?;
        Ok(CompiledMessage {
            declaration,
            digest: compute_digest(resolution, self.algorithm.as_ref())?,
            definition: full_definition(resolution),
            plan,
            plans,
        })
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilerBuilder {
    /// Set the compiler configuration (default: [`CompilerConfig::default`]).
    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the digest algorithm (default: [`Md5`]).
    pub fn with_digest_algorithm(mut self, algorithm: impl DigestAlgorithm + 'static) -> Self {
        self.algorithm = Arc::new(algorithm);
        self
    }

    /// Build the compiler.
    pub fn build(self) -> Compiler {
        Compiler {
            config: self.config,
            algorithm: self.algorithm,
        }
    }
}
