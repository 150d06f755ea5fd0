//! Compiler output: everything a code generator needs for one type.

use std::sync::Arc;

use msgc_codec::{decode, encode};
use msgc_core::{CodecError, Declaration, TypeRef, Value};
use msgc_hash::CanonicalDigest;
use msgc_plan::{PlanTable, SerializationPlan};

/// A compiled message type.
#[derive(Debug, Clone)]
pub struct CompiledMessage {
    /// The declaration with every nested reference resolved.
    pub declaration: Arc<Declaration>,
    pub digest: CanonicalDigest,
    /// Expanded definition: own source, then each dependency's.
    pub definition: String,
    pub plan: SerializationPlan,
    /// Plans for this type and every type it embeds.
    pub plans: PlanTable,
}

impl CompiledMessage {
    pub fn type_ref(&self) -> &TypeRef {
        &self.declaration.type_ref
    }

    /// `package/Name`.
    pub fn type_name(&self) -> String {
        self.declaration.type_ref.to_string()
    }

    pub fn md5sum(&self) -> String {
        self.digest.to_hex()
    }

    pub fn is_fixed_size(&self) -> bool {
        self.plan.is_fixed_size
    }

    pub fn has_header(&self) -> bool {
        self.plan.has_header
    }

    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        encode(&self.plans, value)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        decode(&self.plans, bytes)
    }
}

/// A compiled service: both halves plus the service md5sum.
#[derive(Debug, Clone)]
pub struct CompiledService {
    pub type_ref: TypeRef,
    pub digest: CanonicalDigest,
    pub request: CompiledMessage,
    pub response: CompiledMessage,
}

impl CompiledService {
    pub fn md5sum(&self) -> String {
        self.digest.to_hex()
    }
}
