use msgc_core::{ResolveError, TypeRef};
use msgc_resolver::Resolution;
use tracing::trace;

use crate::{
    digest::{CanonicalDigest, DigestAlgorithm},
    text::{DigestMap, md5_text},
};

/// Digest of every type in the resolution, dependencies before dependents.
/// Each type is hashed once no matter how often it is referenced.
pub fn compute_digests(
    resolution: &Resolution,
    algorithm: &dyn DigestAlgorithm,
) -> Result<DigestMap, ResolveError> {
    let mut digests = DigestMap::new();
    for type_ref in resolution.bottom_up() {
        let Some(decl) = resolution.declaration(&type_ref) else {
            return Err(ResolveError::UnknownRoot(type_ref));
        };
        let text = md5_text(decl, &digests)?;
        let digest = algorithm.digest(text.as_bytes());
        trace!(type_ref = %type_ref, digest = %digest, "computed digest");
        digests.insert(type_ref, digest);
    }
    Ok(digests)
}

/// Digest of the resolution's root type.
pub fn compute_digest(
    resolution: &Resolution,
    algorithm: &dyn DigestAlgorithm,
) -> Result<CanonicalDigest, ResolveError> {
    let mut digests = compute_digests(resolution, algorithm)?;
    root_digest(&mut digests, resolution.root())
}

/// Digest of a service: the request md5 text immediately followed by the
/// response md5 text, with no separator.
pub fn service_digest(
    request: &Resolution,
    response: &Resolution,
    algorithm: &dyn DigestAlgorithm,
) -> Result<CanonicalDigest, ResolveError> {
    let request_text = md5_text(
        request.root_declaration(),
        &compute_digests(request, algorithm)?,
    )?;
    let response_text = md5_text(
        response.root_declaration(),
        &compute_digests(response, algorithm)?,
    )?;
    let mut text = request_text;
    text.push_str(&response_text);
    let digest = algorithm.digest(text.as_bytes());
    trace!(
        request = %request.root(),
        response = %response.root(),
        digest = %digest,
        "computed service digest"
    );
    Ok(digest)
}

fn root_digest(digests: &mut DigestMap, root: &TypeRef) -> Result<CanonicalDigest, ResolveError> {
    digests
        .remove(root)
        .ok_or_else(|| ResolveError::UnknownRoot(root.clone()))
}
