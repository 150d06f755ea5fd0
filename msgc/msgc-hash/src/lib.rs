//! Canonical ROS1 md5sums and expanded definitions for resolved declarations.
//!
//! The md5sum of a type hashes its md5 text, in which every nested field is
//! replaced by the digest of the nested type. Digests are therefore computed
//! bottom-up over the [`Resolution`](msgc_resolver::Resolution):
//!
//! ```text
//! std_msgs/Header          "uint32 seq\ntime stamp\nstring frame_id"
//!        │ 2176decaecbce78abc3b96ef049fabed
//!        ▼
//! geometry_msgs/PointStamped  "2176deca… header\n4a842b65… point"
//! ```

mod compute;
mod digest;
mod text;

pub use compute::{compute_digest, compute_digests, service_digest};
pub use digest::{CanonicalDigest, DigestAlgorithm, Md5};
pub use text::{
    DEPENDENCY_SEPARATOR, DigestMap, canonical_text, full_definition, md5_text, normalized_lines,
};
