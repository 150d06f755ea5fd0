//! Digest values and the replaceable digest algorithm.

use std::{fmt, str::FromStr};

use md5::{Digest, Md5 as Md5Hasher};

/// A 128-bit function over the md5 text of a declaration.
///
/// Peers only agree on a digest when they use the same algorithm, so anything
/// but [`Md5`] produces identities that are private to this process.
pub trait DigestAlgorithm: Send + Sync {
    fn digest(&self, text: &[u8]) -> CanonicalDigest;
}

/// The ROS1 md5sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Md5;

impl DigestAlgorithm for Md5 {
    fn digest(&self, text: &[u8]) -> CanonicalDigest {
        let mut hasher = Md5Hasher::new();
        hasher.update(text);
        let mut out = [0u8; 16];
        out.copy_from_slice(&hasher.finalize());
        CanonicalDigest(out)
    }
}

/// Content identity of a message type. Equal digests mean wire-compatible types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalDigest(pub [u8; 16]);

impl CanonicalDigest {
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Lower-case hex, the interchange form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Big-endian high and low halves, for bindings that store the digest as two integers.
    pub fn halves(&self) -> (u64, u64) {
        let mut hi = [0u8; 8];
        let mut lo = [0u8; 8];
        hi.copy_from_slice(&self.0[..8]);
        lo.copy_from_slice(&self.0[8..]);
        (u64::from_be_bytes(hi), u64::from_be_bytes(lo))
    }
}

impl fmt::Display for CanonicalDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for CanonicalDigest {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut out = [0u8; 16];
        hex::decode_to_slice(s, &mut out)?;
        Ok(Self(out))
    }
}
