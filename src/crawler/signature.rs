//! Directory signatures
//!
//! A signature fingerprints a directory's name together with the ordered
//! paths of its listed children. An unchanged listing always hashes to the
//! same value; reordering the listing counts as a change.

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use url::Url;

/// Number of digest bytes kept in a signature
pub const SIGNATURE_LEN: usize = 16;

/// Fixed-size fingerprint of a directory listing
///
/// Not an identity: collisions only affect change detection.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DirectorySignature([u8; SIGNATURE_LEN]);

impl DirectorySignature {
    /// Hashes a directory name and the paths of its child links
    pub fn compute(name: &str, children: &[Url]) -> Self {
        Self::from_paths(name, children.iter().map(|link| link.path()))
    }

    /// Hashes a directory name and an ordered sequence of child paths
    pub fn from_paths<I, S>(name: &str, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        for path in paths {
            hasher.update(path.as_ref().as_bytes());
        }
        let digest = hasher.finalize();

        let mut key = [0u8; SIGNATURE_LEN];
        key.copy_from_slice(&digest[..SIGNATURE_LEN]);
        Self(key)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a signature previously produced by `to_hex`
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        let key: [u8; SIGNATURE_LEN] = bytes.try_into().ok()?;
        Some(Self(key))
    }
}

impl fmt::Debug for DirectorySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DirectorySignature({})", self.to_hex())
    }
}

impl fmt::Display for DirectorySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for DirectorySignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let a = DirectorySignature::from_paths("pub", ["/pub/a", "/pub/b/"]);
        let b = DirectorySignature::from_paths("pub", ["/pub/a", "/pub/b/"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_known_value() {
        // SHA-256("pub/pub/a") truncated to 16 bytes
        let sig = DirectorySignature::from_paths("pub", ["/pub/a"]);
        let mut hasher = Sha256::new();
        hasher.update(b"pub/pub/a");
        let digest = hasher.finalize();
        assert_eq!(&sig.as_bytes()[..], &digest[..SIGNATURE_LEN]);
    }

    #[test]
    fn test_order_sensitive() {
        let a = DirectorySignature::from_paths("pub", ["/pub/a", "/pub/b"]);
        let b = DirectorySignature::from_paths("pub", ["/pub/b", "/pub/a"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_name_sensitive() {
        let a = DirectorySignature::from_paths("pub", ["/x"]);
        let b = DirectorySignature::from_paths("priv", ["/x"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_compute_uses_link_paths() {
        let links = vec![
            Url::parse("http://host/pub/a").unwrap(),
            Url::parse("http://host/pub/b/").unwrap(),
        ];
        assert_eq!(
            DirectorySignature::compute("pub", &links),
            DirectorySignature::from_paths("pub", ["/pub/a", "/pub/b/"])
        );
    }

    #[test]
    fn test_hex_roundtrip() {
        let sig = DirectorySignature::from_paths("pub", ["/pub/a"]);
        assert_eq!(sig.to_hex().len(), SIGNATURE_LEN * 2);
        assert_eq!(DirectorySignature::from_hex(&sig.to_hex()), Some(sig));
        assert_eq!(DirectorySignature::from_hex("abcd"), None);
    }
}
