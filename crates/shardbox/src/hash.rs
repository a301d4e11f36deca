//! hashing seam for commitment derivation
//!
//! the commitment chain only needs a 256-bit one-way hash. sha-256 is
//! the default; the trait lets embedders swap in another digest without
//! touching the derivation logic.

use sha2::{Digest, Sha256};

/// 256-bit one-way hash
pub trait Hasher {
    /// hash arbitrary bytes to 32 bytes
    fn digest(&self, data: &[u8]) -> [u8; 32];

    /// hash to the 0x-prefixed lowercase hex form used on the wire
    fn digest_hex(&self, data: &[u8]) -> String {
        hex_prefixed(&self.digest(data))
    }
}

/// default sha-256 hasher
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn digest(&self, data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }
}

/// render bytes as 0x-prefixed lowercase hex
pub fn hex_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        let hasher = Sha256Hasher;
        assert_eq!(
            hasher.digest_hex(b""),
            "0xe3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hasher.digest_hex(b"abc"),
            "0xba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_deterministic() {
        let hasher = Sha256Hasher;
        assert_eq!(hasher.digest(b"alice"), hasher.digest(b"alice"));
        assert_ne!(hasher.digest(b"alice"), hasher.digest(b"alicf"));
    }

    #[test]
    fn test_hex_prefixed_shape() {
        let hasher = Sha256Hasher;
        let hex = hasher.digest_hex(b"anything");
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.len(), 66);
        assert!(hex[2..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
