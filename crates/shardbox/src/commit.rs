//! commitment chain derivation
//!
//! four hash links bind a registration together: the claimed name, the
//! salt only the user holds, the share they keep, and the device they
//! enrolled from. derivation is pure - same inputs, same chain.

use serde::{Deserialize, Serialize};

use crate::device::DeviceFingerprint;
use crate::hash::{hex_prefixed, Hasher};
use crate::shamir::Share;
use crate::{rng, Error, Result};

/// random per-user salt, one byte under the field width
#[derive(Clone, PartialEq, Eq)]
pub struct UserSalt([u8; rng::FIELD_ELEMENT_BYTES]);

impl UserSalt {
    /// draw a fresh salt
    pub fn random() -> Result<Self> {
        Ok(Self(rng::random_field_element()?))
    }

    pub fn from_bytes(bytes: [u8; rng::FIELD_ELEMENT_BYTES]) -> Self {
        Self(bytes)
    }

    /// parse the 0x-prefixed hex form
    pub fn from_hex(s: &str) -> Result<Self> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped).map_err(|_| Error::InvalidSalt)?;
        let bytes: [u8; rng::FIELD_ELEMENT_BYTES] =
            bytes.try_into().map_err(|_| Error::InvalidSalt)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; rng::FIELD_ELEMENT_BYTES] {
        &self.0
    }

    /// 0x-prefixed hex form used in commitments and the bundle
    pub fn to_hex(&self) -> String {
        hex_prefixed(&self.0)
    }
}

impl std::fmt::Debug for UserSalt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // the salt is a commitment preimage, keep it out of logs
        f.write_str("UserSalt(<redacted>)")
    }
}

/// the four commitment links sent to the server
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentChain {
    pub username_hash: String,
    pub salt_commitment: String,
    pub identity_commitment: String,
    pub device_commitment: String,
}

/// derive the commitment chain
///
/// concatenation order and encodings are fixed by the wire protocol:
/// strings hash as utf-8, the salt as 0x-hex, share one as base64, and
/// each link feeds the next as 0x-hex
pub fn derive_chain<H: Hasher>(
    hasher: &H,
    name: &str,
    salt: &UserSalt,
    share_one: &Share,
    device: &DeviceFingerprint,
) -> CommitmentChain {
    let salt_hex = salt.to_hex();
    let share_b64 = share_one.to_base64();
    let device_hex = device.to_hex();

    let username_hash = hasher.digest_hex(name.as_bytes());
    let salt_commitment = hasher.digest_hex(format!("{}{}", name, salt_hex).as_bytes());
    let identity_commitment = hasher.digest_hex(format!("{}{}", share_b64, salt_hex).as_bytes());
    let device_commitment =
        hasher.digest_hex(format!("{}{}", identity_commitment, device_hex).as_bytes());

    CommitmentChain {
        username_hash,
        salt_commitment,
        identity_commitment,
        device_commitment,
    }
}
