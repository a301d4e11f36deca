//! password-sealed secrets
//!
//! argon2id stretches the password, chacha20poly1305 encrypts. the
//! envelope records its own kdf parameters so any client can open it
//! later, and carries an integrity digest over every field so a
//! corrupted envelope is reported as corruption, not as a wrong
//! password.

use argon2::{Argon2, Params, Version};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::{rng, Error, Result};

/// argon2id parameters - tuned for reasonable security on commodity hardware
const ARGON2_M_COST: u32 = 16 * 1024; // 16 MiB
const ARGON2_T_COST: u32 = 32;        // 32 iterations
const ARGON2_P_COST: u32 = 1;         // parallelism 1

/// argon2 salt width
pub const SALT_LEN: usize = 16;

/// aead nonce width
pub const NONCE_LEN: usize = 12;

/// envelope format version
const ENVELOPE_VERSION: u8 = 1;

/// domain separator for the integrity digest
const CHECKSUM_DOMAIN: &[u8] = b"shardbox:sealed_secret:v1";

/// argon2id cost parameters, embedded in every envelope
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KdfParams {
    pub m_cost: u32,
    pub t_cost: u32,
    pub p_cost: u32,
}

impl KdfParams {
    /// light profile for tests and latency-sensitive callers
    pub fn light() -> Self {
        Self {
            m_cost: 64,
            t_cost: 2,
            p_cost: 1,
        }
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            m_cost: ARGON2_M_COST,
            t_cost: ARGON2_T_COST,
            p_cost: ARGON2_P_COST,
        }
    }
}

/// stretch a password into a 32-byte key using argon2id
pub fn stretch_password(
    password: &[u8],
    salt: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; 32]>> {
    let argon_params = Params::new(params.m_cost, params.t_cost, params.p_cost, Some(32))
        .map_err(|e| Error::KdfFailed(e.to_string()))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut output = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into(password, salt, &mut *output)
        .map_err(|e| Error::KdfFailed(e.to_string()))?;
    Ok(output)
}

/// self-describing password-sealed envelope
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealedSecret {
    /// envelope format version
    pub version: u8,
    /// kdf costs used to stretch the password
    pub kdf: KdfParams,
    /// argon2 salt
    #[serde(with = "hex_bytes")]
    pub salt: Vec<u8>,
    /// aead nonce
    #[serde(with = "hex_bytes")]
    pub nonce: Vec<u8>,
    /// chacha20poly1305 ciphertext, tag appended
    #[serde(with = "hex_bytes")]
    pub ciphertext: Vec<u8>,
    /// integrity digest over all fields above
    #[serde(with = "hex_bytes")]
    pub checksum: Vec<u8>,
}

impl SealedSecret {
    /// seal plaintext under a password with fresh salt and nonce
    pub fn seal(plaintext: &[u8], password: &str, params: KdfParams) -> Result<Self> {
        let salt = rng::random_bytes::<SALT_LEN>()?;
        let nonce = rng::random_bytes::<NONCE_LEN>()?;
        Self::seal_with_parts(plaintext, password, params, &salt, &nonce)
    }

    /// seal with caller-provided salt and nonce
    ///
    /// deterministic given identical inputs, which is what the tests
    /// rely on; production paths go through [`SealedSecret::seal`]
    pub fn seal_with_parts(
        plaintext: &[u8],
        password: &str,
        params: KdfParams,
        salt: &[u8; SALT_LEN],
        nonce: &[u8; NONCE_LEN],
    ) -> Result<Self> {
        let key = stretch_password(password.as_bytes(), salt, &params)?;
        let cipher = ChaCha20Poly1305::new_from_slice(&key[..])
            .map_err(|e| Error::EncryptionFailed(e.to_string()))?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(nonce), plaintext)
            .map_err(|e| Error::EncryptionFailed(e.to_string()))?;

        let mut sealed = Self {
            version: ENVELOPE_VERSION,
            kdf: params,
            salt: salt.to_vec(),
            nonce: nonce.to_vec(),
            ciphertext,
            checksum: Vec::new(),
        };
        sealed.checksum = sealed.integrity_digest().to_vec();
        Ok(sealed)
    }

    /// open the envelope with a password
    ///
    /// the integrity digest is checked first, so corruption surfaces as
    /// `CorruptEnvelope` and only a genuine aead tag failure becomes
    /// `WrongPassword`
    pub fn open(&self, password: &str) -> Result<Zeroizing<Vec<u8>>> {
        self.verify()?;

        let key = stretch_password(password.as_bytes(), &self.salt, &self.kdf)?;
        let cipher = ChaCha20Poly1305::new_from_slice(&key[..])
            .map_err(|e| Error::DecryptionFailed(e.to_string()))?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(&self.nonce), self.ciphertext.as_slice())
            .map_err(|_| Error::WrongPassword)?;
        Ok(Zeroizing::new(plaintext))
    }

    /// verify field widths and the integrity digest
    pub fn verify(&self) -> Result<()> {
        if self.salt.len() != SALT_LEN || self.nonce.len() != NONCE_LEN {
            return Err(Error::CorruptEnvelope);
        }
        let expected = self.integrity_digest();
        if self.checksum != expected {
            return Err(Error::CorruptEnvelope);
        }
        Ok(())
    }

    /// serialize to the json wire form
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// parse from the json wire form and verify integrity
    pub fn from_json(s: &str) -> Result<Self> {
        let sealed: Self = serde_json::from_str(s).map_err(|_| Error::CorruptEnvelope)?;
        sealed.verify()?;
        Ok(sealed)
    }

    fn integrity_digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(CHECKSUM_DOMAIN);
        hasher.update([self.version]);
        hasher.update(self.kdf.m_cost.to_le_bytes());
        hasher.update(self.kdf.t_cost.to_le_bytes());
        hasher.update(self.kdf.p_cost.to_le_bytes());
        hasher.update(&self.salt);
        hasher.update(&self.nonce);
        hasher.update(&self.ciphertext);
        hasher.finalize().into()
    }
}

/// hex serialization helper for serde
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}
