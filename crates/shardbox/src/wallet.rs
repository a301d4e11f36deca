//! wallet generation and key sealing
//!
//! secp256k1 keypair with a keccak-256 address, the usual evm shape.
//! the private key never leaves this module unsealed: callers get it
//! back only through `decrypt`, and it is zeroed when dropped.

use k256::ecdsa::SigningKey;
use k256::FieldBytes;
use sha3::{Digest, Keccak256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::hash::hex_prefixed;
use crate::seal::{KdfParams, SealedSecret};
use crate::{rng, Error, Result};

/// 32-byte secp256k1 private key, zeroed on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    /// wrap raw key bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// raw key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// 0x-prefixed hex form
    pub fn to_hex(&self) -> String {
        hex_prefixed(&self.0)
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// generated wallet: public half plus the guarded private key
pub struct Wallet {
    /// 0x-prefixed keccak-256 address, lowercase
    pub address: String,
    /// 0x-prefixed uncompressed sec1 public key
    pub public_key: String,
    private_key: PrivateKey,
}

impl Wallet {
    /// the private key, readable only while the wallet is alive
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// capability seam for wallet generation and key sealing
pub trait WalletProvider {
    /// generate a fresh wallet from os entropy
    fn generate(&self) -> Result<Wallet>;

    /// rebuild the public half from an existing private key
    fn from_key(&self, key: &PrivateKey) -> Result<Wallet>;

    /// seal the private key under a password
    fn encrypt(&self, key: &PrivateKey, password: &str) -> Result<SealedSecret>;

    /// open a sealed key; a wrong password fails with `WrongPassword`
    fn decrypt(&self, sealed: &SealedSecret, password: &str) -> Result<PrivateKey>;
}

/// secp256k1 + keccak-256 wallet provider
#[derive(Clone, Debug, Default)]
pub struct EvmWalletProvider {
    kdf: KdfParams,
}

impl EvmWalletProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// override the kdf costs embedded in sealed keys
    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }
}

impl WalletProvider for EvmWalletProvider {
    fn generate(&self) -> Result<Wallet> {
        // rejection-sample until the bytes form a valid scalar; with a
        // 256-bit curve order a retry is all but unreachable
        let key = loop {
            let bytes = rng::random_bytes::<32>()?;
            if SigningKey::from_bytes(FieldBytes::from_slice(&bytes)).is_ok() {
                break PrivateKey::from_bytes(bytes);
            }
        };
        self.from_key(&key)
    }

    fn from_key(&self, key: &PrivateKey) -> Result<Wallet> {
        let signing_key = SigningKey::from_bytes(FieldBytes::from_slice(key.as_bytes()))
            .map_err(|_| Error::InvalidPrivateKey)?;
        let verifying_key = signing_key.verifying_key();
        let encoded_point = verifying_key.to_encoded_point(false);
        let public_key_bytes = encoded_point.as_bytes();

        // address = last 20 bytes of keccak256 over the uncompressed
        // public key minus its 0x04 prefix
        let digest = Keccak256::digest(&public_key_bytes[1..]);
        let address = format!("0x{}", hex::encode(&digest[12..]));
        let public_key = format!("0x{}", hex::encode(public_key_bytes));

        Ok(Wallet {
            address,
            public_key,
            private_key: key.clone(),
        })
    }

    fn encrypt(&self, key: &PrivateKey, password: &str) -> Result<SealedSecret> {
        SealedSecret::seal(key.as_bytes(), password, self.kdf)
    }

    fn decrypt(&self, sealed: &SealedSecret, password: &str) -> Result<PrivateKey> {
        let plaintext = sealed.open(password)?;
        let bytes: [u8; 32] = plaintext
            .as_slice()
            .try_into()
            .map_err(|_| Error::InvalidPrivateKey)?;
        Ok(PrivateKey::from_bytes(bytes))
    }
}
