//! error types for shardbox

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // === validation errors ===
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("password confirmation does not match")]
    PasswordMismatch,

    // === crypto errors ===
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("kdf failed: {0}")]
    KdfFailed(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("wrong password")]
    WrongPassword,

    #[error("invalid private key bytes")]
    InvalidPrivateKey,

    #[error("invalid salt encoding")]
    InvalidSalt,

    // === share errors ===
    #[error("invalid split parameters: {shares} shares with threshold {threshold}")]
    InvalidQuorum { shares: u8, threshold: u8 },

    #[error("malformed share: {0}")]
    MalformedShare(&'static str),

    #[error("not enough shares: have {have}, need {need}")]
    NotEnoughShares { have: usize, need: usize },

    #[error("sealed envelope corrupted")]
    CorruptEnvelope,

    #[error("recovered address {derived} does not match expected {expected}")]
    AddressMismatch { expected: String, derived: String },

    // === submission errors ===
    #[error("registration rejected: {0}")]
    SubmissionRejected(String),

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}
