//! randomness helpers
//!
//! all entropy comes from the operating system csprng. a failure to
//! draw entropy is surfaced as an error, never retried against a
//! weaker source.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::{Error, Result};

/// width in bytes of a random field element
///
/// one byte under the 32-byte field modulus, so sampled values always
/// sit below it without modulo reduction
pub const FIELD_ELEMENT_BYTES: usize = 31;

/// fill a buffer from the os csprng
pub fn fill(buf: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| Error::EntropyUnavailable(e.to_string()))
}

/// generate random bytes
pub fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    fill(&mut bytes)?;
    Ok(bytes)
}

/// sample a random field element
pub fn random_field_element() -> Result<[u8; FIELD_ELEMENT_BYTES]> {
    random_bytes()
}
