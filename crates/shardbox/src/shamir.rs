//! shamir secret sharing over GF(256)
//!
//! one polynomial per secret byte, evaluated at x = 1..=n so the
//! constant term (the secret byte) never appears as a share. any t
//! distinct shares reconstruct exactly; fewer reveal nothing.

use serde::{Deserialize, Serialize};

use crate::{rng, Error, Result};

/// a single share
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// evaluation point (1-indexed, never zero)
    pub index: u8,
    /// one field element per secret byte
    pub payload: Vec<u8>,
}

impl Share {
    /// encode as base64: index byte followed by the payload
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        let mut bytes = Vec::with_capacity(1 + self.payload.len());
        bytes.push(self.index);
        bytes.extend_from_slice(&self.payload);
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    /// decode from base64
    pub fn from_base64(s: &str) -> Result<Self> {
        use base64::Engine;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(s)
            .map_err(|_| Error::MalformedShare("invalid base64"))?;
        if bytes.is_empty() {
            return Err(Error::MalformedShare("empty share"));
        }
        if bytes[0] == 0 {
            return Err(Error::MalformedShare("index must be non-zero"));
        }
        Ok(Self {
            index: bytes[0],
            payload: bytes[1..].to_vec(),
        })
    }
}

/// the full set produced by one split
#[derive(Clone, Debug)]
pub struct ShareSet {
    /// threshold the shares were generated for
    pub threshold: u8,
    /// shares in index order, 1..=n
    pub shares: Vec<Share>,
}

impl ShareSet {
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

/// capability seam for threshold splitting
pub trait SecretSplitter {
    /// split a secret into n shares, any t of which reconstruct it
    fn split(&self, secret: &[u8], share_count: u8, threshold: u8) -> Result<ShareSet>;

    /// reconstruct a secret from distinct shares
    ///
    /// validates share structure only. a share carries no threshold
    /// metadata, so quorum enforcement belongs to the caller
    fn combine(&self, shares: &[Share]) -> Result<Vec<u8>>;
}

/// byte-wise shamir over GF(256)
#[derive(Clone, Copy, Debug, Default)]
pub struct Gf256Splitter;

impl SecretSplitter for Gf256Splitter {
    fn split(&self, secret: &[u8], share_count: u8, threshold: u8) -> Result<ShareSet> {
        if threshold == 0 || threshold > share_count {
            return Err(Error::InvalidQuorum {
                shares: share_count,
                threshold,
            });
        }

        let mut shares: Vec<Share> = (1..=share_count)
            .map(|index| Share {
                index,
                payload: vec![0u8; secret.len()],
            })
            .collect();

        // degree t-1 polynomial per byte: constant term is the secret
        // byte, higher coefficients are fresh randomness
        let mut coeffs = vec![0u8; threshold as usize];
        for (byte_pos, &secret_byte) in secret.iter().enumerate() {
            coeffs[0] = secret_byte;
            rng::fill(&mut coeffs[1..])?;

            for share in &mut shares {
                share.payload[byte_pos] = poly_eval(&coeffs, share.index);
            }
        }

        Ok(ShareSet { threshold, shares })
    }

    fn combine(&self, shares: &[Share]) -> Result<Vec<u8>> {
        let first = shares
            .first()
            .ok_or(Error::MalformedShare("no shares given"))?;
        let len = first.payload.len();

        let mut seen = [false; 256];
        for share in shares {
            if share.index == 0 {
                return Err(Error::MalformedShare("index must be non-zero"));
            }
            if seen[share.index as usize] {
                return Err(Error::MalformedShare("duplicate share index"));
            }
            seen[share.index as usize] = true;
            if share.payload.len() != len {
                return Err(Error::MalformedShare("inconsistent payload lengths"));
            }
        }

        let mut secret = vec![0u8; len];
        for (byte_pos, byte) in secret.iter_mut().enumerate() {
            let points: Vec<(u8, u8)> = shares
                .iter()
                .map(|s| (s.index, s.payload[byte_pos]))
                .collect();
            *byte = lagrange_interpolate(&points);
        }

        Ok(secret)
    }
}

/// GF(256) multiplication using the AES polynomial (x^8 + x^4 + x^3 + x + 1)
fn gf256_mul(a: u8, b: u8) -> u8 {
    let mut result = 0u8;
    let mut a = a;
    let mut b = b;

    while b != 0 {
        if b & 1 != 0 {
            result ^= a;
        }
        let hi = a & 0x80;
        a <<= 1;
        if hi != 0 {
            a ^= 0x1b; // AES polynomial
        }
        b >>= 1;
    }
    result
}

/// GF(256) multiplicative inverse via a^254
fn gf256_inv(a: u8) -> u8 {
    if a == 0 {
        return 0; // 0 has no inverse
    }
    let mut result = a;
    for _ in 0..6 {
        result = gf256_mul(result, result);
        result = gf256_mul(result, a);
    }
    gf256_mul(result, result)
}

/// GF(256) division
fn gf256_div(a: u8, b: u8) -> u8 {
    gf256_mul(a, gf256_inv(b))
}

/// evaluate polynomial at point x
fn poly_eval(coeffs: &[u8], x: u8) -> u8 {
    let mut result = 0u8;
    let mut x_power = 1u8;

    for &coeff in coeffs {
        result ^= gf256_mul(coeff, x_power);
        x_power = gf256_mul(x_power, x);
    }
    result
}

/// lagrange interpolation at x=0
fn lagrange_interpolate(points: &[(u8, u8)]) -> u8 {
    let mut result = 0u8;

    for (i, &(xi, yi)) in points.iter().enumerate() {
        let mut num = 1u8;
        let mut den = 1u8;

        for (j, &(xj, _)) in points.iter().enumerate() {
            if i != j {
                num = gf256_mul(num, xj); // (0 - xj) = xj in GF(256)
                den = gf256_mul(den, xi ^ xj); // (xi - xj)
            }
        }

        result ^= gf256_mul(yi, gf256_div(num, den));
    }

    result
}
