//! device fingerprinting
//!
//! a stable identifier hashed from local environment signals. computed
//! entirely client-side; the rest of the protocol treats it as opaque
//! bytes.

use sha2::{Digest, Sha256};

use crate::hash::hex_prefixed;

/// opaque device fingerprint
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceFingerprint([u8; 32]);

impl DeviceFingerprint {
    /// fingerprint this machine
    ///
    /// stable across runs on the same host as long as the environment
    /// signals do not change
    pub fn collect() -> Self {
        let hostname = std::env::var("HOSTNAME").unwrap_or_default();
        let user = std::env::var("USER").unwrap_or_default();
        let lang = std::env::var("LANG").unwrap_or_default();
        Self::from_signals(&[
            std::env::consts::OS,
            std::env::consts::ARCH,
            &hostname,
            &user,
            &lang,
        ])
    }

    /// build a fingerprint from explicit signals
    pub fn from_signals(signals: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for (i, signal) in signals.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(signal.as_bytes());
        }
        Self(hasher.finalize().into())
    }

    /// raw fingerprint bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// 0x-prefixed hex form used in commitments and the bundle
    pub fn to_hex(&self) -> String {
        hex_prefixed(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_signals_deterministic() {
        let a = DeviceFingerprint::from_signals(&["linux", "x86_64", "host"]);
        let b = DeviceFingerprint::from_signals(&["linux", "x86_64", "host"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_signals_are_separated() {
        // "ab"+"c" and "a"+"bc" must not collide
        let a = DeviceFingerprint::from_signals(&["ab", "c"]);
        let b = DeviceFingerprint::from_signals(&["a", "bc"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_collect_stable() {
        assert_eq!(DeviceFingerprint::collect(), DeviceFingerprint::collect());
    }

    #[test]
    fn test_hex_shape() {
        let fp = DeviceFingerprint::from_signals(&["linux"]);
        let hex = fp.to_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.len(), 66);
    }
}
