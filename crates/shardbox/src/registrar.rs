//! registration pipeline
//!
//! validate -> generate wallet -> seal key -> split -> commit -> submit.
//! a registrar holds no state between calls; each request owns its
//! secrets and they are zeroed when the call frame drops, on success
//! and on every failure path alike.
//!
//! recovery runs the pipeline backwards: shares are combined into the
//! sealed envelope, the envelope opened with the password, and the
//! wallet re-derived and checked against the recorded address.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::commit::{derive_chain, UserSalt};
use crate::device::DeviceFingerprint;
use crate::directory::{Ack, Directory};
use crate::hash::{Hasher, Sha256Hasher};
use crate::seal::SealedSecret;
use crate::shamir::{Gf256Splitter, SecretSplitter, Share};
use crate::wallet::{EvmWalletProvider, PrivateKey, Wallet, WalletProvider};
use crate::{Error, Result};

/// shares created per registration
pub const SHARE_COUNT: u8 = 5;

/// shares required for reconstruction
pub const RECOVERY_THRESHOLD: u8 = 4;

/// suggested filename when exporting the recovery bundle
pub const RECOVERY_BUNDLE_FILENAME: &str = "wallet-zkp-shares.json";

/// what the caller supplies to register
#[derive(Clone, Debug)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

/// transcript submitted to the directory
///
/// carries the login credential and public commitments; never key,
/// salt, device or share material
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationTranscript {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password2: String,
    pub wallet_address: String,
    pub public_key: String,
    pub username_hash: String,
    pub salt_commitment: String,
    pub identity_commitment: String,
    pub device_commitment: String,
    /// iso-8601 with an explicit utc offset
    pub last_auth_timestamp: String,
}

/// user-held recovery bundle
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryBundle {
    /// base64 shares 2..=n; share one stays with the user's commitments
    pub shares: Vec<String>,
    pub wallet_address: String,
    pub threshold: u8,
    pub total_shares: u8,
    /// sealed private key envelope, json-encoded
    pub private_key: String,
    /// 0x-hex user salt
    pub user_salt: String,
    /// 0x-hex device fingerprint
    pub device_id: String,
}

impl RecoveryBundle {
    /// pretty-printed json for export to a file
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// parse an exported bundle
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// artifacts from the local pipeline, not yet submitted
#[derive(Clone, Debug)]
pub struct PreparedRegistration {
    pub transcript: RegistrationTranscript,
    pub bundle: RecoveryBundle,
}

/// how the directory answered
#[derive(Clone, Debug)]
pub enum SubmissionStatus {
    /// transcript recorded
    Accepted(Ack),
    /// rejected or unreachable; reason verbatim
    Failed(String),
}

/// everything register produces
///
/// the bundle is present even when submission fails: once the key
/// material exists, losing the bundle would strand it
#[derive(Clone, Debug)]
pub struct RegistrationOutcome {
    pub transcript: RegistrationTranscript,
    pub bundle: RecoveryBundle,
    pub status: SubmissionStatus,
}

impl RegistrationOutcome {
    pub fn accepted(&self) -> bool {
        matches!(self.status, SubmissionStatus::Accepted(_))
    }
}

/// registration orchestrator over injected capabilities
pub struct Registrar<W, S, H, D> {
    wallet: W,
    splitter: S,
    hasher: H,
    directory: D,
}

impl<D: Directory> Registrar<EvmWalletProvider, Gf256Splitter, Sha256Hasher, D> {
    /// registrar with the default capability set
    pub fn new(directory: D) -> Self {
        Self::with_capabilities(EvmWalletProvider::new(), Gf256Splitter, Sha256Hasher, directory)
    }
}

impl<W, S, H, D> Registrar<W, S, H, D>
where
    W: WalletProvider,
    S: SecretSplitter,
    H: Hasher,
    D: Directory,
{
    /// registrar with explicit capabilities
    pub fn with_capabilities(wallet: W, splitter: S, hasher: H, directory: D) -> Self {
        Self {
            wallet,
            splitter,
            hasher,
            directory,
        }
    }

    /// run the local pipeline and submit the transcript
    pub fn register(&self, request: &RegistrationRequest) -> Result<RegistrationOutcome> {
        let prepared = self.prepare(request)?;

        debug!(address = %prepared.transcript.wallet_address, "submitting transcript");
        let status = match self.directory.submit(&prepared.transcript) {
            Ok(ack) => {
                info!(address = %prepared.transcript.wallet_address, "registration accepted");
                SubmissionStatus::Accepted(ack)
            }
            Err(e) => {
                warn!(error = %e, "registration submission failed");
                SubmissionStatus::Failed(e.to_string())
            }
        };

        Ok(RegistrationOutcome {
            transcript: prepared.transcript,
            bundle: prepared.bundle,
            status,
        })
    }

    /// run the local pipeline only: validate, generate, seal, split, commit
    pub fn prepare(&self, request: &RegistrationRequest) -> Result<PreparedRegistration> {
        validate(request)?;

        debug!("generating wallet keypair");
        let wallet = self.wallet.generate()?;

        debug!("sealing private key");
        let sealed = self.wallet.encrypt(wallet.private_key(), &request.password)?;
        let sealed_json = sealed.to_json()?;

        debug!(
            shares = SHARE_COUNT as usize,
            threshold = RECOVERY_THRESHOLD as usize,
            "splitting sealed key"
        );
        let set = self
            .splitter
            .split(sealed_json.as_bytes(), SHARE_COUNT, RECOVERY_THRESHOLD)?;

        let salt = UserSalt::random()?;
        let device = DeviceFingerprint::collect();

        debug!("deriving commitment chain");
        let chain = derive_chain(&self.hasher, &request.name, &salt, &set.shares[0], &device);

        let transcript = RegistrationTranscript {
            name: request.name.clone(),
            email: request.email.clone(),
            password: request.password.clone(),
            password2: request.password2.clone(),
            wallet_address: wallet.address.clone(),
            public_key: wallet.public_key.clone(),
            username_hash: chain.username_hash,
            salt_commitment: chain.salt_commitment,
            identity_commitment: chain.identity_commitment,
            device_commitment: chain.device_commitment,
            last_auth_timestamp: utc_timestamp(),
        };

        let bundle = RecoveryBundle {
            shares: set.shares[1..].iter().map(Share::to_base64).collect(),
            wallet_address: wallet.address.clone(),
            threshold: RECOVERY_THRESHOLD,
            total_shares: SHARE_COUNT,
            private_key: sealed_json,
            user_salt: salt.to_hex(),
            device_id: device.to_hex(),
        };

        Ok(PreparedRegistration { transcript, bundle })
    }

    /// rebuild the private key from shares and the password
    pub fn reconstruct(&self, shares: &[Share], password: &str) -> Result<PrivateKey> {
        if shares.len() < RECOVERY_THRESHOLD as usize {
            return Err(Error::NotEnoughShares {
                have: shares.len(),
                need: RECOVERY_THRESHOLD as usize,
            });
        }

        debug!(shares = shares.len(), "combining shares");
        let sealed_bytes = self.splitter.combine(shares)?;
        let sealed_json = String::from_utf8(sealed_bytes).map_err(|_| Error::CorruptEnvelope)?;
        let sealed = SealedSecret::from_json(&sealed_json)?;

        self.wallet.decrypt(&sealed, password)
    }

    /// restore the full wallet from an exported bundle
    ///
    /// re-derives the address and checks it against the bundle, so a
    /// reconstruction from bad shares cannot hand back a silently
    /// wrong key
    pub fn recover_wallet(&self, bundle: &RecoveryBundle, password: &str) -> Result<Wallet> {
        let shares = bundle
            .shares
            .iter()
            .map(|s| Share::from_base64(s))
            .collect::<Result<Vec<_>>>()?;

        let key = self.reconstruct(&shares, password)?;
        let wallet = self.wallet.from_key(&key)?;

        if !wallet.address.eq_ignore_ascii_case(&bundle.wallet_address) {
            return Err(Error::AddressMismatch {
                expected: bundle.wallet_address.clone(),
                derived: wallet.address.clone(),
            });
        }

        info!(address = %wallet.address, "wallet recovered");
        Ok(wallet)
    }
}

/// reject empty fields and mismatched password confirmation
fn validate(request: &RegistrationRequest) -> Result<()> {
    if request.name.trim().is_empty() {
        return Err(Error::EmptyField("name"));
    }
    if request.email.trim().is_empty() {
        return Err(Error::EmptyField("email"));
    }
    if request.password.is_empty() {
        return Err(Error::EmptyField("password"));
    }
    if request.password2.is_empty() {
        return Err(Error::EmptyField("password confirmation"));
    }
    if request.password != request.password2 {
        return Err(Error::PasswordMismatch);
    }
    Ok(())
}

/// iso-8601 utc, millisecond precision, explicit +00:00 offset
fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, false)
}
