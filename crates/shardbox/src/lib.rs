//! # shardbox
//!
//! threshold identity registration: a fresh evm wallet key is sealed
//! under the user's password, split 4-of-5 into recovery shares, and
//! anchored to a directory server through a chain of hash commitments.
//!
//! the server learns commitments, never key material. the user keeps a
//! recovery bundle; any four shares plus the password bring the wallet
//! back.
//!
//! ## architecture
//!
//! ```text
//! ┌─────────────────────────┐
//! │ name + email + password │
//! └────────────┬────────────┘
//!              │ secp256k1 keygen
//!              ▼
//!        ┌──────────┐
//!        │  wallet  │
//!        └────┬─────┘
//!             │ argon2id + chacha20-poly1305
//!             ▼
//!      ┌───────────────┐
//!      │ sealed secret │
//!      └───────┬───────┘
//!              │ 4-of-5 gf(256) split
//!     ┌────┬───┴┬────┬────┐
//!     ▼    ▼    ▼    ▼    ▼
//!   ┌───┐┌───┐┌───┐┌───┐┌───┐
//!   │ 1 ││ 2 ││ 3 ││ 4 ││ 5 │
//!   └─┬─┘└─┬─┘└─┬─┘└─┬─┘└─┬─┘
//!     │    └────┴─┬──┴────┘
//!     │           ▼
//!     │   recovery bundle (stays with the user)
//!     │
//!     │ sha-256 commitment chain
//!     ▼
//!   usernameHash -> saltCommitment -> identityCommitment
//!   -> deviceCommitment  (transcript to directory server)
//! ```
//!
//! ## security properties
//!
//! - the wallet key exists in plaintext only inside the registration
//!   call frame and is zeroed when it drops
//! - fewer than four shares reveal nothing about the sealed envelope
//! - shares without the password open nothing; the password without
//!   the shares opens nothing
//! - share one never leaves the device; it binds the identity
//!   commitment the server verifies against
//! - the directory stores commitments and can confirm an identity
//!   claim without being able to forge one
//!
//! ## usage
//!
//! ```rust,ignore
//! use shardbox::{MemoryDirectory, Registrar, RegistrationRequest};
//!
//! let registrar = Registrar::new(MemoryDirectory::new());
//! let outcome = registrar.register(&RegistrationRequest {
//!     name: "alice".into(),
//!     email: "alice@example.com".into(),
//!     password: "Secr3t!".into(),
//!     password2: "Secr3t!".into(),
//! })?;
//!
//! // export the bundle; it is the only path back to the key
//! std::fs::write(
//!     shardbox::RECOVERY_BUNDLE_FILENAME,
//!     outcome.bundle.to_json()?,
//! )?;
//!
//! // later: the bundle's shares plus the password recover the wallet
//! let wallet = registrar.recover_wallet(&outcome.bundle, "Secr3t!")?;
//! println!("address: {}", wallet.address);
//! ```

pub mod error;
pub mod rng;
pub mod hash;
pub mod device;
pub mod seal;
pub mod wallet;
pub mod shamir;
pub mod commit;
pub mod directory;
pub mod registrar;

#[cfg(feature = "network")]
pub mod network;

pub use error::{Error, Result};
pub use registrar::{
    PreparedRegistration, RecoveryBundle, Registrar, RegistrationOutcome, RegistrationRequest,
    RegistrationTranscript, SubmissionStatus, RECOVERY_BUNDLE_FILENAME, RECOVERY_THRESHOLD,
    SHARE_COUNT,
};
pub use commit::{derive_chain, CommitmentChain, UserSalt};
pub use device::DeviceFingerprint;
pub use directory::{Ack, Directory, MemoryDirectory};
pub use hash::{Hasher, Sha256Hasher};
pub use seal::{KdfParams, SealedSecret};
pub use shamir::{Gf256Splitter, SecretSplitter, Share, ShareSet};
pub use wallet::{EvmWalletProvider, PrivateKey, Wallet, WalletProvider};

#[cfg(feature = "network")]
pub use network::{DirectoryEndpoint, HttpDirectory};
