//! end-to-end registration and recovery
//!
//! runs the whole pipeline through the public api:
//! 1. register a user against an in-memory directory
//! 2. recover the wallet from the exported bundle
//! 3. fail the right way on missing shares, wrong passwords,
//!    and corrupted shares

use shardbox::{
    Error, EvmWalletProvider, Gf256Splitter, Hasher, KdfParams, MemoryDirectory, Registrar,
    RegistrationRequest, Sha256Hasher, Share, SubmissionStatus, RECOVERY_THRESHOLD, SHARE_COUNT,
};

type TestRegistrar = Registrar<EvmWalletProvider, Gf256Splitter, Sha256Hasher, MemoryDirectory>;

/// registrar with cheap kdf parameters so the suite stays fast
fn registrar(directory: MemoryDirectory) -> TestRegistrar {
    Registrar::with_capabilities(
        EvmWalletProvider::new().with_kdf(KdfParams::light()),
        Gf256Splitter,
        Sha256Hasher,
        directory,
    )
}

fn alice() -> RegistrationRequest {
    RegistrationRequest {
        name: "alice".into(),
        email: "alice@example.com".into(),
        password: "Secr3t!".into(),
        password2: "Secr3t!".into(),
    }
}

#[test]
fn test_register_produces_full_artifacts() {
    let directory = MemoryDirectory::new();
    let registrar = registrar(directory.clone());

    let outcome = registrar.register(&alice()).unwrap();
    assert!(outcome.accepted());

    // bundle holds shares 2..=5; share one stays on the device
    assert_eq!(outcome.bundle.shares.len(), (SHARE_COUNT - 1) as usize);
    assert_eq!(outcome.bundle.threshold, RECOVERY_THRESHOLD);
    assert_eq!(outcome.bundle.total_shares, SHARE_COUNT);
    assert!(outcome.bundle.wallet_address.starts_with("0x"));
    assert_eq!(outcome.bundle.wallet_address.len(), 42);

    // directory recorded the transcript
    let stored = directory.get("alice@example.com").unwrap();
    assert_eq!(stored.wallet_address, outcome.bundle.wallet_address);
    assert_eq!(stored.identity_commitment, outcome.transcript.identity_commitment);
    assert!(stored.last_auth_timestamp.ends_with("+00:00"));
}

#[test]
fn test_recover_wallet_from_bundle() {
    let registrar = registrar(MemoryDirectory::new());
    let outcome = registrar.register(&alice()).unwrap();

    let wallet = registrar.recover_wallet(&outcome.bundle, "Secr3t!").unwrap();
    assert_eq!(wallet.address, outcome.transcript.wallet_address);
    assert_eq!(wallet.public_key, outcome.transcript.public_key);
}

#[test]
fn test_recover_is_share_order_independent() {
    let registrar = registrar(MemoryDirectory::new());
    let outcome = registrar.register(&alice()).unwrap();

    let mut shuffled = outcome.bundle.clone();
    shuffled.shares.reverse();
    let wallet = registrar.recover_wallet(&shuffled, "Secr3t!").unwrap();
    assert_eq!(wallet.address, outcome.bundle.wallet_address);
}

#[test]
fn test_three_shares_are_not_enough() {
    let registrar = registrar(MemoryDirectory::new());
    let outcome = registrar.register(&alice()).unwrap();

    let shares: Vec<Share> = outcome
        .bundle
        .shares
        .iter()
        .take(3)
        .map(|s| Share::from_base64(s).unwrap())
        .collect();

    let result = registrar.reconstruct(&shares, "Secr3t!");
    assert!(matches!(result, Err(Error::NotEnoughShares { have: 3, need: 4 })));
}

#[test]
fn test_wrong_password_is_reported_as_such() {
    let registrar = registrar(MemoryDirectory::new());
    let outcome = registrar.register(&alice()).unwrap();

    // all four shares are genuine, only the password is wrong
    let result = registrar.recover_wallet(&outcome.bundle, "Secr3t?");
    assert!(matches!(result, Err(Error::WrongPassword)));
}

#[test]
fn test_corrupted_share_is_not_blamed_on_the_password() {
    let registrar = registrar(MemoryDirectory::new());
    let outcome = registrar.register(&alice()).unwrap();

    let mut tampered = outcome.bundle.clone();
    let mut share = Share::from_base64(&tampered.shares[1]).unwrap();
    share.payload[7] ^= 0xff;
    tampered.shares[1] = share.to_base64();

    // the integrity check fires before any password is tried
    let result = registrar.recover_wallet(&tampered, "Secr3t!");
    assert!(matches!(result, Err(Error::CorruptEnvelope)));
}

#[test]
fn test_share_from_another_registration_is_rejected() {
    let registrar = registrar(MemoryDirectory::new());
    let first = registrar.register(&alice()).unwrap();

    let mut other = alice();
    other.email = "alice2@example.com".into();
    let second = registrar.register(&other).unwrap();

    let mut mixed = first.bundle.clone();
    mixed.shares[0] = second.bundle.shares[0].clone();

    let result = registrar.recover_wallet(&mixed, "Secr3t!");
    assert!(result.is_err());
    assert!(!matches!(result, Err(Error::WrongPassword)));
}

#[test]
fn test_duplicate_email_keeps_bundle_usable() {
    let directory = MemoryDirectory::new();
    let registrar = registrar(directory.clone());

    let first = registrar.register(&alice()).unwrap();
    assert!(first.accepted());

    let second = registrar.register(&alice()).unwrap();
    assert!(matches!(second.status, SubmissionStatus::Failed(_)));
    assert_eq!(directory.len(), 1);

    // the rejected registration still yields a working bundle
    let wallet = registrar.recover_wallet(&second.bundle, "Secr3t!").unwrap();
    assert_eq!(wallet.address, second.bundle.wallet_address);
}

#[test]
fn test_directory_can_verify_commitment_links() {
    let registrar = registrar(MemoryDirectory::new());
    let outcome = registrar.register(&alice()).unwrap();
    let transcript = &outcome.transcript;
    let bundle = &outcome.bundle;
    let hasher = Sha256Hasher;

    // name and salt reproduce the first two links
    assert_eq!(transcript.username_hash, hasher.digest_hex(b"alice"));
    assert_eq!(
        transcript.salt_commitment,
        hasher.digest_hex(format!("alice{}", bundle.user_salt).as_bytes())
    );

    // the device link chains off the identity commitment
    assert_eq!(
        transcript.device_commitment,
        hasher.digest_hex(
            format!("{}{}", transcript.identity_commitment, bundle.device_id).as_bytes()
        )
    );

    // the identity link needs share one, which the bundle never carries
    for encoded in &bundle.shares {
        let share = Share::from_base64(encoded).unwrap();
        assert_ne!(share.index, 1);
        assert_ne!(
            transcript.identity_commitment,
            hasher.digest_hex(format!("{}{}", encoded, bundle.user_salt).as_bytes())
        );
    }
}

#[test]
fn test_default_registrar_roundtrip() {
    // production kdf parameters, one pass only
    let registrar = Registrar::new(MemoryDirectory::new());
    let outcome = registrar.register(&alice()).unwrap();
    assert!(outcome.accepted());

    let wallet = registrar.recover_wallet(&outcome.bundle, "Secr3t!").unwrap();
    assert_eq!(wallet.address, outcome.bundle.wallet_address);
}

#[test]
fn test_bundle_export_roundtrip() {
    let registrar = registrar(MemoryDirectory::new());
    let outcome = registrar.register(&alice()).unwrap();

    let exported = outcome.bundle.to_json().unwrap();
    let imported = shardbox::RecoveryBundle::from_json(&exported).unwrap();

    let wallet = registrar.recover_wallet(&imported, "Secr3t!").unwrap();
    assert_eq!(wallet.address, outcome.bundle.wallet_address);
}
