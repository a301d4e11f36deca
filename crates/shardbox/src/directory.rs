//! registration directory seam
//!
//! the server side of registration as this crate sees it: something
//! that records a transcript whole or not at all. the in-memory
//! directory backs the tests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::registrar::RegistrationTranscript;
use crate::{Error, Result};

/// acknowledgment from a directory
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Ack {
    /// optional free-text note from the server
    pub message: Option<String>,
}

/// submission seam
///
/// a rejection must leave no partial record behind
pub trait Directory {
    fn submit(&self, transcript: &RegistrationTranscript) -> Result<Ack>;
}

/// in-memory directory with an email uniqueness constraint
#[derive(Clone, Default)]
pub struct MemoryDirectory {
    records: Arc<RwLock<HashMap<String, RegistrationTranscript>>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// look up a recorded transcript by email
    pub fn get(&self, email: &str) -> Option<RegistrationTranscript> {
        self.records.read().ok()?.get(email).cloned()
    }

    /// number of recorded registrations
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Directory for MemoryDirectory {
    fn submit(&self, transcript: &RegistrationTranscript) -> Result<Ack> {
        let mut records = self
            .records
            .write()
            .map_err(|e| Error::Storage(e.to_string()))?;
        if records.contains_key(&transcript.email) {
            return Err(Error::SubmissionRejected("email already registered".into()));
        }
        records.insert(transcript.email.clone(), transcript.clone());
        Ok(Ack {
            message: Some("registered".into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript(email: &str) -> RegistrationTranscript {
        RegistrationTranscript {
            name: "alice".into(),
            email: email.into(),
            password: "pw".into(),
            password2: "pw".into(),
            wallet_address: "0x00".into(),
            public_key: "0x04".into(),
            username_hash: "0x01".into(),
            salt_commitment: "0x02".into(),
            identity_commitment: "0x03".into(),
            device_commitment: "0x04".into(),
            last_auth_timestamp: "2024-01-01T00:00:00.000+00:00".into(),
        }
    }

    #[test]
    fn test_submit_and_get() {
        let directory = MemoryDirectory::new();
        directory.submit(&transcript("a@example.com")).unwrap();

        let stored = directory.get("a@example.com").unwrap();
        assert_eq!(stored.name, "alice");
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let directory = MemoryDirectory::new();
        directory.submit(&transcript("a@example.com")).unwrap();

        let result = directory.submit(&transcript("a@example.com"));
        assert!(matches!(result, Err(Error::SubmissionRejected(_))));
        // first record untouched, no second record
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_distinct_emails_coexist() {
        let directory = MemoryDirectory::new();
        directory.submit(&transcript("a@example.com")).unwrap();
        directory.submit(&transcript("b@example.com")).unwrap();
        assert_eq!(directory.len(), 2);
    }
}
