//! http client for the directory server
//!
//! posts the registration transcript to the directory's auth api and
//! maps rejections onto the same errors the in-memory directory uses,
//! so callers handle both the same way

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::directory::Ack;
use crate::registrar::RegistrationTranscript;
use crate::{Error, Result};

/// directory server endpoint
#[derive(Clone, Debug)]
pub struct DirectoryEndpoint {
    /// base url of the auth api, without a trailing slash
    pub url: String,
}

impl DirectoryEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// response body from the register route
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// async directory client over http
pub struct HttpDirectory {
    endpoint: DirectoryEndpoint,
    http: reqwest::Client,
}

impl HttpDirectory {
    pub fn new(endpoint: DirectoryEndpoint) -> Self {
        Self {
            endpoint,
            http: reqwest::Client::new(),
        }
    }

    /// local dev server
    pub fn localhost() -> Self {
        Self::new(DirectoryEndpoint::new("http://localhost:5010/api/auth"))
    }

    /// full url of the register route
    pub fn register_url(&self) -> String {
        format!("{}/register", self.endpoint.url)
    }

    /// submit a transcript to the directory
    ///
    /// transport failures map to `NetworkError`; a reachable server
    /// that refuses the transcript maps to `SubmissionRejected`
    pub async fn submit(&self, transcript: &RegistrationTranscript) -> Result<Ack> {
        let url = self.register_url();
        debug!(%url, "posting registration transcript");

        let resp = self
            .http
            .post(url)
            .json(transcript)
            .send()
            .await
            .map_err(|e| Error::NetworkError(e.to_string()))?;

        let status = resp.status();
        let body: RegisterResponse = resp
            .json()
            .await
            .map_err(|e| Error::NetworkError(e.to_string()))?;

        if status.is_success() {
            Ok(Ack { message: body.message })
        } else {
            Err(Error::SubmissionRejected(
                body.message.unwrap_or_else(|| format!("http {}", status)),
            ))
        }
    }
}
