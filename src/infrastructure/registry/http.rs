//! HTTP source registry client
//!
//! Implements the SourceRegistry port against the verification index's
//! registration endpoint. A duplicate registration is surfaced as the
//! recognized `AlreadyRegistered` kind so the caller can treat it as
//! success.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::ports::{RegistryError, SourceRegistry};
use crate::domain::value_objects::Address;

/// Client for the external verification index
pub struct HttpSourceRegistry {
    http: reqwest::blocking::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

impl HttpSourceRegistry {
    pub fn new(
        base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, RegistryError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| RegistryError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

impl SourceRegistry for HttpSourceRegistry {
    fn register(&self, address: &Address, constructor_args: &[Value]) -> Result<(), RegistryError> {
        let url = format!("{}/api/register", self.base_url);
        let body = json!({
            "address": address.to_string(),
            "constructorArgs": constructor_args,
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RegistryError::Rejected(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let parsed: RegisterResponse = response
            .json()
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        match parsed.status.as_str() {
            "ok" => Ok(()),
            "already_registered" => Err(RegistryError::AlreadyRegistered),
            other => Err(RegistryError::Rejected(
                parsed.message.unwrap_or_else(|| other.to_string()),
            )),
        }
    }

    fn listing_url(&self, address: &Address) -> String {
        format!("{}/{address}#code", self.base_url)
    }
}
