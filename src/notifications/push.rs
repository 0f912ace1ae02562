use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

const FCM_ENDPOINT: &str = "https://fcm.googleapis.com/fcm/send";

#[derive(Debug, Clone, PartialEq)]
pub struct PushMessage {
    pub token: String,
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
}

#[derive(Debug, Error)]
pub enum PushError {
    #[error("Push delivery is not configured")]
    Disabled,
    #[error("Push rejected by provider: {0}")]
    Rejected(String),
    #[error("Push request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Single delivery attempt to one device. Callers never retry.
#[async_trait]
pub trait PushGateway: Send + Sync {
    async fn send(&self, message: &PushMessage) -> Result<(), PushError>;
}

/// Firebase Cloud Messaging over the legacy HTTP endpoint.
pub struct FcmPush {
    server_key: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct FcmResponse {
    #[serde(default)]
    failure: u32,
    #[serde(default)]
    results: Vec<FcmResult>,
}

#[derive(Debug, Deserialize)]
struct FcmResult {
    error: Option<String>,
}

impl FcmPush {
    pub fn new(server_key: impl Into<String>) -> Self {
        Self {
            server_key: server_key.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PushGateway for FcmPush {
    async fn send(&self, message: &PushMessage) -> Result<(), PushError> {
        let response: FcmResponse = self
            .http
            .post(FCM_ENDPOINT)
            .header("Authorization", format!("key={}", self.server_key))
            .json(&json!({
                "to": message.token,
                "notification": {
                    "title": message.title,
                    "body": message.body,
                },
                "data": message.data,
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.failure > 0 {
            let reason = response
                .results
                .into_iter()
                .find_map(|r| r.error)
                .unwrap_or_else(|| "unknown".to_string());
            return Err(PushError::Rejected(reason));
        }
        Ok(())
    }
}

/// Used when no provider key is configured: every send is dropped.
pub struct DisabledPush;

#[async_trait]
impl PushGateway for DisabledPush {
    async fn send(&self, message: &PushMessage) -> Result<(), PushError> {
        debug!(title = %message.title, "Push disabled, dropping notification");
        Err(PushError::Disabled)
    }
}
