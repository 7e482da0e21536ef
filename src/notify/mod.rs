//! Best-effort chat notifications.
//!
//! Failures never propagate: [`Chat::say`] logs them and returns.

use crate::cli::OutputManager;
use crate::config::ChatConfig;
use crate::error::ChatError;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Slack Web API endpoint for posting messages
const POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

/// Trait implemented by chat backends
pub trait Notifier {
    /// Post `message` to the configured channel
    fn post(&self, message: &str) -> impl Future<Output = Result<(), ChatError>>;
}

/// Request body for `chat.postMessage`
#[derive(Debug, Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
    username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon_url: Option<&'a str>,
}

/// Relevant part of the Slack response envelope
#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Posts to Slack with a bot or user token
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    client: reqwest::Client,
    token: Option<String>,
    config: ChatConfig,
}

impl SlackNotifier {
    /// Create a notifier; without a token every post fails with [`ChatError::NoToken`]
    pub fn new(token: Option<String>, config: ChatConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            config,
        }
    }
}

impl Notifier for SlackNotifier {
    async fn post(&self, message: &str) -> Result<(), ChatError> {
        let token = self.token.as_deref().ok_or(ChatError::NoToken)?;

        let body = PostMessage {
            channel: &self.config.channel,
            text: message,
            username: &self.config.username,
            icon_url: self.config.icon_url.as_deref(),
        };

        let response: SlackResponse = self
            .client
            .post(POST_MESSAGE_URL)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.ok {
            Ok(())
        } else {
            Err(ChatError::Api(
                response.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

/// Wraps a [`Notifier`] so that posting can never fail the caller
#[derive(Debug)]
pub struct Chat<N> {
    notifier: N,
    output: OutputManager,
}

impl<N: Notifier> Chat<N> {
    /// Wrap `notifier`
    pub fn new(notifier: N, output: OutputManager) -> Self {
        Self { notifier, output }
    }

    /// Underlying notifier
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Post `message`; returns whether it was delivered
    pub async fn say(&self, message: &str) -> bool {
        match self.notifier.post(message).await {
            Ok(()) => {
                log::debug!("chat: {}", message);
                true
            }
            Err(e) => {
                log::warn!("chat notification failed: {}", e);
                let _ = self
                    .output
                    .warn("Trouble contacting slack, going on without notifications");
                false
            }
        }
    }
}
