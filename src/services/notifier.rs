// src/services/notifier.rs

//! Notification sinks.
//!
//! Messages go to a Telegram chat when credentials are available, and are
//! always echoed to stdout.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{Credentials, NotifierConfig};

/// Best-effort text message delivery.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<()>;
}

/// Prints messages locally. Used when no chat credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, text: &str) -> Result<()> {
        println!("{text}");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Sends messages through the Telegram bot API.
pub struct TelegramNotifier {
    client: Client,
    endpoint: String,
    chat_id: String,
    parse_mode: String,
}

impl TelegramNotifier {
    pub fn new(client: Client, config: &NotifierConfig, credentials: Credentials) -> Self {
        Self {
            client,
            endpoint: Self::endpoint(&config.api_base, &credentials.api_token),
            chat_id: credentials.chat_id,
            parse_mode: config.parse_mode.clone(),
        }
    }

    fn endpoint(api_base: &str, token: &str) -> String {
        format!("{}/bot{}/sendMessage", api_base.trim_end_matches('/'), token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> Result<()> {
        println!("{text}");

        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: &self.parse_mode,
        };
        // The endpoint embeds the bot token; keep it out of error messages
        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Telegram rejected message: {} {}", status, body);
            return Err(AppError::notify(format!("chat API answered {status}")));
        }
        Ok(())
    }
}

/// Pick the notifier matching the available credentials.
pub fn from_credentials(
    client: &Client,
    config: &NotifierConfig,
    credentials: Option<Credentials>,
) -> Box<dyn Notifier> {
    match credentials {
        Some(credentials) => {
            log::info!("Notifications go to Telegram chat {}", credentials.chat_id);
            Box::new(TelegramNotifier::new(client.clone(), config, credentials))
        }
        None => {
            log::info!(
                "{} or {} not set, notifications are printed only",
                Credentials::TOKEN_VAR,
                Credentials::CHAT_VAR
            );
            Box::new(ConsoleNotifier)
        }
    }
}
