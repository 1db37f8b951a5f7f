use crate::core::resolver::{MatchNotifier, StoreError};
use crate::models::MatchCreatedEvent;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Webhook returned error: {0}")]
    WebhookError(String),
}

impl From<NotifierError> for StoreError {
    fn from(value: NotifierError) -> Self {
        StoreError::Unavailable(value.to_string())
    }
}

/// Webhook notifier: POSTs the match-created event to the platform's
/// delivery service, which handles push, points and analytics. This core
/// only emits; the resolver treats delivery as best-effort.
pub struct WebhookNotifier {
    webhook_url: String,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(webhook_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            webhook_url,
            client,
        }
    }
}

#[async_trait]
impl MatchNotifier for WebhookNotifier {
    async fn match_created(&self, event: &MatchCreatedEvent) -> Result<(), StoreError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(event)
            .send()
            .await
            .map_err(NotifierError::from)?;

        if !response.status().is_success() {
            return Err(NotifierError::WebhookError(format!(
                "Failed to deliver match event: {}",
                response.status()
            ))
            .into());
        }

        tracing::debug!("Delivered match-created event for {}", event.match_id);
        Ok(())
    }
}

/// Notifier for deployments without a webhook configured: logs and drops.
pub struct NoopNotifier;

#[async_trait]
impl MatchNotifier for NoopNotifier {
    async fn match_created(&self, event: &MatchCreatedEvent) -> Result<(), StoreError> {
        tracing::info!(
            "match-created event for {} ({} + {}) dropped: no notifier configured",
            event.match_id,
            event.user_a,
            event.user_b
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchType;

    fn event() -> MatchCreatedEvent {
        MatchCreatedEvent {
            match_id: "m1".to_string(),
            user_a: "a".to_string(),
            user_b: "b".to_string(),
            match_type: MatchType::Cofounder,
            icebreakers: vec!["hi".to_string()],
        }
    }

    #[tokio::test]
    async fn test_webhook_delivers_event() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hooks/match")
            .with_status(200)
            .create_async()
            .await;

        let notifier = WebhookNotifier::new(format!("{}/hooks/match", server.url()));
        notifier.match_created(&event()).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_webhook_surfaces_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/hooks/match")
            .with_status(500)
            .create_async()
            .await;

        let notifier = WebhookNotifier::new(format!("{}/hooks/match", server.url()));
        assert!(notifier.match_created(&event()).await.is_err());
    }

    #[tokio::test]
    async fn test_noop_never_fails() {
        assert!(NoopNotifier.match_created(&event()).await.is_ok());
    }
}
