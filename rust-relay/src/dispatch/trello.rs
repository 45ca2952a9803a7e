//! Trello card API client.
//!
//! Creates cards with `POST /1/cards?key=..&token=..&idList=..` and a JSON
//! body of `{name, desc}`. One pooled `reqwest::Client` is shared by every
//! dispatch task.

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::info;
use url::Url;

use super::card::CardJob;
use crate::Config;

/// Failure of the outbound card call.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Network, TLS, timeout or body encoding failure
    #[error("card request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Trello answered with a non-2xx status
    #[error("card API returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Thin client for the Trello create-card endpoint.
#[derive(Debug, Clone)]
pub struct TrelloClient {
    client: Client,
    cards_url: Url,
}

impl TrelloClient {
    /// Build a client from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(&config.trello_api_base)
            .with_context(|| format!("Invalid TRELLO_API_BASE: {}", config.trello_api_base))?;
        let cards_url = base
            .join("/1/cards")
            .context("Failed to build card endpoint URL")?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to create HTTP client")?;

        info!(
            cards_url = %cards_url,
            timeout_ms = config.request_timeout_ms,
            "trello_client_created"
        );

        Ok(Self { client, cards_url })
    }

    /// Endpoint cards are posted to.
    pub fn cards_url(&self) -> &Url {
        &self.cards_url
    }

    /// Create one card. Single attempt, no retry.
    pub async fn create_card(&self, job: &CardJob) -> Result<(), DispatchError> {
        let creds = &job.credentials;

        let response = self
            .client
            .post(self.cards_url.clone())
            .query(&[
                ("key", creds.api_key.as_str()),
                ("token", creds.token.as_str()),
                ("idList", creds.list_id.as_str()),
            ])
            .json(&job.card)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Trello error bodies are short plain-text messages.
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Status { status, body });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::card::{CardDraft, TrelloCredentials};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(base: &str) -> Config {
        Config {
            trello_api_base: base.to_string(),
            request_timeout_ms: 2_000,
            ..Config::default()
        }
    }

    fn job() -> CardJob {
        CardJob {
            channel_id: "chan-1".to_string(),
            credentials: TrelloCredentials {
                api_key: "key-1".to_string(),
                token: "token-1".to_string(),
                list_id: "list-1".to_string(),
            },
            card: CardDraft {
                name: "Ship it".to_string(),
                desc: "From Telex channel chan-1\nAuthor: ada\nTimestamp: ".to_string(),
            },
        }
    }

    #[test]
    fn test_cards_url_default() {
        let client = TrelloClient::new(&Config::default()).unwrap();
        assert_eq!(client.cards_url().as_str(), "https://api.trello.com/1/cards");
    }

    #[test]
    fn test_invalid_base_rejected() {
        assert!(TrelloClient::new(&config_for("not a url")).is_err());
    }

    #[tokio::test]
    async fn test_create_card_sends_trello_contract() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/1/cards"))
            .and(query_param("key", "key-1"))
            .and(query_param("token", "token-1"))
            .and(query_param("idList", "list-1"))
            .and(body_json(serde_json::json!({
                "name": "Ship it",
                "desc": "From Telex channel chan-1\nAuthor: ada\nTimestamp: "
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "card-1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = TrelloClient::new(&config_for(&server.uri())).unwrap();
        client.create_card(&job()).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_card_non_2xx_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/1/cards"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .expect(1)
            .mount(&server)
            .await;

        let client = TrelloClient::new(&config_for(&server.uri())).unwrap();
        match client.create_card(&job()).await {
            Err(DispatchError::Status { status, body }) => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body, "invalid key");
            }
            other => panic!("Expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_card_honors_request_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/1/cards"))
            .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client = TrelloClient::new(&Config {
            trello_api_base: server.uri(),
            request_timeout_ms: 200,
            ..Config::default()
        })
        .unwrap();

        match client.create_card(&job()).await {
            Err(DispatchError::Request(e)) => assert!(e.is_timeout(), "expected timeout, got {}", e),
            other => panic!("Expected timed-out Request error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_card_network_error() {
        // Nothing listens on port 9 of localhost
        let client = TrelloClient::new(&config_for("http://127.0.0.1:9")).unwrap();
        assert!(matches!(
            client.create_card(&job()).await,
            Err(DispatchError::Request(_))
        ));
    }
}
