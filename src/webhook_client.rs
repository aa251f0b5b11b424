use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::config::WEBHOOK_TIMEOUT;
use crate::error::NotifyError;
use crate::notification::WebhookPayload;

#[async_trait]
pub trait Notify {
    async fn notify(&self, payload: &WebhookPayload) -> Result<(), NotifyError>;
}

pub struct MattermostWebhookClient {
    client: Client,
    webhook_url: Url,
}

#[async_trait]
impl Notify for MattermostWebhookClient {
    async fn notify(&self, payload: &WebhookPayload) -> Result<(), NotifyError> {
        let body = serde_json::to_vec(payload)?;
        let response = self
            .client
            .post(self.webhook_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(NotifyError::UnexpectedStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

impl MattermostWebhookClient {
    pub fn new(webhook_url: Url) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(WEBHOOK_TIMEOUT).build()?;
        Ok(Self::new_with_client(client, webhook_url))
    }

    pub fn new_with_client(client: Client, webhook_url: Url) -> Self {
        MattermostWebhookClient {
            client,
            webhook_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::NotifyError;
    use crate::notification::WebhookPayload;
    use crate::webhook_client::{MattermostWebhookClient, Notify};
    use url::Url;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> MattermostWebhookClient {
        let url = Url::parse(&format!("{}/hooks/abc", server.uri())).unwrap();
        MattermostWebhookClient::new(url).unwrap()
    }

    #[tokio::test]
    async fn test_notify() {
        let mock_server = MockServer::start().await;
        let payload = WebhookPayload::new("Cloud Auth", "https://example.com/icon.png")
            .with_text("Cloud Auth Failure".to_string());

        Mock::given(method("POST"))
            .and(path("/hooks/abc"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "username": "Cloud Auth",
                "icon_url": "https://example.com/icon.png",
                "text": "Cloud Auth Failure"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server).notify(&payload).await;
        assert!(result.is_ok(), "notify should succeed: {:?}", result);
    }

    #[tokio::test]
    async fn test_notify_unexpected_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&mock_server)
            .await;

        let payload = WebhookPayload::new("Cloud Auth", "https://example.com/icon.png");
        let result = client_for(&mock_server).notify(&payload).await;
        assert!(matches!(result, Err(NotifyError::UnexpectedStatus(201))));
    }

    #[tokio::test]
    async fn test_notify_transport_error() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let url = Url::parse(&format!("http://127.0.0.1:{}/hooks/abc", port)).unwrap();
        let client = MattermostWebhookClient::new(url).unwrap();

        let payload = WebhookPayload::new("Cloud Auth", "https://example.com/icon.png");
        let result = client.notify(&payload).await;
        assert!(matches!(result, Err(NotifyError::Transport(_))));
    }
}
