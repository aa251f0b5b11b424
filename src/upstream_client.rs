use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use tracing::debug;
use url::Url;

use crate::config::UPSTREAM_TIMEOUT;
use crate::error::CloudAuthError;

/// Never relayed. `accept-encoding` is dropped so the cloud server answers
/// with an identity-encoded body that can be passed through untouched.
const SKIPPED_HEADERS: [&'static str; 5] = [
    "accept-encoding",
    "host",
    "content-length",
    "connection",
    "transfer-encoding",
];

#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: String,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForwardedResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait Forward {
    async fn forward(&self, request: OutboundRequest) -> Result<ForwardedResponse, CloudAuthError>;
}

pub struct CloudServerClient {
    client: Client,
}

#[async_trait]
impl Forward for CloudServerClient {
    async fn forward(&self, request: OutboundRequest) -> Result<ForwardedResponse, CloudAuthError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|error| CloudAuthError::upstream("invalid request method", error))?;

        let response = self
            .client
            .request(method, request.url)
            .headers(relayed_headers(&request.headers))
            .body(request.body)
            .send()
            .await
            .map_err(|error| {
                CloudAuthError::upstream("failed when making request to cloud server", error)
            })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|error| {
            CloudAuthError::upstream("failed to read cloud server response body", error)
        })?;

        Ok(ForwardedResponse {
            status,
            body: body.to_vec(),
        })
    }
}

impl CloudServerClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(UPSTREAM_TIMEOUT).build()?;
        Ok(Self::new_with_client(client))
    }

    pub fn new_with_client(client: Client) -> Self {
        CloudServerClient { client }
    }
}

fn relayed_headers(pairs: &[(String, String)]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        if SKIPPED_HEADERS
            .iter()
            .any(|skipped| name.eq_ignore_ascii_case(skipped))
        {
            continue;
        }
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => debug!(header = %name, "dropping header that is not valid HTTP"),
        }
    }
    headers
}
