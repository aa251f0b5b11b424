use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use tracing::{error, info};
use url::Url;

use crate::authorizer::is_authorized;
use crate::config::Config;
use crate::error::CloudAuthError;
use crate::event::{error_response, json_response, ProxyRequestExt};
use crate::notification::FailureNotification;
use crate::upstream_client::{Forward, ForwardedResponse, OutboundRequest};
use crate::webhook_client::Notify;

/// Gates one API Gateway request against the allow-list and relays it to
/// the cloud server. Every failure is answered with `{"error": ...}` and
/// reported to the webhook.
pub struct CloudAuth<F, N> {
    config: Config,
    upstream: F,
    notifier: N,
}

impl<F, N> CloudAuth<F, N>
where
    F: Forward + Sync,
    N: Notify + Sync,
{
    pub fn new(config: Config, upstream: F, notifier: N) -> Self {
        CloudAuth {
            config,
            upstream,
            notifier,
        }
    }

    /// `invocation_id` identifies the request in notifications when the
    /// gateway did not supply its own request id.
    pub async fn handle(
        &self,
        request: &ApiGatewayProxyRequest,
        invocation_id: &str,
    ) -> ApiGatewayProxyResponse {
        let request_id = request.request_id().unwrap_or(invocation_id);
        match self.relay(request).await {
            Ok(response) => {
                info!(request_id, status = response.status, "Success!");
                json_response(response.status, response.body)
            }
            Err(error) => self.process_failure(request, request_id, error).await,
        }
    }

    async fn relay(
        &self,
        request: &ApiGatewayProxyRequest,
    ) -> Result<ForwardedResponse, CloudAuthError> {
        let query = request.query_pairs();
        info!(path = request.path_text(), query = ?query, "Initial request");

        let target = resolve_target(&self.config.cloud_server_url, request.path_text(), &query)?;
        if !is_authorized(target.path()) {
            return Err(CloudAuthError::Unauthorized(target.path().to_string()));
        }

        info!(method = request.method(), url = %target, "Final API call");

        self.upstream
            .forward(OutboundRequest {
                method: request.method().to_string(),
                url: target,
                headers: request.header_pairs(),
                body: request.body_bytes(),
            })
            .await
    }

    async fn process_failure(
        &self,
        request: &ApiGatewayProxyRequest,
        request_id: &str,
        cause: CloudAuthError,
    ) -> ApiGatewayProxyResponse {
        let status = cause.status_code();
        error!(
            request_id,
            status,
            method = request.method(),
            path = request.path_text(),
            error = %cause,
            "Auth Failure"
        );

        let notification = FailureNotification {
            error: cause.to_string(),
            method: request.method(),
            path: request.path_text(),
            request_id,
            body: request.body_text(),
        };
        if let Err(webhook_error) = self.notifier.notify(&notification.to_payload()).await {
            error!(request_id, error = %webhook_error, "Mattermost Webhook Error");
        }

        error_response(status, &cause.to_string())
    }
}

/// Resolves an inbound path against the cloud server base URL and replaces
/// its query with `query`, which is expected to be sorted by key already.
pub fn resolve_target(
    base: &Url,
    raw_path: &str,
    query: &[(String, String)],
) -> Result<Url, CloudAuthError> {
    let invalid = |reason: String| CloudAuthError::InvalidPath {
        path: raw_path.to_string(),
        reason,
    };

    validate_path(raw_path).map_err(invalid)?;
    let mut target = base
        .join(raw_path)
        .map_err(|error| invalid(error.to_string()))?;

    if target.scheme() != base.scheme()
        || target.host_str() != base.host_str()
        || target.port_or_known_default() != base.port_or_known_default()
    {
        return Err(invalid("path must not name another host".to_string()));
    }

    target.set_fragment(None);
    target.set_query(None);
    if !query.is_empty() {
        target.query_pairs_mut().extend_pairs(query);
    }
    Ok(target)
}

fn validate_path(raw_path: &str) -> Result<(), String> {
    if raw_path.bytes().any(|b| b < 0x20 || b == 0x7f) {
        return Err("invalid control character in URL".to_string());
    }

    let bytes = raw_path.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            match escape {
                Some(hex) if hex.iter().all(u8::is_ascii_hexdigit) => i += 3,
                _ => {
                    let end = (i + 3).min(bytes.len());
                    return Err(format!(
                        "invalid URL escape {:?}",
                        String::from_utf8_lossy(&bytes[i..end])
                    ));
                }
            }
        } else {
            i += 1;
        }
    }
    Ok(())
}
