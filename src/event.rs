use std::collections::BTreeMap;

use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::encodings::Body;
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue};
use serde::Serialize;

/// Relay-side view of an API Gateway proxy event.
pub trait ProxyRequestExt {
    fn method(&self) -> &str;
    fn path_text(&self) -> &str;
    fn query_pairs(&self) -> Vec<(String, String)>;
    fn header_pairs(&self) -> Vec<(String, String)>;
    fn body_text(&self) -> &str;
    fn body_bytes(&self) -> Vec<u8>;
    fn request_id(&self) -> Option<&str>;
}

impl ProxyRequestExt for ApiGatewayProxyRequest {
    fn method(&self) -> &str {
        self.http_method.as_str()
    }

    fn path_text(&self) -> &str {
        self.path.as_deref().unwrap_or("")
    }

    /// Sorted by key; every value of a repeated key kept in arrival order.
    fn query_pairs(&self) -> Vec<(String, String)> {
        let params = if self.multi_value_query_string_parameters.is_empty() {
            &self.query_string_parameters
        } else {
            &self.multi_value_query_string_parameters
        };

        let mut sorted: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (key, _) in params.iter() {
            if !sorted.contains_key(key) {
                sorted.insert(key, params.all(key).unwrap_or_default());
            }
        }

        sorted
            .into_iter()
            .flat_map(|(key, values)| {
                values
                    .into_iter()
                    .map(move |value| (key.to_string(), value.to_string()))
            })
            .collect()
    }

    /// One entry per header value. Multi-value headers win over the
    /// single-value map when API Gateway sends both.
    fn header_pairs(&self) -> Vec<(String, String)> {
        let headers = if self.multi_value_headers.is_empty() {
            &self.headers
        } else {
            &self.multi_value_headers
        };
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect()
    }

    fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }

    /// Base64 bodies are decoded, falling back to the literal text when the
    /// payload does not decode.
    fn body_bytes(&self) -> Vec<u8> {
        let text = self.body_text();
        if self.is_base64_encoded {
            if let Ok(decoded) = BASE64_STANDARD.decode(text) {
                return decoded;
            }
        }
        text.as_bytes().to_vec()
    }

    fn request_id(&self) -> Option<&str> {
        self.request_context.request_id.as_deref()
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// JSON response carrying `body` untouched. Bytes that are not UTF-8 go
/// out base64-encoded so the gateway restores them verbatim.
pub fn json_response(status_code: u16, body: Vec<u8>) -> ApiGatewayProxyResponse {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let mut response = ApiGatewayProxyResponse::default();
    response.status_code = i64::from(status_code);
    response.headers = headers;
    match String::from_utf8(body) {
        Ok(text) => response.body = Some(Body::Text(text)),
        Err(error) => {
            response.body = Some(Body::Binary(error.into_bytes()));
            response.is_base64_encoded = true;
        }
    }
    response
}

pub fn error_response(status_code: u16, message: &str) -> ApiGatewayProxyResponse {
    let body = serde_json::to_vec(&ErrorBody { error: message })
        .unwrap_or_else(|_| b"{}".to_vec());
    json_response(status_code, body)
}
