//! HTTP transport: request construction, response decoding, error mapping.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use ragdesk_core::{Error, Result};

use crate::config::ClientConfig;

/// Query parameters; `None` values are skipped.
pub type QueryParams<'a> = &'a [(&'a str, Option<&'a str>)];

/// Thin JSON-over-HTTP wrapper bound to one API base URL.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    base_url: String,
}

impl Transport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(base_url = %config.base_url, "Initializing API transport");

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("Content-Type", "application/json")
    }

    /// `GET {base}{path}?{params}`
    pub async fn get<T: DeserializeOwned>(&self, path: &str, params: QueryParams<'_>) -> Result<T> {
        let url = self.url(path);
        let query: Vec<(&str, &str)> = params
            .iter()
            .filter_map(|(key, value)| value.map(|v| (*key, v)))
            .collect();
        let request = self.request(Method::GET, &url).query(&query);
        self.execute(Method::GET, &url, request).await
    }

    /// `POST {base}{path}` with a JSON body.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        let request = self.request(Method::POST, &url).json(body);
        self.execute(Method::POST, &url, request).await
    }

    /// `DELETE {base}{path}`
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let request = self.request(Method::DELETE, &url);
        self.execute(Method::DELETE, &url, request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        request: RequestBuilder,
    ) -> Result<T> {
        let start = Instant::now();
        debug!(%method, url, "API request");

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = Error::from(e);
                warn!(%method, url, error = %err, "API request failed before response");
                return Err(err);
            }
        };

        let result = handle_response(response).await;
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => debug!(%method, url, duration_ms, "API response"),
            Err(Error::Server { status, detail }) => {
                error!(%method, url, status, duration_ms, %detail, "API server error")
            }
            Err(err) => warn!(%method, url, duration_ms, error = %err, "API error"),
        }
        result
    }
}

async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        // Empty success bodies decode as JSON null.
        let text = if body.trim().is_empty() { "null" } else { body.as_str() };
        return serde_json::from_str(text).map_err(Error::from);
    }

    let message = extract_error_message(&body, status);
    if status.is_server_error() {
        Err(Error::Server {
            status: status.as_u16(),
            detail: message,
        })
    } else {
        Err(Error::Client {
            status: status.as_u16(),
            message,
        })
    }
}

/// Known error envelope: `{detail: string | object}` or `{message: string}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    detail: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

type Extractor = fn(&ErrorEnvelope, &Value) -> Option<String>;

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn detail_text(envelope: &ErrorEnvelope, _: &Value) -> Option<String> {
    non_empty_str(envelope.detail.as_ref())
}

fn detail_structured(envelope: &ErrorEnvelope, _: &Value) -> Option<String> {
    match &envelope.detail {
        Some(Value::Null) | Some(Value::String(_)) | None => None,
        Some(Value::Bool(false)) => None,
        Some(other) => Some(other.to_string()),
    }
}

fn message_text(envelope: &ErrorEnvelope, _: &Value) -> Option<String> {
    non_empty_str(envelope.message.as_ref())
}

fn raw_json(_: &ErrorEnvelope, raw: &Value) -> Option<String> {
    Some(raw.to_string())
}

/// Tried in order; the first extractor returning `Some` wins.
const EXTRACTORS: &[Extractor] = &[detail_text, detail_structured, message_text, raw_json];

/// User-facing message for a non-2xx response body.
///
/// Order: `detail` string, `detail` as JSON, `message`, the raw JSON body.
/// Bodies that are not JSON fall back to the status reason phrase.
pub fn extract_error_message(body: &str, status: StatusCode) -> String {
    let fallback = || {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| "Unknown error occurred".to_string())
    };

    let raw: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return fallback(),
    };
    let envelope: ErrorEnvelope = serde_json::from_value(raw.clone()).unwrap_or_default();

    EXTRACTORS
        .iter()
        .find_map(|extract| extract(&envelope, &raw))
        .unwrap_or_else(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_string_preferred() {
        let body = r#"{"detail": "not found", "message": "ignored"}"#;
        assert_eq!(extract_error_message(body, StatusCode::NOT_FOUND), "not found");
    }

    #[test]
    fn test_detail_object_serialized() {
        let body = r#"{"detail": [{"loc": ["body", "name"], "msg": "field required"}]}"#;
        let message = extract_error_message(body, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(message, r#"[{"loc":["body","name"],"msg":"field required"}]"#);
    }

    #[test]
    fn test_message_fallback() {
        let body = r#"{"message": "vault name taken"}"#;
        assert_eq!(extract_error_message(body, StatusCode::CONFLICT), "vault name taken");
    }

    #[test]
    fn test_raw_json_fallback() {
        let body = r#"{"error": "bad"}"#;
        assert_eq!(extract_error_message(body, StatusCode::BAD_REQUEST), r#"{"error":"bad"}"#);

        let body = r#"["odd", "shape"]"#;
        assert_eq!(extract_error_message(body, StatusCode::BAD_REQUEST), r#"["odd","shape"]"#);
    }

    #[test]
    fn test_empty_detail_skipped() {
        let body = r#"{"detail": "", "message": "from message"}"#;
        assert_eq!(extract_error_message(body, StatusCode::BAD_REQUEST), "from message");
    }

    #[test]
    fn test_non_json_uses_status_text() {
        assert_eq!(
            extract_error_message("<html>oops</html>", StatusCode::FORBIDDEN),
            "Forbidden"
        );
        let unknown = StatusCode::from_u16(499).unwrap();
        assert_eq!(extract_error_message("", unknown), "Unknown error occurred");
    }
}
