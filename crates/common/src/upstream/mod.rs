//! Upstream provider client
//!
//! Builds outbound requests to the mapping provider's REST surface,
//! injects the server-side API key, applies a bounded timeout, and
//! classifies failures into the timeout / HTTP / network taxonomy.

use crate::config::UpstreamConfig;
use crate::errors::{AppError, Result};
use crate::metrics;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Instant;

/// HTTP client for the mapping provider
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
    key_param: String,
    api_key: String,
}

impl UpstreamClient {
    /// Create a new upstream client with the configured timeout
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Configuration {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            key_param: config.key_param.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Forward one call to the provider.
    ///
    /// The server-side API key is injected as the configured key
    /// parameter, overwriting any caller-supplied value of the same name.
    /// At most one attempt is made; a successful response body is
    /// returned verbatim.
    pub async fn get(&self, path: &str, params: &BTreeMap<String, String>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        let mut query = params.clone();
        query.insert(self.key_param.clone(), self.api_key.clone());

        // Parameter names only; values may carry caller data and the key
        tracing::debug!(
            url = %url,
            params = ?query.keys().collect::<Vec<_>>(),
            "Forwarding call to provider"
        );

        let start = Instant::now();
        let outcome = self.send(&url, &query).await;
        metrics::record_upstream(start.elapsed().as_secs_f64(), path, outcome.as_ref().err());
        outcome
    }

    async fn send(&self, url: &str, query: &BTreeMap<String, String>) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamHttp {
                status: status.as_u16(),
            });
        }

        // A body that cannot be fully received or decoded counts as a
        // transport failure, not a partial response
        response.json::<Value>().await.map_err(classify)
    }
}

/// Map a transport-level reqwest failure onto the error taxonomy
fn classify(error: reqwest::Error) -> AppError {
    if error.is_timeout() {
        AppError::UpstreamTimeout
    } else {
        tracing::warn!(error = %error, "Upstream transport failure");
        AppError::UpstreamNetwork
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str, timeout_secs: u64) -> UpstreamConfig {
        UpstreamConfig {
            base_url: base_url.to_string(),
            api_key: "server-side-key".to_string(),
            key_param: "key".to_string(),
            timeout_secs,
        }
    }

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn injects_the_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geocode/json"))
            .and(query_param("address", "Alexanderplatz"))
            .and(query_param("key", "server-side-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": "OK", "results": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = UpstreamClient::new(&test_config(&server.uri(), 5)).unwrap();
        let payload = client
            .get("/geocode/json", &params(&[("address", "Alexanderplatz")]))
            .await
            .unwrap();
        assert_eq!(payload["status"], "OK");
    }

    #[tokio::test]
    async fn caller_cannot_override_the_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geocode/json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": "OK", "results": []})),
            )
            .mount(&server)
            .await;

        let client = UpstreamClient::new(&test_config(&server.uri(), 5)).unwrap();
        client
            .get("/geocode/json", &params(&[("key", "attacker-key"), ("address", "X")]))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let keys: Vec<String> = requests[0]
            .url
            .query_pairs()
            .filter(|(name, _)| name == "key")
            .map(|(_, value)| value.into_owned())
            .collect();
        assert_eq!(keys, vec!["server-side-key".to_string()]);
    }

    #[tokio::test]
    async fn classifies_provider_errors_by_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/directions/json"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = UpstreamClient::new(&test_config(&server.uri(), 5)).unwrap();
        let err = client
            .get("/directions/json", &params(&[]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UpstreamHttp { status: 502 }));
        assert_eq!(err.to_string(), "HTTP_ERROR_502");
    }

    #[tokio::test]
    async fn classifies_timeouts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geocode/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "OK", "results": []}))
                    .set_delay(std::time::Duration::from_millis(1500)),
            )
            .mount(&server)
            .await;

        let client = UpstreamClient::new(&test_config(&server.uri(), 1)).unwrap();
        let err = client.get("/geocode/json", &params(&[])).await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamTimeout));
    }

    #[tokio::test]
    async fn classifies_connection_failures() {
        // Nothing listens on the discard port
        let client = UpstreamClient::new(&test_config("http://127.0.0.1:9", 1)).unwrap();
        let err = client.get("/geocode/json", &params(&[])).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::UpstreamNetwork | AppError::UpstreamTimeout
        ));
    }
}
