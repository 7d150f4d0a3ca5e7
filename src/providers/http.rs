use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::core::transport::{ApiRequest, ApiResponse, Method, Transport};
use crate::error::Result;

/// `Transport` over a shared reqwest client rooted at the configured API URL.
pub struct HttpTransport {
    config: ProviderConfig,
    client: Client,
}

impl HttpTransport {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self
            .client
            .request(method, self.url(&request.path))
            .query(&request.query);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        Ok(ApiResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use httpmock::prelude::*;
    use serde_json::json;

    fn transport(server: &MockServer) -> HttpTransport {
        HttpTransport::new(ProviderConfig::new(server.url(""))).unwrap()
    }

    #[tokio::test]
    async fn test_get_sends_query_and_headers() {
        let server = MockServer::start_async().await;
        let zones_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/zones")
                    .query_param("offset", "0")
                    .query_param("limit", "100")
                    .header("Authorization", "Bearer abc");
                then.status(200)
                    .json_body(json!({"zones": [{"properties": {"name": "denominator.io."}}]}));
            })
            .await;

        let request = ApiRequest::get("/zones")
            .with_query("offset", 0)
            .with_query("limit", 100)
            .with_header("Authorization", "Bearer abc");
        let response = transport(&server).execute(request).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(
            response.body["zones"][0]["properties"]["name"],
            json!("denominator.io.")
        );
        zones_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start_async().await;
        let login_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/Session")
                    .json_body(json!({"user_name": "joe"}));
                then.status(200).json_body(json!({"data": {"token": "t"}}));
            })
            .await;

        let request = ApiRequest::post("/Session").with_body(json!({"user_name": "joe"}));
        let response = transport(&server).execute(request).await.unwrap();
        assert_eq!(response.body["data"]["token"], json!("t"));
        login_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_a_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/Zone");
                then.status(401).body("");
            })
            .await;

        let response = transport(&server)
            .execute(ApiRequest::get("/Zone"))
            .await
            .unwrap();
        assert_eq!(response.status, 401);
        assert_eq!(response.body, Value::Null);
    }

    #[tokio::test]
    async fn test_non_json_body_kept_as_text() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/health");
                then.status(503).body("upstream down");
            })
            .await;

        let response = transport(&server)
            .execute(ApiRequest::get("/health"))
            .await
            .unwrap();
        assert_eq!(response.body, json!("upstream down"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let transport = HttpTransport::new(ProviderConfig::new("http://127.0.0.1:1")).unwrap();
        let result = transport.execute(ApiRequest::get("/Zone")).await;
        assert_matches!(result, Err(crate::error::Error::Transport(_)));
    }
}
