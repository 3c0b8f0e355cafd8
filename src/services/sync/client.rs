use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{SyncError, SyncResult};

/// HTTP client shared by all catalog sources.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
}

impl CatalogClient {
    pub fn new(timeout: Duration) -> SyncResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cfp-sync/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch and decode a YAML document.
    ///
    /// A 404 is not an error: it yields `Ok(None)` and the caller decides what
    /// missing data means. Any other non-success status is a `SyncError::Status`.
    pub async fn fetch_yaml<T: DeserializeOwned>(&self, url: &str) -> SyncResult<Option<T>> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!("No document at {} (404)", url);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SyncError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let doc = serde_yaml::from_str(&body).map_err(|source| SyncError::Yaml {
            url: url.to_string(),
            source,
        })?;
        Ok(Some(doc))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Doc {
        title: String,
    }

    fn client() -> CatalogClient {
        CatalogClient::new(Duration::from_secs(5)).expect("client")
    }

    #[tokio::test]
    async fn decodes_yaml_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doc.yml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("title: hello\n"))
            .mount(&server)
            .await;

        let doc: Option<Doc> = client()
            .fetch_yaml(&format!("{}/doc.yml", server.uri()))
            .await
            .unwrap();
        assert_eq!(doc.unwrap().title, "hello");
    }

    #[tokio::test]
    async fn not_found_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let doc: Option<Doc> = client()
            .fetch_yaml(&format!("{}/missing.yml", server.uri()))
            .await
            .unwrap();
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn server_error_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client()
            .fetch_yaml::<Doc>(&format!("{}/doc.yml", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn malformed_yaml_is_yaml_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("title: [unclosed\n"))
            .mount(&server)
            .await;

        let err = client()
            .fetch_yaml::<Doc>(&format!("{}/doc.yml", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Yaml { .. }));
    }
}
