//! Schema API client using reqwest

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::ApiConfig;
use crate::domain::meta::{RecordFetcher, TableMeta, TableSummary};
use crate::domain::DomainError;

/// Paginated list envelope returned by list endpoints
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    list: Vec<T>,
}

/// Error body shape; older servers use `msg`, newer ones `message`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
}

/// Client for the table metadata endpoints
#[derive(Debug, Clone)]
pub struct MetaApiClient {
    client: reqwest::Client,
    base_url: Url,
    auth: Option<(String, String)>,
}

impl MetaApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, DomainError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            DomainError::configuration(format!("Invalid API base URL '{}': {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(DomainError::configuration(format!(
                "API base URL '{}' cannot be used as a base",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        let auth = config
            .token
            .as_ref()
            .map(|token| (config.token_header.clone(), token.clone()));

        Ok(Self {
            client,
            base_url,
            auth,
        })
    }

    /// Lists the tables of a project; this is what backs title resolution
    pub async fn list_tables(&self, project_id: &str) -> Result<Vec<TableSummary>, DomainError> {
        let response: ListResponse<TableSummary> = self
            .get_json(&["api", "v1", "db", "meta", "projects", project_id, "tables"])
            .await?;

        Ok(response.list)
    }

    /// Reads full table metadata by canonical id
    pub async fn read_table(&self, table_id: &str) -> Result<TableMeta, DomainError> {
        self.get_json(&["api", "v1", "db", "meta", "tables", table_id])
            .await
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<R: DeserializeOwned>(&self, segments: &[&str]) -> Result<R, DomainError> {
        let url = self.url(segments);
        debug!(url = %url, "GET schema API");

        let mut request = self.client.get(url);
        if let Some((header, token)) = &self.auth {
            request = request.header(header.as_str(), token.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::remote_fetch(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::remote_fetch(extract_error_message(status, &body)));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::remote_fetch(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl RecordFetcher<TableMeta> for MetaApiClient {
    async fn fetch_by_id(&self, id: &str) -> Result<TableMeta, DomainError> {
        self.read_table(id).await
    }
}

/// Pulls a human-readable message out of an error response
fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = parsed.msg.or(parsed.message).filter(|m| !m.is_empty()) {
            return message;
        }
    }

    match status.canonical_reason() {
        Some(reason) => format!("HTTP {}: {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, token: Option<&str>) -> MetaApiClient {
        let config = ApiConfig {
            base_url: server.uri(),
            token: token.map(str::to_string),
            ..Default::default()
        };
        MetaApiClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_read_table_sends_auth_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/db/meta/tables/md_1"))
            .and(header("xc-auth", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "md_1",
                "title": "Users",
                "table_name": "nc_users",
                "columns": [{ "id": "cl_1", "title": "Id", "pk": true }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        let meta = client.fetch_by_id("md_1").await.unwrap();

        assert_eq!(meta.id.as_deref(), Some("md_1"));
        assert_eq!(meta.title.as_deref(), Some("Users"));
        assert_eq!(meta.primary_keys().count(), 1);
    }

    #[tokio::test]
    async fn test_api_token_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/db/meta/tables/md_1"))
            .and(header("xc-token", "api-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "md_1",
                "title": "Users"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = ApiConfig {
            base_url: server.uri(),
            token: Some("api-token".to_string()),
            token_header: "xc-token".to_string(),
            ..Default::default()
        };
        let client = MetaApiClient::new(&config).unwrap();

        assert!(client.read_table("md_1").await.is_ok());
    }

    #[tokio::test]
    async fn test_list_tables() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/db/meta/projects/p_1/tables"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "list": [
                    { "id": "md_1", "title": "Users", "table_name": "nc_users" },
                    { "id": "md_2", "title": "Orders" }
                ],
                "pageInfo": { "totalRows": 2 }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let tables = client.list_tables("p_1").await.unwrap();

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].table_name.as_deref(), Some("nc_users"));
        assert_eq!(tables[1], TableSummary::new("md_2", "Orders"));
    }

    #[tokio::test]
    async fn test_error_message_extracted_from_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/db/meta/tables/md_missing"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "msg": "Table not found" })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client.fetch_by_id("md_missing").await.unwrap_err();

        assert_eq!(err, DomainError::remote_fetch("Table not found"));
    }

    #[tokio::test]
    async fn test_error_without_body_uses_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client.fetch_by_id("md_1").await.unwrap_err();

        assert_eq!(
            err,
            DomainError::remote_fetch("HTTP 500: Internal Server Error")
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client.fetch_by_id("md_1").await.unwrap_err();

        assert!(matches!(err, DomainError::RemoteFetch { .. }));
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let config = ApiConfig {
            base_url: "https://example.com/nocodb/".to_string(),
            ..Default::default()
        };
        let client = MetaApiClient::new(&config).unwrap();

        let url = client.url(&["api", "v1", "db", "meta", "tables", "md_1"]);
        assert_eq!(
            url.as_str(),
            "https://example.com/nocodb/api/v1/db/meta/tables/md_1"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            MetaApiClient::new(&config),
            Err(DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn test_extract_error_message_prefers_msg() {
        let body = r#"{ "msg": "from msg", "message": "from message" }"#;
        assert_eq!(
            extract_error_message(StatusCode::BAD_REQUEST, body),
            "from msg"
        );

        let body = r#"{ "message": "from message" }"#;
        assert_eq!(
            extract_error_message(StatusCode::BAD_REQUEST, body),
            "from message"
        );

        assert_eq!(
            extract_error_message(StatusCode::BAD_REQUEST, ""),
            "HTTP 400: Bad Request"
        );
    }
}
