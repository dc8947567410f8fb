//! Elasticsearch export through the `_bulk` API
//!
//! Every batch becomes one newline-delimited bulk request:
//!
//! ```text
//! {"index":{"_id":"https://example.com/about"}}
//! {"name":"about","url":"https://example.com/about",...}
//! ```

use crate::page::PageSnapshot;
use crate::repository::{ExportError, ExportResult, Repository};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde_json::{json, Value};
use std::fmt;

/// Location of an Elasticsearch index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElasticSearchIndex {
    node: String,
    port: u16,
    index: String,
}

impl ElasticSearchIndex {
    /// Creates an index location, e.g. `("localhost", 9200, "pages")`
    pub fn new(node: impl Into<String>, port: u16, index: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            port,
            index: index.into(),
        }
    }

    /// Endpoint receiving bulk requests for this index
    pub fn bulk_url(&self) -> String {
        format!("{}/_bulk", self)
    }
}

impl fmt::Display for ElasticSearchIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http://{}:{}/{}", self.node, self.port, self.index)
    }
}

/// Body of one bulk request
#[derive(Debug, Clone)]
pub struct BulkContent<'a> {
    pages: &'a [PageSnapshot],
}

impl<'a> BulkContent<'a> {
    /// Creates the bulk content for the given pages
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::EmptyBulk`] if `pages` is empty.
    pub fn new(pages: &'a [PageSnapshot]) -> ExportResult<Self> {
        if pages.is_empty() {
            return Err(ExportError::EmptyBulk);
        }
        Ok(Self { pages })
    }

    /// Renders the newline-delimited request body
    ///
    /// Each page contributes an action line and a document line, both ending
    /// with `\n`. Pages without a URL are indexed without an explicit id.
    pub fn structure(&self) -> ExportResult<String> {
        let mut body = String::new();
        for page in self.pages {
            let action = if page.url().is_empty() {
                json!({ "index": {} })
            } else {
                json!({ "index": { "_id": page.url() } })
            };
            body.push_str(&action.to_string());
            body.push('\n');
            body.push_str(&serde_json::to_string(page)?);
            body.push('\n');
        }
        Ok(body)
    }
}

/// Exports pages to an Elasticsearch index
pub struct ElasticSearchRepository {
    client: Client,
    index: ElasticSearchIndex,
}

impl ElasticSearchRepository {
    /// Creates a repository for `index` with a default client
    pub fn new(index: ElasticSearchIndex) -> Self {
        Self::with_client(Client::new(), index)
    }

    /// Creates a repository that sends requests through `client`
    pub fn with_client(client: Client, index: ElasticSearchIndex) -> Self {
        Self { client, index }
    }

    /// The target index
    pub fn index(&self) -> &ElasticSearchIndex {
        &self.index
    }
}

#[async_trait]
impl Repository for ElasticSearchRepository {
    async fn export(&self, pages: &[PageSnapshot]) -> ExportResult<()> {
        if pages.is_empty() {
            tracing::debug!("Nothing to export to {}", self.index);
            return Ok(());
        }

        let url = self.index.bulk_url();
        let body = BulkContent::new(pages)?.structure()?;

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await
            .map_err(|source| ExportError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|source| ExportError::Http {
            url: url.clone(),
            source,
        })?;

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Bulk export to {} failed: {}", url, text);
            return Err(ExportError::ServerError {
                url,
                status: status.as_u16(),
            });
        }

        let reply: Value = serde_json::from_str(&text)?;
        if status != StatusCode::OK {
            tracing::warn!("Bulk export to {} returned HTTP {}: {}", url, status, text);
        }

        if reply.get("errors").and_then(Value::as_bool).unwrap_or(true) {
            tracing::error!("Bulk export to {} reported errors: {}", url, text);
        }

        let took = reply.get("took").and_then(Value::as_u64).unwrap_or(0);
        tracing::info!("Exported {} pages to {} in {} ms", pages.len(), self.index, took);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::Link;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page(name: &str, url: &str) -> PageSnapshot {
        PageSnapshot::new(
            name,
            url,
            "Title",
            "Some text",
            "news",
            vec![Link::new("Home", "http://x.com/")],
        )
    }

    fn index_for(server: &MockServer) -> ElasticSearchIndex {
        let address = server.address();
        ElasticSearchIndex::new(address.ip().to_string(), address.port(), "pages")
    }

    #[test]
    fn test_index_urls() {
        let index = ElasticSearchIndex::new("localhost", 9200, "pages");
        assert_eq!(index.to_string(), "http://localhost:9200/pages");
        assert_eq!(index.bulk_url(), "http://localhost:9200/pages/_bulk");
    }

    #[test]
    fn test_bulk_structure_is_exact() {
        let pages = [page("a", "http://x.com/a")];
        let body = BulkContent::new(&pages).unwrap().structure().unwrap();

        let expected = concat!(
            "{\"index\":{\"_id\":\"http://x.com/a\"}}\n",
            "{\"name\":\"a\",\"url\":\"http://x.com/a\",\"title\":\"Title\",",
            "\"textContent\":\"Some text\",\"category\":\"news\",",
            "\"links\":[{\"text\":\"Home\",\"href\":\"http://x.com/\"}]}\n"
        );
        assert_eq!(body, expected);
    }

    #[test]
    fn test_bulk_structure_two_lines_per_page() {
        let pages = [page("a", "http://x.com/a"), page("b", "http://x.com/b")];
        let body = BulkContent::new(&pages).unwrap().structure().unwrap();
        assert_eq!(body.lines().count(), 4);
        assert!(body.ends_with('\n'));
    }

    #[test]
    fn test_bulk_without_url_has_no_id() {
        let pages = [page("a", "")];
        let body = BulkContent::new(&pages).unwrap().structure().unwrap();
        assert!(body.starts_with("{\"index\":{}}\n"));
    }

    #[test]
    fn test_bulk_needs_pages() {
        assert!(matches!(BulkContent::new(&[]), Err(ExportError::EmptyBulk)));
    }

    #[tokio::test]
    async fn test_export_posts_bulk_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pages/_bulk"))
            .and(header("content-type", "application/x-ndjson"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"took":3,"errors":false}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let repo = ElasticSearchRepository::new(index_for(&server));
        repo.export(&[page("a", "http://x.com/a")]).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8(requests[0].body.clone()).unwrap();
        assert!(body.starts_with("{\"index\":{\"_id\":\"http://x.com/a\"}}\n"));
    }

    #[tokio::test]
    async fn test_export_server_error_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let repo = ElasticSearchRepository::new(index_for(&server));
        let result = repo.export(&[page("a", "http://x.com/a")]).await;
        assert!(matches!(
            result,
            Err(ExportError::ServerError { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_export_reported_errors_are_only_logged() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"took":1,"errors":true}"#),
            )
            .mount(&server)
            .await;

        let repo = ElasticSearchRepository::new(index_for(&server));
        assert!(repo.export(&[page("a", "http://x.com/a")]).await.is_ok());
    }

    #[tokio::test]
    async fn test_export_other_status_is_only_logged() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string(r#"{"error":"bad","status":400}"#),
            )
            .mount(&server)
            .await;

        let repo = ElasticSearchRepository::new(index_for(&server));
        assert!(repo.export(&[page("a", "http://x.com/a")]).await.is_ok());
    }

    #[tokio::test]
    async fn test_export_empty_batch_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let repo = ElasticSearchRepository::new(index_for(&server));
        repo.export(&[]).await.unwrap();
    }

    #[tokio::test]
    async fn test_export_unreachable_node_fails() {
        let repo = ElasticSearchRepository::new(ElasticSearchIndex::new("127.0.0.1", 9, "pages"));
        let result = repo.export(&[page("a", "http://x.com/a")]).await;
        assert!(matches!(result, Err(ExportError::Http { .. })));
    }
}
