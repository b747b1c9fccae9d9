//! Search service client.
//!
//! Subject pages are driven by the search backend: a subject query returns
//! matching edition documents, a total match count, and author/publisher
//! facets.

use crate::services::{ServiceResult, read_json};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};

/// A windowed subject query.
#[derive(Clone, Debug)]
pub struct SubjectQuery {
    pub subject: String,
    pub facets: bool,
    pub offset: usize,
    pub limit: usize,
}

impl SubjectQuery {
    /// Facet-bearing query for the first page of a subject.
    pub fn faceted(subject: impl Into<String>, limit: usize) -> Self {
        Self {
            subject: subject.into(),
            facets: true,
            offset: 0,
            limit,
        }
    }

    /// Plain windowed query, no facets.
    pub fn window(subject: impl Into<String>, offset: usize, limit: usize) -> Self {
        Self {
            subject: subject.into(),
            facets: false,
            offset,
            limit,
        }
    }
}

/// Search reply: edition documents plus counts and facets.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct SearchResult {
    #[serde(default)]
    pub docs: Vec<Map<String, Value>>,
    #[serde(default)]
    pub matches: u64,
    #[serde(default)]
    pub facets: Option<Facets>,
}

/// Facet counts as (name, count) pairs, most frequent first.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Facets {
    #[serde(default)]
    pub authors: Vec<(String, u64)>,
    #[serde(default)]
    pub publishers: Vec<(String, u64)>,
}

/// HTTP client for the search backend.
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    base_url: String,
}

impl SearchClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub async fn search(&self, query: &SubjectQuery) -> ServiceResult<SearchResult> {
        let url = format!("{}/search", self.base_url);
        let mut params = vec![
            ("subjects", query.subject.clone()),
            ("offset", query.offset.to_string()),
            ("limit", query.limit.to_string()),
        ];
        if query.facets {
            params.push(("facets", "true".to_string()));
        }
        let resp = self.client.get(&url).query(&params).send().await?;
        read_json(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn faceted_query_decodes_docs_counts_and_facets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("subjects", "Travel"))
            .and(query_param("facets", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "docs": [{"key": "/books/OL1M", "title": "A Year in Provence"}],
                "matches": 42,
                "facets": {
                    "authors": [["Peter Mayle", 7], ["Rick Steves", 3]],
                    "publishers": [["Penguin", 11]]
                }
            })))
            .mount(&server)
            .await;

        let client = SearchClient::new(reqwest::Client::new(), server.uri());
        let result = client
            .search(&SubjectQuery::faceted("Travel", 20))
            .await
            .unwrap();

        assert_eq!(result.matches, 42);
        assert_eq!(result.docs.len(), 1);
        let facets = result.facets.unwrap();
        assert_eq!(facets.authors[0], ("Peter Mayle".to_string(), 7));
        assert_eq!(facets.publishers.len(), 1);
    }

    #[tokio::test]
    async fn window_query_omits_facets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("subjects", "Travel"))
            .and(query_param("offset", "40"))
            .and(query_param("limit", "20"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"docs": [], "matches": 42})),
            )
            .mount(&server)
            .await;

        let client = SearchClient::new(reqwest::Client::new(), server.uri());
        let result = client
            .search(&SubjectQuery::window("Travel", 40, 20))
            .await
            .unwrap();
        assert!(result.docs.is_empty());
        assert!(result.facets.is_none());
    }
}
