//! Coverstore client.
//!
//! The coverstore is a separate image service. It serves rendered images
//! at `{base}/{category}/id/{id}-{SIZE}.jpg` and answers ID queries at
//! `{base}/{category}/query`. Book covers live under category `b`,
//! author photos under `a`.

use crate::services::{ServiceResult, read_json};
use reqwest::Client;
use std::collections::HashMap;

/// Image category namespace on the coverstore.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageCategory {
    /// Book covers.
    Book,
    /// Author photos.
    Author,
}

impl ImageCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageCategory::Book => "b",
            ImageCategory::Author => "a",
        }
    }
}

/// Rendered image size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageSize {
    Small,
    Medium,
    Large,
}

impl ImageSize {
    /// Size letter used in coverstore image paths.
    pub fn letter(&self) -> char {
        match self {
            ImageSize::Small => 'S',
            ImageSize::Medium => 'M',
            ImageSize::Large => 'L',
        }
    }
}

/// A cover or photo stored on the coverstore.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Image {
    pub category: ImageCategory,
    pub id: i64,
}

impl Image {
    /// Image URL for the given rendered size.
    pub fn url(&self, base: &str, size: ImageSize) -> String {
        format!(
            "{}/{}/id/{}-{}.jpg",
            base.trim_end_matches('/'),
            self.category.as_str(),
            self.id,
            size.letter()
        )
    }
}

/// HTTP client for the coverstore query API.
#[derive(Clone)]
pub struct CoverstoreClient {
    client: Client,
    base_url: String,
}

impl CoverstoreClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Convenience for building an image URL against this store.
    pub fn image_url(&self, image: &Image, size: ImageSize) -> String {
        image.url(&self.base_url, size)
    }

    /// Look up image IDs registered for one OLID in a category.
    pub async fn query_ids(
        &self,
        category: ImageCategory,
        olid: &str,
    ) -> ServiceResult<Vec<Image>> {
        let url = format!("{}/{}/query", self.base_url, category.as_str());
        let resp = self
            .client
            .get(&url)
            .query(&[("olid", olid)])
            .send()
            .await?;
        let ids: Vec<i64> = read_json(resp).await?;
        Ok(ids
            .into_iter()
            .map(|id| Image { category, id })
            .collect())
    }

    /// Batch lookup of cover IDs for many edition OLIDs at once. The reply
    /// maps each OLID that has a cover to its cover ID; OLIDs without
    /// covers are absent.
    pub async fn batch_cover_ids(&self, olids: &[String]) -> ServiceResult<HashMap<String, i64>> {
        let url = format!("{}/b/query", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("cmd", "ids"), ("olid", &olids.join(","))])
            .send()
            .await?;
        read_json(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn query_ids_hits_the_category_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/b/query"))
            .and(query_param("olid", "OL1M"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![101, 102]))
            .mount(&server)
            .await;

        let client = CoverstoreClient::new(reqwest::Client::new(), server.uri());
        let images = client.query_ids(ImageCategory::Book, "OL1M").await.unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].id, 101);
        assert_eq!(images[0].category, ImageCategory::Book);
    }

    #[tokio::test]
    async fn batch_cover_ids_joins_olids_with_commas() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/b/query"))
            .and(query_param("cmd", "ids"))
            .and(query_param("olid", "OL1M,OL2M"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"OL1M": 55})),
            )
            .mount(&server)
            .await;

        let client = CoverstoreClient::new(reqwest::Client::new(), server.uri());
        let ids = client
            .batch_cover_ids(&["OL1M".to_string(), "OL2M".to_string()])
            .await
            .unwrap();
        assert_eq!(ids.get("OL1M"), Some(&55));
        assert_eq!(ids.get("OL2M"), None);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a/query"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = CoverstoreClient::new(reqwest::Client::new(), server.uri());
        let err = client
            .query_ids(ImageCategory::Author, "OL23A")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn image_url_uppercases_size() {
        let image = Image {
            category: ImageCategory::Book,
            id: 42,
        };
        assert_eq!(
            image.url("http://covers.example.org", ImageSize::Medium),
            "http://covers.example.org/b/id/42-M.jpg"
        );
        assert_eq!(
            image.url("http://covers.example.org/", ImageSize::Small),
            "http://covers.example.org/b/id/42-S.jpg"
        );
    }

    #[test]
    fn author_photos_use_the_a_category() {
        let image = Image {
            category: ImageCategory::Author,
            id: 7,
        };
        assert_eq!(
            image.url("http://covers.example.org", ImageSize::Large),
            "http://covers.example.org/a/id/7-L.jpg"
        );
    }
}
