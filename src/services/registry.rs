//! Record registry client.
//!
//! The registry is the content-object store that owns every cataloged
//! record. This module only reads from it (and submits edited records
//! back); record lifecycle, revisions, and storage are entirely the
//! registry's concern.

use crate::models::record::Record;
use crate::services::{ServiceError, ServiceResult, check_status, read_json};
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// One entry in a record's version history.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Version {
    pub key: String,
    pub revision: i64,
    /// Key of the user who made the edit.
    pub author: Option<String>,
    pub ip: Option<String>,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Filters for a versions query. Unset fields are omitted from the
/// request.
#[derive(Clone, Debug, Default)]
pub struct VersionQuery {
    /// Restrict to edits by this user key.
    pub author: Option<String>,
    /// Restrict to versions of this record key.
    pub key: Option<String>,
    /// Sort expression, e.g. `-created`.
    pub sort: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

/// HTTP client for the record registry.
#[derive(Clone)]
pub struct RegistryClient {
    client: Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetch a record by key. A registry 404 becomes `RecordNotFound`.
    pub async fn get_record(&self, key: &str) -> ServiceResult<Record> {
        let url = format!("{}/get", self.base_url);
        let resp = self.client.get(&url).query(&[("key", key)]).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ServiceError::RecordNotFound(key.to_string()));
        }
        read_json(resp).await
    }

    /// Submit an edited record back to the registry.
    pub async fn save_record(&self, record: &Record) -> ServiceResult<()> {
        let url = format!("{}/save", self.base_url);
        let resp = self.client.post(&url).json(record).send().await?;
        check_status(resp)?;
        Ok(())
    }

    /// Query the version history.
    pub async fn versions(&self, query: &VersionQuery) -> ServiceResult<Vec<Version>> {
        let url = format!("{}/versions", self.base_url);
        let mut params = vec![
            ("limit", query.limit.to_string()),
            ("offset", query.offset.to_string()),
        ];
        if let Some(author) = &query.author {
            params.push(("author", author.clone()));
        }
        if let Some(key) = &query.key {
            params.push(("key", key.clone()));
        }
        if let Some(sort) = &query.sort {
            params.push(("sort", sort.clone()));
        }
        let resp = self.client.get(&url).query(&params).send().await?;
        read_json(resp).await
    }

    /// Total number of edits made by a user.
    pub async fn count_edits_by_user(&self, user_key: &str) -> ServiceResult<u64> {
        let url = format!("{}/count_edits_by_user", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("key", user_key)])
            .send()
            .await?;
        read_json(resp).await
    }

    /// Liveness check against the registry root. Used by the readiness
    /// probe.
    pub async fn ping(&self) -> ServiceResult<()> {
        let resp = self.client.get(&self.base_url).send().await?;
        check_status(resp)?;
        Ok(())
    }
}
