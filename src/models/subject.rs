//! Subject overlay.
//!
//! Subjects have no fields of their own worth displaying; their pages are
//! assembled from the search backend (matching editions plus author and
//! publisher facets) and the coverstore (cover IDs for the listed
//! editions). The first facet-bearing search result is memoized on the
//! instance so the counting accessors share one query.

use crate::models::record::Record;
use crate::services::ServiceResult;
use crate::services::coverstore::CoverstoreClient;
use crate::services::search::{SearchClient, SearchResult, SubjectQuery};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::warn;

/// Page size of the memoized facet query.
const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubjectKind {
    Subject,
    Place,
    Person,
}

/// An author facet entry on a subject page.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SubjectAuthor {
    pub name: String,
    pub key: String,
    pub count: u64,
}

/// A publisher facet entry on a subject page.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Publisher {
    pub name: String,
    pub count: u64,
}

/// A related-subject link.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RelatedSubject {
    pub name: String,
    pub key: String,
}

pub struct Subject {
    name: String,
    kind: SubjectKind,
    memo: RwLock<Option<SearchResult>>,
}

impl Subject {
    pub fn new(name: impl Into<String>, kind: SubjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            memo: RwLock::new(None),
        }
    }

    /// Build from a registry record, taking the display name from the
    /// record's `name` field or the key's last segment.
    pub fn from_record(record: &Record, kind: SubjectKind) -> Self {
        let name = record
            .str_field("name")
            .map(str::to_string)
            .unwrap_or_else(|| record.olid().to_string());
        Self::new(name, kind)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SubjectKind {
        self.kind
    }

    /// The memoized facet-bearing search result.
    async fn facet_result(&self, search: &SearchClient) -> ServiceResult<SearchResult> {
        if let Some(result) = self.memo.read().await.as_ref() {
            return Ok(result.clone());
        }
        let result = search
            .search(&SubjectQuery::faceted(&self.name, DEFAULT_PAGE_SIZE))
            .await?;
        *self.memo.write().await = Some(result.clone());
        Ok(result)
    }

    /// Total number of matching editions.
    pub async fn edition_count(&self, search: &SearchClient) -> ServiceResult<u64> {
        Ok(self.facet_result(search).await?.matches)
    }

    /// Matching edition documents for the given window. Reuses the
    /// memoized result when it already covers the window.
    pub async fn editions(
        &self,
        search: &SearchClient,
        offset: usize,
        limit: usize,
    ) -> ServiceResult<Vec<Map<String, Value>>> {
        if let Some(result) = self.memo.read().await.as_ref() {
            // offset comes straight from the request; the sum can overflow.
            if let Some(window) = offset
                .checked_add(limit)
                .and_then(|end| result.docs.get(offset..end))
            {
                return Ok(window.to_vec());
            }
        }
        let result = search
            .search(&SubjectQuery::window(&self.name, offset, limit))
            .await?;
        Ok(result.docs)
    }

    /// Edition documents for the window with their cover IDs attached.
    ///
    /// The coverstore lookup is best-effort: on failure the editions are
    /// returned without cover IDs. Bulky fields (`type`, `subjects`,
    /// `languages`) are stripped from each document.
    pub async fn covers(
        &self,
        search: &SearchClient,
        coverstore: &CoverstoreClient,
        offset: usize,
        limit: usize,
    ) -> ServiceResult<Vec<Map<String, Value>>> {
        let editions = self.editions(search, offset, limit).await?;
        let olids: Vec<String> = editions
            .iter()
            .filter_map(|doc| doc.get("key").and_then(Value::as_str))
            .map(|key| crate::models::record::olid(key).to_string())
            .collect();

        let cover_ids = match coverstore.batch_cover_ids(&olids).await {
            Ok(ids) => ids,
            Err(err) => {
                warn!("coverstore lookup failed for subject `{}`: {}", self.name, err);
                Default::default()
            }
        };

        Ok(editions
            .into_iter()
            .map(|mut doc| {
                doc.remove("type");
                doc.remove("subjects");
                doc.remove("languages");
                if let Some(key) = doc.get("key").and_then(Value::as_str) {
                    if let Some(id) = cover_ids.get(crate::models::record::olid(key)) {
                        doc.insert("cover_id".to_string(), Value::from(*id));
                    }
                }
                doc
            })
            .collect())
    }

    /// Number of distinct authors in the facet.
    pub async fn author_count(&self, search: &SearchClient) -> ServiceResult<u64> {
        let result = self.facet_result(search).await?;
        Ok(result
            .facets
            .as_ref()
            .map(|f| f.authors.len() as u64)
            .unwrap_or(0))
    }

    /// Author facet entries. Facet rows carry only names; the key is a
    /// placeholder until the search backend exposes author keys.
    pub async fn authors(&self, search: &SearchClient) -> ServiceResult<Vec<SubjectAuthor>> {
        let result = self.facet_result(search).await?;
        Ok(result
            .facets
            .as_ref()
            .map(|f| {
                f.authors
                    .iter()
                    .map(|(name, count)| SubjectAuthor {
                        name: name.clone(),
                        key: "/authors/OL1A".to_string(),
                        count: *count,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Publisher facet entries.
    pub async fn publishers(&self, search: &SearchClient) -> ServiceResult<Vec<Publisher>> {
        let result = self.facet_result(search).await?;
        Ok(result
            .facets
            .as_ref()
            .map(|f| {
                f.publishers
                    .iter()
                    .map(|(name, count)| Publisher {
                        name: name.clone(),
                        count: *count,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Placeholder list until related-subject search lands.
    pub fn related_subjects(&self) -> Vec<RelatedSubject> {
        vec![
            RelatedSubject {
                name: "France".to_string(),
                key: "/subjects/places/France".to_string(),
            },
            RelatedSubject {
                name: "Travel".to_string(),
                key: "/subjects/Travel".to_string(),
            },
        ]
    }
}
