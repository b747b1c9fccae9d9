//! Author overlay: derives photo fields for author pages.

use crate::models::record::Record;
use crate::services::ServiceResult;
use crate::services::coverstore::{CoverstoreClient, Image, ImageCategory, ImageSize};

pub struct Author {
    record: Record,
}

impl Author {
    pub fn new(record: Record) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn olid(&self) -> &str {
        self.record.olid()
    }

    pub fn name(&self) -> &str {
        self.record.str_field("name").unwrap_or_default()
    }

    /// Author photos. Uses the record's `photos` field when present,
    /// otherwise asks the coverstore what it has for this OLID.
    pub async fn photos(&self, coverstore: &CoverstoreClient) -> ServiceResult<Vec<Image>> {
        let ids = self.record.int_list("photos");
        if !ids.is_empty() {
            return Ok(ids
                .into_iter()
                .map(|id| Image {
                    category: ImageCategory::Author,
                    id,
                })
                .collect());
        }
        coverstore
            .query_ids(ImageCategory::Author, self.olid())
            .await
    }

    /// The primary photo, if any.
    pub async fn photo(&self, coverstore: &CoverstoreClient) -> ServiceResult<Option<Image>> {
        Ok(self.photos(coverstore).await?.into_iter().next())
    }

    /// URL of the primary photo at the given size.
    pub async fn photo_url(
        &self,
        coverstore: &CoverstoreClient,
        size: ImageSize,
    ) -> ServiceResult<Option<String>> {
        Ok(self
            .photo(coverstore)
            .await?
            .map(|image| coverstore.image_url(&image, size)))
    }
}
