//! User overlay.
//!
//! Derives a user's edit history from the registry's version log. Email,
//! account creation info, and the full edit count are only exposed on
//! admin views; the `admin` flag comes from the caller.

use crate::models::record::Record;
use crate::services::ServiceResult;
use crate::services::registry::{RegistryClient, Version, VersionQuery};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Account creation details, shown on admin views only.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CreationInfo {
    pub ip: Option<String>,
    pub member_since: DateTime<Utc>,
}

pub struct User {
    record: Record,
}

impl User {
    pub fn new(record: Record) -> Self {
        Self { record }
    }

    pub fn key(&self) -> &str {
        &self.record.key
    }

    pub fn username(&self) -> &str {
        self.record.olid()
    }

    /// Most recent edits by this user.
    pub async fn edit_history(
        &self,
        registry: &RegistryClient,
        limit: usize,
        offset: usize,
    ) -> ServiceResult<Vec<Version>> {
        registry
            .versions(&VersionQuery {
                author: Some(self.record.key.clone()),
                limit,
                offset,
                ..VersionQuery::default()
            })
            .await
    }

    /// Account email, admin views only.
    pub fn email(&self, admin: bool) -> Option<&str> {
        if admin {
            self.record.str_field("email")
        } else {
            None
        }
    }

    /// IP and timestamp of account creation, admin views only. Reads the
    /// newest-first version log of the user record itself.
    pub async fn creation_info(
        &self,
        registry: &RegistryClient,
        admin: bool,
    ) -> ServiceResult<Option<CreationInfo>> {
        if !admin {
            return Ok(None);
        }
        let versions = registry
            .versions(&VersionQuery {
                key: Some(self.record.key.clone()),
                sort: Some("-created".to_string()),
                limit: 1,
                ..VersionQuery::default()
            })
            .await?;
        Ok(versions.into_iter().next().map(|v| CreationInfo {
            ip: v.ip,
            member_since: v.created,
        }))
    }

    /// Total edit count. Non-admin views read 0 without asking the
    /// registry.
    pub async fn edit_count(&self, registry: &RegistryClient, admin: bool) -> ServiceResult<u64> {
        if !admin {
            return Ok(0);
        }
        registry.count_edits_by_user(&self.record.key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> User {
        let mut record = Record::new("/people/alice", "/type/user");
        record.set("email", json!("alice@example.org"));
        User::new(record)
    }

    #[test]
    fn email_is_admin_only() {
        let u = user();
        assert_eq!(u.email(true), Some("alice@example.org"));
        assert_eq!(u.email(false), None);
        assert_eq!(u.username(), "alice");
    }

    #[tokio::test]
    async fn edit_count_is_zero_for_non_admins() {
        // Non-admin reads never touch the registry, so an unroutable base
        // URL is safe here.
        let registry = RegistryClient::new(reqwest::Client::new(), "http://127.0.0.1:9/registry");
        assert_eq!(user().edit_count(&registry, false).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn creation_info_is_admin_only() {
        let registry = RegistryClient::new(reqwest::Client::new(), "http://127.0.0.1:9/registry");
        assert_eq!(user().creation_info(&registry, false).await.unwrap(), None);
    }
}
