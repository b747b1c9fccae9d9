//! Clients for the external services the catalog reads from: the record
//! registry, the coverstore, and the search backend.

pub mod coverstore;
pub mod registry;
pub mod search;

use crate::config::AppConfig;
use crate::models::record::TypeRegistry;
use coverstore::CoverstoreClient;
use registry::RegistryClient;
use search::SearchClient;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("record `{0}` not found")]
    RecordNotFound(String),
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
    #[error("decoding reply from {url}: {source}")]
    Decode {
        url: String,
        source: reqwest::Error,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Shared handler state: one client per external service plus the overlay
/// type registry. Clients share a single connection pool.
#[derive(Clone)]
pub struct Catalog {
    pub registry: RegistryClient,
    pub coverstore: CoverstoreClient,
    pub search: SearchClient,
    pub types: TypeRegistry,
}

impl Catalog {
    pub fn new(client: reqwest::Client, cfg: &AppConfig) -> Self {
        Self {
            registry: RegistryClient::new(client.clone(), cfg.registry_url.clone()),
            coverstore: CoverstoreClient::new(client.clone(), cfg.coverstore_url.clone()),
            search: SearchClient::new(client, cfg.search_url.clone()),
            types: TypeRegistry::with_defaults(),
        }
    }
}

/// Map a non-success response to an error, keeping the final URL for
/// diagnostics.
pub(crate) fn check_status(resp: reqwest::Response) -> ServiceResult<reqwest::Response> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(ServiceError::UnexpectedStatus {
            status: resp.status().as_u16(),
            url: resp.url().to_string(),
        })
    }
}

/// Check the status and decode the JSON body, keeping malformed replies
/// distinguishable from transport failures.
pub(crate) async fn read_json<T>(resp: reqwest::Response) -> ServiceResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let resp = check_status(resp)?;
    let url = resp.url().to_string();
    resp.json()
        .await
        .map_err(|source| ServiceError::Decode { url, source })
}
