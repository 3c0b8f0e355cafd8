//! Client for the flat conf42 catalog.

use serde::Deserialize;

use super::client::CatalogClient;
use super::family::strip_mailto;
use crate::error::SyncResult;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Conf42CatalogEntry {
    #[serde(default)]
    pub name: String,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    /// Topic and year, e.g. `golang2026`.
    #[serde(default)]
    pub short_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Conf42Catalog {
    #[serde(default)]
    pub events: Vec<Conf42CatalogEntry>,
    #[serde(default)]
    pub description_template: Option<String>,
    #[serde(default)]
    pub mailto: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

impl Conf42Catalog {
    pub fn contact_email(&self) -> String {
        strip_mailto(self.mailto.as_deref().unwrap_or_default())
    }
}

/// Public page of a conf42 event.
pub fn website_url(site: &str, short_url: &str) -> String {
    format!("{}/{}", site.trim_end_matches('/'), short_url.trim())
}

/// Fetch the conf42 catalog. `Ok(None)` means the catalog is gone (404).
pub async fn fetch_catalog(client: &CatalogClient, url: &str) -> SyncResult<Option<Conf42Catalog>> {
    client.fetch_yaml(url).await
}
