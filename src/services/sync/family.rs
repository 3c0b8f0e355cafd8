//! Client for the family of structurally identical event catalogs.
//!
//! Each catalog publishes a root document listing upcoming and past event
//! references. References hosted on the catalog itself may have a per-event
//! `metadata.yml` with exact dates.

use serde::Deserialize;
use url::Url;

use super::client::CatalogClient;
use super::slug::site_prefix;
use super::tags::family_source_tags;
use crate::config::FamilySourceConfig;
use crate::error::SyncResult;

const ROOT_DOCUMENT: &str = "events.yml";
const DETAIL_DOCUMENT: &str = "metadata.yml";

/// A family catalog as configured, with its slug prefix and tags resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilySource {
    pub base_url: String,
    /// Empty for the home source, which owns its own slug namespace.
    pub prefix: String,
    pub tags: Vec<String>,
}

impl FamilySource {
    pub fn from_config(config: &FamilySourceConfig) -> Self {
        let prefix = if config.home {
            String::new()
        } else {
            site_prefix(&config.base_url)
        };
        let tags = family_source_tags(&site_prefix(&config.base_url));
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            prefix,
            tags,
        }
    }

    pub fn root_url(&self) -> String {
        format!("{}/{}", self.base_url, ROOT_DOCUMENT)
    }

    fn base(&self) -> Option<Url> {
        Url::parse(&format!("{}/", self.base_url)).ok()
    }

    /// Absolute URL of an event page referenced from the root document.
    pub fn event_page_url(&self, reference_url: &str) -> Option<Url> {
        let reference_url = reference_url.trim();
        if reference_url.is_empty() {
            return None;
        }
        self.base()?.join(reference_url).ok()
    }

    /// Detail document URL for a reference, or `None` when the event page is
    /// hosted somewhere else and has no metadata to offer.
    pub fn detail_url(&self, reference_url: &str) -> Option<String> {
        let base = self.base()?;
        let page = self.event_page_url(reference_url)?;
        if page.host_str() != base.host_str() {
            return None;
        }
        let mut url = page.to_string();
        if !url.ends_with('/') {
            url.push('/');
        }
        url.push_str(DETAIL_DOCUMENT);
        Some(url)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventReference {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    /// Relative or absolute event page URL.
    #[serde(default)]
    pub url: String,
    /// Link to the event's page on this platform, used to pre-claim a slug.
    #[serde(default)]
    pub cfp_link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FamilyCatalog {
    #[serde(default)]
    pub events: Vec<EventReference>,
    #[serde(default)]
    pub events_past: Vec<EventReference>,
    #[serde(default)]
    pub mailto: Option<String>,
    #[serde(default)]
    pub description_template: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub tos_url: Option<String>,
}

impl FamilyCatalog {
    /// Contact address with any `mailto:` scheme stripped.
    pub fn contact_email(&self) -> String {
        strip_mailto(self.mailto.as_deref().unwrap_or_default())
    }
}

pub fn strip_mailto(raw: &str) -> String {
    let raw = raw.trim();
    raw.strip_prefix("mailto:").unwrap_or(raw).trim().to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventDetailMetadata {
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub days: Option<i64>,
    /// External ticketing/registration id.
    #[serde(default)]
    pub booking_id: Option<String>,
}

/// Fetch the root catalog. `Ok(None)` means the source has no catalog (404).
pub async fn fetch_catalog(
    client: &CatalogClient,
    source: &FamilySource,
) -> SyncResult<Option<FamilyCatalog>> {
    client.fetch_yaml(&source.root_url()).await
}

/// Fetch per-event metadata. `Ok(None)` means dates have to be inferred.
pub async fn fetch_detail(
    client: &CatalogClient,
    detail_url: &str,
) -> SyncResult<Option<EventDetailMetadata>> {
    client.fetch_yaml(detail_url).await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn source(base: &str) -> FamilySource {
        FamilySource::from_config(&FamilySourceConfig {
            base_url: base.to_string(),
            home: false,
        })
    }

    #[test]
    fn source_prefix_and_tags() {
        let s = source("https://sreday.com/");
        assert_eq!(s.prefix, "sreday");
        assert_eq!(s.tags, vec!["sre", "devops"]);
        assert_eq!(s.root_url(), "https://sreday.com/events.yml");

        let home = FamilySource::from_config(&FamilySourceConfig {
            base_url: "https://cfp.example.com".to_string(),
            home: true,
        });
        assert_eq!(home.prefix, "");
    }

    #[test]
    fn detail_url_gets_trailing_slash() {
        let s = source("https://sreday.com");
        assert_eq!(
            s.detail_url("./2026-london-q1/").as_deref(),
            Some("https://sreday.com/2026-london-q1/metadata.yml")
        );
        assert_eq!(
            s.detail_url("2026-london-q1").as_deref(),
            Some("https://sreday.com/2026-london-q1/metadata.yml")
        );
    }

    #[test]
    fn external_pages_have_no_detail_document() {
        let s = source("https://sreday.com");
        assert_eq!(s.detail_url("https://meetup.com/sre-london/"), None);
        assert_eq!(
            s.event_page_url("https://meetup.com/sre-london/")
                .map(|u| u.to_string())
                .as_deref(),
            Some("https://meetup.com/sre-london/")
        );
    }

    #[test]
    fn empty_reference_has_no_page() {
        let s = source("https://sreday.com");
        assert_eq!(s.event_page_url("  "), None);
        assert_eq!(s.detail_url(""), None);
    }

    #[test]
    fn mailto_prefix_is_stripped() {
        let catalog = FamilyCatalog {
            mailto: Some("mailto:hello@sreday.com".to_string()),
            ..Default::default()
        };
        assert_eq!(catalog.contact_email(), "hello@sreday.com");
        assert_eq!(strip_mailto("team@llmday.com"), "team@llmday.com");
        assert_eq!(FamilyCatalog::default().contact_email(), "");
    }

    #[test]
    fn root_document_shape() {
        let doc = r#"
mailto: "mailto:hello@sreday.com"
description_template: "{{ .Name }} in {{ .Location }}"
events:
  - name: SRE Day London Q1 2026
    location: London, UK
    url: ./2026-london-q1/
    cfp_link: https://cfp.example.com/e/sreday-2026-london-q1
events_past:
  - name: SRE Day San Francisco 2025
    location: San Francisco, CA, US
    url: ./2025-san-francisco/
"#;
        let catalog: FamilyCatalog = serde_yaml::from_str(doc).unwrap();
        assert_eq!(catalog.events.len(), 1);
        assert_eq!(catalog.events_past.len(), 1);
        assert!(catalog.events_past[0].cfp_link.is_none());
        assert_eq!(
            catalog.description_template.as_deref(),
            Some("{{ .Name }} in {{ .Location }}")
        );
    }

    #[tokio::test]
    async fn fetches_detail_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2026-london-q1/metadata.yml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "start_time: \"2026-03-12T09:00:00Z\"\ndays: 2\nbooking_id: evt-123\n",
            ))
            .mount(&server)
            .await;

        let client = CatalogClient::new(Duration::from_secs(5)).unwrap();
        let s = source(&server.uri());
        let url = s.detail_url("./2026-london-q1/").unwrap();
        let detail = fetch_detail(&client, &url).await.unwrap().unwrap();
        assert_eq!(detail.start_time.as_deref(), Some("2026-03-12T09:00:00Z"));
        assert_eq!(detail.days, Some(2));
        assert_eq!(detail.booking_id.as_deref(), Some("evt-123"));
    }

    #[tokio::test]
    async fn missing_root_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events.yml"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = CatalogClient::new(Duration::from_secs(5)).unwrap();
        let catalog = fetch_catalog(&client, &source(&server.uri())).await.unwrap();
        assert!(catalog.is_none());
    }
}
