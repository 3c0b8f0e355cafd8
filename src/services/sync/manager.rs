use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::client::CatalogClient;
use super::conf42::{self, Conf42Catalog, Conf42CatalogEntry};
use super::dates::{cfp_window, infer_dates, parse_iso_date, parse_start_time};
use super::diff::detect_changes;
use super::family::{self, EventReference, FamilyCatalog, FamilySource};
use super::location::{extract_country, extract_location_without_country, is_online};
use super::slug::{conf42_slug, parse_conf42_short_url, resolve_slug};
use super::store::EventStore;
use super::tags::conf42_topic_tags;
use super::template::{render, TemplateFields};
use crate::config::SyncConfig;
use crate::db::models::{NewEvent, SyncFieldUpdate};
use crate::error::{SyncError, SyncResult};

/// Summary of one sync run across all sources.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: bool,
}

impl SyncReport {
    fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            created: 0,
            updated: 0,
            skipped: 0,
            failed: 0,
            cancelled: false,
        }
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Created => self.created += 1,
            Outcome::Updated => self.updated += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Created,
    Updated,
    Skipped,
}

/// A unit of work the scheduler runs on every tick.
#[async_trait]
pub trait SyncJob: Send + Sync + 'static {
    async fn run(&self, cancel: &CancellationToken) -> SyncReport;
}

/// Crawls every configured catalog and reconciles it with the event store.
///
/// Sources and events are processed strictly one after another. Each event
/// results in at most one store write per run: a create, an update of the
/// sync-managed fields, or nothing.
pub struct EventSyncManager {
    store: Arc<dyn EventStore>,
    client: CatalogClient,
    family_sources: Vec<FamilySource>,
    conf42_url: String,
    conf42_site: String,
    organizer_ids: Vec<String>,
}

impl EventSyncManager {
    pub fn new(store: Arc<dyn EventStore>, client: CatalogClient, config: &SyncConfig) -> Self {
        Self {
            store,
            client,
            family_sources: config
                .family_sources
                .iter()
                .map(FamilySource::from_config)
                .collect(),
            conf42_url: config.conf42_url.clone(),
            conf42_site: config.conf42_site.clone(),
            organizer_ids: config.organizer_ids.clone(),
        }
    }

    /// Run a full sync over all family sources, then conf42.
    pub async fn sync_all(&self, cancel: &CancellationToken) -> SyncReport {
        let mut report = SyncReport::start();
        let today = Utc::now().date_naive();

        info!("Starting event catalog synchronization");

        let organizers = self.resolve_organizers().await;

        for source in &self.family_sources {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            if let Err(e) = self
                .sync_family_source(source, &organizers, today, cancel, &mut report)
                .await
            {
                warn!(source = %source.base_url, "Failed to sync family source: {}", e);
            }
        }

        if !report.cancelled && cancel.is_cancelled() {
            report.cancelled = true;
        }
        if !report.cancelled {
            if let Err(e) = self
                .sync_conf42(&organizers, today, cancel, &mut report)
                .await
            {
                warn!(source = %self.conf42_url, "Failed to sync conf42 catalog: {}", e);
            }
        }

        report.finished_at = Some(Utc::now());
        info!(
            created = report.created,
            updated = report.updated,
            skipped = report.skipped,
            failed = report.failed,
            cancelled = report.cancelled,
            "Event sync finished: {} created, {} updated, {} skipped, {} failed",
            report.created,
            report.updated,
            report.skipped,
            report.failed
        );

        report
    }

    /// Configured organizers that exist as users, in configured order.
    async fn resolve_organizers(&self) -> Vec<String> {
        if self.organizer_ids.is_empty() {
            return Vec::new();
        }

        match self.store.find_users_by_ids(&self.organizer_ids).await {
            Ok(users) => {
                for id in &self.organizer_ids {
                    if !users.iter().any(|u| &u.id == id) {
                        warn!("Configured organizer {} does not exist; ignoring", id);
                    }
                }
                users.into_iter().map(|u| u.id).collect()
            }
            Err(e) => {
                warn!("Failed to look up configured organizers: {:?}", e);
                Vec::new()
            }
        }
    }

    async fn sync_family_source(
        &self,
        source: &FamilySource,
        organizers: &[String],
        today: NaiveDate,
        cancel: &CancellationToken,
        report: &mut SyncReport,
    ) -> SyncResult<()> {
        info!(source = %source.base_url, "Syncing family catalog");

        let Some(catalog) = family::fetch_catalog(&self.client, source).await? else {
            warn!(source = %source.base_url, "Catalog not found (404); skipping source");
            return Ok(());
        };

        let references = catalog
            .events
            .iter()
            .map(|r| (r, false))
            .chain(catalog.events_past.iter().map(|r| (r, true)));

        for (reference, is_past) in references {
            if cancel.is_cancelled() {
                report.cancelled = true;
                return Ok(());
            }

            match self
                .sync_family_reference(source, &catalog, reference, is_past, organizers, today)
                .await
            {
                Ok(outcome) => report.record(outcome),
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        source = %source.base_url,
                        event = %reference.name,
                        "Failed to sync event: {}",
                        e
                    );
                }
            }
        }

        Ok(())
    }

    async fn sync_family_reference(
        &self,
        source: &FamilySource,
        catalog: &FamilyCatalog,
        reference: &EventReference,
        is_past: bool,
        organizers: &[String],
        today: NaiveDate,
    ) -> SyncResult<Outcome> {
        let slug = resolve_slug(&source.prefix, &reference.url, reference.cfp_link.as_deref());
        if slug.is_empty() {
            return Err(SyncError::Parse(format!(
                "reference {:?} has no usable url or cfp link",
                reference.name
            )));
        }

        let detail = match source.detail_url(&reference.url) {
            Some(url) => family::fetch_detail(&self.client, &url).await?,
            None => None,
        };

        let (explicit_start, days) = match &detail {
            Some(meta) => {
                if let Some(booking_id) = &meta.booking_id {
                    debug!(slug = %slug, "Event has booking id {}", booking_id);
                }
                let start = match meta.start_time.as_deref() {
                    Some(raw) => Some(parse_start_time(raw).ok_or_else(|| {
                        SyncError::Parse(format!("invalid start_time {:?} for {}", raw, slug))
                    })?),
                    None => None,
                };
                (start, meta.days)
            }
            None => {
                debug!(slug = %slug, "No event metadata; inferring dates from name");
                (None, None)
            }
        };

        let (start_date, end_date) = infer_dates(&reference.name, explicit_start, days, today);
        let location = extract_location_without_country(&reference.location);
        let country = extract_country(&reference.location);
        let website = source
            .event_page_url(&reference.url)
            .map(|u| u.to_string())
            .unwrap_or_default();

        let fields = TemplateFields {
            name: reference.name.clone(),
            location: location.clone(),
            country: country.clone(),
            start_date,
            end_date,
            website: website.clone(),
            slug: slug.clone(),
        };
        let template = catalog.description_template.as_deref().unwrap_or_default();
        let description = match render(template, &fields) {
            Ok(d) => d,
            Err(e) => {
                warn!(slug = %slug, source = %source.base_url, "Failed to render description: {}", e);
                String::new()
            }
        };

        let window = cfp_window(start_date, is_past, today);
        let candidate = NewEvent {
            slug,
            name: reference.name.clone(),
            description,
            is_online: is_online(&reference.location),
            location,
            country,
            start_date,
            end_date,
            website,
            logo: catalog.logo.clone().unwrap_or_default(),
            tos_url: catalog.tos_url.clone().unwrap_or_default(),
            contact_email: catalog.contact_email(),
            tags: source.tags.join(","),
            cfp_status: window.status,
            cfp_open_at: window.open_at,
            cfp_close_at: window.close_at,
            is_paid: true,
            created_by: None,
        };

        self.reconcile(candidate, organizers).await
    }

    async fn sync_conf42(
        &self,
        organizers: &[String],
        today: NaiveDate,
        cancel: &CancellationToken,
        report: &mut SyncReport,
    ) -> SyncResult<()> {
        info!(source = %self.conf42_url, "Syncing conf42 catalog");

        let Some(catalog) = conf42::fetch_catalog(&self.client, &self.conf42_url).await? else {
            warn!(source = %self.conf42_url, "Catalog not found (404); skipping source");
            return Ok(());
        };

        for entry in &catalog.events {
            if cancel.is_cancelled() {
                report.cancelled = true;
                return Ok(());
            }

            match self
                .sync_conf42_entry(&catalog, entry, organizers, today)
                .await
            {
                Ok(outcome) => report.record(outcome),
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        source = %self.conf42_url,
                        event = %entry.short_url,
                        "Failed to sync conf42 event: {}",
                        e
                    );
                }
            }
        }

        Ok(())
    }

    async fn sync_conf42_entry(
        &self,
        catalog: &Conf42Catalog,
        entry: &Conf42CatalogEntry,
        organizers: &[String],
        today: NaiveDate,
    ) -> SyncResult<Outcome> {
        let (topic, _year) = parse_conf42_short_url(&entry.short_url).ok_or_else(|| {
            SyncError::Parse(format!("unexpected short_url {:?}", entry.short_url))
        })?;
        let slug = conf42_slug(&entry.short_url);

        let start_date = parse_iso_date(&entry.date)
            .ok_or_else(|| SyncError::Parse(format!("invalid date {:?} for {}", entry.date, slug)))?;
        let end_date = start_date;
        let location = extract_location_without_country(&entry.location);
        let country = extract_country(&entry.location);
        let website = conf42::website_url(&self.conf42_site, &entry.short_url);

        let template = catalog.description_template.as_deref().unwrap_or_default();
        let description = if template.is_empty() {
            entry.description.clone()
        } else {
            let fields = TemplateFields {
                name: entry.name.clone(),
                location: location.clone(),
                country: country.clone(),
                start_date,
                end_date,
                website: website.clone(),
                slug: slug.clone(),
            };
            match render(template, &fields) {
                Ok(d) => d,
                Err(e) => {
                    warn!(slug = %slug, "Failed to render conf42 description, using raw text: {}", e);
                    entry.description.clone()
                }
            }
        };

        let is_past = start_date.date() < today;
        let window = cfp_window(start_date, is_past, today);
        let candidate = NewEvent {
            slug,
            name: entry.name.clone(),
            description,
            is_online: is_online(&entry.location),
            location,
            country,
            start_date,
            end_date,
            website,
            logo: catalog.logo.clone().unwrap_or_default(),
            tos_url: String::new(),
            contact_email: catalog.contact_email(),
            tags: conf42_topic_tags(&topic).join(","),
            cfp_status: window.status,
            cfp_open_at: window.open_at,
            cfp_close_at: window.close_at,
            is_paid: true,
            created_by: None,
        };

        self.reconcile(candidate, organizers).await
    }

    /// Create, update or skip a candidate event. This is the only place that writes to the store.
    async fn reconcile(&self, mut candidate: NewEvent, organizers: &[String]) -> SyncResult<Outcome> {
        let found = self.store.find_by_slug(&candidate.slug).await?;
        let Some(existing) = found else {
            candidate.created_by = organizers.first().cloned();
            let id = self.store.create(&candidate).await?;
            info!(slug = %candidate.slug, "Created event {}", id);

            if !organizers.is_empty() {
                if let Err(e) = self.store.assign_organizers(&id, organizers).await {
                    warn!(slug = %candidate.slug, "Failed to assign organizers: {:?}", e);
                }
            }
            return Ok(Outcome::Created);
        };

        let update = SyncFieldUpdate::from(&candidate);
        let changes = detect_changes(&update, &existing);
        if changes.is_empty() {
            debug!(slug = %candidate.slug, "Event unchanged");
            return Ok(Outcome::Skipped);
        }

        self.store.update_fields(&existing.id, &update).await?;
        info!(slug = %candidate.slug, "Updated event fields: {}", changes);
        Ok(Outcome::Updated)
    }
}

#[async_trait]
impl SyncJob for EventSyncManager {
    async fn run(&self, cancel: &CancellationToken) -> SyncReport {
        self.sync_all(cancel).await
    }
}
