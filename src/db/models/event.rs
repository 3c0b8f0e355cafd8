use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// Event Models (canonical conference events, partly managed by catalog sync)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CfpStatus {
    Open,
    Closed,
}

impl CfpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CfpStatus::Open => "open",
            CfpStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CanonicalEvent {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    /// Location without the trailing country segment.
    pub location: String,
    pub country: String,
    pub is_online: bool,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub website: String,
    pub logo: String,
    pub tos_url: String,
    pub contact_email: String,
    /// Comma-joined tag list.
    pub tags: String,
    pub cfp_status: String,
    pub cfp_open_at: NaiveDateTime,
    pub cfp_close_at: NaiveDateTime,
    pub is_paid: bool,
    pub created_by: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub country: String,
    pub is_online: bool,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub website: String,
    pub logo: String,
    pub tos_url: String,
    pub contact_email: String,
    pub tags: String,
    pub cfp_status: CfpStatus,
    pub cfp_open_at: NaiveDateTime,
    pub cfp_close_at: NaiveDateTime,
    pub is_paid: bool,
    pub created_by: Option<String>,
}

/// The only fields catalog sync may overwrite on an existing event.
///
/// CFP status, tags and organizers belong to the organizers once the event exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncFieldUpdate {
    pub name: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub description: String,
    pub is_paid: bool,
    pub logo: String,
    pub contact_email: String,
}

impl From<&NewEvent> for SyncFieldUpdate {
    fn from(event: &NewEvent) -> Self {
        Self {
            name: event.name.clone(),
            start_date: event.start_date,
            end_date: event.end_date,
            description: event.description.clone(),
            is_paid: event.is_paid,
            logo: event.logo.clone(),
            contact_email: event.contact_email.clone(),
        }
    }
}
