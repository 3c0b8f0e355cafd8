use std::fmt;

use crate::db::models::{CanonicalEvent, SyncFieldUpdate};

/// Names of the sync-managed fields that differ between a candidate and a stored event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet(Vec<&'static str>);

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn fields(&self) -> &[&'static str] {
        &self.0
    }
}

impl fmt::Display for ChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

/// Compare the sync-managed fields of `candidate` against `existing`.
///
/// CFP status, tags and organizers are never compared.
pub fn detect_changes(candidate: &SyncFieldUpdate, existing: &CanonicalEvent) -> ChangeSet {
    let mut changed = Vec::new();

    if candidate.name != existing.name {
        changed.push("name");
    }
    if candidate.start_date != existing.start_date {
        changed.push("start_date");
    }
    if candidate.end_date != existing.end_date {
        changed.push("end_date");
    }
    if candidate.description != existing.description {
        changed.push("description");
    }
    if candidate.is_paid != existing.is_paid {
        changed.push("is_paid");
    }
    if candidate.logo != existing.logo {
        changed.push("logo");
    }
    if candidate.contact_email != existing.contact_email {
        changed.push("contact_email");
    }

    ChangeSet(changed)
}
