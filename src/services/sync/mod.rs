//! Catalog synchronization: fetching external event catalogs, mapping them
//! onto canonical events and reconciling them with the store.

pub mod client;
pub mod conf42;
pub mod dates;
pub mod diff;
pub mod family;
pub mod location;
pub mod manager;
pub mod scheduler;
pub mod slug;
pub mod store;
pub mod tags;
pub mod template;

pub use client::CatalogClient;
pub use manager::{EventSyncManager, SyncReport};
pub use scheduler::{SyncHandle, SyncScheduler};
pub use store::SqliteEventStore;
