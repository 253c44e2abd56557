// src/models/mod.rs

//! Domain models for the watcher.
//!
//! This module contains the data structures shared by the parsing,
//! snapshot and notification stages, organized by their primary purpose.

mod config;
mod event;
mod offer;
mod snapshot;

// Re-export all public types
pub use config::{Config, Credentials, HttpConfig, NotifierConfig, PollerConfig, SourcesConfig};
pub use event::ChangeEvent;
pub use offer::{Availability, AvailabilityRecord, CatalogEntry, Offer};
pub use snapshot::Snapshot;
