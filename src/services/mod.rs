//! Service layer for the watcher.
//!
//! This module contains the business logic for:
//! - Catalog page parsing (`CatalogParser`)
//! - Availability feed resolution (`AvailabilityResolver`)
//! - Message delivery (`Notifier`)

mod availability;
mod catalog;
pub mod notifier;

pub use availability::{AvailabilityResolver, DatacenterEntry, FeedEntry, resolve_datacenters};
pub use catalog::{CatalogParser, OFFER_CELL_COUNT, PRICE_CELL, parse_price_cell};
pub use notifier::{ConsoleNotifier, Notifier, TelegramNotifier};
