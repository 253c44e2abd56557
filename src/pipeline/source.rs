// src/pipeline/source.rs

//! Where snapshots come from.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::{Snapshot, SourcesConfig};
use crate::pipeline::build_snapshot;
use crate::services::{AvailabilityResolver, CatalogParser};
use crate::utils::http::fetch_text;

/// Produces a fresh snapshot on every call.
///
/// An `Err` means no data was obtained; it is never an empty snapshot.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<Snapshot>;
}

/// Fetches the catalog page and the availability feed over HTTP.
///
/// Both requests run one after the other; a failure of either one fails
/// the whole fetch.
pub struct HttpSource {
    client: Client,
    config: SourcesConfig,
    parser: CatalogParser,
    resolver: AvailabilityResolver,
}

impl HttpSource {
    pub fn new(client: Client, config: SourcesConfig) -> Self {
        let resolver = AvailabilityResolver::new(config.region.clone());
        Self {
            client,
            config,
            parser: CatalogParser::new(),
            resolver,
        }
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let document = fetch_text(&self.client, &self.config.catalog_url).await?;
        let catalog = self.parser.parse(&document)?;

        let feed = fetch_text(&self.client, &self.config.availability_url).await?;
        let availability = self.resolver.parse(&feed)?;

        log::debug!(
            "Fetched {} catalog offers and {} {} availability records",
            catalog.len(),
            availability.len(),
            self.config.region
        );

        Ok(build_snapshot(catalog, &availability))
    }
}
