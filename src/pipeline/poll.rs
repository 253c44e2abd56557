// src/pipeline/poll.rs

//! The poll loop.
//!
//! Bootstrapping builds the first snapshot and sends a full listing. The
//! loop then sleeps, fetches a new snapshot, reports its differences
//! against the retained one and replaces it. A failed cycle is logged and
//! leaves the retained snapshot untouched.

use std::time::Duration;

use rand::Rng;

use crate::error::{AppError, ErrorKind, Result};
use crate::models::{PollerConfig, Snapshot};
use crate::pipeline::source::SnapshotSource;
use crate::pipeline::{DiffResult, calculate_diff};
use crate::services::Notifier;

/// Drives fetch, diff and notification cycles.
pub struct Poller {
    source: Box<dyn SnapshotSource>,
    notifier: Box<dyn Notifier>,
    config: PollerConfig,
}

impl Poller {
    pub fn new(
        source: Box<dyn SnapshotSource>,
        notifier: Box<dyn Notifier>,
        config: PollerConfig,
    ) -> Self {
        Self {
            source,
            notifier,
            config,
        }
    }

    /// Run forever. Only returns when bootstrapping fails.
    pub async fn run(&self) -> Result<()> {
        let mut current = self.bootstrap().await?;

        loop {
            let delay = self.next_delay();
            log::debug!("Next poll in {}s", delay.as_secs());
            tokio::time::sleep(delay).await;

            match self.poll_once(&mut current).await {
                Ok(diff) if diff.has_changes() => {
                    let (removed, changed, added) = diff.counts();
                    log::info!(
                        "{} changes ({} removed, {} changed, {} added), tracking {} offers",
                        diff.change_count(),
                        removed,
                        changed,
                        added,
                        current.len()
                    );
                }
                Ok(_) => log::debug!("No changes across {} offers", current.len()),
                Err(e) => match e.kind() {
                    ErrorKind::Fetch => {
                        log::warn!("Fetch failed, keeping previous snapshot: {}", e)
                    }
                    ErrorKind::Parse => {
                        log::warn!("Upstream data unreadable, keeping previous snapshot: {}", e)
                    }
                    ErrorKind::Unexpected => {
                        log::error!("Cycle failed, will try again later: {}", e)
                    }
                },
            }
        }
    }

    /// Build the first snapshot and send the full listing.
    ///
    /// Retries with doubling backoff up to `bootstrap_attempts` times, then
    /// fails with [`AppError::Bootstrap`].
    pub async fn bootstrap(&self) -> Result<Snapshot> {
        let attempts = self.config.bootstrap_attempts.max(1);
        let mut backoff = self.config.bootstrap_backoff();

        let mut attempt = 1;
        loop {
            match self.source.fetch_snapshot().await {
                Ok(snapshot) => {
                    log::info!("Bootstrapped with {} offers", snapshot.len());
                    self.deliver(&snapshot.summary_message()).await;
                    return Ok(snapshot);
                }
                Err(e) if attempt < attempts => {
                    log::warn!(
                        "Bootstrap attempt {}/{} failed ({}): {}. Retrying in {}s",
                        attempt,
                        attempts,
                        e.kind(),
                        e,
                        backoff.as_secs()
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                    attempt += 1;
                }
                Err(e) => {
                    log::error!("Bootstrap attempt {}/{} failed: {}", attempt, attempts, e);
                    return Err(AppError::Bootstrap {
                        attempts,
                        source: Box::new(e),
                    });
                }
            }
        }
    }

    /// One running cycle.
    ///
    /// On success every change is notified in order and `current` is
    /// replaced by the new snapshot. On error nothing is notified and
    /// `current` is left as it was.
    pub async fn poll_once(&self, current: &mut Snapshot) -> Result<DiffResult> {
        let next = self.source.fetch_snapshot().await?;
        let diff = calculate_diff(current, &next);

        for event in &diff.events {
            log::debug!("Reporting change for {}", event.hardware());
            self.deliver(&event.to_string()).await;
        }

        *current = next;
        Ok(diff)
    }

    /// Base interval shifted by a random offset within the jitter range.
    ///
    /// Saturates at zero and at the largest representable delay.
    pub fn next_delay(&self) -> Duration {
        let base = self.config.interval();
        let jitter = self.config.jitter_secs;
        let offset = rand::rng().random_range(0..=jitter.saturating_mul(2));
        if offset >= jitter {
            base.saturating_add(Duration::from_secs(offset - jitter))
        } else {
            base.saturating_sub(Duration::from_secs(jitter - offset))
        }
    }

    async fn deliver(&self, text: &str) {
        if let Err(e) = self.notifier.notify(text).await {
            log::warn!("Notification dropped: {}", e);
        }
    }
}
