//! Point-in-time view of the catalog.

use std::collections::BTreeMap;
use std::collections::btree_map;

use chrono::{DateTime, Utc};

use crate::models::Offer;

/// Offers keyed by hardware reference, ordered by key.
///
/// Built once per poll cycle and never mutated afterwards; the next cycle
/// produces a whole new value.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    offers: BTreeMap<String, Offer>,
    taken_at: DateTime<Utc>,
}

impl Snapshot {
    /// Build a snapshot from offers. A later offer replaces an earlier one
    /// with the same hardware reference.
    pub fn new(offers: impl IntoIterator<Item = Offer>) -> Self {
        Self::with_timestamp(offers, Utc::now())
    }

    pub fn with_timestamp(
        offers: impl IntoIterator<Item = Offer>,
        taken_at: DateTime<Utc>,
    ) -> Self {
        let mut map = BTreeMap::new();
        for offer in offers {
            if let Some(previous) = map.insert(offer.hardware.clone(), offer) {
                log::debug!(
                    "Duplicate catalog row for {}, keeping the last one",
                    previous.hardware
                );
            }
        }
        Self {
            offers: map,
            taken_at,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn get(&self, hardware: &str) -> Option<&Offer> {
        self.offers.get(hardware)
    }

    pub fn contains(&self, hardware: &str) -> bool {
        self.offers.contains_key(hardware)
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// Offers in ascending hardware order.
    pub fn iter(&self) -> btree_map::Values<'_, String, Offer> {
        self.offers.values()
    }

    pub fn hardware_ids(&self) -> btree_map::Keys<'_, String, Offer> {
        self.offers.keys()
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    /// Full listing sent once at startup.
    pub fn summary_message(&self) -> String {
        let mut message = String::from("Kimsufi server prices and availability:\n\n");
        for offer in self.iter() {
            message.push_str(&format!(
                "\t- {} (*{}e*): `{}`\n",
                offer.hardware, offer.price_with_tax, offer.availability
            ));
        }
        message
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Offer;
    type IntoIter = btree_map::Values<'a, String, Offer>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
