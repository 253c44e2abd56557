//! Offer and availability data structures.

use std::fmt;

use serde::Deserialize;

/// Stock state reported by the availability feed.
///
/// The feed uses an open set of labels (`"1H-low"`, `"72H"`, ...), so the
/// value is kept as text. Only `"unavailable"` carries meaning here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct Availability(String);

impl Availability {
    pub const UNAVAILABLE: &'static str = "unavailable";

    pub fn new(state: impl Into<String>) -> Self {
        Self(state.into())
    }

    pub fn unavailable() -> Self {
        Self(Self::UNAVAILABLE.to_string())
    }

    pub fn is_unavailable(&self) -> bool {
        self.0 == Self::UNAVAILABLE
    }
}

impl Default for Availability {
    fn default() -> Self {
        Self::unavailable()
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A priced row extracted from the catalog page.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Hardware reference taken from the `data-ref` attribute
    pub hardware: String,

    /// Monthly price without tax
    pub price_without_tax: f64,

    /// Monthly price with tax
    pub price_with_tax: f64,
}

/// Resolved stock state of one hardware reference in one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRecord {
    pub region: String,
    pub hardware: String,
    pub availability: Availability,
}

/// One hardware SKU with its prices and stock state.
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    pub hardware: String,

    /// Price with tax, the figure shown in messages
    pub price_with_tax: f64,

    pub price_without_tax: f64,

    pub availability: Availability,
}

impl From<CatalogEntry> for Offer {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            hardware: entry.hardware,
            price_with_tax: entry.price_with_tax,
            price_without_tax: entry.price_without_tax,
            availability: Availability::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_availability_is_unavailable() {
        assert!(Availability::default().is_unavailable());
        assert_eq!(Availability::default().to_string(), "unavailable");
    }

    #[test]
    fn offer_from_entry_starts_unavailable() {
        let offer = Offer::from(CatalogEntry {
            hardware: "1801sk13".into(),
            price_without_tax: 4.99,
            price_with_tax: 6.04,
        });
        assert_eq!(offer.hardware, "1801sk13");
        assert!(offer.availability.is_unavailable());
    }

    #[test]
    fn availability_is_read_from_plain_string() {
        let state: Availability = serde_json::from_str("\"1H-low\"").unwrap();
        assert_eq!(state, Availability::new("1H-low"));
        assert!(!state.is_unavailable());
    }
}
