// src/pipeline/snapshot.rs

//! Joins catalog entries with availability records.

use std::collections::HashMap;

use crate::models::{AvailabilityRecord, CatalogEntry, Offer, Snapshot};

/// Build a snapshot from both sources.
///
/// The catalog decides membership: records without a matching catalog
/// entry are dropped, and catalog entries without a record stay
/// `unavailable`. When several records share a hardware reference the first
/// one is used.
pub fn build_snapshot(catalog: Vec<CatalogEntry>, availability: &[AvailabilityRecord]) -> Snapshot {
    let mut lookup: HashMap<&str, &AvailabilityRecord> = HashMap::with_capacity(availability.len());
    for record in availability {
        lookup.entry(record.hardware.as_str()).or_insert(record);
    }

    let offers: Vec<Offer> = catalog
        .into_iter()
        .map(|entry| {
            let mut offer = Offer::from(entry);
            if let Some(record) = lookup.get(offer.hardware.as_str()) {
                offer.availability = record.availability.clone();
            }
            offer
        })
        .collect();

    let unmatched = availability
        .iter()
        .filter(|record| !offers.iter().any(|o| o.hardware == record.hardware))
        .count();
    if unmatched > 0 {
        log::debug!("{} availability records have no catalog offer", unmatched);
    }

    Snapshot::new(offers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Availability;

    fn entry(hardware: &str, price: f64) -> CatalogEntry {
        CatalogEntry {
            hardware: hardware.to_string(),
            price_without_tax: price,
            price_with_tax: price * 1.21,
        }
    }

    fn record(hardware: &str, availability: &str) -> AvailabilityRecord {
        AvailabilityRecord {
            region: "europe".into(),
            hardware: hardware.to_string(),
            availability: Availability::new(availability),
        }
    }

    #[test]
    fn test_join_sets_availability() {
        let snapshot = build_snapshot(
            vec![entry("ks-2", 20.0), entry("ks-1", 10.0)],
            &[record("ks-1", "72H")],
        );

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("ks-1").unwrap().availability, Availability::new("72H"));
        assert!(snapshot.get("ks-2").unwrap().availability.is_unavailable());
    }

    #[test]
    fn test_catalog_drives_membership() {
        let snapshot = build_snapshot(vec![entry("ks-1", 10.0)], &[record("ghost", "1H-low")]);

        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot.contains("ghost"));
    }

    #[test]
    fn test_first_matching_record_wins() {
        let snapshot = build_snapshot(
            vec![entry("ks-1", 10.0)],
            &[record("ks-1", "1H-low"), record("ks-1", "72H")],
        );
        assert_eq!(snapshot.get("ks-1").unwrap().availability, Availability::new("1H-low"));
    }

    #[test]
    fn test_result_is_sorted() {
        let snapshot = build_snapshot(
            vec![entry("c", 1.0), entry("a", 1.0), entry("b", 1.0)],
            &[],
        );
        let ids: Vec<&str> = snapshot.hardware_ids().map(String::as_str).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
