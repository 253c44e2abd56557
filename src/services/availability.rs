// src/services/availability.rs

//! Availability feed resolver.
//!
//! The feed lists, per hardware reference and region, the stock state of
//! every datacenter. This service folds those into one state per reference.

use serde::Deserialize;

use crate::error::Result;
use crate::models::{Availability, AvailabilityRecord};

/// One element of the feed array. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEntry {
    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub hardware: Option<String>,

    #[serde(default)]
    pub datacenters: Vec<DatacenterEntry>,
}

/// Stock state of one datacenter.
#[derive(Debug, Clone, Deserialize)]
pub struct DatacenterEntry {
    #[serde(default)]
    pub availability: Option<Availability>,
}

/// Resolves feed entries of one region into availability records.
#[derive(Debug, Clone)]
pub struct AvailabilityResolver {
    region: String,
}

impl AvailabilityResolver {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }

    /// Decode the raw feed body and resolve it.
    pub fn parse(&self, body: &str) -> Result<Vec<AvailabilityRecord>> {
        let entries: Vec<FeedEntry> = serde_json::from_str(body)?;
        Ok(self.resolve(&entries))
    }

    /// Keep entries of the configured region and resolve each one.
    ///
    /// Entries without a hardware reference cannot be joined with the
    /// catalog and are dropped.
    pub fn resolve(&self, entries: &[FeedEntry]) -> Vec<AvailabilityRecord> {
        entries
            .iter()
            .filter(|entry| entry.region.as_deref() == Some(self.region.as_str()))
            .filter_map(|entry| {
                let hardware = entry.hardware.as_deref()?;
                Some(AvailabilityRecord {
                    region: self.region.clone(),
                    hardware: hardware.to_string(),
                    availability: resolve_datacenters(&entry.datacenters),
                })
            })
            .collect()
    }
}

/// Fold datacenter states into one.
///
/// Starts from `unavailable`; every datacenter reporting something other
/// than null or `unavailable` overwrites the running value. The last such
/// datacenter in feed order wins, not the "most available" one.
pub fn resolve_datacenters(datacenters: &[DatacenterEntry]) -> Availability {
    datacenters
        .iter()
        .filter_map(|dc| dc.availability.as_ref())
        .filter(|state| !state.is_unavailable())
        .last()
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dc(availability: Option<&str>) -> DatacenterEntry {
        DatacenterEntry {
            availability: availability.map(Availability::new),
        }
    }

    #[test]
    fn test_last_non_unavailable_datacenter_wins() {
        // Deliberately reproduces last-write-wins: "available-now" beats the
        // earlier "available" only because it comes later.
        let datacenters = vec![
            dc(Some("available")),
            dc(None),
            dc(Some("unavailable")),
            dc(Some("available-now")),
        ];
        assert_eq!(resolve_datacenters(&datacenters), Availability::new("available-now"));
    }

    #[test]
    fn test_later_unavailable_does_not_reset() {
        let datacenters = vec![dc(Some("1H-low")), dc(Some("unavailable")), dc(None)];
        assert_eq!(resolve_datacenters(&datacenters), Availability::new("1H-low"));
    }

    #[test]
    fn test_no_datacenters_is_unavailable() {
        assert!(resolve_datacenters(&[]).is_unavailable());
        assert!(resolve_datacenters(&[dc(None), dc(Some("unavailable"))]).is_unavailable());
    }

    #[test]
    fn test_parse_filters_region() {
        let body = r#"[
            {"region": "europe", "hardware": "1801sk12", "datacenters": [
                {"datacenter": "gra", "availability": "unavailable"},
                {"datacenter": "rbx", "availability": "72H"}
            ]},
            {"region": "canada", "hardware": "1801sk12", "datacenters": [
                {"datacenter": "bhs", "availability": "1H-high"}
            ]},
            {"region": "europe", "hardware": "1801sk13", "datacenters": []},
            {"region": "europe", "datacenters": [{"availability": "1H-low"}]}
        ]"#;

        let records = AvailabilityResolver::new("europe").parse(body).unwrap();
        assert_eq!(
            records,
            vec![
                AvailabilityRecord {
                    region: "europe".into(),
                    hardware: "1801sk12".into(),
                    availability: Availability::new("72H"),
                },
                AvailabilityRecord {
                    region: "europe".into(),
                    hardware: "1801sk13".into(),
                    availability: Availability::unavailable(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_tolerates_missing_fields() {
        let body = r#"[{"hardware": "x"}, {"region": "europe", "hardware": "y"}]"#;
        let records = AvailabilityResolver::new("europe").parse(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].hardware, "y");
        assert!(records[0].availability.is_unavailable());
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(AvailabilityResolver::new("europe").parse("{}").is_err());
    }
}
