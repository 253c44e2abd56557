//! Diff calculation for change notifications.
//!
//! Computes the difference between two snapshots to identify removed,
//! re-stocked/sold-out and newly listed hardware.
//!
//! Only availability is compared for hardware present in both snapshots.
//! A price change alone produces no event.

use crate::models::{ChangeEvent, Snapshot};

/// Ordered change events between two snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffResult {
    pub events: Vec<ChangeEvent>,
}

impl DiffResult {
    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get the total number of changes.
    pub fn change_count(&self) -> usize {
        self.events.len()
    }

    /// Counts of (removed, changed, added) events.
    pub fn counts(&self) -> (usize, usize, usize) {
        self.events.iter().fold((0, 0, 0), |(r, c, a), event| match event {
            ChangeEvent::Removed { .. } => (r + 1, c, a),
            ChangeEvent::AvailabilityChanged { .. } => (r, c + 1, a),
            ChangeEvent::Added { .. } => (r, c, a + 1),
        })
    }
}

/// Calculate the diff between previous and current snapshots.
///
/// Previous keys are walked in order first, each yielding `Removed` or
/// `AvailabilityChanged` when applicable; current keys then yield `Added`.
pub fn calculate_diff(previous: &Snapshot, current: &Snapshot) -> DiffResult {
    let mut events = Vec::new();

    for old in previous.iter() {
        match current.get(&old.hardware) {
            None => events.push(ChangeEvent::Removed {
                hardware: old.hardware.clone(),
                last_known_price: old.price_with_tax,
            }),
            Some(new) if new.availability != old.availability => {
                events.push(ChangeEvent::AvailabilityChanged {
                    hardware: new.hardware.clone(),
                    price: new.price_with_tax,
                    from: old.availability.clone(),
                    to: new.availability.clone(),
                })
            }
            Some(_) => {}
        }
    }

    for new in current.iter().filter(|o| !previous.contains(&o.hardware)) {
        events.push(ChangeEvent::Added {
            hardware: new.hardware.clone(),
            price: new.price_with_tax,
        });
    }

    DiffResult { events }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::models::{Availability, Offer};

    fn make_offer(hardware: &str, price: f64, availability: &str) -> Offer {
        Offer {
            hardware: hardware.to_string(),
            price_with_tax: price,
            price_without_tax: price,
            availability: Availability::new(availability),
        }
    }

    fn snapshot(offers: Vec<Offer>) -> Snapshot {
        Snapshot::new(offers)
    }

    #[test]
    fn test_no_changes() {
        let prev = snapshot(vec![
            make_offer("A", 10.0, "unavailable"),
            make_offer("B", 20.0, "72H"),
        ]);

        let result = calculate_diff(&prev, &prev.clone());
        assert!(!result.has_changes());
        assert_eq!(result.change_count(), 0);
    }

    #[test]
    fn test_changed_and_added() {
        let prev = snapshot(vec![make_offer("A", 10.0, "unavailable")]);
        let curr = snapshot(vec![
            make_offer("A", 10.0, "available"),
            make_offer("B", 20.0, "unavailable"),
        ]);

        let result = calculate_diff(&prev, &curr);
        assert_eq!(
            result.events,
            vec![
                ChangeEvent::AvailabilityChanged {
                    hardware: "A".into(),
                    price: 10.0,
                    from: Availability::new("unavailable"),
                    to: Availability::new("available"),
                },
                ChangeEvent::Added {
                    hardware: "B".into(),
                    price: 20.0,
                },
            ]
        );
    }

    #[test]
    fn test_removals_use_last_known_price() {
        let prev = snapshot(vec![make_offer("A", 10.0, "72H"), make_offer("B", 20.0, "72H")]);
        let curr = snapshot(vec![make_offer("A", 10.0, "72H")]);

        let result = calculate_diff(&prev, &curr);
        assert_eq!(
            result.events,
            vec![ChangeEvent::Removed {
                hardware: "B".into(),
                last_known_price: 20.0,
            }]
        );
    }

    #[test]
    fn test_changed_event_carries_current_price() {
        let prev = snapshot(vec![make_offer("A", 10.0, "unavailable")]);
        let curr = snapshot(vec![make_offer("A", 12.0, "1H-low")]);

        let result = calculate_diff(&prev, &curr);
        assert!(matches!(
            &result.events[..],
            [ChangeEvent::AvailabilityChanged { price, .. }] if *price == 12.0
        ));
    }

    #[test]
    fn test_price_only_change_is_ignored() {
        let prev = snapshot(vec![make_offer("A", 10.0, "72H")]);
        let curr = snapshot(vec![make_offer("A", 11.0, "72H")]);

        assert!(!calculate_diff(&prev, &curr).has_changes());
    }

    #[test]
    fn test_event_order_is_deterministic() {
        let prev = snapshot(vec![
            make_offer("D", 4.0, "72H"),
            make_offer("A", 1.0, "72H"),
            make_offer("C", 3.0, "unavailable"),
        ]);
        let curr = snapshot(vec![
            make_offer("E", 5.0, "72H"),
            make_offer("C", 3.0, "1H-low"),
            make_offer("B", 2.0, "72H"),
        ]);

        let result = calculate_diff(&prev, &curr);
        let order: Vec<&str> = result.events.iter().map(ChangeEvent::hardware).collect();
        assert_eq!(order, vec!["A", "C", "D", "B", "E"]);
        assert_eq!(result.counts(), (2, 1, 2));
    }

    #[test]
    fn test_every_key_classified_once() {
        let prev = snapshot(vec![
            make_offer("keep", 1.0, "72H"),
            make_offer("gone", 2.0, "72H"),
            make_offer("flip", 3.0, "unavailable"),
        ]);
        let curr = snapshot(vec![
            make_offer("keep", 1.0, "72H"),
            make_offer("flip", 3.0, "72H"),
            make_offer("new", 4.0, "unavailable"),
        ]);

        let result = calculate_diff(&prev, &curr);
        let touched: Vec<&str> = result.events.iter().map(ChangeEvent::hardware).collect();
        let unique: BTreeSet<&str> = touched.iter().copied().collect();

        assert_eq!(touched.len(), unique.len());
        assert_eq!(unique, BTreeSet::from(["flip", "gone", "new"]));
    }

    #[test]
    fn test_empty_to_full() {
        let curr = snapshot(vec![make_offer("A", 1.0, "unavailable")]);

        let result = calculate_diff(&Snapshot::empty(), &curr);
        assert_eq!(result.counts(), (0, 0, 1));
    }

    #[test]
    fn test_full_to_empty() {
        let prev = snapshot(vec![make_offer("A", 1.0, "unavailable")]);

        let result = calculate_diff(&prev, &Snapshot::empty());
        assert_eq!(result.counts(), (1, 0, 0));
    }
}
