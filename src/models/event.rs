//! Change events produced by comparing two snapshots.

use std::fmt;

use crate::models::Availability;

/// A single difference between the previous and the current snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    /// Hardware disappeared from the catalog
    Removed {
        hardware: String,
        last_known_price: f64,
    },

    /// Hardware stayed listed but its stock state moved
    AvailabilityChanged {
        hardware: String,
        price: f64,
        from: Availability,
        to: Availability,
    },

    /// Hardware appeared in the catalog
    Added { hardware: String, price: f64 },
}

impl ChangeEvent {
    pub fn hardware(&self) -> &str {
        match self {
            ChangeEvent::Removed { hardware, .. }
            | ChangeEvent::AvailabilityChanged { hardware, .. }
            | ChangeEvent::Added { hardware, .. } => hardware,
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeEvent::Removed {
                hardware,
                last_known_price,
            } => write!(
                f,
                "Hardware {} ({}e) is not in the list anymore!",
                hardware, last_known_price
            ),
            ChangeEvent::AvailabilityChanged {
                hardware,
                price,
                from,
                to,
            } => write!(
                f,
                "Hardware {} ({}e) has changed its availability from {} to {}",
                hardware, price, from, to
            ),
            ChangeEvent::Added { hardware, price } => {
                write!(f, "Hardware {} ({}e) has been added to the list!", hardware, price)
            }
        }
    }
}
