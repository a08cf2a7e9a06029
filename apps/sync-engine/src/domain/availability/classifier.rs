//! Availability classification.
//!
//! Maps raw probe signals to a confidence-qualified verdict. A blocked or
//! ambiguous probe is evidence of nothing: it never yields `Unavailable`.

use serde::{Deserialize, Serialize};

use super::snapshot::{AvailabilitySignal, SourceSnapshot};

/// Judgment of current purchasability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// In stock, priced, not blocked.
    Available,
    /// Confident negative from an unblocked page.
    Unavailable,
    /// Blocked, unknown, or contradictory.
    Indeterminate,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "AVAILABLE"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::Indeterminate => write!(f, "INDETERMINATE"),
        }
    }
}

/// Stateless availability classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvailabilityClassifier;

impl AvailabilityClassifier {
    /// Classify a snapshot. Pure and deterministic.
    #[must_use]
    pub const fn classify(snapshot: &SourceSnapshot) -> Verdict {
        if snapshot.blocked {
            return Verdict::Indeterminate;
        }

        match snapshot.availability_signal {
            AvailabilitySignal::InStock => {
                if snapshot.raw_price.is_some() {
                    Verdict::Available
                } else {
                    // Positive signal without a price is contradictory
                    Verdict::Indeterminate
                }
            }
            AvailabilitySignal::OutOfStock | AvailabilitySignal::Unavailable => {
                Verdict::Unavailable
            }
            AvailabilitySignal::Blocked | AvailabilitySignal::Unknown => Verdict::Indeterminate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::SkuId;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn snapshot(signal: AvailabilitySignal, price: Option<Decimal>, blocked: bool) -> SourceSnapshot {
        let mut snapshot = SourceSnapshot::new(SkuId::new("B000TEST"), "USD").with_signal(signal);
        snapshot.raw_price = price;
        snapshot.blocked = blocked;
        snapshot
    }

    #[test_case(AvailabilitySignal::InStock, Some(dec!(20)), false => Verdict::Available; "in stock with price")]
    #[test_case(AvailabilitySignal::InStock, None, false => Verdict::Indeterminate; "in stock without price")]
    #[test_case(AvailabilitySignal::OutOfStock, None, false => Verdict::Unavailable; "out of stock")]
    #[test_case(AvailabilitySignal::Unavailable, Some(dec!(20)), false => Verdict::Unavailable; "unavailable with stale price")]
    #[test_case(AvailabilitySignal::Unknown, Some(dec!(20)), false => Verdict::Indeterminate; "unknown signal")]
    #[test_case(AvailabilitySignal::Blocked, None, false => Verdict::Indeterminate; "blocked signal")]
    #[test_case(AvailabilitySignal::InStock, Some(dec!(20)), true => Verdict::Indeterminate; "blocked in stock")]
    #[test_case(AvailabilitySignal::OutOfStock, None, true => Verdict::Indeterminate; "blocked out of stock")]
    fn classify_table(signal: AvailabilitySignal, price: Option<Decimal>, blocked: bool) -> Verdict {
        AvailabilityClassifier::classify(&snapshot(signal, price, blocked))
    }

    fn any_signal() -> impl Strategy<Value = AvailabilitySignal> {
        prop_oneof![
            Just(AvailabilitySignal::InStock),
            Just(AvailabilitySignal::OutOfStock),
            Just(AvailabilitySignal::Unavailable),
            Just(AvailabilitySignal::Blocked),
            Just(AvailabilitySignal::Unknown),
        ]
    }

    proptest! {
        #[test]
        fn blocked_snapshot_is_never_unavailable(
            signal in any_signal(),
            cents in proptest::option::of(0i64..1_000_000),
        ) {
            let price = cents.map(|c| Decimal::new(c, 2));
            let verdict = AvailabilityClassifier::classify(&snapshot(signal, price, true));
            prop_assert_ne!(verdict, Verdict::Unavailable);
        }

        #[test]
        fn classification_is_deterministic(
            signal in any_signal(),
            cents in proptest::option::of(0i64..1_000_000),
            blocked in any::<bool>(),
        ) {
            let snap = snapshot(signal, cents.map(|c| Decimal::new(c, 2)), blocked);
            prop_assert_eq!(
                AvailabilityClassifier::classify(&snap),
                AvailabilityClassifier::classify(&snap)
            );
        }
    }
}
