//! Segment pricing: customer segments, their discount table, and segment
//! price derivation.
//!
//! Segment prices are derived once, when a product or client is created, and
//! stored. They are a historical snapshot: changing a product's base price
//! later does NOT recompute them.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Prices are stored with two decimal places.
const PRICE_DECIMAL_PLACES: u32 = 2;

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// Customer segment driving the discount tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Segment {
    HealthStore,
    Distributor,
    Gym,
    Cafeteria,
}

impl Segment {
    /// Every segment, in display order.
    pub const ALL: [Segment; 4] = [
        Segment::HealthStore,
        Segment::Distributor,
        Segment::Gym,
        Segment::Cafeteria,
    ];

    /// Wire tag of the segment (`health-store`, `distributor`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Segment::HealthStore => "health-store",
            Segment::Distributor => "distributor",
            Segment::Gym => "gym",
            Segment::Cafeteria => "cafeteria",
        }
    }

    /// Exact discount rate for this segment.
    pub fn discount_rate(self) -> Decimal {
        match self {
            Segment::HealthStore => Decimal::new(15, 2),
            Segment::Distributor => Decimal::new(25, 2),
            Segment::Gym => Decimal::new(12, 2),
            Segment::Cafeteria => Decimal::new(10, 2),
        }
    }

    /// Discount rate as a fraction (e.g. `0.25` for distributors).
    pub fn discount(self) -> f64 {
        self.discount_rate().to_f64().unwrap_or_default()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Segment {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Segment::ALL
            .into_iter()
            .find(|seg| seg.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "unknown segment '{s}', expected one of: health-store, distributor, gym, cafeteria"
                ))
            })
    }
}

/// Discount fraction for a raw segment tag.
///
/// Unrecognized tags get no discount (`0.0`); this never fails.
pub fn discount_for_tag(tag: &str) -> f64 {
    tag.parse::<Segment>().map(Segment::discount).unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Price derivation
// ---------------------------------------------------------------------------

/// Round a decimal amount to a stored price (2 places, half away from zero).
fn to_price(amount: Decimal) -> f64 {
    amount
        .round_dp_with_strategy(PRICE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Price a segment pays for an item with the given base price.
///
/// `round(base_price * (1 - discount), 2)`, computed in decimal so that
/// `15.50` for a distributor gives `11.63` rather than a binary-float `11.62`.
///
/// Fails when the base price has no decimal representation or when the
/// discounted price rounds down to zero.
pub fn segment_price(base_price: f64, segment: Segment) -> Result<f64, CoreError> {
    let base = Decimal::from_f64(base_price).ok_or_else(|| {
        CoreError::Validation(format!("base_price {base_price} is out of range"))
    })?;
    let price = to_price(base * (Decimal::ONE - segment.discount_rate()));
    if price <= 0.0 {
        return Err(CoreError::Validation(format!(
            "base_price {base_price} is too small: the {segment} price rounds to 0.00"
        )));
    }
    Ok(price)
}

/// The four stored segment prices of a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentPrices {
    pub health_store: f64,
    pub distributor: f64,
    pub gym: f64,
    pub cafeteria: f64,
}

impl SegmentPrices {
    /// Derive all four prices from a base price.
    pub fn derive(base_price: f64) -> Result<Self, CoreError> {
        Self::derive_with_overrides(base_price, None, None, None, None)
    }

    /// Derive from a base price, keeping any explicitly provided price.
    ///
    /// Only the omitted prices are derived, so a base price too small to
    /// discount is fine when every segment price is given.
    pub fn derive_with_overrides(
        base_price: f64,
        health_store: Option<f64>,
        distributor: Option<f64>,
        gym: Option<f64>,
        cafeteria: Option<f64>,
    ) -> Result<Self, CoreError> {
        let resolve = |explicit: Option<f64>, segment| match explicit {
            Some(price) => Ok(price),
            None => segment_price(base_price, segment),
        };
        Ok(Self {
            health_store: resolve(health_store, Segment::HealthStore)?,
            distributor: resolve(distributor, Segment::Distributor)?,
            gym: resolve(gym, Segment::Gym)?,
            cafeteria: resolve(cafeteria, Segment::Cafeteria)?,
        })
    }

    pub fn get(&self, segment: Segment) -> f64 {
        match segment {
            Segment::HealthStore => self.health_store,
            Segment::Distributor => self.distributor,
            Segment::Gym => self.gym,
            Segment::Cafeteria => self.cafeteria,
        }
    }
}

/// Validate that a price is finite and strictly positive.
pub fn validate_price(field: &str, price: f64) -> Result<(), CoreError> {
    if !price.is_finite() {
        return Err(CoreError::Validation(format!(
            "{field} must be a finite number, got {price}"
        )));
    }
    if price <= 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must be greater than 0, got {price}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    // -- discount table --------------------------------------------------------

    #[test]
    fn discount_table_matches_segments() {
        assert_eq!(Segment::HealthStore.discount(), 0.15);
        assert_eq!(Segment::Distributor.discount(), 0.25);
        assert_eq!(Segment::Gym.discount(), 0.12);
        assert_eq!(Segment::Cafeteria.discount(), 0.10);
    }

    #[test]
    fn discount_for_known_tags() {
        for segment in Segment::ALL {
            assert_eq!(discount_for_tag(segment.as_str()), segment.discount());
        }
    }

    #[test]
    fn unknown_tag_gets_no_discount() {
        assert_eq!(discount_for_tag("wholesale-club"), 0.0);
        assert_eq!(discount_for_tag(""), 0.0);
        assert_eq!(discount_for_tag("Distributor"), 0.0);
    }

    #[test]
    fn segment_parses_from_tag() {
        assert_eq!("gym".parse::<Segment>().unwrap(), Segment::Gym);
        assert_eq!(
            "health-store".parse::<Segment>().unwrap(),
            Segment::HealthStore
        );
        assert!("bakery".parse::<Segment>().is_err());
    }

    #[test]
    fn segment_serializes_as_kebab_case() {
        let json = serde_json::to_string(&Segment::HealthStore).unwrap();
        assert_eq!(json, "\"health-store\"");
        let parsed: Segment = serde_json::from_str("\"cafeteria\"").unwrap();
        assert_eq!(parsed, Segment::Cafeteria);
    }

    // -- segment_price ---------------------------------------------------------

    #[test]
    fn distributor_price_rounds_half_up() {
        assert_eq!(segment_price(15.50, Segment::Distributor).unwrap(), 11.63);
    }

    #[test]
    fn health_store_price_example() {
        assert_eq!(segment_price(8.99, Segment::HealthStore).unwrap(), 7.64);
    }

    #[test]
    fn derive_matches_seed_catalog() {
        let prices = SegmentPrices::derive(18.50).unwrap();
        assert_eq!(prices.health_store, 15.73);
        assert_eq!(prices.distributor, 13.88);
        assert_eq!(prices.gym, 16.28);
        assert_eq!(prices.cafeteria, 16.65);
    }

    #[test]
    fn derived_prices_never_exceed_base() {
        for base in [0.01, 1.0, 8.99, 12.0, 15.5, 999.99] {
            let prices = SegmentPrices::derive(base).unwrap();
            for segment in Segment::ALL {
                assert!(prices.get(segment) <= base);
            }
        }
    }

    #[test]
    fn overrides_win_over_derivation() {
        let prices =
            SegmentPrices::derive_with_overrides(12.0, None, Some(8.5), None, None).unwrap();
        assert_eq!(prices.distributor, 8.5);
        assert_eq!(prices.health_store, 10.2);
        assert_eq!(prices.gym, 10.56);
        assert_eq!(prices.cafeteria, 10.8);
    }

    #[test]
    fn price_rounding_to_zero_is_rejected() {
        assert_matches!(
            segment_price(0.004, Segment::Distributor),
            Err(CoreError::Validation(msg)) if msg.contains("distributor")
        );
        assert_matches!(SegmentPrices::derive(0.004), Err(CoreError::Validation(_)));
    }

    #[test]
    fn smallest_price_survives_every_discount() {
        // 0.01 * 0.75 = 0.0075, which rounds up to 0.01.
        let prices = SegmentPrices::derive(0.01).unwrap();
        for segment in Segment::ALL {
            assert_eq!(prices.get(segment), 0.01);
        }
    }

    #[test]
    fn base_price_beyond_decimal_range_is_rejected() {
        assert_matches!(
            SegmentPrices::derive(1e29),
            Err(CoreError::Validation(msg)) if msg.contains("out of range")
        );
    }

    #[test]
    fn full_overrides_skip_derivation() {
        let prices =
            SegmentPrices::derive_with_overrides(0.004, Some(0.01), Some(0.01), Some(0.01), Some(0.01))
                .unwrap();
        assert_eq!(prices.distributor, 0.01);
    }

    // -- validate_price --------------------------------------------------------

    #[test]
    fn rejects_zero_and_negative_prices() {
        assert!(validate_price("base_price", 0.0).is_err());
        assert!(validate_price("base_price", -3.0).is_err());
    }

    #[test]
    fn rejects_non_finite_prices() {
        assert!(validate_price("base_price", f64::NAN).is_err());
        assert!(validate_price("base_price", f64::INFINITY).is_err());
    }

    #[test]
    fn accepts_positive_price() {
        assert!(validate_price("base_price", 0.01).is_ok());
    }
}
