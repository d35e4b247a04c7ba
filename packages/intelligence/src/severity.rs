//! Crime severity classification.
//!
//! Each ladder is a list of strict upper bounds: a value falls into the
//! first tier whose bound it is strictly less than, and anything at or
//! above the last bound is [`SeverityTier::VeryHigh`]. A value equal to a
//! bound therefore lands in the tier above it.

use site_risk_crime_models::{CrimeType, SeverityTier};

/// A severity ladder of `(tier, exclusive upper bound)` pairs.
pub type Ladder = [(SeverityTier, f64)];

/// Violent crimes per 100k residents.
pub const VIOLENT_RATE_LADDER: &Ladder = &[
    (SeverityTier::VeryLow, 100.0),
    (SeverityTier::Low, 250.0),
    (SeverityTier::Medium, 400.0),
    (SeverityTier::High, 600.0),
    (SeverityTier::VeryHigh, 800.0),
];

/// Property crimes per 100k residents.
pub const PROPERTY_RATE_LADDER: &Ladder = &[
    (SeverityTier::VeryLow, 1000.0),
    (SeverityTier::Low, 1800.0),
    (SeverityTier::Medium, 2500.0),
    (SeverityTier::High, 3500.0),
    (SeverityTier::VeryHigh, 4500.0),
];

/// Absolute violent crime counts, used when no rate is known.
pub const VIOLENT_COUNT_LADDER: &Ladder = &[
    (SeverityTier::VeryLow, 50.0),
    (SeverityTier::Low, 200.0),
    (SeverityTier::Medium, 500.0),
    (SeverityTier::High, 1000.0),
];

/// Absolute property crime counts, used when no rate is known.
pub const PROPERTY_COUNT_LADDER: &Ladder = &[
    (SeverityTier::VeryLow, 200.0),
    (SeverityTier::Low, 1000.0),
    (SeverityTier::Medium, 2500.0),
    (SeverityTier::High, 5000.0),
];

/// Returns the per-100k rate ladder for a crime type.
#[must_use]
pub const fn rate_ladder(crime_type: CrimeType) -> &'static Ladder {
    match crime_type {
        CrimeType::Violent => VIOLENT_RATE_LADDER,
        CrimeType::Property => PROPERTY_RATE_LADDER,
    }
}

/// Returns the absolute-count ladder for a crime type.
#[must_use]
pub const fn count_ladder(crime_type: CrimeType) -> &'static Ladder {
    match crime_type {
        CrimeType::Violent => VIOLENT_COUNT_LADDER,
        CrimeType::Property => PROPERTY_COUNT_LADDER,
    }
}

/// Places `value` on `ladder`.
#[must_use]
pub fn classify_on(ladder: &Ladder, value: f64) -> SeverityTier {
    ladder
        .iter()
        .find(|(_, bound)| value < *bound)
        .map_or(SeverityTier::VeryHigh, |(tier, _)| *tier)
}

/// Returns `rate` if it is usable for classification (present and positive).
#[must_use]
pub fn usable_rate(rate: Option<f64>) -> Option<f64> {
    rate.filter(|r| *r > 0.0)
}

/// Classifies a crime category by rate, falling back to the absolute
/// count when no positive rate is available.
///
/// With neither a rate nor a nonzero total the result is
/// [`SeverityTier::VeryLow`].
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn classify_severity(crime_type: CrimeType, rate: Option<f64>, total: u64) -> SeverityTier {
    if let Some(rate) = usable_rate(rate) {
        return classify_on(rate_ladder(crime_type), rate);
    }
    if total > 0 {
        return classify_on(count_ladder(crime_type), total as f64);
    }
    SeverityTier::VeryLow
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violent_rate_tiers() {
        let v = CrimeType::Violent;
        assert_eq!(classify_severity(v, Some(50.0), 0), SeverityTier::VeryLow);
        assert_eq!(classify_severity(v, Some(99.9), 0), SeverityTier::VeryLow);
        assert_eq!(classify_severity(v, Some(300.0), 0), SeverityTier::Medium);
        assert_eq!(classify_severity(v, Some(599.0), 0), SeverityTier::High);
        assert_eq!(classify_severity(v, Some(700.0), 0), SeverityTier::VeryHigh);
        assert_eq!(classify_severity(v, Some(5000.0), 0), SeverityTier::VeryHigh);
    }

    #[test]
    fn boundary_values_move_up_a_tier() {
        let v = CrimeType::Violent;
        assert_eq!(classify_severity(v, Some(100.0), 0), SeverityTier::Low);
        assert_eq!(classify_severity(v, Some(250.0), 0), SeverityTier::Medium);
        assert_eq!(classify_severity(v, Some(400.0), 0), SeverityTier::High);
        assert_eq!(classify_severity(v, Some(600.0), 0), SeverityTier::VeryHigh);

        let p = CrimeType::Property;
        assert_eq!(classify_severity(p, Some(1000.0), 0), SeverityTier::Low);
        assert_eq!(classify_severity(p, Some(1800.0), 0), SeverityTier::Medium);
        assert_eq!(classify_severity(p, Some(2500.0), 0), SeverityTier::High);
        assert_eq!(classify_severity(p, Some(3500.0), 0), SeverityTier::VeryHigh);
    }

    #[test]
    fn falls_back_to_counts_without_rate() {
        let v = CrimeType::Violent;
        assert_eq!(classify_severity(v, None, 49), SeverityTier::VeryLow);
        assert_eq!(classify_severity(v, None, 50), SeverityTier::Low);
        assert_eq!(classify_severity(v, Some(0.0), 499), SeverityTier::Medium);
        assert_eq!(classify_severity(v, None, 999), SeverityTier::High);
        assert_eq!(classify_severity(v, None, 1000), SeverityTier::VeryHigh);

        let p = CrimeType::Property;
        assert_eq!(classify_severity(p, None, 199), SeverityTier::VeryLow);
        assert_eq!(classify_severity(p, None, 2500), SeverityTier::High);
        assert_eq!(classify_severity(p, None, 5000), SeverityTier::VeryHigh);
    }

    #[test]
    fn no_data_is_very_low() {
        for crime_type in CrimeType::all() {
            assert_eq!(
                classify_severity(*crime_type, None, 0),
                SeverityTier::VeryLow
            );
            assert_eq!(
                classify_severity(*crime_type, Some(0.0), 0),
                SeverityTier::VeryLow
            );
        }
    }

    #[test]
    fn monotonic_in_rate() {
        for crime_type in CrimeType::all() {
            let mut previous = SeverityTier::VeryLow;
            for step in 1..=600 {
                let rate = f64::from(step) * 10.0;
                let tier = classify_severity(*crime_type, Some(rate), 0);
                assert!(
                    tier >= previous,
                    "{crime_type} tier dropped from {previous} to {tier} at rate {rate}"
                );
                previous = tier;
            }
        }
    }
}
