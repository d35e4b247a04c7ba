//! Crime-adjusted threat likelihood.

use site_risk_crime_models::{CrimeType, SeverityTier};
use site_risk_intelligence_models::{CrimeDataSummary, CrimeToThreatMapping};

use crate::severity::{classify_on, rate_ladder, usable_rate};

/// Base tier for a crime category before a mapping is applied.
///
/// Uses the rate ladder when a rate is known, otherwise a coarse count
/// ladder: `0 → 1`, `< 100 → 2`, `< 500 → 3`, `< 1000 → 4`, else `5`.
#[must_use]
pub fn base_tier(crime_type: CrimeType, summary: &CrimeDataSummary) -> SeverityTier {
    if let Some(rate) = usable_rate(summary.rate(crime_type)) {
        return classify_on(rate_ladder(crime_type), rate);
    }

    match summary.total(crime_type) {
        0 => SeverityTier::VeryLow,
        1..100 => SeverityTier::Low,
        100..500 => SeverityTier::Medium,
        500..1000 => SeverityTier::High,
        _ => SeverityTier::VeryHigh,
    }
}

/// Computes `round(base × modifier × weight)` clamped into 1-5.
///
/// A low-relevance, low-modifier threat stays near the bottom of the scale
/// even under extreme crime, and a high modifier lifts modest severity.
#[must_use]
pub fn calculate_threat_likelihood(
    crime_type: CrimeType,
    mapping: &CrimeToThreatMapping,
    summary: &CrimeDataSummary,
) -> SeverityTier {
    let base = f64::from(base_tier(crime_type, summary).value());
    let adjusted = base * mapping.likelihood_modifier * mapping.relevance_weight;

    if !adjusted.is_finite() {
        return if adjusted > 0.0 {
            SeverityTier::VeryHigh
        } else {
            SeverityTier::VeryLow
        };
    }

    #[allow(clippy::cast_possible_truncation)]
    let rounded = adjusted.round() as i64;
    SeverityTier::from_clamped(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(violent_rate: Option<f64>, violent_total: u64) -> CrimeDataSummary {
        CrimeDataSummary {
            violent_total,
            property_total: 0,
            violent_rate,
            property_rate: None,
            population: None,
            year: 2023,
            source: "test".to_string(),
        }
    }

    fn mapping(weight: f64, modifier: f64) -> CrimeToThreatMapping {
        CrimeToThreatMapping {
            threat_name: "Armed Robbery".to_string(),
            category: "Human Threats".to_string(),
            relevance_weight: weight,
            likelihood_modifier: modifier,
        }
    }

    #[test]
    fn base_tier_uses_rate_when_known() {
        let v = CrimeType::Violent;
        assert_eq!(base_tier(v, &summary(Some(450.0), 3)), SeverityTier::High);
        assert_eq!(base_tier(v, &summary(Some(20.0), 5000)), SeverityTier::VeryLow);
    }

    #[test]
    fn base_tier_count_ladder() {
        let v = CrimeType::Violent;
        assert_eq!(base_tier(v, &summary(None, 0)), SeverityTier::VeryLow);
        assert_eq!(base_tier(v, &summary(None, 99)), SeverityTier::Low);
        assert_eq!(base_tier(v, &summary(None, 100)), SeverityTier::Medium);
        assert_eq!(base_tier(v, &summary(None, 999)), SeverityTier::High);
        assert_eq!(base_tier(v, &summary(None, 1000)), SeverityTier::VeryHigh);
    }

    #[test]
    fn applies_modifier_and_weight() {
        // High (4) × 1.2 × 0.9 = 4.32 → 4
        let tier = calculate_threat_likelihood(
            CrimeType::Violent,
            &mapping(0.9, 1.2),
            &summary(Some(450.0), 0),
        );
        assert_eq!(tier, SeverityTier::High);

        // Medium (3) × 1.5 × 1.0 = 4.5 → 5
        let tier = calculate_threat_likelihood(
            CrimeType::Violent,
            &mapping(1.0, 1.5),
            &summary(Some(300.0), 0),
        );
        assert_eq!(tier, SeverityTier::VeryHigh);
    }

    #[test]
    fn low_relevance_threat_stays_low_under_extreme_crime() {
        // Very high (5) × 0.7 × 0.3 = 1.05 → 1
        let tier = calculate_threat_likelihood(
            CrimeType::Violent,
            &mapping(0.3, 0.7),
            &summary(Some(5000.0), 0),
        );
        assert_eq!(tier, SeverityTier::VeryLow);
    }

    #[test]
    fn result_is_always_clamped() {
        let extremes = [0.0, 1e-9, 0.5, 1.0, 3.0, 1e6, f64::MAX];
        for weight in extremes {
            for modifier in extremes {
                for rate in [None, Some(10.0), Some(10_000.0)] {
                    let tier = calculate_threat_likelihood(
                        CrimeType::Violent,
                        &mapping(weight, modifier),
                        &summary(rate, 2000),
                    );
                    assert!((1..=5).contains(&tier.value()));
                }
            }
        }
    }
}
