//! Whole-site risk level.

use site_risk_crime_models::SeverityTier;
use site_risk_intelligence_models::OverallRiskLevel;

/// Reduces per-category severities to one level, worst case first.
///
/// Violent crime weighs one tier heavier than property crime: a very high
/// violent profile is critical on its own, whatever the property figures.
#[must_use]
pub fn classify_overall_risk(violent: SeverityTier, property: SeverityTier) -> OverallRiskLevel {
    use SeverityTier::{High, Medium, VeryHigh};

    if violent == VeryHigh {
        OverallRiskLevel::Critical
    } else if violent == High || property == VeryHigh {
        OverallRiskLevel::High
    } else if violent == Medium || property == High {
        OverallRiskLevel::Moderate
    } else {
        OverallRiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn very_high_violent_is_critical_regardless_of_property() {
        for property in SeverityTier::all() {
            assert_eq!(
                classify_overall_risk(SeverityTier::VeryHigh, *property),
                OverallRiskLevel::Critical
            );
        }
    }

    #[test]
    fn first_match_wins() {
        use SeverityTier::*;

        assert_eq!(classify_overall_risk(High, VeryLow), OverallRiskLevel::High);
        assert_eq!(classify_overall_risk(VeryLow, VeryHigh), OverallRiskLevel::High);
        assert_eq!(classify_overall_risk(Medium, VeryHigh), OverallRiskLevel::High);
        assert_eq!(classify_overall_risk(Medium, Low), OverallRiskLevel::Moderate);
        assert_eq!(classify_overall_risk(Low, High), OverallRiskLevel::Moderate);
        assert_eq!(classify_overall_risk(Low, Medium), OverallRiskLevel::Low);
        assert_eq!(classify_overall_risk(VeryLow, VeryLow), OverallRiskLevel::Low);
    }
}
