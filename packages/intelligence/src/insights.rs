//! Free-text insights and recommended controls derived from crime figures.
//!
//! Both are driven by the severity ladders directly rather than by the
//! generated threat intelligence.

use site_risk_crime_models::{CrimeType, SeverityTier};
use site_risk_intelligence_models::CrimeDataSummary;

use crate::severity::classify_severity;
use crate::threats::describe_figure;

/// Property-to-violent ratio above which property crime is called dominant.
const PROPERTY_DOMINANT_RATIO: f64 = 10.0;

/// Property-to-violent ratio below which the violent share is called unusual.
const VIOLENT_HEAVY_RATIO: f64 = 3.0;

/// Violent totals above this trigger the full violent-crime control set
/// regardless of rate.
const VIOLENT_TOTAL_ESCALATION: u64 = 500;

/// Property totals above this trigger the full property-crime control set
/// regardless of rate.
const PROPERTY_TOTAL_ESCALATION: u64 = 2500;

const VIOLENT_HIGH_CONTROLS: &[&str] = &[
    "Provide active-threat response training for all staff",
    "Install panic buttons at reception and high-exposure workstations",
    "Evaluate armed security officer coverage during operating hours",
    "Assess metal detector screening at public entrances",
    "Conduct lockdown drills at least twice per year",
];

const VIOLENT_MEDIUM_CONTROLS: &[&str] = &[
    "Establish visitor check-in and badge procedures",
    "Offer de-escalation and situational awareness training",
    "Provide security escorts to parking areas after dark",
];

const PROPERTY_HIGH_CONTROLS: &[&str] = &[
    "Install monitored intrusion detection on all perimeter openings",
    "Deploy CCTV with recorded coverage of entrances, docks, and parking",
    "Upgrade to electronic access control with audit logging",
    "Tag and track high-value assets",
    "Schedule randomized security patrols outside business hours",
];

const PROPERTY_MEDIUM_CONTROLS: &[&str] = &[
    "Improve exterior and parking lot lighting",
    "Harden locks and door hardware on secondary entrances",
    "Run periodic inventory audits of portable equipment",
];

const GENERAL_CONTROLS: &[&str] = &[
    "Brief staff on local crime trends and reporting procedures",
    "Apply CPTED principles (natural surveillance, territorial reinforcement) to the site layout",
];

fn severity(crime_type: CrimeType, summary: &CrimeDataSummary) -> SeverityTier {
    classify_severity(
        crime_type,
        summary.rate(crime_type),
        summary.total(crime_type),
    )
}

fn category_insight(crime_type: CrimeType, summary: &CrimeDataSummary) -> Option<String> {
    let tier = severity(crime_type, summary);
    let figure = describe_figure(crime_type, summary);

    match tier {
        SeverityTier::High | SeverityTier::VeryHigh => Some(format!(
            "Elevated {crime_type} crime: {figure} is {} for the area. \
             Threats driven by {crime_type} crime warrant likelihoods above catalog baselines.",
            tier.describe(),
        )),
        SeverityTier::VeryLow => Some(format!(
            "{} crime is very low ({figure}); {crime_type}-driven threats can likely stay at baseline.",
            capitalize(crime_type.as_ref()),
        )),
        SeverityTier::Low | SeverityTier::Medium => None,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[allow(clippy::cast_precision_loss)]
fn ratio_insight(summary: &CrimeDataSummary) -> Option<String> {
    let elevated = CrimeType::all()
        .iter()
        .any(|ct| severity(*ct, summary) > SeverityTier::VeryLow);
    if !elevated || summary.violent_total == 0 {
        return None;
    }

    let ratio = summary.property_total as f64 / summary.violent_total as f64;
    if ratio > PROPERTY_DOMINANT_RATIO {
        Some(format!(
            "Property crime dominates the local profile ({ratio:.1} property crimes per violent crime); \
             prioritize asset protection and access control."
        ))
    } else if ratio < VIOLENT_HEAVY_RATIO {
        Some(format!(
            "Violent crime is unusually prominent ({ratio:.1} property crimes per violent crime); \
             prioritize personnel safety measures."
        ))
    } else {
        None
    }
}

/// Produces free-text observations about a crime profile.
#[must_use]
pub fn generate_insights(summary: &CrimeDataSummary) -> Vec<String> {
    CrimeType::all()
        .iter()
        .filter_map(|ct| category_insight(*ct, summary))
        .chain(ratio_insight(summary))
        .collect()
}

fn push_all(recommendations: &mut Vec<String>, controls: &[&str]) {
    for control in controls {
        if !recommendations.iter().any(|r| r == control) {
            recommendations.push((*control).to_string());
        }
    }
}

/// Produces recommended controls, gated on crime severity.
///
/// Tiers are additive: a high-severity category receives both its high
/// and medium control sets.
#[must_use]
pub fn generate_recommendations(summary: &CrimeDataSummary) -> Vec<String> {
    let violent = severity(CrimeType::Violent, summary);
    let property = severity(CrimeType::Property, summary);
    let mut recommendations = Vec::new();

    if violent >= SeverityTier::High || summary.violent_total > VIOLENT_TOTAL_ESCALATION {
        push_all(&mut recommendations, VIOLENT_HIGH_CONTROLS);
    }
    if violent >= SeverityTier::Medium {
        push_all(&mut recommendations, VIOLENT_MEDIUM_CONTROLS);
    }

    if property >= SeverityTier::High || summary.property_total > PROPERTY_TOTAL_ESCALATION {
        push_all(&mut recommendations, PROPERTY_HIGH_CONTROLS);
    }
    if property >= SeverityTier::Medium {
        push_all(&mut recommendations, PROPERTY_MEDIUM_CONTROLS);
    }

    if violent > SeverityTier::Low || property > SeverityTier::Low {
        push_all(&mut recommendations, GENERAL_CONTROLS);
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(
        violent: (u64, Option<f64>),
        property: (u64, Option<f64>),
    ) -> CrimeDataSummary {
        CrimeDataSummary {
            violent_total: violent.0,
            property_total: property.0,
            violent_rate: violent.1,
            property_rate: property.1,
            population: None,
            year: 2023,
            source: "test".to_string(),
        }
    }

    #[test]
    fn high_violent_rate_produces_warning() {
        let insights = generate_insights(&summary((900, Some(650.0)), (3000, Some(2000.0))));
        assert!(insights[0].starts_with("Elevated violent crime"));
        assert!(insights[0].contains("650.0 per 100k residents"));
    }

    #[test]
    fn very_low_categories_are_reassuring() {
        let insights = generate_insights(&summary((5, Some(20.0)), (40, Some(300.0))));
        assert_eq!(insights.len(), 2, "{insights:?}");
        assert!(insights[0].starts_with("Violent crime is very low"));
        assert!(insights[1].starts_with("Property crime is very low"));
    }

    #[test]
    fn no_ratio_insight_for_two_negligible_categories() {
        // Ratio of 8 would not fire anyway; use 1:1 which would be "violent heavy".
        let insights = generate_insights(&summary((10, Some(10.0)), (10, Some(10.0))));
        assert!(insights.iter().all(|i| !i.contains("per violent crime")));
    }

    #[test]
    fn ratio_insight_bands() {
        let dominant = generate_insights(&summary((100, Some(150.0)), (2000, Some(3000.0))));
        assert!(dominant.iter().any(|i| i.starts_with("Property crime dominates")));

        let violent_heavy = generate_insights(&summary((300, Some(500.0)), (600, Some(1200.0))));
        assert!(
            violent_heavy
                .iter()
                .any(|i| i.starts_with("Violent crime is unusually prominent"))
        );

        let balanced = generate_insights(&summary((100, Some(300.0)), (500, Some(1500.0))));
        assert!(balanced.iter().all(|i| !i.contains("per violent crime")));
    }

    #[test]
    fn ratio_skipped_without_violent_crime() {
        let insights = generate_insights(&summary((0, None), (4000, Some(3000.0))));
        assert!(insights.iter().all(|i| !i.contains("per violent crime")));
    }

    #[test]
    fn quiet_profile_gets_no_recommendations() {
        assert!(generate_recommendations(&summary((5, Some(20.0)), (40, Some(300.0)))).is_empty());
    }

    #[test]
    fn high_violent_adds_full_and_lighter_controls() {
        let recs = generate_recommendations(&summary((50, Some(450.0)), (10, Some(100.0))));
        for control in VIOLENT_HIGH_CONTROLS.iter().chain(VIOLENT_MEDIUM_CONTROLS) {
            assert!(recs.iter().any(|r| r == control), "missing {control}");
        }
        for control in GENERAL_CONTROLS {
            assert!(recs.iter().any(|r| r == control));
        }
        assert!(recs.iter().all(|r| !PROPERTY_HIGH_CONTROLS.contains(&r.as_str())));
    }

    #[test]
    fn large_violent_total_escalates_even_at_low_rate() {
        let recs = generate_recommendations(&summary((600, Some(20.0)), (0, None)));
        assert!(recs.iter().any(|r| r == VIOLENT_HIGH_CONTROLS[0]));
        assert!(recs.iter().all(|r| r != VIOLENT_MEDIUM_CONTROLS[0]));
        assert!(recs.iter().all(|r| r != GENERAL_CONTROLS[0]));
    }

    #[test]
    fn medium_property_gets_lighter_controls_only() {
        let recs = generate_recommendations(&summary((0, None), (500, Some(2000.0))));
        assert_eq!(
            recs.len(),
            PROPERTY_MEDIUM_CONTROLS.len() + GENERAL_CONTROLS.len()
        );
    }

    #[test]
    fn recommendations_have_no_duplicates() {
        let recs = generate_recommendations(&summary((2000, Some(900.0)), (9000, Some(5000.0))));
        let mut sorted = recs.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), recs.len());
    }
}
