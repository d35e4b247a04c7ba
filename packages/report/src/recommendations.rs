//! Scenario and crime-informed recommendations.

use site_risk_assessment_models::RiskScenario;
use site_risk_intelligence_models::ThreatIntelligence;
use site_risk_report_models::{Priority, Recommendation, RecommendationSource};

use crate::summary::current_score;

const CRIME_PRIORITY: Priority = Priority::High;
const CRIME_TIMEFRAME: &str = "60 days";

/// Priority and timeframe for a current risk score.
#[must_use]
pub const fn priority_for_score(score: u32) -> (Priority, &'static str) {
    match score {
        20.. => (Priority::Critical, "Immediate"),
        15.. => (Priority::High, "30 days"),
        8.. => (Priority::Medium, "90 days"),
        _ => (Priority::Low, "180 days"),
    }
}

/// One recommendation per scenario, prioritized by its current score.
#[must_use]
pub fn scenario_recommendations(scenarios: &[RiskScenario]) -> Vec<Recommendation> {
    scenarios
        .iter()
        .map(|scenario| {
            let score = current_score(scenario);
            let (priority, timeframe) = priority_for_score(score);
            Recommendation {
                title: format!("Mitigate: {}", scenario.scenario),
                description: format!(
                    "Current risk score is {score} of 25. Review existing controls and \
                     implement additional measures to reduce likelihood or impact."
                ),
                priority,
                timeframe: timeframe.to_string(),
                source: RecommendationSource::Scenario,
            }
        })
        .collect()
}

/// One recommendation per threat whose crime-adjusted likelihood differs
/// from its catalog baseline.
#[must_use]
pub fn crime_recommendations(intelligence: &[ThreatIntelligence]) -> Vec<Recommendation> {
    intelligence
        .iter()
        .filter(|t| t.suggested_likelihood != t.baseline_likelihood)
        .map(|t| {
            let direction = if t.suggested_likelihood > t.baseline_likelihood {
                "raising"
            } else {
                "lowering"
            };
            Recommendation {
                title: format!("Reassess {} likelihood", t.threat_name),
                description: format!(
                    "Local crime data suggests {direction} {} likelihood from {} to {}. {}",
                    t.threat_name,
                    t.baseline_likelihood.describe(),
                    t.suggested_likelihood.describe(),
                    t.rationale,
                ),
                priority: CRIME_PRIORITY,
                timeframe: CRIME_TIMEFRAME.to_string(),
                source: RecommendationSource::CrimeData,
            }
        })
        .collect()
}

/// Concatenates both lists and sorts by priority, most urgent first.
///
/// The sort is stable, so equal priorities keep scenario recommendations
/// ahead of crime ones, each in input order. Unrecognized priorities sort
/// last.
#[must_use]
pub fn merge_recommendations(
    scenario: Vec<Recommendation>,
    crime: Vec<Recommendation>,
) -> Vec<Recommendation> {
    let mut merged = scenario;
    merged.extend(crime);
    merged.sort_by_key(|r| r.priority.rank());
    merged
}
