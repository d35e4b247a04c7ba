//! Scenario risk scoring and aggregation.
//!
//! Every score is `likelihood × impact` on the 1-5 ordinal scale, so
//! scores range from 1 to 25.

use site_risk_assessment_models::RiskScenario;
use site_risk_crime_models::SeverityTier;
use site_risk_report_models::{RiskSummary, TopThreat};

/// Level assumed for labels outside `very-low` .. `very-high`.
pub const DEFAULT_LEVEL: u32 = 3;

/// Current scores at or above this count as high risk.
pub const HIGH_RISK_THRESHOLD: u32 = 15;

/// Current scores at or above this (and below high) count as medium risk.
pub const MEDIUM_RISK_THRESHOLD: u32 = 8;

const TOP_THREAT_COUNT: usize = 5;

/// Resolves a likelihood or impact label to 1-5.
///
/// Accepts `very-low`, `Very Low`, `very_low` and so on. Anything else
/// resolves to [`DEFAULT_LEVEL`].
#[must_use]
pub fn resolve_level(label: &str) -> u32 {
    let normalized = label.trim().replace([' ', '_'], "-");
    normalized.parse::<SeverityTier>().map_or_else(
        |_| {
            log::debug!("Unrecognized risk label '{label}'; using level {DEFAULT_LEVEL}");
            DEFAULT_LEVEL
        },
        |tier| u32::from(tier.value()),
    )
}

/// Inherent (pre-control) score.
#[must_use]
pub fn inherent_score(scenario: &RiskScenario) -> u32 {
    resolve_level(&scenario.likelihood) * resolve_level(&scenario.impact)
}

/// Score with current controls. Missing current labels fall back to the
/// inherent ones individually.
#[must_use]
pub fn current_score(scenario: &RiskScenario) -> u32 {
    let likelihood = scenario
        .current_likelihood
        .as_deref()
        .unwrap_or(&scenario.likelihood);
    let impact = scenario
        .current_impact
        .as_deref()
        .unwrap_or(&scenario.impact);
    resolve_level(likelihood) * resolve_level(impact)
}

/// Derives the residual (post-proposed-control) score of a scenario.
pub trait ResidualRiskModel: Send + Sync {
    /// Returns the residual score given the scenario and its current score.
    fn residual_score(&self, scenario: &RiskScenario, current_score: u32) -> u32;
}

/// Models no proposed controls: residual risk equals current risk.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentControlsOnly;

impl ResidualRiskModel for CurrentControlsOnly {
    fn residual_score(&self, _scenario: &RiskScenario, current_score: u32) -> u32 {
        current_score
    }
}

#[allow(clippy::cast_precision_loss)]
fn average(sum: u32, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        f64::from(sum) / count as f64
    }
}

/// Aggregates scores across scenarios.
///
/// An empty list yields an all-zero summary.
#[must_use]
pub fn summarize_risks(
    scenarios: &[RiskScenario],
    residual_model: &dyn ResidualRiskModel,
) -> RiskSummary {
    let mut summary = RiskSummary {
        total_scenarios: scenarios.len(),
        ..RiskSummary::default()
    };

    let mut inherent_sum = 0;
    let mut current_sum = 0;
    let mut residual_sum = 0;
    let mut ranked = Vec::with_capacity(scenarios.len());

    for scenario in scenarios {
        let current = current_score(scenario);
        inherent_sum += inherent_score(scenario);
        current_sum += current;
        residual_sum += residual_model.residual_score(scenario, current);

        match current {
            s if s >= HIGH_RISK_THRESHOLD => summary.high_risk_count += 1,
            s if s >= MEDIUM_RISK_THRESHOLD => summary.medium_risk_count += 1,
            _ => summary.low_risk_count += 1,
        }

        ranked.push((current, scenario));
    }

    summary.average_inherent_risk = average(inherent_sum, scenarios.len());
    summary.average_current_risk = average(current_sum, scenarios.len());
    summary.average_residual_risk = average(residual_sum, scenarios.len());

    ranked.sort_by(|a, b| b.0.cmp(&a.0));
    summary.top_threats = ranked
        .into_iter()
        .take(TOP_THREAT_COUNT)
        .map(|(current_risk, scenario)| TopThreat {
            scenario_id: scenario.id.clone(),
            scenario: scenario.scenario.clone(),
            current_risk,
            risk_level: scenario.risk_level.clone(),
        })
        .collect();

    summary
}
