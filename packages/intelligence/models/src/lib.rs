#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime-informed threat intelligence types.
//!
//! A [`RiskIntelligenceReport`] is what the intelligence engine produces for
//! a site: a normalized [`CrimeDataSummary`], per-threat likelihood
//! adjustments ([`ThreatIntelligence`]), free-text insights, and a
//! whole-site [`OverallRiskLevel`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use site_risk_crime_models::{CrimeType, SeverityTier};
use strum_macros::{AsRefStr, Display, EnumString};

/// A threat in the reference catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatDefinition {
    /// Unique threat name (e.g., "Armed Robbery").
    pub name: String,
    /// Threat grouping (e.g., "Human Threats").
    pub category: String,
    /// Likelihood label the catalog assumes absent local data.
    pub typical_likelihood: String,
}

/// Links a crime category to a threat it predicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeToThreatMapping {
    /// Name of the threat in the catalog.
    pub threat_name: String,
    /// Threat grouping reported alongside the intelligence entry.
    pub category: String,
    /// How strongly the crime category predicts this threat, in `[0, 1]`.
    pub relevance_weight: f64,
    /// Scalar applied to the base severity before clamping. Must be positive.
    pub likelihood_modifier: f64,
}

/// Normalized crime figures for one site, built fresh per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeDataSummary {
    /// Violent crimes in the observation period.
    pub violent_total: u64,
    /// Property crimes in the observation period.
    pub property_total: u64,
    /// Violent crimes per 100k residents, published or derived.
    pub violent_rate: Option<f64>,
    /// Property crimes per 100k residents, published or derived.
    pub property_rate: Option<f64>,
    /// Population used to derive missing rates, when known.
    pub population: Option<u64>,
    /// Year the observation period ends in.
    pub year: i32,
    /// Name of the crime source the observation came from.
    pub source: String,
}

impl CrimeDataSummary {
    /// Returns the total for the given category.
    #[must_use]
    pub const fn total(&self, crime_type: CrimeType) -> u64 {
        match crime_type {
            CrimeType::Violent => self.violent_total,
            CrimeType::Property => self.property_total,
        }
    }

    /// Returns the rate for the given category, if known.
    #[must_use]
    pub const fn rate(&self, crime_type: CrimeType) -> Option<f64> {
        match crime_type {
            CrimeType::Violent => self.violent_rate,
            CrimeType::Property => self.property_rate,
        }
    }
}

/// The crime figures that justify a [`ThreatIntelligence`] entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeDataSupport {
    /// Violent total, for entries derived from violent crime.
    pub violent_crimes: Option<u64>,
    /// Property total, for entries derived from property crime.
    pub property_crimes: Option<u64>,
    /// Relevance weight of the mapping that produced the entry.
    pub relevance_score: f64,
}

/// A crime-adjusted likelihood for one catalog threat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatIntelligence {
    /// Catalog threat name.
    pub threat_name: String,
    /// Threat grouping.
    pub category: String,
    /// Likelihood after applying local crime data.
    pub suggested_likelihood: SeverityTier,
    /// Catalog's typical likelihood.
    pub baseline_likelihood: SeverityTier,
    /// One-sentence justification naming the crime figures used.
    pub rationale: String,
    /// Supporting figures.
    pub crime_data_support: CrimeDataSupport,
}

/// Whole-site risk level derived from the worst crime category.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OverallRiskLevel {
    /// No elevated category
    Low,
    /// Moderate violent or high property crime
    Moderate,
    /// High violent or very high property crime
    High,
    /// Very high violent crime
    Critical,
}

/// Crime intelligence output for a single site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskIntelligenceReport {
    /// Site the report describes.
    pub site_id: String,
    /// Site display name.
    pub site_name: String,
    /// Whether any crime observation was available.
    pub crime_data_available: bool,
    /// Normalized crime figures, when available.
    pub crime_summary: Option<CrimeDataSummary>,
    /// Violent crime severity, when crime data is available.
    pub violent_severity: Option<SeverityTier>,
    /// Property crime severity, when crime data is available.
    pub property_severity: Option<SeverityTier>,
    /// Worst-case whole-site level.
    pub overall_risk_level: OverallRiskLevel,
    /// Crime-adjusted threat likelihoods, most relevant first.
    pub threat_intelligence: Vec<ThreatIntelligence>,
    /// Free-text observations about the crime profile.
    pub insights: Vec<String>,
    /// Suggested security controls.
    pub recommendations: Vec<String>,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
}

impl RiskIntelligenceReport {
    /// Insight used when a site has no usable crime observation.
    pub const NO_DATA_INSIGHT: &'static str = "No crime data is available for this site. \
         Add a crime source with at least one observation to enable crime-informed risk analysis.";

    /// Builds the report for a site that exists but has no crime data.
    #[must_use]
    pub fn without_crime_data(
        site_id: impl Into<String>,
        site_name: impl Into<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            site_id: site_id.into(),
            site_name: site_name.into(),
            crime_data_available: false,
            crime_summary: None,
            violent_severity: None,
            property_severity: None,
            overall_risk_level: OverallRiskLevel::Low,
            threat_intelligence: Vec::new(),
            insights: vec![Self::NO_DATA_INSIGHT.to_string()],
            recommendations: Vec::new(),
            generated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_data_report_shape() {
        let report = RiskIntelligenceReport::without_crime_data("s1", "Depot", Utc::now());
        assert!(!report.crime_data_available);
        assert_eq!(report.overall_risk_level, OverallRiskLevel::Low);
        assert_eq!(report.insights.len(), 1);
        assert!(report.threat_intelligence.is_empty());
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn overall_level_orders_by_severity() {
        assert!(OverallRiskLevel::Critical > OverallRiskLevel::High);
        assert!(OverallRiskLevel::High > OverallRiskLevel::Moderate);
        assert!(OverallRiskLevel::Moderate > OverallRiskLevel::Low);
        assert_eq!(OverallRiskLevel::Moderate.to_string(), "moderate");
    }

    #[test]
    fn summary_accessors_follow_crime_type() {
        let summary = CrimeDataSummary {
            violent_total: 10,
            property_total: 90,
            violent_rate: Some(12.5),
            property_rate: None,
            population: Some(80_000),
            year: 2023,
            source: "County Sheriff".to_string(),
        };
        assert_eq!(summary.total(CrimeType::Violent), 10);
        assert_eq!(summary.total(CrimeType::Property), 90);
        assert_eq!(summary.rate(CrimeType::Violent), Some(12.5));
        assert_eq!(summary.rate(CrimeType::Property), None);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["violentTotal"], 10);
        assert!(json["propertyRate"].is_null());
    }
}
