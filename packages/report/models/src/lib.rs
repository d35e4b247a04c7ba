#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Comprehensive assessment report types.
//!
//! [`ComprehensiveReportData`] is the payload handed to the rendering
//! layer. It is assembled fresh for each request and never persisted.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use site_risk_assessment_models::{Assessment, PointOfInterest, Site, SiteIncident};
use site_risk_crime_models::{CrimeObservation, CrimeSourceRecord};
use site_risk_intelligence_models::RiskIntelligenceReport;
use strum_macros::{AsRefStr, Display, EnumString};

/// A scenario ranked among the highest current risks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopThreat {
    /// Scenario ID.
    pub scenario_id: String,
    /// Scenario description.
    pub scenario: String,
    /// Current likelihood × impact score (1-25).
    pub current_risk: u32,
    /// Consultant-assigned risk level label.
    pub risk_level: String,
}

/// Aggregate scores across an assessment's risk scenarios.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummary {
    /// Number of scenarios scored.
    pub total_scenarios: usize,
    /// Mean likelihood × impact before controls.
    pub average_inherent_risk: f64,
    /// Mean likelihood × impact with current controls.
    pub average_current_risk: f64,
    /// Mean likelihood × impact with proposed controls.
    pub average_residual_risk: f64,
    /// Scenarios with a current score of 15 or more.
    pub high_risk_count: usize,
    /// Scenarios with a current score from 8 to 14.
    pub medium_risk_count: usize,
    /// Scenarios with a current score below 8.
    pub low_risk_count: usize,
    /// Up to five scenarios, highest current score first.
    pub top_threats: Vec<TopThreat>,
}

/// Recommendation priority.
///
/// Labels outside the four known ones are preserved verbatim and rank
/// after [`Priority::Low`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    /// Act immediately.
    Critical,
    /// Act within 30 days.
    High,
    /// Act within 90 days.
    Medium,
    /// Act within 180 days.
    Low,
    /// Any unrecognized label.
    Other(String),
}

impl Priority {
    /// Sort rank: `critical = 0` through `low = 3`, anything else `4`.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
            Self::Other(_) => 4,
        }
    }

    /// Returns the label for this priority.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for Priority {
    fn from(label: String) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "critical" => Self::Critical,
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Other(label),
        }
    }
}

impl From<&str> for Priority {
    fn from(label: &str) -> Self {
        Self::from(label.to_string())
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a recommendation came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RecommendationSource {
    /// Derived from a scored risk scenario.
    Scenario,
    /// Derived from crime-adjusted threat likelihood.
    CrimeData,
}

/// An actionable recommendation in the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Short headline.
    pub title: String,
    /// Supporting detail.
    pub description: String,
    /// How urgent the recommendation is.
    pub priority: Priority,
    /// Suggested implementation window (e.g., "30 days").
    pub timeframe: String,
    /// What produced the recommendation.
    pub source: RecommendationSource,
}

/// Which question collection a piece of evidence came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum QuestionCollection {
    /// Facility survey.
    Facility,
    /// Executive interview.
    Interview,
}

/// Photos attached to one assessment question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoEvidence {
    /// Question ID.
    pub question_id: String,
    /// Question text.
    pub question: String,
    /// Collection the question belongs to.
    pub collection: QuestionCollection,
    /// Non-empty photo URLs, in stored order.
    pub urls: Vec<String>,
}

/// A crime source with its observations, as shown in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCrimeData {
    /// The source.
    pub source: CrimeSourceRecord,
    /// Its observations. Empty if none exist or the fetch failed.
    pub observations: Vec<CrimeObservation>,
}

/// Geographic context around the assessed site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoIntel {
    /// Nearby points of interest.
    pub points_of_interest: Vec<PointOfInterest>,
    /// Crime sources attached to the site.
    pub crime_data: Vec<SourceCrimeData>,
    /// Recorded site incidents.
    pub incidents: Vec<SiteIncident>,
}

/// Everything the report renderer needs for one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensiveReportData {
    /// The assessment, including scenarios and questions.
    pub assessment: Assessment,
    /// The assessed site, if one is linked and could be loaded.
    pub site: Option<Site>,
    /// Scenario score aggregates.
    pub risk_summary: RiskSummary,
    /// Crime intelligence for the site, if any crime data was available.
    pub risk_intelligence: Option<RiskIntelligenceReport>,
    /// Geographic context. Empty when there is no site.
    pub geo_intel: GeoIntel,
    /// Photo evidence from both question collections.
    pub photo_evidence: Vec<PhotoEvidence>,
    /// Scenario and crime recommendations, most urgent first.
    pub recommendations: Vec<Recommendation>,
    /// When the report data was assembled.
    pub generated_at: DateTime<Utc>,
}
