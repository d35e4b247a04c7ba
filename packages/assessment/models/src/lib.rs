#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Site and assessment types consumed by risk reporting.
//!
//! These are owned by the assessment workflow (interviews, facility surveys,
//! scenario scoring). Reporting only reads them, so the shapes here mirror
//! what the storage layer hands back.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A physical location under assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    /// Primary key.
    pub id: String,
    /// Display name (e.g., "Riverside Distribution Center").
    pub name: String,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// Two-letter state abbreviation.
    #[serde(default)]
    pub state: Option<String>,
    /// Latitude (WGS84).
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// A security assessment owned by a single consultant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    /// Primary key.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Assessment title.
    pub title: String,
    /// Site under assessment, if one was linked.
    #[serde(default)]
    pub site_id: Option<String>,
    /// When the assessment was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Scored risk scenarios.
    #[serde(default)]
    pub scenarios: Vec<RiskScenario>,
    /// Facility survey questions.
    #[serde(default)]
    pub facility_questions: Vec<AssessmentQuestion>,
    /// Executive interview questions.
    #[serde(default)]
    pub interview_questions: Vec<AssessmentQuestion>,
}

/// A scored risk scenario.
///
/// Likelihood and impact are free-form labels from the scoring UI
/// (`very-low` .. `very-high`); unrecognized labels are tolerated and
/// resolved to a default when scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskScenario {
    /// Primary key.
    pub id: String,
    /// Scenario description (e.g., "Forced entry after hours").
    pub scenario: String,
    /// Inherent likelihood label.
    pub likelihood: String,
    /// Inherent impact label.
    pub impact: String,
    /// Likelihood with current controls in place.
    #[serde(default)]
    pub current_likelihood: Option<String>,
    /// Impact with current controls in place.
    #[serde(default)]
    pub current_impact: Option<String>,
    /// Risk level label assigned by the consultant.
    #[serde(default)]
    pub risk_level: String,
}

/// One question from a facility survey or interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentQuestion {
    /// Primary key.
    pub id: String,
    /// Question text.
    pub question: String,
    /// Free-text response.
    #[serde(default)]
    pub response: Option<String>,
    /// Photo evidence URLs.
    ///
    /// Older records stored this as `null`, a bare string, or an array
    /// mixing strings with other values. Only the string entries of an
    /// array are kept; anything else deserializes to an empty list.
    #[serde(default, deserialize_with = "deserialize_evidence")]
    pub evidence: Vec<String>,
}

fn deserialize_evidence<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// A notable location near a site (police station, hospital, bar district).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterest {
    /// Primary key.
    pub id: String,
    /// Place name.
    pub name: String,
    /// Place category (e.g., "police", "hospital").
    pub category: String,
    /// Distance from the site in miles.
    #[serde(default)]
    pub distance_miles: Option<f64>,
    /// Latitude (WGS84).
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// A security incident recorded at a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteIncident {
    /// Primary key.
    pub id: String,
    /// Site the incident occurred at.
    pub site_id: String,
    /// Short title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Date the incident occurred.
    #[serde(default)]
    pub occurred_on: Option<NaiveDate>,
    /// Severity label as entered.
    #[serde(default)]
    pub severity: Option<String>,
}
