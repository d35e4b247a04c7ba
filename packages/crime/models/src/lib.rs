#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime statistics types and severity tier definitions.
//!
//! A site's crime picture is stored as one or more [`CrimeSourceRecord`]s,
//! each owning a series of [`CrimeObservation`] snapshots with violent and
//! property counts. Observation payloads are validated here, at the storage
//! boundary, so downstream scoring can rely on well-formed numbers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Five-tier ordinal scale, from 1 (very low) to 5 (very high).
///
/// Used for crime severity as well as for likelihood and impact labels on
/// risk scenarios, which share the same vocabulary.
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SeverityTier {
    /// Level 1
    VeryLow = 1,
    /// Level 2
    Low = 2,
    /// Level 3
    Medium = 3,
    /// Level 4
    High = 4,
    /// Level 5
    VeryHigh = 5,
}

impl SeverityTier {
    /// Returns the numeric value of this tier.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a tier from any integer, clamping it into 1-5 first.
    #[must_use]
    pub fn from_clamped(value: i64) -> Self {
        match value.clamp(1, 5) {
            1 => Self::VeryLow,
            2 => Self::Low,
            3 => Self::Medium,
            4 => Self::High,
            _ => Self::VeryHigh,
        }
    }

    /// Human-readable lowercase description (`"very high"`), for sentences.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::VeryLow => "very low",
            Self::Low => "low",
            Self::Medium => "moderate",
            Self::High => "high",
            Self::VeryHigh => "very high",
        }
    }

    /// Returns all variants in ascending order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::VeryLow,
            Self::Low,
            Self::Medium,
            Self::High,
            Self::VeryHigh,
        ]
    }
}

/// The two crime categories tracked per observation.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CrimeType {
    /// Crimes against persons (homicide, assault, robbery)
    Violent,
    /// Crimes against property (burglary, theft, vandalism)
    Property,
}

impl CrimeType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Violent, Self::Property]
    }
}

/// Count and optional per-capita rate for one crime category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeCounts {
    /// Number of reported crimes in the observation period.
    pub total: u64,
    /// Crimes per 100,000 residents, when the source publishes it.
    #[serde(default)]
    pub rate_per_100k: Option<f64>,
}

/// Inclusive date range an observation covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationPeriod {
    /// First day of the period.
    pub start: NaiveDate,
    /// Last day of the period.
    pub end: NaiveDate,
}

/// A crime statistics snapshot from one [`CrimeSourceRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeObservation {
    /// Primary key.
    pub id: String,
    /// Owning crime source.
    pub source_id: String,
    /// Period the counts cover.
    pub period: ObservationPeriod,
    /// Violent crime counts.
    pub violent_crimes: CrimeCounts,
    /// Property crime counts.
    pub property_crimes: CrimeCounts,
}

impl CrimeObservation {
    /// Returns the counts for the given category.
    #[must_use]
    pub const fn counts(&self, crime_type: CrimeType) -> &CrimeCounts {
        match crime_type {
            CrimeType::Violent => &self.violent_crimes,
            CrimeType::Property => &self.property_crimes,
        }
    }

    /// Deserializes and validates a raw observation payload.
    ///
    /// # Errors
    ///
    /// Returns [`ObservationError`] if the payload does not match the
    /// observation schema or fails [`CrimeObservation::validate`].
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ObservationError> {
        let observation = Self::deserialize(value)?;
        observation.validate()?;
        Ok(observation)
    }

    /// Checks the numeric and date invariants serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ObservationError`] if a rate is negative or not finite, or
    /// if the period ends before it starts.
    pub fn validate(&self) -> Result<(), ObservationError> {
        if self.period.end < self.period.start {
            return Err(ObservationError::InvertedPeriod {
                id: self.id.clone(),
                start: self.period.start,
                end: self.period.end,
            });
        }

        for crime_type in CrimeType::all() {
            if let Some(rate) = self.counts(*crime_type).rate_per_100k
                && (!rate.is_finite() || rate < 0.0)
            {
                return Err(ObservationError::InvalidRate {
                    id: self.id.clone(),
                    crime_type: *crime_type,
                    rate,
                });
            }
        }

        Ok(())
    }
}

/// Errors raised while validating a crime observation payload.
#[derive(Debug, thiserror::Error)]
pub enum ObservationError {
    /// The payload does not match the observation schema.
    #[error("Malformed observation payload: {0}")]
    Json(#[from] serde_json::Error),

    /// A per-capita rate is negative, infinite, or NaN.
    #[error("Observation {id} has invalid {crime_type} rate {rate}")]
    InvalidRate {
        /// Observation ID.
        id: String,
        /// Category carrying the bad rate.
        crime_type: CrimeType,
        /// The rejected value.
        rate: f64,
    },

    /// The observation period ends before it starts.
    #[error("Observation {id} period ends ({end}) before it starts ({start})")]
    InvertedPeriod {
        /// Observation ID.
        id: String,
        /// Period start.
        start: NaiveDate,
        /// Period end.
        end: NaiveDate,
    },
}

/// How a crime source's data entered the system.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ImportMethod {
    /// Typed in by a consultant
    Manual,
    /// Extracted from an agency PDF report
    PdfImport,
    /// Pulled from a third-party crime data API
    ExternalApi,
}

/// Provenance quality flag for a crime source.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DataQuality {
    /// Cross-checked against the publishing agency
    Verified,
    /// Derived or extrapolated figures
    Estimated,
    /// Not yet reviewed
    #[default]
    Unverified,
}

/// A crime data provenance record attached to a site or an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeSourceRecord {
    /// Primary key.
    pub id: String,
    /// Site this source describes, if any.
    #[serde(default)]
    pub site_id: Option<String>,
    /// Assessment this source was attached to, if any.
    #[serde(default)]
    pub assessment_id: Option<String>,
    /// Human-readable source name (e.g., "Chicago PD Annual Report").
    pub name: String,
    /// City the statistics cover.
    #[serde(default)]
    pub city: Option<String>,
    /// County the statistics cover.
    #[serde(default)]
    pub county: Option<String>,
    /// Two-letter state abbreviation.
    #[serde(default)]
    pub state: Option<String>,
    /// How the data was imported.
    pub import_method: ImportMethod,
    /// Quality flag.
    #[serde(default)]
    pub data_quality: DataQuality,
}
