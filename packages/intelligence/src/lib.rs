#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime-informed risk intelligence engine.
//!
//! Turns a site's most recent crime observation into severity tiers,
//! crime-adjusted threat likelihoods, insights, and recommended controls.
//! The pieces are pure functions over a [`CrimeDataSummary`]; only
//! [`engine::RiskIntelligenceEngine`] touches storage.
//!
//! [`CrimeDataSummary`]: site_risk_intelligence_models::CrimeDataSummary

pub mod catalog;
pub mod engine;
pub mod insights;
pub mod likelihood;
pub mod overall;
pub mod population;
pub mod severity;
pub mod summary;
pub mod threats;

use site_risk_store::StoreError;
use thiserror::Error;

/// Errors that can occur while building risk intelligence.
#[derive(Debug, Error)]
pub enum IntelligenceError {
    /// A storage lookup failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A mapping references a threat missing from the catalog.
    #[error("Threat mapping references unknown threat '{threat_name}'")]
    UnresolvedThreat {
        /// Name that failed to resolve.
        threat_name: String,
    },

    /// A catalog entry carries a likelihood label outside the five tiers.
    #[error("Threat '{threat_name}' has unknown typical likelihood '{label}'")]
    UnknownLikelihood {
        /// Catalog threat name.
        threat_name: String,
        /// The unparseable label.
        label: String,
    },

    /// A mapping's weight or modifier is out of range.
    #[error("Invalid mapping for '{threat_name}': {message}")]
    InvalidMapping {
        /// Threat the mapping points at.
        threat_name: String,
        /// Description of what went wrong.
        message: String,
    },

    /// Reference data TOML failed to parse.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
