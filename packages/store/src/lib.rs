#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Read interface to the assessment storage layer.
//!
//! Risk reporting never writes; it only needs the handful of lookups on
//! [`AssessmentStore`]. [`memory::InMemoryStore`] implements the trait over
//! a JSON dataset for the CLI and for tests.

pub mod memory;

use async_trait::async_trait;
use site_risk_assessment_models::{Assessment, PointOfInterest, Site, SiteIncident};
use site_risk_crime_models::{CrimeObservation, CrimeSourceRecord, ObservationError};
use site_risk_intelligence_models::ThreatDefinition;

/// Errors that can occur while reading from storage.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not serve the request.
    #[error("Store unavailable: {message}")]
    Unavailable {
        /// Description of what went wrong.
        message: String,
    },

    /// A stored crime observation failed validation.
    #[error("Invalid crime observation: {0}")]
    Observation(#[from] ObservationError),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only access to sites, assessments, and their crime and geo context.
///
/// Lookups by primary key return `Ok(None)` when the record does not
/// exist; list lookups return an empty list.
#[async_trait]
pub trait AssessmentStore: Send + Sync {
    /// Fetches an assessment with its scenarios and question collections.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    async fn assessment(&self, id: &str) -> Result<Option<Assessment>, StoreError>;

    /// Fetches a site.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    async fn site(&self, id: &str) -> Result<Option<Site>, StoreError>;

    /// Lists points of interest near a site.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    async fn points_of_interest(&self, site_id: &str)
    -> Result<Vec<PointOfInterest>, StoreError>;

    /// Lists crime sources attached to a site.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    async fn crime_sources(&self, site_id: &str) -> Result<Vec<CrimeSourceRecord>, StoreError>;

    /// Lists the observations owned by a crime source.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    async fn crime_observations(
        &self,
        source_id: &str,
    ) -> Result<Vec<CrimeObservation>, StoreError>;

    /// Lists security incidents recorded at a site.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    async fn site_incidents(&self, site_id: &str) -> Result<Vec<SiteIncident>, StoreError>;

    /// Returns the threat reference catalog.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    async fn threat_catalog(&self) -> Result<Vec<ThreatDefinition>, StoreError>;
}
