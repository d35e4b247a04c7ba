//! JSON-backed [`AssessmentStore`] held entirely in memory.
//!
//! The dataset file is a single JSON object with one array per record type.
//! Crime observations are validated with
//! [`CrimeObservation::from_json`] while loading, so a malformed payload is
//! rejected up front instead of surfacing during scoring.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use site_risk_assessment_models::{Assessment, PointOfInterest, Site, SiteIncident};
use site_risk_crime_models::{CrimeObservation, CrimeSourceRecord};
use site_risk_intelligence_models::ThreatDefinition;

use crate::{AssessmentStore, StoreError};

/// Raw dataset layout, before observation validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawDataset {
    sites: Vec<Site>,
    assessments: Vec<Assessment>,
    points_of_interest: Vec<(String, PointOfInterest)>,
    crime_sources: Vec<CrimeSourceRecord>,
    crime_observations: Vec<serde_json::Value>,
    site_incidents: Vec<SiteIncident>,
    threat_catalog: Vec<ThreatDefinition>,
}

/// An [`AssessmentStore`] over records loaded from JSON.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    sites: Vec<Site>,
    assessments: Vec<Assessment>,
    /// `(site_id, poi)` pairs.
    points_of_interest: Vec<(String, PointOfInterest)>,
    crime_sources: Vec<CrimeSourceRecord>,
    crime_observations: Vec<CrimeObservation>,
    site_incidents: Vec<SiteIncident>,
    threat_catalog: Vec<ThreatDefinition>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a dataset from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the JSON is malformed or any crime
    /// observation fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let raw: RawDataset = serde_json::from_str(json)?;

        let crime_observations = raw
            .crime_observations
            .iter()
            .map(CrimeObservation::from_json)
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "Loaded dataset: {} sites, {} assessments, {} crime sources, {} observations",
            raw.sites.len(),
            raw.assessments.len(),
            raw.crime_sources.len(),
            crime_observations.len(),
        );

        Ok(Self {
            sites: raw.sites,
            assessments: raw.assessments,
            points_of_interest: raw.points_of_interest,
            crime_sources: raw.crime_sources,
            crime_observations,
            site_incidents: raw.site_incidents,
            threat_catalog: raw.threat_catalog,
        })
    }

    /// Reads and parses a dataset file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Adds a site.
    #[must_use]
    pub fn with_site(mut self, site: Site) -> Self {
        self.sites.push(site);
        self
    }

    /// Adds an assessment.
    #[must_use]
    pub fn with_assessment(mut self, assessment: Assessment) -> Self {
        self.assessments.push(assessment);
        self
    }

    /// Adds a point of interest near `site_id`.
    #[must_use]
    pub fn with_point_of_interest(
        mut self,
        site_id: impl Into<String>,
        poi: PointOfInterest,
    ) -> Self {
        self.points_of_interest.push((site_id.into(), poi));
        self
    }

    /// Adds a crime source.
    #[must_use]
    pub fn with_crime_source(mut self, source: CrimeSourceRecord) -> Self {
        self.crime_sources.push(source);
        self
    }

    /// Adds an observation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Observation`] if the observation is invalid.
    pub fn with_crime_observation(
        mut self,
        observation: CrimeObservation,
    ) -> Result<Self, StoreError> {
        observation.validate()?;
        self.crime_observations.push(observation);
        Ok(self)
    }

    /// Adds a site incident.
    #[must_use]
    pub fn with_site_incident(mut self, incident: SiteIncident) -> Self {
        self.site_incidents.push(incident);
        self
    }

    /// Replaces the threat catalog.
    #[must_use]
    pub fn with_threat_catalog(mut self, catalog: Vec<ThreatDefinition>) -> Self {
        self.threat_catalog = catalog;
        self
    }
}

#[async_trait]
impl AssessmentStore for InMemoryStore {
    async fn assessment(&self, id: &str) -> Result<Option<Assessment>, StoreError> {
        Ok(self.assessments.iter().find(|a| a.id == id).cloned())
    }

    async fn site(&self, id: &str) -> Result<Option<Site>, StoreError> {
        Ok(self.sites.iter().find(|s| s.id == id).cloned())
    }

    async fn points_of_interest(
        &self,
        site_id: &str,
    ) -> Result<Vec<PointOfInterest>, StoreError> {
        Ok(self
            .points_of_interest
            .iter()
            .filter(|(id, _)| id == site_id)
            .map(|(_, poi)| poi.clone())
            .collect())
    }

    async fn crime_sources(&self, site_id: &str) -> Result<Vec<CrimeSourceRecord>, StoreError> {
        Ok(self
            .crime_sources
            .iter()
            .filter(|s| s.site_id.as_deref() == Some(site_id))
            .cloned()
            .collect())
    }

    async fn crime_observations(
        &self,
        source_id: &str,
    ) -> Result<Vec<CrimeObservation>, StoreError> {
        Ok(self
            .crime_observations
            .iter()
            .filter(|o| o.source_id == source_id)
            .cloned()
            .collect())
    }

    async fn site_incidents(&self, site_id: &str) -> Result<Vec<SiteIncident>, StoreError> {
        Ok(self
            .site_incidents
            .iter()
            .filter(|i| i.site_id == site_id)
            .cloned()
            .collect())
    }

    async fn threat_catalog(&self) -> Result<Vec<ThreatDefinition>, StoreError> {
        Ok(self.threat_catalog.clone())
    }
}
