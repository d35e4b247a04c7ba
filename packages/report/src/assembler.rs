//! Comprehensive report assembly.
//!
//! Site context is fetched with fan-out: points of interest, crime sources,
//! and incidents together, then every source's observations together. In
//! [`AssemblyMode::FaultTolerant`] each of those fetches is isolated, so a
//! failure degrades that one section to empty instead of failing the
//! report. [`AssemblyMode::Strict`] propagates the first failure.
//!
//! Crime intelligence is built from the observations gathered for the geo
//! intel section, so a source whose observations failed to load is simply
//! absent from it.
//!
//! A missing assessment and an ownership mismatch are fatal in both modes.

use std::fmt::Display;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use site_risk_assessment_models::{Assessment, Site};
use site_risk_intelligence::engine::RiskIntelligenceEngine;
use site_risk_intelligence::summary::SourceObservations;
use site_risk_intelligence_models::RiskIntelligenceReport;
use site_risk_report_models::{ComprehensiveReportData, GeoIntel, SourceCrimeData};
use site_risk_store::AssessmentStore;

use crate::ReportError;
use crate::config::{AssemblyMode, ReportConfig};
use crate::evidence::extract_photo_evidence;
use crate::recommendations::{
    crime_recommendations, merge_recommendations, scenario_recommendations,
};
use crate::summary::{CurrentControlsOnly, ResidualRiskModel, summarize_risks};

/// Builds [`ComprehensiveReportData`] for assessments in a store.
#[derive(Clone)]
pub struct ReportAssembler {
    store: Arc<dyn AssessmentStore>,
    engine: RiskIntelligenceEngine,
    residual_model: Arc<dyn ResidualRiskModel>,
    config: ReportConfig,
}

impl std::fmt::Debug for ReportAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportAssembler")
            .field("engine", &self.engine)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReportAssembler {
    /// Creates an assembler over `store` using an existing engine.
    #[must_use]
    pub fn new(
        store: Arc<dyn AssessmentStore>,
        engine: RiskIntelligenceEngine,
        config: ReportConfig,
    ) -> Self {
        Self {
            store,
            engine,
            residual_model: Arc::new(CurrentControlsOnly),
            config,
        }
    }

    /// Creates an assembler and a default intelligence engine for `store`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Intelligence`] if the engine's reference data
    /// does not resolve against the store's threat catalog.
    pub async fn from_store(
        store: Arc<dyn AssessmentStore>,
        config: ReportConfig,
    ) -> Result<Self, ReportError> {
        let engine = RiskIntelligenceEngine::from_store(store.clone()).await?;
        Ok(Self::new(store, engine, config))
    }

    /// Replaces the residual risk model.
    #[must_use]
    pub fn with_residual_model(mut self, residual_model: Arc<dyn ResidualRiskModel>) -> Self {
        self.residual_model = residual_model;
        self
    }

    /// Assembles the report for `assessment_id` on behalf of `user_id`.
    ///
    /// # Errors
    ///
    /// * [`ReportError::AssessmentNotFound`] if the assessment does not exist
    /// * [`ReportError::Unauthorized`] if `user_id` does not own it
    /// * [`ReportError::Store`] if the assessment cannot be read, or in
    ///   strict mode if any other fetch fails
    pub async fn assemble(
        &self,
        assessment_id: &str,
        user_id: &str,
    ) -> Result<ComprehensiveReportData, ReportError> {
        let assessment = self.authorized_assessment(assessment_id, user_id).await?;

        log::info!(
            "Assembling report for assessment {assessment_id} ({} mode)",
            self.config.mode
        );

        let site = self.site_for(&assessment).await?;

        let (geo_intel, risk_intelligence) = match &site {
            Some(site) => {
                let geo_intel = self.geo_intel(site).await?;
                let risk_intelligence = self.risk_intelligence(site, &geo_intel);
                (geo_intel, risk_intelligence)
            }
            None => (GeoIntel::default(), None),
        };

        let risk_summary = summarize_risks(&assessment.scenarios, self.residual_model.as_ref());
        let crime = risk_intelligence
            .as_ref()
            .map(|report| crime_recommendations(&report.threat_intelligence))
            .unwrap_or_default();
        let recommendations =
            merge_recommendations(scenario_recommendations(&assessment.scenarios), crime);
        let photo_evidence = extract_photo_evidence(&assessment);

        log::debug!(
            "Assessment {assessment_id}: {} scenarios, {} recommendations, {} photo evidence entries",
            risk_summary.total_scenarios,
            recommendations.len(),
            photo_evidence.len(),
        );

        Ok(ComprehensiveReportData {
            assessment,
            site,
            risk_summary,
            risk_intelligence,
            geo_intel,
            photo_evidence,
            recommendations,
            generated_at: Utc::now(),
        })
    }

    async fn authorized_assessment(
        &self,
        assessment_id: &str,
        user_id: &str,
    ) -> Result<Assessment, ReportError> {
        let assessment = self.store.assessment(assessment_id).await?.ok_or_else(|| {
            ReportError::AssessmentNotFound {
                id: assessment_id.to_string(),
            }
        })?;

        if assessment.user_id != user_id {
            log::warn!("User {user_id} denied access to assessment {assessment_id}");
            return Err(ReportError::Unauthorized {
                assessment_id: assessment_id.to_string(),
                user_id: user_id.to_string(),
            });
        }

        Ok(assessment)
    }

    async fn site_for(&self, assessment: &Assessment) -> Result<Option<Site>, ReportError> {
        let Some(site_id) = assessment.site_id.as_deref() else {
            return Ok(None);
        };

        match self.store.site(site_id).await {
            Ok(None) => {
                log::warn!(
                    "Site {site_id} for assessment {} not found; continuing without site context",
                    assessment.id
                );
                Ok(None)
            }
            result => self.recover("site", site_id, result),
        }
    }

    async fn geo_intel(&self, site: &Site) -> Result<GeoIntel, ReportError> {
        let (points_of_interest, sources, incidents) = futures::join!(
            self.store.points_of_interest(&site.id),
            self.store.crime_sources(&site.id),
            self.store.site_incidents(&site.id),
        );

        let points_of_interest = self.recover("points of interest", &site.id, points_of_interest)?;
        let sources = self.recover("crime sources", &site.id, sources)?;
        let incidents = self.recover("site incidents", &site.id, incidents)?;

        let observations = join_all(
            sources
                .iter()
                .map(|source| self.store.crime_observations(&source.id)),
        )
        .await;

        let crime_data = sources
            .into_iter()
            .zip(observations)
            .map(|(source, observations)| {
                let observations = self.recover("crime observations", &source.id, observations)?;
                Ok(SourceCrimeData {
                    source,
                    observations,
                })
            })
            .collect::<Result<Vec<_>, ReportError>>()?;

        Ok(GeoIntel {
            points_of_interest,
            crime_data,
            incidents,
        })
    }

    fn risk_intelligence(
        &self,
        site: &Site,
        geo_intel: &GeoIntel,
    ) -> Option<RiskIntelligenceReport> {
        let sources: Vec<SourceObservations> = geo_intel
            .crime_data
            .iter()
            .filter(|data| !data.observations.is_empty())
            .map(|data| SourceObservations {
                source: data.source.clone(),
                observations: data.observations.clone(),
            })
            .collect();

        if sources.is_empty() {
            log::debug!("Site {} has no crime observations; skipping intelligence", site.id);
            return None;
        }

        Some(self.engine.build_report(site, &sources, Utc::now()))
    }

    /// Applies the assembly mode to a fetch result.
    ///
    /// Fault-tolerant mode logs the failure and substitutes `T::default()`.
    fn recover<T, E>(&self, what: &str, id: &str, result: Result<T, E>) -> Result<T, ReportError>
    where
        T: Default,
        E: Display + Into<ReportError>,
    {
        match (result, self.config.mode) {
            (Ok(value), _) => Ok(value),
            (Err(e), AssemblyMode::Strict) => Err(e.into()),
            (Err(e), AssemblyMode::FaultTolerant) => {
                log::warn!("Failed to fetch {what} for {id}: {e}; continuing without it");
                Ok(T::default())
            }
        }
    }
}
