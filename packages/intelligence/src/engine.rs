//! Per-site risk intelligence orchestration.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use site_risk_assessment_models::Site;
use site_risk_crime_models::CrimeType;
use site_risk_intelligence_models::RiskIntelligenceReport;
use site_risk_store::{AssessmentStore, StoreError};

use crate::IntelligenceError;
use crate::catalog::bundled_catalog;
use crate::insights::{generate_insights, generate_recommendations};
use crate::overall::classify_overall_risk;
use crate::population::{PopulationLookup, StaticPopulationTable};
use crate::severity::classify_severity;
use crate::summary::{SourceObservations, build_crime_summary, latest_observation};
use crate::threats::{ResolvedThreatMappings, ThreatMappings, generate_threat_intelligence};

/// Builds [`RiskIntelligenceReport`]s for sites in an [`AssessmentStore`].
#[derive(Clone)]
pub struct RiskIntelligenceEngine {
    store: Arc<dyn AssessmentStore>,
    mappings: ResolvedThreatMappings,
    population: Arc<dyn PopulationLookup>,
}

impl std::fmt::Debug for RiskIntelligenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskIntelligenceEngine")
            .field("mappings", &self.mappings.entries().len())
            .finish_non_exhaustive()
    }
}

impl RiskIntelligenceEngine {
    /// Creates an engine from already-resolved parts.
    #[must_use]
    pub fn new(
        store: Arc<dyn AssessmentStore>,
        mappings: ResolvedThreatMappings,
        population: Arc<dyn PopulationLookup>,
    ) -> Self {
        Self {
            store,
            mappings,
            population,
        }
    }

    /// Creates an engine with the bundled mapping tables and population
    /// table, resolved against the store's threat catalog.
    ///
    /// A store with an empty catalog falls back to the bundled catalog.
    ///
    /// # Errors
    ///
    /// * [`IntelligenceError::Store`] if the catalog cannot be read
    /// * [`IntelligenceError::UnresolvedThreat`] and friends if a bundled
    ///   mapping does not resolve against the catalog
    pub async fn from_store(store: Arc<dyn AssessmentStore>) -> Result<Self, IntelligenceError> {
        let mut catalog = store.threat_catalog().await?;
        if catalog.is_empty() {
            log::debug!("Store has no threat catalog; using the bundled catalog");
            catalog = bundled_catalog();
        }

        let mappings = ThreatMappings::bundled().resolve(&catalog)?;

        Ok(Self::new(
            store,
            mappings,
            Arc::new(StaticPopulationTable::bundled()),
        ))
    }

    /// Replaces the population lookup used to backfill missing rates.
    #[must_use]
    pub fn with_population_lookup(mut self, population: Arc<dyn PopulationLookup>) -> Self {
        self.population = population;
        self
    }

    /// Generates the crime intelligence report for a site.
    ///
    /// Returns `Ok(None)` only when the site does not exist. A site with no
    /// crime observations yields a report with `crime_data_available`
    /// unset rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`IntelligenceError::Store`] if any lookup fails.
    pub async fn generate_report(
        &self,
        site_id: &str,
    ) -> Result<Option<RiskIntelligenceReport>, IntelligenceError> {
        let Some(site) = self.store.site(site_id).await? else {
            log::debug!("Site {site_id} not found; no intelligence report");
            return Ok(None);
        };

        let sources = self.store.crime_sources(site_id).await?;
        let fetched = join_all(
            sources
                .iter()
                .map(|source| self.store.crime_observations(&source.id)),
        )
        .await;

        let sources = sources
            .into_iter()
            .zip(fetched)
            .map(|(source, observations)| {
                Ok(SourceObservations {
                    source,
                    observations: observations?,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        Ok(Some(self.build_report(&site, &sources, Utc::now())))
    }

    /// Builds a report from crime data that has already been fetched.
    #[must_use]
    pub fn build_report(
        &self,
        site: &Site,
        sources: &[SourceObservations],
        generated_at: DateTime<Utc>,
    ) -> RiskIntelligenceReport {
        let Some((source, observation)) = latest_observation(sources) else {
            log::info!(
                "No crime observations for site {} ({} sources)",
                site.id,
                sources.len()
            );
            return RiskIntelligenceReport::without_crime_data(&site.id, &site.name, generated_at);
        };

        log::debug!(
            "Using observation {} from source '{}' for site {}",
            observation.id,
            source.name,
            site.id
        );

        let summary = build_crime_summary(source, observation, self.population.as_ref());
        let severity = |crime_type: CrimeType| {
            classify_severity(
                crime_type,
                summary.rate(crime_type),
                summary.total(crime_type),
            )
        };
        let violent = severity(CrimeType::Violent);
        let property = severity(CrimeType::Property);

        RiskIntelligenceReport {
            site_id: site.id.clone(),
            site_name: site.name.clone(),
            crime_data_available: true,
            violent_severity: Some(violent),
            property_severity: Some(property),
            overall_risk_level: classify_overall_risk(violent, property),
            threat_intelligence: generate_threat_intelligence(&self.mappings, &summary),
            insights: generate_insights(&summary),
            recommendations: generate_recommendations(&summary),
            crime_summary: Some(summary),
            generated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use site_risk_crime_models::{
        CrimeCounts, CrimeObservation, CrimeSourceRecord, DataQuality, ImportMethod,
        ObservationPeriod, SeverityTier,
    };
    use site_risk_intelligence_models::{OverallRiskLevel, ThreatDefinition};
    use site_risk_store::memory::InMemoryStore;

    use super::*;

    fn site() -> Site {
        Site {
            id: "site-1".to_string(),
            name: "Riverside Distribution Center".to_string(),
            address: None,
            city: Some("Chicago".to_string()),
            state: Some("IL".to_string()),
            latitude: None,
            longitude: None,
        }
    }

    fn source(id: &str, city: &str) -> CrimeSourceRecord {
        CrimeSourceRecord {
            id: id.to_string(),
            site_id: Some("site-1".to_string()),
            assessment_id: None,
            name: "Chicago Police Department".to_string(),
            city: Some(city.to_string()),
            county: None,
            state: Some("IL".to_string()),
            import_method: ImportMethod::Manual,
            data_quality: DataQuality::Verified,
        }
    }

    fn observation(source_id: &str, violent: CrimeCounts, property: CrimeCounts) -> CrimeObservation {
        CrimeObservation {
            id: format!("{source_id}-2023"),
            source_id: source_id.to_string(),
            period: ObservationPeriod {
                start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            },
            violent_crimes: violent,
            property_crimes: property,
        }
    }

    fn counts(total: u64, rate_per_100k: Option<f64>) -> CrimeCounts {
        CrimeCounts {
            total,
            rate_per_100k,
        }
    }

    #[tokio::test]
    async fn missing_site_yields_none() {
        let engine = RiskIntelligenceEngine::from_store(Arc::new(InMemoryStore::new()))
            .await
            .unwrap();
        assert!(engine.generate_report("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn source_without_observations_is_a_no_data_report() {
        let store = InMemoryStore::new()
            .with_site(site())
            .with_crime_source(source("cpd", "chicago"));
        let engine = RiskIntelligenceEngine::from_store(Arc::new(store))
            .await
            .unwrap();

        let report = engine.generate_report("site-1").await.unwrap().unwrap();
        assert!(!report.crime_data_available);
        assert_eq!(report.insights.len(), 1);
        assert!(report.threat_intelligence.is_empty());
        assert!(report.recommendations.is_empty());
        assert_eq!(report.overall_risk_level, OverallRiskLevel::Low);
    }

    #[tokio::test]
    async fn infers_rate_from_city_population() {
        let store = InMemoryStore::new()
            .with_site(site())
            .with_crime_source(source("cpd", "chicago"))
            .with_crime_observation(observation("cpd", counts(600, None), counts(0, None)))
            .unwrap();
        let engine = RiskIntelligenceEngine::from_store(Arc::new(store))
            .await
            .unwrap();

        let report = engine.generate_report("site-1").await.unwrap().unwrap();
        assert!(report.crime_data_available);
        let summary = report.crime_summary.as_ref().unwrap();
        assert_eq!(summary.population, Some(2_746_388));
        assert!((summary.violent_rate.unwrap() - 21.85).abs() < 0.01);
        assert_eq!(report.violent_severity, Some(SeverityTier::VeryLow));
        assert_eq!(report.overall_risk_level, OverallRiskLevel::Low);
        assert!(
            report
                .threat_intelligence
                .iter()
                .all(|t| t.crime_data_support.violent_crimes == Some(600))
        );
    }

    struct Springfield;

    impl PopulationLookup for Springfield {
        fn population_of(&self, city_key: &str) -> Option<u64> {
            city_key
                .trim()
                .eq_ignore_ascii_case("springfield")
                .then_some(50_000)
        }
    }

    #[tokio::test]
    async fn custom_population_lookup_backfills_rates() {
        let store = InMemoryStore::new()
            .with_site(site())
            .with_crime_source(source("spd", "Springfield"))
            .with_crime_observation(observation("spd", counts(500, None), counts(0, None)))
            .unwrap();
        let engine = RiskIntelligenceEngine::from_store(Arc::new(store))
            .await
            .unwrap()
            .with_population_lookup(Arc::new(Springfield));

        let report = engine.generate_report("site-1").await.unwrap().unwrap();
        let summary = report.crime_summary.as_ref().unwrap();
        assert_eq!(summary.population, Some(50_000));
        assert!((summary.violent_rate.unwrap() - 1000.0).abs() < 1e-9);
        assert_eq!(summary.property_rate, Some(0.0));
    }

    #[tokio::test]
    async fn very_high_violent_crime_is_critical() {
        let store = InMemoryStore::new()
            .with_site(site())
            .with_crime_source(source("cpd", "chicago"))
            .with_crime_observation(observation(
                "cpd",
                counts(25_000, Some(910.0)),
                counts(20_000, Some(700.0)),
            ))
            .unwrap();
        let engine = RiskIntelligenceEngine::from_store(Arc::new(store))
            .await
            .unwrap();

        let report = engine.generate_report("site-1").await.unwrap().unwrap();
        assert_eq!(report.violent_severity, Some(SeverityTier::VeryHigh));
        assert_eq!(report.property_severity, Some(SeverityTier::VeryLow));
        assert_eq!(report.overall_risk_level, OverallRiskLevel::Critical);
        assert!(!report.recommendations.is_empty());
        assert!(!report.insights.is_empty());
    }

    #[tokio::test]
    async fn store_catalog_must_cover_mappings() {
        let store = InMemoryStore::new().with_threat_catalog(vec![ThreatDefinition {
            name: "Assault".to_string(),
            category: "Human Threats".to_string(),
            typical_likelihood: "medium".to_string(),
        }]);
        let err = RiskIntelligenceEngine::from_store(Arc::new(store))
            .await
            .unwrap_err();
        assert!(matches!(err, IntelligenceError::UnresolvedThreat { .. }));
    }

    #[test]
    fn build_report_uses_latest_observation() {
        let engine = RiskIntelligenceEngine::new(
            Arc::new(InMemoryStore::new()),
            ThreatMappings::bundled()
                .resolve(&bundled_catalog())
                .unwrap(),
            Arc::new(StaticPopulationTable::default()),
        );

        let mut older = observation("a", counts(5000, Some(900.0)), counts(0, None));
        older.period.end = NaiveDate::from_ymd_opt(2021, 12, 31).unwrap();
        let newer = observation("b", counts(10, Some(20.0)), counts(0, None));

        let sources = vec![
            SourceObservations {
                source: source("a", "chicago"),
                observations: vec![older],
            },
            SourceObservations {
                source: source("b", "chicago"),
                observations: vec![newer],
            },
        ];

        let report = engine.build_report(&site(), &sources, Utc::now());
        assert_eq!(report.crime_summary.unwrap().year, 2023);
        assert_eq!(report.violent_severity, Some(SeverityTier::VeryLow));
    }
}
