//! Builds a [`CrimeDataSummary`] from a site's most recent observation.

use chrono::Datelike as _;
use site_risk_crime_models::{CrimeObservation, CrimeSourceRecord};
use site_risk_intelligence_models::CrimeDataSummary;

use crate::population::{PopulationLookup, backfill_rates};

/// A crime source paired with the observations it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceObservations {
    /// The source.
    pub source: CrimeSourceRecord,
    /// Its observations, in storage order.
    pub observations: Vec<CrimeObservation>,
}

/// Picks the observation with the latest period end across all sources.
///
/// Ties keep the first observation encountered.
#[must_use]
pub fn latest_observation(
    sources: &[SourceObservations],
) -> Option<(&CrimeSourceRecord, &CrimeObservation)> {
    sources
        .iter()
        .flat_map(|s| s.observations.iter().map(move |o| (&s.source, o)))
        .fold(None, |best, candidate| match best {
            Some((_, current)) if candidate.1.period.end <= current.period.end => best,
            _ => Some(candidate),
        })
}

/// Normalizes one observation, backfilling missing rates.
#[must_use]
pub fn build_crime_summary(
    source: &CrimeSourceRecord,
    observation: &CrimeObservation,
    lookup: &dyn PopulationLookup,
) -> CrimeDataSummary {
    let rates = backfill_rates(
        &observation.violent_crimes,
        &observation.property_crimes,
        source.city.as_deref(),
        lookup,
    );

    CrimeDataSummary {
        violent_total: observation.violent_crimes.total,
        property_total: observation.property_crimes.total,
        violent_rate: rates.violent_rate,
        property_rate: rates.property_rate,
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        population: rates.population.map(|p| p.round() as u64),
        year: observation.period.end.year(),
        source: source.name.clone(),
    }
}
