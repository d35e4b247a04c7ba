//! Crime-to-threat mapping tables and threat intelligence generation.
//!
//! Mapping tables are loaded from TOML (one table per crime type) and
//! resolved against a threat catalog before use. Resolution fails loudly on
//! any threat name the catalog does not know, so a rename on either side
//! cannot silently drop an entry.

use serde::Deserialize;
use site_risk_crime_models::{CrimeType, SeverityTier};
use site_risk_intelligence_models::{
    CrimeDataSummary, CrimeDataSupport, CrimeToThreatMapping, ThreatDefinition, ThreatIntelligence,
};

use crate::IntelligenceError;
use crate::likelihood::calculate_threat_likelihood;
use crate::severity::{classify_severity, usable_rate};

/// Embedded mapping tables.
const THREAT_MAPPINGS_TOML: &str = include_str!("../data/threat_mappings.toml");

#[derive(Debug, Deserialize)]
struct MappingTablesConfig {
    #[serde(default)]
    violent: Vec<MappingEntry>,
    #[serde(default)]
    property: Vec<MappingEntry>,
}

#[derive(Debug, Deserialize)]
struct MappingEntry {
    threat_name: String,
    category: String,
    relevance_weight: f64,
    likelihood_modifier: f64,
}

impl From<MappingEntry> for CrimeToThreatMapping {
    fn from(entry: MappingEntry) -> Self {
        Self {
            threat_name: entry.threat_name,
            category: entry.category,
            relevance_weight: entry.relevance_weight,
            likelihood_modifier: entry.likelihood_modifier,
        }
    }
}

/// Unresolved mapping tables, one per crime type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreatMappings {
    violent: Vec<CrimeToThreatMapping>,
    property: Vec<CrimeToThreatMapping>,
}

impl ThreatMappings {
    /// Creates mapping tables from explicit entries.
    #[must_use]
    pub const fn new(
        violent: Vec<CrimeToThreatMapping>,
        property: Vec<CrimeToThreatMapping>,
    ) -> Self {
        Self { violent, property }
    }

    /// Parses mapping tables from TOML with `[[violent]]` and `[[property]]`
    /// arrays.
    ///
    /// # Errors
    ///
    /// Returns [`IntelligenceError::Toml`] if the TOML is malformed.
    pub fn from_toml(toml_str: &str) -> Result<Self, IntelligenceError> {
        let config: MappingTablesConfig = toml::de::from_str(toml_str)?;
        Ok(Self {
            violent: config.violent.into_iter().map(Into::into).collect(),
            property: config.property.into_iter().map(Into::into).collect(),
        })
    }

    /// Returns the tables compiled into the binary.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML fails to parse.
    #[must_use]
    pub fn bundled() -> Self {
        Self::from_toml(THREAT_MAPPINGS_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse threat_mappings.toml: {e}"))
    }

    /// Returns the table for a crime type.
    #[must_use]
    pub fn table(&self, crime_type: CrimeType) -> &[CrimeToThreatMapping] {
        match crime_type {
            CrimeType::Violent => &self.violent,
            CrimeType::Property => &self.property,
        }
    }

    /// Validates every entry and links it to its catalog threat.
    ///
    /// # Errors
    ///
    /// * [`IntelligenceError::UnresolvedThreat`] if a threat name is not in
    ///   `catalog`
    /// * [`IntelligenceError::UnknownLikelihood`] if the catalog entry's
    ///   typical likelihood is not a valid tier label
    /// * [`IntelligenceError::InvalidMapping`] if a relevance weight is
    ///   outside `[0, 1]` or a likelihood modifier is not positive
    pub fn resolve(
        &self,
        catalog: &[ThreatDefinition],
    ) -> Result<ResolvedThreatMappings, IntelligenceError> {
        let mut entries = Vec::with_capacity(self.violent.len() + self.property.len());

        for crime_type in CrimeType::all() {
            for mapping in self.table(*crime_type) {
                validate_mapping(mapping)?;

                let definition = catalog
                    .iter()
                    .find(|t| t.name == mapping.threat_name)
                    .ok_or_else(|| IntelligenceError::UnresolvedThreat {
                        threat_name: mapping.threat_name.clone(),
                    })?;

                let baseline = definition
                    .typical_likelihood
                    .trim()
                    .parse::<SeverityTier>()
                    .map_err(|_| IntelligenceError::UnknownLikelihood {
                        threat_name: definition.name.clone(),
                        label: definition.typical_likelihood.clone(),
                    })?;

                entries.push(ResolvedMapping {
                    crime_type: *crime_type,
                    mapping: mapping.clone(),
                    baseline,
                });
            }
        }

        log::debug!(
            "Resolved {} threat mappings against a catalog of {} threats",
            entries.len(),
            catalog.len()
        );

        Ok(ResolvedThreatMappings { entries })
    }
}

fn validate_mapping(mapping: &CrimeToThreatMapping) -> Result<(), IntelligenceError> {
    let invalid = |message: String| IntelligenceError::InvalidMapping {
        threat_name: mapping.threat_name.clone(),
        message,
    };

    if !(0.0..=1.0).contains(&mapping.relevance_weight) {
        return Err(invalid(format!(
            "relevance weight {} is outside [0, 1]",
            mapping.relevance_weight
        )));
    }
    if !mapping.likelihood_modifier.is_finite() || mapping.likelihood_modifier <= 0.0 {
        return Err(invalid(format!(
            "likelihood modifier {} must be positive",
            mapping.likelihood_modifier
        )));
    }
    Ok(())
}

/// A mapping entry linked to its catalog threat.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMapping {
    /// Crime type whose table the entry came from.
    pub crime_type: CrimeType,
    /// The mapping itself.
    pub mapping: CrimeToThreatMapping,
    /// Catalog typical likelihood.
    pub baseline: SeverityTier,
}

/// Mapping tables that have passed catalog resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedThreatMappings {
    entries: Vec<ResolvedMapping>,
}

impl ResolvedThreatMappings {
    /// All entries, violent table first, each table in file order.
    #[must_use]
    pub fn entries(&self) -> &[ResolvedMapping] {
        &self.entries
    }
}

/// Describes the figure a category was judged on, e.g.
/// `"512.3 per 100k residents"` or `"612 reported incidents"`.
#[must_use]
pub fn describe_figure(crime_type: CrimeType, summary: &CrimeDataSummary) -> String {
    usable_rate(summary.rate(crime_type)).map_or_else(
        || format!("{} reported incidents", summary.total(crime_type)),
        |rate| format!("{rate:.1} per 100k residents"),
    )
}

fn rationale(
    crime_type: CrimeType,
    summary: &CrimeDataSummary,
    threat_name: &str,
    suggested: SeverityTier,
) -> String {
    let severity = classify_severity(
        crime_type,
        summary.rate(crime_type),
        summary.total(crime_type),
    );
    let basis = if usable_rate(summary.rate(crime_type)).is_some() {
        "rate"
    } else {
        "count, no population data"
    };

    format!(
        "Local {crime_type} crime of {figure} in {year} is {severity} ({basis}), \
         indicating a {suggested} likelihood of {threat_name}.",
        figure = describe_figure(crime_type, summary),
        year = summary.year,
        severity = severity.describe(),
        suggested = suggested.describe(),
    )
}

/// Emits one [`ThreatIntelligence`] per mapping whose crime category has a
/// nonzero total, most relevant first.
#[must_use]
pub fn generate_threat_intelligence(
    mappings: &ResolvedThreatMappings,
    summary: &CrimeDataSummary,
) -> Vec<ThreatIntelligence> {
    let mut intelligence: Vec<ThreatIntelligence> = mappings
        .entries()
        .iter()
        .filter(|entry| summary.total(entry.crime_type) > 0)
        .map(|entry| {
            let suggested = calculate_threat_likelihood(entry.crime_type, &entry.mapping, summary);
            let total = summary.total(entry.crime_type);

            ThreatIntelligence {
                threat_name: entry.mapping.threat_name.clone(),
                category: entry.mapping.category.clone(),
                suggested_likelihood: suggested,
                baseline_likelihood: entry.baseline,
                rationale: rationale(
                    entry.crime_type,
                    summary,
                    &entry.mapping.threat_name,
                    suggested,
                ),
                crime_data_support: CrimeDataSupport {
                    violent_crimes: (entry.crime_type == CrimeType::Violent).then_some(total),
                    property_crimes: (entry.crime_type == CrimeType::Property).then_some(total),
                    relevance_score: entry.mapping.relevance_weight,
                },
            }
        })
        .collect();

    intelligence.sort_by(|a, b| {
        b.crime_data_support
            .relevance_score
            .total_cmp(&a.crime_data_support.relevance_score)
    });

    intelligence
}
