#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Comprehensive assessment report assembly.
//!
//! [`assembler::ReportAssembler`] gathers an assessment, its site context,
//! and crime intelligence into a
//! [`ComprehensiveReportData`](site_risk_report_models::ComprehensiveReportData).
//! Scenario scoring ([`summary`]) and recommendation merging
//! ([`recommendations`]) are pure functions the assembler composes.

pub mod assembler;
pub mod config;
pub mod evidence;
pub mod recommendations;
pub mod summary;

use site_risk_intelligence::IntelligenceError;
use site_risk_store::StoreError;
use thiserror::Error;

/// Errors that can occur while assembling a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The requested assessment does not exist.
    #[error("Assessment {id} not found")]
    AssessmentNotFound {
        /// Requested assessment ID.
        id: String,
    },

    /// The requesting user does not own the assessment.
    #[error("User {user_id} is not authorized to access assessment {assessment_id}")]
    Unauthorized {
        /// Requested assessment ID.
        assessment_id: String,
        /// Requesting user ID.
        user_id: String,
    },

    /// A storage lookup failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Crime intelligence could not be generated.
    #[error("Risk intelligence error: {0}")]
    Intelligence(#[from] IntelligenceError),
}
