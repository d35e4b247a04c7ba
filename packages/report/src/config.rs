//! Report assembly configuration.

use strum_macros::{AsRefStr, Display, EnumString};

/// Environment variable selecting the [`AssemblyMode`].
pub const ASSEMBLY_MODE_ENV: &str = "REPORT_ASSEMBLY_MODE";

/// How the assembler treats collaborator failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum AssemblyMode {
    /// Any failed fetch aborts assembly with an error.
    Strict,
    /// Failed fetches are logged and replaced with empty data.
    #[default]
    FaultTolerant,
}

/// Settings for [`ReportAssembler`](crate::assembler::ReportAssembler).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportConfig {
    /// Failure handling for collaborator fetches.
    pub mode: AssemblyMode,
}

impl ReportConfig {
    /// Reads configuration from `REPORT_ASSEMBLY_MODE`.
    ///
    /// Unset or unrecognized values fall back to
    /// [`AssemblyMode::FaultTolerant`].
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            mode: parse_mode(std::env::var(ASSEMBLY_MODE_ENV).ok().as_deref()),
        }
    }

    /// Returns a copy with the given mode.
    #[must_use]
    pub const fn with_mode(self, mode: AssemblyMode) -> Self {
        Self { mode }
    }
}

fn parse_mode(value: Option<&str>) -> AssemblyMode {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return AssemblyMode::default();
    };

    value.parse().unwrap_or_else(|_| {
        log::warn!(
            "Unknown {ASSEMBLY_MODE_ENV} '{value}'; expected 'strict' or 'fault-tolerant'. \
             Using {}",
            AssemblyMode::default()
        );
        AssemblyMode::default()
    })
}
