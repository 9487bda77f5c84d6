//! # Combination Generator
//!
//! Owns an [`ActionCatalog`] and the combinations computed from it.
//!
//! Lifecycle: register actions and relationships through
//! [`CombinationGenerator::catalog_mut`], call
//! [`CombinationGenerator::compute_combinations`], then query. The first
//! computation freezes the catalogue; later computations rebuild the
//! snapshot from the same catalogue and give identical results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enumerator;
use super::CombinationSet;
use crate::actions::ActionCatalog;
use crate::coefficients::LimitState;
use crate::errors::{CombError, CombResult};

/// How favourable/unfavourable variants of the permanent actions are built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PermanentEnvelope {
    /// Every favourable/unfavourable assignment (2^n variants)
    #[default]
    PowerSet,
    /// All unfavourable and all favourable only
    Extremes,
}

impl std::str::FromStr for PermanentEnvelope {
    type Err = CombError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "power-set" | "powerset" => Ok(PermanentEnvelope::PowerSet),
            "extremes" => Ok(PermanentEnvelope::Extremes),
            _ => Err(CombError::invalid_input(
                "permanent_envelope",
                s,
                "Expected 'power-set' or 'extremes'",
            )),
        }
    }
}

/// Generation settings, stored alongside the catalogue in documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Design code label the factor tables come from
    pub code: String,
    pub permanent_envelope: PermanentEnvelope,
    /// Above this many permanent actions the power set falls back to the extremes
    pub max_power_set_permanents: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        GeneratorSettings {
            code: "IAP-11".to_string(),
            permanent_envelope: PermanentEnvelope::PowerSet,
            max_power_set_permanents: 12,
        }
    }
}

/// Result of one `compute_combinations` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationSnapshot {
    pub settings: GeneratorSettings,
    pub computed_at: DateTime<Utc>,
    /// One set per limit state, in [`LimitState::ALL`] order
    pub sets: Vec<CombinationSet>,
    /// Consistency problems recovered during enumeration
    pub diagnostics: Vec<CombError>,
}

impl CombinationSnapshot {
    pub fn get(&self, limit_state: LimitState) -> Option<&CombinationSet> {
        self.sets.iter().find(|s| s.limit_state() == limit_state)
    }

    /// Total number of combinations across limit states
    pub fn total(&self) -> usize {
        self.sets.iter().map(|s| s.len()).sum()
    }
}

/// Load combination generator for one structure
#[derive(Debug, Clone, Default)]
pub struct CombinationGenerator {
    catalog: ActionCatalog,
    settings: GeneratorSettings,
    snapshot: Option<CombinationSnapshot>,
}

impl CombinationGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: GeneratorSettings) -> Self {
        CombinationGenerator {
            settings,
            ..Self::default()
        }
    }

    /// Wrap an already populated catalogue
    pub fn from_catalog(catalog: ActionCatalog, settings: GeneratorSettings) -> Self {
        CombinationGenerator {
            catalog,
            settings,
            snapshot: None,
        }
    }

    pub fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    /// Mutable catalogue access. Registration calls on a frozen catalogue
    /// fail with a state error.
    pub fn catalog_mut(&mut self) -> &mut ActionCatalog {
        &mut self.catalog
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Replace the settings. Only allowed before the first computation.
    pub fn set_settings(&mut self, settings: GeneratorSettings) -> CombResult<()> {
        if self.catalog.is_frozen() {
            return Err(CombError::state(
                "set_settings",
                "Settings cannot change once combinations have been computed",
            ));
        }
        self.settings = settings;
        Ok(())
    }

    /// Freeze the catalogue and enumerate every limit state.
    ///
    /// Contradictory actions are left out and reported in
    /// [`CombinationSnapshot::diagnostics`]; they never abort the run.
    pub fn compute_combinations(&mut self) -> &CombinationSnapshot {
        self.catalog.freeze();
        log::info!(
            "computing {} combinations for {} actions",
            self.settings.code,
            self.catalog.len()
        );

        let result = enumerator::enumerate(&self.catalog, &self.settings);
        let snapshot = self.snapshot.insert(CombinationSnapshot {
            settings: self.settings.clone(),
            computed_at: Utc::now(),
            sets: result.sets,
            diagnostics: result.diagnostics,
        });
        log::info!(
            "generated {} combinations ({} diagnostics)",
            snapshot.total(),
            snapshot.diagnostics.len()
        );
        snapshot
    }

    pub fn is_computed(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn snapshot(&self) -> CombResult<&CombinationSnapshot> {
        self.snapshot
            .as_ref()
            .ok_or_else(|| CombError::state("snapshot", "compute_combinations() has not been called"))
    }

    /// Combinations of one limit state
    pub fn combinations(&self, limit_state: LimitState) -> CombResult<&CombinationSet> {
        let snapshot = self.snapshot.as_ref().ok_or_else(|| {
            CombError::state(
                format!("{} query", limit_state),
                "compute_combinations() has not been called",
            )
        })?;
        snapshot
            .get(limit_state)
            .ok_or_else(|| CombError::state(format!("{} query", limit_state), "Limit state missing from snapshot"))
    }

    /// ULS persistent and transient design situations
    pub fn uls_transient_combinations(&self) -> CombResult<&CombinationSet> {
        self.combinations(LimitState::UlsPersistent)
    }

    pub fn uls_seismic_combinations(&self) -> CombResult<&CombinationSet> {
        self.combinations(LimitState::UlsSeismic)
    }

    pub fn sls_characteristic_combinations(&self) -> CombResult<&CombinationSet> {
        self.combinations(LimitState::SlsCharacteristic)
    }

    pub fn sls_frequent_combinations(&self) -> CombResult<&CombinationSet> {
        self.combinations(LimitState::SlsFrequent)
    }

    pub fn sls_quasi_permanent_combinations(&self) -> CombResult<&CombinationSet> {
        self.combinations(LimitState::SlsQuasiPermanent)
    }

    /// Diagnostics of the last computation
    pub fn diagnostics(&self) -> CombResult<&[CombError]> {
        Ok(&self.snapshot()?.diagnostics)
    }
}
