//! # Load Effects
//!
//! Applies generated combinations to nominal effects, one scalar per action
//! (for example the midspan bending moment of each load case from an external
//! analysis), and picks the governing combinations.
//!
//! Effects are entered with their sign. Since every permanent sign variant is
//! generated, the maximum and the minimum of a set are both meaningful: the
//! minimum governs for uplift and reversal checks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::actions::ActionCatalog;
use crate::combinations::{Combination, CombinationSet};
use crate::errors::{CombError, CombResult};

/// Nominal effect of each action at one location
///
/// # Example
/// ```
/// use comb_core::combinations::CombinationGenerator;
/// use comb_core::effects::LoadEffects;
///
/// let mut generator = CombinationGenerator::new();
/// generator.catalog_mut().new_permanent_action("G", "Self-weight").unwrap();
/// generator.catalog_mut().new_snow_action("S", "Snow", &[]).unwrap();
/// generator.compute_combinations();
///
/// let effects = LoadEffects::new("Midspan moment")
///     .with_effect("G", 100.0)
///     .with_effect("S", 40.0);
///
/// let uls = generator.uls_transient_combinations().unwrap();
/// let governing = effects.find_governing_combination(uls).unwrap();
/// assert_eq!(governing.name, "1.35*G+1.50*S");
/// assert!((governing.value - 195.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadEffects {
    /// Location or quantity the effects describe
    pub label: String,
    /// Effect per action name (missing actions contribute zero)
    pub values: BTreeMap<String, f64>,
}

/// One combination applied to a set of effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationResult {
    /// Combination name
    pub name: String,
    /// Factored effect
    pub value: f64,
}

/// Maximum and minimum factored effects of a set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoverningResults {
    pub max: CombinationResult,
    pub min: CombinationResult,
}

impl LoadEffects {
    pub fn new(label: impl Into<String>) -> Self {
        LoadEffects {
            label: label.into(),
            values: BTreeMap::new(),
        }
    }

    /// Builder: add the effect of one action
    pub fn with_effect(mut self, action: impl Into<String>, value: f64) -> Self {
        self.values.insert(action.into(), value);
        self
    }

    pub fn set_effect(&mut self, action: impl Into<String>, value: f64) {
        self.values.insert(action.into(), value);
    }

    /// Effect of the named action (0.0 if not given)
    pub fn get(&self, action: &str) -> f64 {
        self.values.get(action).copied().unwrap_or(0.0)
    }

    /// Factored effect: Σ coefficient × effect
    pub fn apply(&self, combination: &Combination) -> f64 {
        combination
            .terms()
            .iter()
            .map(|t| t.coefficient * self.get(&t.name))
            .sum()
    }

    /// Every effect must belong to a registered action and be finite.
    pub fn validate(&self, catalog: &ActionCatalog) -> CombResult<()> {
        for (name, value) in &self.values {
            catalog.id_of(name)?;
            if !value.is_finite() {
                return Err(CombError::invalid_input(
                    format!("{}.{}", self.label, name),
                    value.to_string(),
                    "Effect must be finite",
                ));
            }
        }
        Ok(())
    }

    /// Factored effect of every combination, in row order
    pub fn all_combination_results(&self, set: &CombinationSet) -> Vec<CombinationResult> {
        set.iter()
            .map(|combo| CombinationResult {
                name: combo.name().to_string(),
                value: self.apply(combo),
            })
            .collect()
    }

    /// Combination with the largest factored effect. `None` for an empty set.
    pub fn find_governing_combination(&self, set: &CombinationSet) -> Option<CombinationResult> {
        self.all_combination_results(set)
            .into_iter()
            .max_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Combination with the smallest factored effect. `None` for an empty set.
    pub fn find_minimum_combination(&self, set: &CombinationSet) -> Option<CombinationResult> {
        self.all_combination_results(set)
            .into_iter()
            .min_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Both extremes in a single pass. Ties keep the earlier row.
    pub fn find_governing_min_max(&self, set: &CombinationSet) -> Option<GoverningResults> {
        let mut results = self.all_combination_results(set).into_iter();
        let first = results.next()?;
        let mut governing = GoverningResults {
            max: first.clone(),
            min: first,
        };
        for result in results {
            if result.value > governing.max.value {
                governing.max = result.clone();
            }
            if result.value < governing.min.value {
                governing.min = result;
            }
        }
        Some(governing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinations::CombinationGenerator;
    use approx::assert_relative_eq;

    fn generator() -> CombinationGenerator {
        let mut generator = CombinationGenerator::new();
        let catalog = generator.catalog_mut();
        catalog.new_permanent_action("G", "Self-weight").unwrap();
        catalog.new_footbridge_wind_action("W", "Wind", &[]).unwrap();
        catalog.new_snow_action("S", "Snow", &["W"]).unwrap();
        generator.compute_combinations();
        generator
    }

    #[test]
    fn test_apply_combination() {
        let generator = generator();
        let uls = generator.uls_transient_combinations().unwrap();
        let combo = uls.find("1.35*G+1.50*W").unwrap();
        let effects = LoadEffects::new("M").with_effect("G", 10.0).with_effect("W", 4.0);
        assert_relative_eq!(effects.apply(combo), 13.5 + 6.0);
    }

    #[test]
    fn test_missing_effects_are_zero() {
        let generator = generator();
        let uls = generator.uls_transient_combinations().unwrap();
        let effects = LoadEffects::new("M");
        assert!(uls.iter().all(|c| effects.apply(c) == 0.0));
        assert_eq!(effects.get("G"), 0.0);
    }

    #[test]
    fn test_governing_and_minimum_with_uplift() {
        let generator = generator();
        let uls = generator.uls_transient_combinations().unwrap();
        // Wind suction against gravity
        let effects = LoadEffects::new("Support reaction")
            .with_effect("G", 10.0)
            .with_effect("W", -20.0)
            .with_effect("S", 5.0);

        let max = effects.find_governing_combination(uls).unwrap();
        assert_eq!(max.name, "1.35*G+1.50*S");
        assert_relative_eq!(max.value, 13.5 + 7.5);

        let min = effects.find_minimum_combination(uls).unwrap();
        assert_eq!(min.name, "1.00*G+1.50*W");
        assert_relative_eq!(min.value, 10.0 - 30.0);

        let both = effects.find_governing_min_max(uls).unwrap();
        assert_eq!(both.max, max);
        assert_eq!(both.min, min);
    }

    #[test]
    fn test_empty_set_has_no_governing() {
        let generator = generator();
        let seismic = generator.uls_seismic_combinations().unwrap();
        let effects = LoadEffects::new("M").with_effect("G", 1.0);
        assert!(effects.find_governing_combination(seismic).is_none());
        assert!(effects.find_governing_min_max(seismic).is_none());
        assert!(effects.all_combination_results(seismic).is_empty());
    }

    #[test]
    fn test_validate() {
        let generator = generator();
        let mut effects = LoadEffects::new("M").with_effect("G", 1.0);
        assert!(effects.validate(generator.catalog()).is_ok());
        effects.set_effect("X", 1.0);
        assert_eq!(
            effects.validate(generator.catalog()).unwrap_err().error_code(),
            "CONFIGURATION_ERROR"
        );
        let nan = LoadEffects::new("M").with_effect("G", f64::NAN);
        assert_eq!(nan.validate(generator.catalog()).unwrap_err().error_code(), "INVALID_INPUT");
    }
}
