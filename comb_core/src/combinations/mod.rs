//! # Load Combinations
//!
//! Generated combinations and their per-limit-state collections.
//!
//! - [`Combination`] - one set of nonzero action coefficients
//! - [`CombinationSet`] - all combinations of one limit state, with matrix queries
//! - [`CombinationGenerator`] - owns the catalogue and the computed snapshot
//! - [`enumerator`] - the generation pipeline
//!
//! # Example
//!
//! ```
//! use comb_core::combinations::CombinationGenerator;
//!
//! let mut generator = CombinationGenerator::new();
//! let catalog = generator.catalog_mut();
//! catalog.new_permanent_action("G", "Self-weight").unwrap();
//! catalog.new_footbridge_wind_action("W", "Wind", &[]).unwrap();
//! generator.compute_combinations();
//!
//! let uls = generator.uls_transient_combinations().unwrap();
//! let matrix = uls.coefficients(&["G", "W"]).unwrap();
//! assert_eq!(matrix.len(), uls.len());
//! assert!(matrix.iter().all(|row| row[1] == 1.5));
//! ```

pub mod enumerator;
pub mod generator;

pub use generator::{CombinationGenerator, CombinationSnapshot, GeneratorSettings, PermanentEnvelope};

use serde::{Deserialize, Serialize};

use crate::actions::{ActionCatalog, ActionId};
use crate::coefficients::{LimitState, Role};
use crate::errors::{CombError, CombResult};

/// One action with its nonzero coefficient inside a combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationTerm {
    pub action: ActionId,
    /// Action name, copied for name-keyed queries
    pub name: String,
    pub role: Role,
    pub coefficient: f64,
}

impl CombinationTerm {
    pub fn is_permanent(&self) -> bool {
        matches!(self.role, Role::PermanentFavourable | Role::PermanentUnfavourable)
    }
}

/// A load combination: coefficients to apply to each action's
/// characteristic value.
///
/// Terms are kept in canonical order: permanent actions (registration
/// order), then the leading action, then the rest alphabetically. Actions
/// that do not take part have no term and a coefficient of 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    limit_state: LimitState,
    leading: Option<ActionId>,
    terms: Vec<CombinationTerm>,
    name: String,
}

impl Combination {
    /// Build a combination from its terms. Zero coefficients are discarded
    /// and terms are put in canonical order.
    pub fn new(limit_state: LimitState, leading: Option<ActionId>, terms: Vec<CombinationTerm>) -> Self {
        let mut terms: Vec<CombinationTerm> = terms.into_iter().filter(|t| t.coefficient != 0.0).collect();
        let leading = leading.filter(|id| terms.iter().any(|t| t.action == *id));

        terms.sort_by(|a, b| {
            let rank = |t: &CombinationTerm| {
                if t.is_permanent() {
                    0
                } else if Some(t.action) == leading {
                    1
                } else {
                    2
                }
            };
            rank(a).cmp(&rank(b)).then_with(|| {
                if rank(a) == 0 {
                    a.action.cmp(&b.action)
                } else {
                    a.name.cmp(&b.name)
                }
            })
        });

        let name = terms
            .iter()
            .map(|t| format!("{:.2}*{}", t.coefficient, t.name))
            .collect::<Vec<_>>()
            .join("+");

        Combination {
            limit_state,
            leading,
            terms,
            name,
        }
    }

    pub fn limit_state(&self) -> LimitState {
        self.limit_state
    }

    /// Leading variable action, if any
    pub fn leading(&self) -> Option<ActionId> {
        self.leading
    }

    pub fn terms(&self) -> &[CombinationTerm] {
        &self.terms
    }

    /// Canonical name, e.g. `"1.35*G1+1.50*Qviento+0.54*Q1"`.
    ///
    /// Coefficients are printed with two decimals, so the name is a label
    /// and not a key: distinct coefficient vectors may share a name. Compare
    /// [`Combination::coefficients`] to tell them apart.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Coefficient of the named action (0.0 when absent)
    pub fn coefficient(&self, action_name: &str) -> f64 {
        self.terms
            .iter()
            .find(|t| t.name == action_name)
            .map(|t| t.coefficient)
            .unwrap_or(0.0)
    }

    /// Coefficient of an action handle (0.0 when absent)
    pub fn coefficient_of(&self, action: ActionId) -> f64 {
        self.terms
            .iter()
            .find(|t| t.action == action)
            .map(|t| t.coefficient)
            .unwrap_or(0.0)
    }

    /// Whether the named action has a nonzero coefficient
    pub fn contains(&self, action_name: &str) -> bool {
        self.terms.iter().any(|t| t.name == action_name)
    }

    /// Coefficient vector aligned to `action_names` (0.0 for absent actions)
    pub fn coefficients<S: AsRef<str>>(&self, action_names: &[S]) -> Vec<f64> {
        action_names.iter().map(|n| self.coefficient(n.as_ref())).collect()
    }

    /// Coefficient vector over a dense action count, used for deduplication
    pub(crate) fn signature(&self, action_count: usize) -> Vec<u64> {
        let mut signature = vec![0.0f64.to_bits(); action_count];
        for term in &self.terms {
            if let Some(slot) = signature.get_mut(term.action.0) {
                *slot = (term.coefficient + 0.0).to_bits();
            }
        }
        signature
    }

    /// Verify the catalogue invariants on this combination: every permanent
    /// action present, no incompatible pair present, every accompanying
    /// action's mains present.
    pub fn check_invariants(&self, catalog: &ActionCatalog) -> CombResult<()> {
        for action in catalog.iter().filter(|a| a.is_permanent()) {
            if self.coefficient_of(action.id) == 0.0 {
                return Err(CombError::consistency(
                    &action.name,
                    format!("Permanent action missing from '{}'", self.name),
                ));
            }
        }
        let graph = catalog.graph();
        for term in &self.terms {
            if let Some(other) = graph
                .exclusions_of(term.action)
                .iter()
                .find(|id| self.coefficient_of(**id) != 0.0)
            {
                return Err(CombError::consistency(
                    &term.name,
                    format!("Incompatible with action #{} in '{}'", other.0, self.name),
                ));
            }
            if let Some(main) = graph
                .mains_of(term.action)
                .iter()
                .find(|id| self.coefficient_of(**id) == 0.0)
            {
                return Err(CombError::consistency(
                    &term.name,
                    format!("Main action #{} missing from '{}'", main.0, self.name),
                ));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Combination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// All combinations generated for one limit state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationSet {
    limit_state: LimitState,
    /// Catalogue action names in registration order
    action_names: Vec<String>,
    combinations: Vec<Combination>,
}

impl CombinationSet {
    pub fn new(limit_state: LimitState, action_names: Vec<String>, combinations: Vec<Combination>) -> Self {
        CombinationSet {
            limit_state,
            action_names,
            combinations,
        }
    }

    pub fn limit_state(&self) -> LimitState {
        self.limit_state
    }

    pub fn action_names(&self) -> &[String] {
        &self.action_names
    }

    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    /// An empty set means "no applicable combinations", which is valid
    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Combination> {
        self.combinations.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Combination> {
        self.combinations.get(index)
    }

    /// First combination with this canonical name, in row order.
    ///
    /// Names are not unique; see [`CombinationSet::find_unique`].
    pub fn find(&self, name: &str) -> Option<&Combination> {
        self.combinations.iter().find(|c| c.name() == name)
    }

    /// Every combination with this canonical name, in row order
    pub fn find_all(&self, name: &str) -> Vec<&Combination> {
        self.combinations.iter().filter(|c| c.name() == name).collect()
    }

    /// The only combination with this canonical name.
    ///
    /// Fails when no combination or more than one combination carries it.
    pub fn find_unique(&self, name: &str) -> CombResult<&Combination> {
        match self.find_all(name).as_slice() {
            [combination] => Ok(*combination),
            [] => Err(CombError::invalid_input(
                "combination",
                name,
                format!("No {} combination has this name", self.limit_state),
            )),
            matches => Err(CombError::invalid_input(
                "combination",
                name,
                format!("{} {} combinations share this name", matches.len(), self.limit_state),
            )),
        }
    }

    /// Combination names in row order
    pub fn names(&self) -> Vec<&str> {
        self.combinations.iter().map(|c| c.name()).collect()
    }

    /// Coefficient matrix: one row per combination, one column per entry of
    /// `action_names`. Names outside the catalogue are a configuration error.
    pub fn coefficients<S: AsRef<str>>(&self, action_names: &[S]) -> CombResult<Vec<Vec<f64>>> {
        if let Some(unknown) = action_names
            .iter()
            .map(|n| n.as_ref())
            .find(|n| !self.action_names.iter().any(|a| a == n))
        {
            return Err(CombError::configuration(unknown, "Action is not registered"));
        }
        Ok(self.combinations.iter().map(|c| c.coefficients(action_names)).collect())
    }

    /// Coefficient matrix over the catalogue ordering
    pub fn coefficient_matrix(&self) -> Vec<Vec<f64>> {
        self.combinations
            .iter()
            .map(|c| c.coefficients(self.action_names.as_slice()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a CombinationSet {
    type Item = &'a Combination;
    type IntoIter = std::slice::Iter<'a, Combination>;

    fn into_iter(self) -> Self::IntoIter {
        self.combinations.iter()
    }
}
