//! # Action Catalogue
//!
//! Registers the structural actions considered in design, each with its
//! family factor table, and owns the [`RelationshipGraph`] between them.
//!
//! Actions live in an arena and are referred to by dense [`ActionId`]
//! handles. Names are unique within a catalogue. The catalogue is frozen by
//! the generator on the first `compute_combinations()` call; any later
//! mutation fails with a state error.
//!
//! ## Example
//!
//! ```
//! use comb_core::actions::ActionCatalog;
//!
//! let mut catalog = ActionCatalog::new();
//! catalog.new_permanent_action("G1", "Self-weight").unwrap();
//! let q1 = catalog.new_footbridge_action("Q1", "Pedestrian load", &[]).unwrap();
//! let q2 = catalog.new_footbridge_action("Q2", "Pedestrian load, second span", &[]).unwrap();
//! catalog.relationships(q2).unwrap().append_main("Q1").unwrap();
//! catalog.new_footbridge_wind_action("Qviento", "Wind", &[]).unwrap();
//! catalog.new_thermal_action("Qtemp", "Thermal", &["Qviento"]).unwrap();
//!
//! assert_eq!(catalog.len(), 5);
//! assert_eq!(catalog.graph().mains_of(q2), &[q1]);
//! assert!(catalog.new_snow_action("Q1", "Duplicate", &[]).is_err());
//! ```

pub mod family;

pub use family::{ActionCategory, ActionFactors, ActionFamily, CombinationFactors, PartialSafetyFactors};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{CombError, CombResult};
use crate::relationships::{EdgeRejection, RelationshipGraph};

/// Dense index of an action inside its catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub usize);

impl ActionId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A registered structural action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: ActionId,
    /// Unique name (e.g., "G1", "Qviento")
    pub name: String,
    pub description: String,
    pub family: ActionFamily,
    /// γ and ψ factors applied by the coefficient policy
    pub factors: ActionFactors,
}

impl Action {
    pub fn category(&self) -> ActionCategory {
        self.family.category()
    }

    pub fn is_permanent(&self) -> bool {
        self.category() == ActionCategory::Permanent
    }

    pub fn is_seismic(&self) -> bool {
        self.family.is_seismic()
    }
}

/// Arena of actions plus their relationship graph
#[derive(Debug, Clone, Default)]
pub struct ActionCatalog {
    actions: Vec<Action>,
    by_name: HashMap<String, ActionId>,
    graph: RelationshipGraph,
    frozen: bool,
}

impl ActionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a permanent action with the self-weight factor table.
    pub fn new_permanent_action(&mut self, name: &str, description: &str) -> CombResult<ActionId> {
        self.add_action(name, description, ActionFamily::SelfWeight, None, &[])
    }

    /// Register a permanent action with non-default partial factors.
    pub fn new_permanent_action_with_factors(
        &mut self,
        name: &str,
        description: &str,
        factors: ActionFactors,
    ) -> CombResult<ActionId> {
        self.add_action(name, description, ActionFamily::SelfWeight, Some(factors), &[])
    }

    /// Register a pedestrian live load on a footbridge.
    pub fn new_footbridge_action(&mut self, name: &str, description: &str, incompatible: &[&str]) -> CombResult<ActionId> {
        self.add_action(name, description, ActionFamily::FootbridgeLive, None, incompatible)
    }

    /// Register a wind action on a footbridge.
    pub fn new_footbridge_wind_action(&mut self, name: &str, description: &str, incompatible: &[&str]) -> CombResult<ActionId> {
        self.add_action(name, description, ActionFamily::FootbridgeWind, None, incompatible)
    }

    /// Register a thermal action.
    pub fn new_thermal_action(&mut self, name: &str, description: &str, incompatible: &[&str]) -> CombResult<ActionId> {
        self.add_action(name, description, ActionFamily::Thermal, None, incompatible)
    }

    /// Register a snow action.
    pub fn new_snow_action(&mut self, name: &str, description: &str, incompatible: &[&str]) -> CombResult<ActionId> {
        self.add_action(name, description, ActionFamily::Snow, None, incompatible)
    }

    /// Register a seismic action. Seismic actions only lead the ULS seismic
    /// situation and never appear in the other limit states.
    pub fn new_seismic_action(&mut self, name: &str, description: &str, incompatible: &[&str]) -> CombResult<ActionId> {
        self.add_action(name, description, ActionFamily::Seismic, None, incompatible)
    }

    /// Register a variable action with caller-supplied factors.
    pub fn new_variable_action(
        &mut self,
        name: &str,
        description: &str,
        factors: ActionFactors,
        incompatible: &[&str],
    ) -> CombResult<ActionId> {
        self.add_action(name, description, ActionFamily::Generic, Some(factors), incompatible)
    }

    /// Register an action of any family.
    ///
    /// Everything is validated before the catalogue changes, so a failed
    /// call leaves it untouched. `factors` defaults to the family table.
    pub fn add_action(
        &mut self,
        name: &str,
        description: &str,
        family: ActionFamily,
        factors: Option<ActionFactors>,
        incompatible: &[&str],
    ) -> CombResult<ActionId> {
        self.ensure_mutable("add_action")?;

        if name.trim().is_empty() {
            return Err(CombError::configuration(name, "Action name must not be empty"));
        }
        if self.by_name.contains_key(name) {
            return Err(CombError::configuration(name, "Duplicate action name"));
        }

        let factors = factors.unwrap_or_else(|| family.default_factors());
        if let Some(field) = factors.invalid_factor() {
            return Err(CombError::configuration(
                name,
                format!("Factor '{}' must be finite and non-negative", field),
            ));
        }
        let permanent = family.category() == ActionCategory::Permanent;
        let s = &factors.safety;
        let gammas = [s.uls_favourable, s.uls_unfavourable, s.sls_favourable, s.sls_unfavourable];
        if permanent && gammas.iter().any(|g| *g <= 0.0) {
            return Err(CombError::configuration(
                name,
                "Permanent action factors must be strictly positive",
            ));
        }
        if permanent && !incompatible.is_empty() {
            return Err(CombError::configuration(
                name,
                "Permanent actions cannot be declared incompatible with other actions",
            ));
        }

        let mut excluded = Vec::with_capacity(incompatible.len());
        for other in incompatible {
            if *other == name {
                return Err(CombError::configuration(name, "Action cannot be incompatible with itself"));
            }
            let other_id = self.id_of(other).map_err(|_| {
                CombError::configuration(name, format!("Incompatible action '{}' is not registered", other))
            })?;
            if self.actions[other_id.0].is_permanent() {
                return Err(CombError::configuration(
                    name,
                    format!("Cannot be incompatible with permanent action '{}'", other),
                ));
            }
            excluded.push(other_id);
        }

        let id = self.graph.add_node();
        for other_id in excluded {
            // Both ids are distinct and registered at this point.
            let _ = self.graph.add_exclusion(id, other_id);
        }
        self.actions.push(Action {
            id,
            name: name.to_string(),
            description: description.to_string(),
            family,
            factors,
        });
        self.by_name.insert(name.to_string(), id);
        log::debug!("registered action {} ({}) as {:?}", name, family.code(), id);
        Ok(id)
    }

    /// Relationship editor for an action handle.
    pub fn relationships(&mut self, id: ActionId) -> CombResult<Relationships<'_>> {
        self.ensure_mutable("relationships")?;
        if id.0 >= self.actions.len() {
            return Err(CombError::configuration(
                format!("#{}", id.0),
                "Action handle does not belong to this catalogue",
            ));
        }
        Ok(Relationships { catalog: self, action: id })
    }

    /// Relationship editor looked up by action name.
    pub fn relationships_by_name(&mut self, name: &str) -> CombResult<Relationships<'_>> {
        let id = self.id_of(name)?;
        self.relationships(id)
    }

    pub fn graph(&self) -> &RelationshipGraph {
        &self.graph
    }

    pub fn get(&self, id: ActionId) -> Option<&Action> {
        self.actions.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<&Action> {
        self.by_name.get(name).map(|id| &self.actions[id.0])
    }

    /// Resolve a name to its handle, failing with a configuration error.
    pub fn id_of(&self, name: &str) -> CombResult<ActionId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| CombError::configuration(name, "Action is not registered"))
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Actions in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    /// Action names in registration order
    pub fn names(&self) -> Vec<String> {
        self.actions.iter().map(|a| a.name.clone()).collect()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
    }

    fn ensure_mutable(&self, operation: &str) -> CombResult<()> {
        if self.frozen {
            return Err(CombError::state(
                operation,
                "Catalogue is frozen once combinations have been computed",
            ));
        }
        Ok(())
    }
}

/// Relationship editor bound to one action of a catalogue
#[derive(Debug)]
pub struct Relationships<'a> {
    catalog: &'a mut ActionCatalog,
    action: ActionId,
}

impl Relationships<'_> {
    /// Mark this action as accompanying `main`: it may only appear in a
    /// combination where `main` also has a nonzero coefficient.
    pub fn append_main(&mut self, main: &str) -> CombResult<&mut Self> {
        let name = self.catalog.actions[self.action.0].name.clone();
        let main_id = self.catalog.id_of(main).map_err(|_| {
            CombError::configuration(&name, format!("Main action '{}' is not registered", main))
        })?;
        if self.catalog.actions[self.action.0].is_permanent() {
            return Err(CombError::configuration(&name, "Permanent actions cannot accompany a main action"));
        }
        self.catalog
            .graph
            .add_main(self.action, main_id)
            .map_err(|rejection| match rejection {
                EdgeRejection::SelfReference => CombError::configuration(&name, "Action cannot be its own main action"),
                EdgeRejection::Cycle => CombError::configuration(
                    &name,
                    format!("Main action '{}' would close a cycle of main actions", main),
                ),
            })?;
        Ok(self)
    }

    /// Declare this action incompatible with `other` (symmetric).
    pub fn add_incompatible(&mut self, other: &str) -> CombResult<&mut Self> {
        let name = self.catalog.actions[self.action.0].name.clone();
        let other_id = self.catalog.id_of(other).map_err(|_| {
            CombError::configuration(&name, format!("Incompatible action '{}' is not registered", other))
        })?;
        if self.catalog.actions[self.action.0].is_permanent() || self.catalog.actions[other_id.0].is_permanent() {
            return Err(CombError::configuration(
                &name,
                format!("Permanent actions cannot take part in an incompatibility ('{}')", other),
            ));
        }
        self.catalog
            .graph
            .add_exclusion(self.action, other_id)
            .map_err(|_| CombError::configuration(&name, "Action cannot be incompatible with itself"))?;
        Ok(self)
    }

    /// Names of the direct main actions
    pub fn mains(&self) -> Vec<&str> {
        self.catalog
            .graph
            .mains_of(self.action)
            .iter()
            .map(|id| self.catalog.actions[id.0].name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_order_and_lookup() {
        let mut catalog = ActionCatalog::new();
        let g = catalog.new_permanent_action("G1", "Self-weight").unwrap();
        let w = catalog.new_footbridge_wind_action("W", "Wind", &[]).unwrap();

        assert_eq!(g, ActionId(0));
        assert_eq!(w, ActionId(1));
        assert_eq!(catalog.names(), vec!["G1", "W"]);
        assert_eq!(catalog.find("W").unwrap().family, ActionFamily::FootbridgeWind);
        assert!(catalog.get(g).unwrap().is_permanent());
        assert!(catalog.find("X").is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut catalog = ActionCatalog::new();
        catalog.new_permanent_action("G1", "Self-weight").unwrap();
        let err = catalog.new_thermal_action("G1", "Thermal", &[]).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut catalog = ActionCatalog::new();
        assert!(catalog.new_snow_action("  ", "Snow", &[]).is_err());
    }

    #[test]
    fn test_unknown_incompatible_rejected_without_side_effects() {
        let mut catalog = ActionCatalog::new();
        let err = catalog.new_thermal_action("T", "Thermal", &["Qviento"]).unwrap_err();
        assert!(matches!(err, CombError::Configuration { .. }));
        assert!(catalog.is_empty());
        assert!(catalog.graph().is_empty());
    }

    #[test]
    fn test_constructor_incompatibility_is_symmetric() {
        let mut catalog = ActionCatalog::new();
        let w = catalog.new_footbridge_wind_action("W", "Wind", &[]).unwrap();
        let t = catalog.new_thermal_action("T", "Thermal", &["W"]).unwrap();
        assert!(catalog.graph().is_excluded(w, t));
        assert!(catalog.graph().is_excluded(t, w));
    }

    #[test]
    fn test_permanent_cannot_be_excluded() {
        let mut catalog = ActionCatalog::new();
        catalog.new_permanent_action("G1", "Self-weight").unwrap();
        assert!(catalog.new_thermal_action("T", "Thermal", &["G1"]).is_err());
        let t = catalog.new_thermal_action("T", "Thermal", &[]).unwrap();
        assert!(catalog.relationships(t).unwrap().add_incompatible("G1").is_err());
    }

    #[test]
    fn test_permanent_factors_must_be_positive() {
        let mut catalog = ActionCatalog::new();
        let factors = ActionFactors::permanent(0.0, 1.35);
        assert!(catalog.new_permanent_action_with_factors("G", "Self-weight", factors).is_err());
        let factors = ActionFactors::permanent(0.9, 1.1);
        assert!(catalog.new_permanent_action_with_factors("G", "Self-weight", factors).is_ok());
    }

    #[test]
    fn test_generic_variable_uses_given_factors() {
        let mut catalog = ActionCatalog::new();
        let factors = ActionFactors::variable(1.5, 0.7, 0.5, 0.3);
        let q = catalog.new_variable_action("Q", "Imposed load", factors, &[]).unwrap();
        let action = catalog.get(q).unwrap();
        assert_eq!(action.family, ActionFamily::Generic);
        assert_eq!(action.factors, factors);
    }

    #[test]
    fn test_append_main() {
        let mut catalog = ActionCatalog::new();
        let q1 = catalog.new_footbridge_action("Q1", "Live", &[]).unwrap();
        let q2 = catalog.new_footbridge_action("Q2", "Live", &[]).unwrap();
        let mut rel = catalog.relationships(q2).unwrap();
        rel.append_main("Q1").unwrap();
        assert_eq!(rel.mains(), vec!["Q1"]);
        assert_eq!(catalog.graph().mains_of(q2), &[q1]);
    }

    #[test]
    fn test_append_unknown_main_fails() {
        let mut catalog = ActionCatalog::new();
        let q2 = catalog.new_footbridge_action("Q2", "Live", &[]).unwrap();
        let err = catalog.relationships(q2).unwrap().append_main("Q1").unwrap_err();
        assert!(err.to_string().contains("Q1"));
    }

    #[test]
    fn test_main_cycle_fails() {
        let mut catalog = ActionCatalog::new();
        let a = catalog.new_footbridge_action("A", "Live", &[]).unwrap();
        let b = catalog.new_footbridge_action("B", "Live", &[]).unwrap();
        catalog.relationships(b).unwrap().append_main("A").unwrap();
        assert!(catalog.relationships(a).unwrap().append_main("B").is_err());
        assert!(catalog.relationships(a).unwrap().append_main("A").is_err());
    }

    #[test]
    fn test_permanent_cannot_accompany() {
        let mut catalog = ActionCatalog::new();
        catalog.new_footbridge_action("Q", "Live", &[]).unwrap();
        let g = catalog.new_permanent_action("G", "Self-weight").unwrap();
        assert!(catalog.relationships(g).unwrap().append_main("Q").is_err());
    }

    #[test]
    fn test_frozen_catalog_rejects_mutation() {
        let mut catalog = ActionCatalog::new();
        let q = catalog.new_footbridge_action("Q", "Live", &[]).unwrap();
        catalog.freeze();
        let err = catalog.new_snow_action("S", "Snow", &[]).unwrap_err();
        assert_eq!(err.error_code(), "STATE_ERROR");
        assert!(catalog.relationships(q).is_err());
    }

    #[test]
    fn test_foreign_handle_rejected() {
        let mut catalog = ActionCatalog::new();
        assert!(catalog.relationships(ActionId(7)).is_err());
    }
}
