//! # Catalogue Documents
//!
//! `CatalogDocument` is the serializable form of an action catalogue. Documents
//! are saved as human-readable JSON (see [`crate::file_io`]).
//!
//! ## Structure
//!
//! ```text
//! CatalogDocument
//! ├── meta: DocumentMetadata (schema version, engineer, job id, timestamps)
//! ├── settings: GeneratorSettings (code label, permanent envelope)
//! └── actions: Vec<ActionDefinition> (registration order)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use comb_core::actions::ActionFamily;
//! use comb_core::document::{ActionDefinition, CatalogDocument};
//!
//! let mut document = CatalogDocument::new("Jane Engineer", "26-017");
//! document.push(ActionDefinition::new("G", ActionFamily::SelfWeight));
//! document.push(ActionDefinition::new("W", ActionFamily::FootbridgeWind));
//! document.push(ActionDefinition::new("T", ActionFamily::Thermal).incompatible_with("W"));
//!
//! let json = serde_json::to_string_pretty(&document).unwrap();
//! let parsed: CatalogDocument = serde_json::from_str(&json).unwrap();
//!
//! let mut generator = parsed.build_generator().unwrap();
//! generator.compute_combinations();
//! assert_eq!(generator.uls_transient_combinations().unwrap().len(), 4);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::actions::{ActionCatalog, ActionFactors, ActionFamily, ActionId};
use crate::combinations::{CombinationGenerator, GeneratorSettings};
use crate::errors::CombResult;

/// Current schema version for catalogue documents
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root document container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub meta: DocumentMetadata,
    #[serde(default)]
    pub settings: GeneratorSettings,
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
}

/// Document header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,
    #[serde(default)]
    pub engineer: String,
    #[serde(default)]
    pub job_id: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// One action as stored in a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub family: ActionFamily,
    /// Overrides the family factor table when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factors: Option<ActionFactors>,
    /// Main actions this action accompanies
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mains: Vec<String>,
    /// Actions this one is incompatible with (symmetric, listing one side is enough)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub incompatible: Vec<String>,
}

impl ActionDefinition {
    pub fn new(name: impl Into<String>, family: ActionFamily) -> Self {
        ActionDefinition {
            name: name.into(),
            description: family.description().to_string(),
            family,
            factors: None,
            mains: Vec::new(),
            incompatible: Vec::new(),
        }
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_factors(mut self, factors: ActionFactors) -> Self {
        self.factors = Some(factors);
        self
    }

    pub fn with_main(mut self, main: impl Into<String>) -> Self {
        self.mains.push(main.into());
        self
    }

    pub fn incompatible_with(mut self, other: impl Into<String>) -> Self {
        self.incompatible.push(other.into());
        self
    }
}

impl CatalogDocument {
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>) -> Self {
        let now = Utc::now();
        CatalogDocument {
            meta: DocumentMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                created: now,
                modified: now,
            },
            settings: GeneratorSettings::default(),
            actions: Vec::new(),
        }
    }

    /// Append an action definition
    pub fn push(&mut self, action: ActionDefinition) {
        self.actions.push(action);
        self.touch();
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Describe an existing catalogue. Each incompatibility is listed once,
    /// on the later of the two actions.
    pub fn from_catalog(catalog: &ActionCatalog, settings: GeneratorSettings) -> Self {
        let graph = catalog.graph();
        let name_of = |id: &ActionId| {
            catalog.get(*id).map(|a| a.name.clone()).unwrap_or_default()
        };

        let actions = catalog
            .iter()
            .map(|action| ActionDefinition {
                name: action.name.clone(),
                description: action.description.clone(),
                family: action.family,
                factors: (action.factors != action.family.default_factors()).then_some(action.factors),
                mains: graph.mains_of(action.id).iter().map(name_of).collect(),
                incompatible: graph
                    .exclusions_of(action.id)
                    .iter()
                    .filter(|other| **other < action.id)
                    .map(name_of)
                    .collect(),
            })
            .collect();

        CatalogDocument {
            settings,
            actions,
            ..CatalogDocument::new("", "")
        }
    }

    /// Register every action, then apply incompatibilities and mains.
    ///
    /// Fails on the first invalid definition with the same configuration
    /// error the catalogue API gives.
    pub fn build_generator(&self) -> CombResult<CombinationGenerator> {
        let mut catalog = ActionCatalog::new();
        for action in &self.actions {
            catalog.add_action(&action.name, &action.description, action.family, action.factors, &[])?;
        }
        for action in &self.actions {
            let mut relationships = catalog.relationships_by_name(&action.name)?;
            for other in &action.incompatible {
                relationships.add_incompatible(other)?;
            }
            for main in &action.mains {
                relationships.append_main(main)?;
            }
        }
        log::debug!(
            "built catalogue '{}' with {} actions",
            self.meta.job_id,
            catalog.len()
        );
        Ok(CombinationGenerator::from_catalog(catalog, self.settings.clone()))
    }
}

impl Default for CatalogDocument {
    fn default() -> Self {
        CatalogDocument::new("", "")
    }
}

/// Footbridge demonstration catalogue: two permanent actions, two live load
/// spans (the second accompanying the first), wind, two mutually exclusive
/// thermal actions incompatible with wind, snow and an earthquake.
pub fn footbridge_example() -> CatalogDocument {
    let mut document = CatalogDocument::new("", "footbridge");
    let actions = [
        ActionDefinition::new("G1", ActionFamily::SelfWeight).described("Self-weight of the deck"),
        ActionDefinition::new("G2", ActionFamily::SelfWeight).described("Dead load (pavement, railings)"),
        ActionDefinition::new("Q1", ActionFamily::FootbridgeLive).described("Pedestrian load, span 1"),
        ActionDefinition::new("Q2", ActionFamily::FootbridgeLive)
            .described("Pedestrian load, span 2")
            .with_main("Q1"),
        ActionDefinition::new("Qviento", ActionFamily::FootbridgeWind).described("Transverse wind"),
        ActionDefinition::new("Qtemp1", ActionFamily::Thermal)
            .described("Uniform temperature, expansion")
            .incompatible_with("Qviento"),
        ActionDefinition::new("Qtemp2", ActionFamily::Thermal)
            .described("Uniform temperature, contraction")
            .incompatible_with("Qviento")
            .incompatible_with("Qtemp1"),
        ActionDefinition::new("Qnieve", ActionFamily::Snow).described("Snow on the deck"),
        ActionDefinition::new("Asismo", ActionFamily::Seismic).described("Design earthquake"),
    ];
    for action in actions {
        document.push(action);
    }
    document
}
