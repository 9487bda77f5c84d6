//! # comb_core - Load Combination Generator
//!
//! `comb_core` builds the load combinations a structural design code requires
//! from a catalogue of actions. Each action carries the code's partial safety
//! factors (γ) and combination factors (ψ); relationships between actions
//! (main/accompanying, incompatible) restrict which actions may appear
//! together. The result is one set of combinations per limit state, each a
//! vector of coefficients to apply to the actions' characteristic values.
//!
//! ## Design Philosophy
//!
//! - **Validated at the door**: malformed catalogues fail when the action or
//!   relationship is declared, not during generation
//! - **JSON-First**: catalogues, snapshots and fixtures implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use comb_core::CombinationGenerator;
//!
//! let mut generator = CombinationGenerator::new();
//! let catalog = generator.catalog_mut();
//! catalog.new_permanent_action("G1", "Self-weight").unwrap();
//! catalog.new_footbridge_action("Q1", "Pedestrian load", &[]).unwrap();
//! catalog.new_footbridge_wind_action("Qviento", "Wind", &[]).unwrap();
//! catalog.new_thermal_action("Qtemp", "Thermal", &["Qviento"]).unwrap();
//!
//! generator.compute_combinations();
//!
//! let uls = generator.uls_transient_combinations().unwrap();
//! for combination in uls {
//!     assert!(!(combination.contains("Qviento") && combination.contains("Qtemp")));
//! }
//! let rows = uls.coefficients(&["G1", "Q1", "Qviento", "Qtemp"]).unwrap();
//! assert_eq!(rows.len(), uls.len());
//! ```
//!
//! ## Modules
//!
//! - [`actions`] - Action catalogue, families and factor tables
//! - [`relationships`] - Main-of and exclusion graphs
//! - [`coefficients`] - Limit states and the coefficient policy
//! - [`combinations`] - Generated combinations, the enumerator and the generator
//! - [`effects`] - Applying combinations to nominal load effects
//! - [`document`] - Serializable catalogue documents
//! - [`file_io`] - Atomic saves and versioned loads
//! - [`verification`] - Reference matrices and RMS comparison
//! - [`errors`] - Structured error types

pub mod actions;
pub mod coefficients;
pub mod combinations;
pub mod document;
pub mod effects;
pub mod errors;
pub mod file_io;
pub mod relationships;
pub mod verification;

// Re-export commonly used types at crate root for convenience
pub use actions::{ActionCatalog, ActionFamily, ActionId};
pub use coefficients::LimitState;
pub use combinations::{Combination, CombinationGenerator, CombinationSet, GeneratorSettings, PermanentEnvelope};
pub use document::CatalogDocument;
pub use errors::{CombError, CombResult};
pub use file_io::{load_document, save_document};
