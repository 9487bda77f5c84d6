//! # Verification Against Reference Matrices
//!
//! A [`ReferenceFixture`] stores expected coefficient matrices per limit
//! state, aligned to a fixed list of action names. Computed sets are compared
//! row by row with a root-mean-square difference, so hand-computed or
//! externally produced tables can be checked within a tolerance.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::coefficients::LimitState;
use crate::combinations::CombinationGenerator;
use crate::errors::{CombError, CombResult};
use crate::file_io::{read_json, write_json_atomic};

/// Expected coefficient matrix of one limit state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceMatrix {
    pub limit_state: LimitState,
    /// One row per combination, one column per fixture action name
    pub coefficients: Vec<Vec<f64>>,
}

/// Reference coefficient matrices for a catalogue
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReferenceFixture {
    #[serde(default)]
    pub description: String,
    /// Column order of every matrix
    pub action_names: Vec<String>,
    pub matrices: Vec<ReferenceMatrix>,
}

/// Root-mean-square difference of two matrices of identical shape.
///
/// Two empty matrices differ by 0.0.
///
/// # Example
/// ```
/// use comb_core::verification::rms_difference;
///
/// let computed = vec![vec![1.35, 1.5], vec![1.0, 1.5]];
/// let reference = vec![vec![1.35, 1.5], vec![1.0, 1.1]];
/// let rms = rms_difference(&computed, &reference).unwrap();
/// assert!((rms - 0.2).abs() < 1e-12);
/// ```
pub fn rms_difference(computed: &[Vec<f64>], reference: &[Vec<f64>]) -> CombResult<f64> {
    if computed.len() != reference.len() {
        return Err(CombError::invalid_input(
            "rows",
            format!("{} vs {}", computed.len(), reference.len()),
            "Matrices must have the same number of rows",
        ));
    }

    let mut sum = 0.0;
    let mut count = 0usize;
    for (i, (a, b)) in computed.iter().zip(reference).enumerate() {
        if a.len() != b.len() {
            return Err(CombError::invalid_input(
                format!("row {}", i),
                format!("{} vs {}", a.len(), b.len()),
                "Rows must have the same number of columns",
            ));
        }
        sum += a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>();
        count += a.len();
    }

    if count == 0 {
        return Ok(0.0);
    }
    Ok((sum / count as f64).sqrt())
}

impl ReferenceFixture {
    /// Capture the current snapshot of `generator` as a fixture over the
    /// whole catalogue.
    pub fn from_generator(generator: &CombinationGenerator, description: impl Into<String>) -> CombResult<Self> {
        let snapshot = generator.snapshot()?;
        let action_names = generator.catalog().names();
        let matrices = snapshot
            .sets
            .iter()
            .map(|set| ReferenceMatrix {
                limit_state: set.limit_state(),
                coefficients: set.coefficient_matrix(),
            })
            .collect();
        Ok(ReferenceFixture {
            description: description.into(),
            action_names,
            matrices,
        })
    }

    pub fn load(path: &Path) -> CombResult<Self> {
        read_json(path)
    }

    pub fn save(&self, path: &Path) -> CombResult<()> {
        write_json_atomic(self, path)
    }

    pub fn matrix(&self, limit_state: LimitState) -> Option<&ReferenceMatrix> {
        self.matrices.iter().find(|m| m.limit_state == limit_state)
    }

    /// RMS difference per limit state present in the fixture.
    ///
    /// Fails if the generator has not computed yet, if a fixture action is
    /// not registered, or if a matrix shape differs.
    pub fn compare(&self, generator: &CombinationGenerator) -> CombResult<Vec<(LimitState, f64)>> {
        self.matrices
            .iter()
            .map(|reference| {
                let computed = generator
                    .combinations(reference.limit_state)?
                    .coefficients(&self.action_names)?;
                let rms = rms_difference(&computed, &reference.coefficients)?;
                log::debug!("{}: rms difference {:.3e}", reference.limit_state, rms);
                Ok((reference.limit_state, rms))
            })
            .collect()
    }
}
