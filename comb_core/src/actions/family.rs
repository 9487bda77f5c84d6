//! Action families and their code factor tables
//!
//! Each family carries the partial safety factors (γ) and combination
//! factors (ψ0, ψ1, ψ2) mandated by the design code. Default values follow
//! the IAP-11 tables for footbridges, which share the Eurocode EN 1990
//! combination format.
//!
//! ## Factor Summary
//!
//! | Family          | γ ULS fav | γ ULS unfav | ψ0  | ψ1  | ψ2  |
//! |-----------------|-----------|-------------|-----|-----|-----|
//! | Self-weight     | 1.00      | 1.35        | -   | -   | -   |
//! | Footbridge live | 0.00      | 1.35        | 0.4 | 0.4 | 0.0 |
//! | Footbridge wind | 0.00      | 1.50        | 0.3 | 0.2 | 0.0 |
//! | Thermal         | 0.00      | 1.50        | 0.6 | 0.6 | 0.5 |
//! | Snow            | 0.00      | 1.50        | 0.8 | 0.0 | 0.0 |
//! | Seismic         | 0.00      | 1.00        | 0.0 | 0.0 | 0.0 |
//! | Generic         | 0.00      | 1.50        | 0.7 | 0.5 | 0.3 |

use serde::{Deserialize, Serialize};

/// Whether an action is always present or may be absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionCategory {
    /// Present with certainty throughout the structure's life
    Permanent,
    /// May or may not act, or varies in magnitude/position over time
    Variable,
}

/// Action families with code-mandated factor tables
///
/// # Example
/// ```
/// use comb_core::actions::{ActionCategory, ActionFamily};
///
/// let wind = ActionFamily::FootbridgeWind;
/// assert_eq!(wind.category(), ActionCategory::Variable);
/// assert_eq!(wind.default_factors().combination.psi_0, 0.3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionFamily {
    /// G - Self-weight and other permanent loads
    SelfWeight,
    /// Q - Pedestrian live load on footbridges
    FootbridgeLive,
    /// W - Wind on footbridges
    FootbridgeWind,
    /// T - Thermal actions
    Thermal,
    /// S - Snow
    Snow,
    /// AE - Seismic action
    Seismic,
    /// Variable action with caller-supplied factors
    Generic,
}

impl ActionFamily {
    /// All families in table order
    pub const ALL: [ActionFamily; 7] = [
        ActionFamily::SelfWeight,
        ActionFamily::FootbridgeLive,
        ActionFamily::FootbridgeWind,
        ActionFamily::Thermal,
        ActionFamily::Snow,
        ActionFamily::Seismic,
        ActionFamily::Generic,
    ];

    /// Permanent or variable
    pub fn category(&self) -> ActionCategory {
        match self {
            ActionFamily::SelfWeight => ActionCategory::Permanent,
            _ => ActionCategory::Variable,
        }
    }

    /// Short code used in reports
    pub fn code(&self) -> &'static str {
        match self {
            ActionFamily::SelfWeight => "G",
            ActionFamily::FootbridgeLive => "Q",
            ActionFamily::FootbridgeWind => "W",
            ActionFamily::Thermal => "T",
            ActionFamily::Snow => "S",
            ActionFamily::Seismic => "AE",
            ActionFamily::Generic => "Q*",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ActionFamily::SelfWeight => "Self-weight",
            ActionFamily::FootbridgeLive => "Footbridge live load",
            ActionFamily::FootbridgeWind => "Footbridge wind",
            ActionFamily::Thermal => "Thermal action",
            ActionFamily::Snow => "Snow load",
            ActionFamily::Seismic => "Seismic action",
            ActionFamily::Generic => "Generic variable action",
        }
    }

    /// Whether actions of this family lead the seismic situation
    pub fn is_seismic(&self) -> bool {
        matches!(self, ActionFamily::Seismic)
    }

    /// Code factor table for this family
    pub fn default_factors(&self) -> ActionFactors {
        match self {
            ActionFamily::SelfWeight => ActionFactors::permanent(1.0, 1.35),
            ActionFamily::FootbridgeLive => ActionFactors::variable(1.35, 0.4, 0.4, 0.0),
            ActionFamily::FootbridgeWind => ActionFactors::variable(1.5, 0.3, 0.2, 0.0),
            ActionFamily::Thermal => ActionFactors::variable(1.5, 0.6, 0.6, 0.5),
            ActionFamily::Snow => ActionFactors::variable(1.5, 0.8, 0.0, 0.0),
            ActionFamily::Seismic => ActionFactors::variable(1.0, 0.0, 0.0, 0.0),
            ActionFamily::Generic => ActionFactors::variable(1.5, 0.7, 0.5, 0.3),
        }
    }
}

impl std::fmt::Display for ActionFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Partial safety factors γ for favourable/unfavourable effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartialSafetyFactors {
    pub uls_favourable: f64,
    pub uls_unfavourable: f64,
    pub sls_favourable: f64,
    pub sls_unfavourable: f64,
}

/// Combination factors ψ
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinationFactors {
    /// ψ0 - combination value
    pub psi_0: f64,
    /// ψ1 - frequent value
    pub psi_1: f64,
    /// ψ2 - quasi-permanent value
    pub psi_2: f64,
}

/// Complete factor set carried by an action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionFactors {
    pub safety: PartialSafetyFactors,
    pub combination: CombinationFactors,
}

impl ActionFactors {
    /// Factors for a permanent action. SLS factors are 1.0 and ψ does not apply.
    pub fn permanent(uls_favourable: f64, uls_unfavourable: f64) -> Self {
        ActionFactors {
            safety: PartialSafetyFactors {
                uls_favourable,
                uls_unfavourable,
                sls_favourable: 1.0,
                sls_unfavourable: 1.0,
            },
            combination: CombinationFactors {
                psi_0: 1.0,
                psi_1: 1.0,
                psi_2: 1.0,
            },
        }
    }

    /// Factors for a variable action. A favourable variable action is left
    /// out of the combination, hence the zero favourable γ.
    pub fn variable(gamma_q: f64, psi_0: f64, psi_1: f64, psi_2: f64) -> Self {
        ActionFactors {
            safety: PartialSafetyFactors {
                uls_favourable: 0.0,
                uls_unfavourable: gamma_q,
                sls_favourable: 0.0,
                sls_unfavourable: 1.0,
            },
            combination: CombinationFactors { psi_0, psi_1, psi_2 },
        }
    }

    /// Check that every factor is finite and non-negative.
    ///
    /// Returns the name of the first offending factor.
    pub fn invalid_factor(&self) -> Option<&'static str> {
        let s = &self.safety;
        let c = &self.combination;
        [
            ("uls_favourable", s.uls_favourable),
            ("uls_unfavourable", s.uls_unfavourable),
            ("sls_favourable", s.sls_favourable),
            ("sls_unfavourable", s.sls_unfavourable),
            ("psi_0", c.psi_0),
            ("psi_1", c.psi_1),
            ("psi_2", c.psi_2),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite() || *v < 0.0)
        .map(|(name, _)| name)
    }
}
