//! # Coefficient Policy
//!
//! Maps (action, limit state, role) to the numeric coefficient applied to the
//! action's characteristic value, following the EN 1990 / IAP-11 format:
//!
//! ```text
//! ULS persistent:     Σ γG·G + γQ,1·Q1 + Σ γQ,i·ψ0,i·Qi
//! ULS seismic:        Σ G + AE + Σ ψ2,i·Qi
//! SLS characteristic: Σ G + Q1 + Σ ψ0,i·Qi
//! SLS frequent:       Σ G + ψ1,1·Q1 + Σ ψ2,i·Qi
//! SLS quasi-perm.:    Σ G + Σ ψ2,i·Qi
//! ```
//!
//! The SLS γ applies to permanent actions only. Variable actions enter the
//! SLS combinations at their representative values (1.0, ψ0, ψ1 or ψ2).

use serde::{Deserialize, Serialize};

use crate::actions::Action;

/// Limit-state categories for which combinations are generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LimitState {
    /// ULS persistent and transient design situations
    UlsPersistent,
    /// ULS seismic design situation
    UlsSeismic,
    /// SLS characteristic (rare) combination
    SlsCharacteristic,
    /// SLS frequent combination
    SlsFrequent,
    /// SLS quasi-permanent combination
    SlsQuasiPermanent,
}

impl LimitState {
    /// All limit states in report order
    pub const ALL: [LimitState; 5] = [
        LimitState::UlsPersistent,
        LimitState::UlsSeismic,
        LimitState::SlsCharacteristic,
        LimitState::SlsFrequent,
        LimitState::SlsQuasiPermanent,
    ];

    /// Short code (e.g., "ULS-P")
    pub fn code(&self) -> &'static str {
        match self {
            LimitState::UlsPersistent => "ULS-P",
            LimitState::UlsSeismic => "ULS-E",
            LimitState::SlsCharacteristic => "SLS-C",
            LimitState::SlsFrequent => "SLS-F",
            LimitState::SlsQuasiPermanent => "SLS-QP",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            LimitState::UlsPersistent => "ULS persistent/transient",
            LimitState::UlsSeismic => "ULS seismic",
            LimitState::SlsCharacteristic => "SLS characteristic",
            LimitState::SlsFrequent => "SLS frequent",
            LimitState::SlsQuasiPermanent => "SLS quasi-permanent",
        }
    }

    pub fn is_ultimate(&self) -> bool {
        matches!(self, LimitState::UlsPersistent | LimitState::UlsSeismic)
    }

    /// Whether the combination has a single leading variable action
    pub fn has_leading_action(&self) -> bool {
        !matches!(self, LimitState::SlsQuasiPermanent)
    }
}

impl std::fmt::Display for LimitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Role an action plays in one combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    PermanentFavourable,
    PermanentUnfavourable,
    /// The variable action taken at its representative value
    Leading,
    /// A variable action at its combination value
    Accompanying,
    /// Every variable action at its quasi-permanent value (no leading split)
    QuasiPermanentAll,
}

/// Coefficient applied to `action` in `limit_state` when it plays `role`.
///
/// # Example
/// ```
/// use comb_core::actions::ActionCatalog;
/// use comb_core::coefficients::{coefficient, LimitState, Role};
///
/// let mut catalog = ActionCatalog::new();
/// let w = catalog.new_footbridge_wind_action("W", "Wind", &[]).unwrap();
/// let wind = catalog.get(w).unwrap();
///
/// assert_eq!(coefficient(wind, LimitState::UlsPersistent, Role::Leading), 1.5);
/// assert!((coefficient(wind, LimitState::UlsPersistent, Role::Accompanying) - 0.45).abs() < 1e-12);
/// assert_eq!(coefficient(wind, LimitState::SlsCharacteristic, Role::Leading), 1.0);
/// ```
pub fn coefficient(action: &Action, limit_state: LimitState, role: Role) -> f64 {
    let gamma = &action.factors.safety;
    let psi = &action.factors.combination;

    match (limit_state, role) {
        // Permanent actions enter the seismic situation unfactored.
        (LimitState::UlsSeismic, Role::PermanentFavourable | Role::PermanentUnfavourable) => 1.0,
        (LimitState::UlsSeismic, Role::Leading) => gamma.uls_unfavourable,
        (LimitState::UlsSeismic, Role::Accompanying | Role::QuasiPermanentAll) => psi.psi_2,

        (LimitState::UlsPersistent, Role::PermanentFavourable) => gamma.uls_favourable,
        (LimitState::UlsPersistent, Role::PermanentUnfavourable) => gamma.uls_unfavourable,
        (LimitState::UlsPersistent, Role::Leading) => gamma.uls_unfavourable,
        (LimitState::UlsPersistent, Role::Accompanying) => gamma.uls_unfavourable * psi.psi_0,
        (LimitState::UlsPersistent, Role::QuasiPermanentAll) => gamma.uls_unfavourable * psi.psi_2,

        (_, Role::PermanentFavourable) => gamma.sls_favourable,
        (_, Role::PermanentUnfavourable) => gamma.sls_unfavourable,

        (LimitState::SlsCharacteristic, Role::Leading) => 1.0,
        (LimitState::SlsCharacteristic, Role::Accompanying) => psi.psi_0,
        (LimitState::SlsFrequent, Role::Leading) => psi.psi_1,
        (LimitState::SlsFrequent, Role::Accompanying) => psi.psi_2,
        (_, _) => psi.psi_2,
    }
}
