//! # Combination Enumerator
//!
//! Generates the combinations of every limit state as an explicit pipeline:
//!
//! ```text
//! partition ─► sign variants ─► candidate selections ─► compatibility filter
//!                                                           │
//!            dedup by signature ◄── coefficient assignment ◄┘
//! ```
//!
//! - **Partition**: permanent (P), non-seismic variable (V) and seismic (S)
//!   actions. Actions whose relationships contradict each other are left out
//!   here, with a consistency diagnostic.
//! - **Sign variants**: favourable/unfavourable assignments of P, either the
//!   full power set or the two extremes.
//! - **Candidate selections**: for each leading action L, every maximal set
//!   of accompanying actions A such that P ∪ {L} ∪ A is compatible. Maximal
//!   sets are the maximal cliques of the compatibility graph (Bron–Kerbosch
//!   with pivoting), pruned until every member's mains are present.
//! - **Coefficient assignment**: roles per limit state, zero coefficients
//!   dropped, orphaned accompanying actions pruned.
//! - **Dedup**: identical coefficient vectors collapse to the first one.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use super::generator::{GeneratorSettings, PermanentEnvelope};
use super::{Combination, CombinationSet, CombinationTerm};
use crate::actions::{ActionCatalog, ActionId};
use crate::coefficients::{coefficient, LimitState, Role};
use crate::errors::CombError;
use crate::relationships::{Contradiction, RelationshipGraph};

/// Hard cap on the power-set envelope, whatever the settings say
pub const MAX_POWER_SET_PERMANENTS: usize = 20;

/// Actions split by how they enter the combinations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub permanent: Vec<ActionId>,
    /// Non-seismic variable actions
    pub variable: Vec<ActionId>,
    pub seismic: Vec<ActionId>,
    /// Actions that can never be selected
    pub excluded: BTreeSet<ActionId>,
}

/// Favourable/unfavourable role of each permanent action
pub type SignVariant = Vec<(ActionId, Role)>;

/// Leading action plus accompanying set, before coefficients are applied
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Selection {
    pub leading: Option<ActionId>,
    pub accompanying: BTreeSet<ActionId>,
}

/// Output of one enumeration run
#[derive(Debug, Clone)]
pub struct Enumeration {
    /// One set per limit state, in [`LimitState::ALL`] order
    pub sets: Vec<CombinationSet>,
    pub diagnostics: Vec<CombError>,
}

/// Split the catalogue and drop contradictory actions.
pub fn partition(catalog: &ActionCatalog, diagnostics: &mut Vec<CombError>) -> Partition {
    let mut excluded = BTreeSet::new();

    for (id, reason) in catalog.graph().contradictions() {
        let name = action_name(catalog, id);
        let reason = match reason {
            Contradiction::IncompatibleWithMain(main) => {
                format!("Incompatible with its main action '{}'", action_name(catalog, main))
            }
            Contradiction::MainsIncompatible(a, b) => format!(
                "Main actions '{}' and '{}' are incompatible",
                action_name(catalog, a),
                action_name(catalog, b)
            ),
            Contradiction::DependsOnContradictory(main) => {
                format!("Depends on contradictory action '{}'", action_name(catalog, main))
            }
        };
        log::warn!("excluding action '{}' from all combinations: {}", name, reason);
        diagnostics.push(CombError::consistency(name, reason));
        excluded.insert(id);
    }

    let mut partition = Partition {
        excluded,
        ..Partition::default()
    };
    for action in catalog.iter().filter(|a| !partition.excluded.contains(&a.id)) {
        if action.is_permanent() {
            partition.permanent.push(action.id);
        } else if action.is_seismic() {
            partition.seismic.push(action.id);
        } else {
            partition.variable.push(action.id);
        }
    }
    partition
}

/// Favourable/unfavourable assignments of the permanent actions.
///
/// The all-unfavourable variant always comes first. With no permanent
/// actions there is a single empty variant. Above
/// [`MAX_POWER_SET_PERMANENTS`] the power set falls back to the extremes.
pub fn sign_variants(permanent: &[ActionId], envelope: PermanentEnvelope) -> Vec<SignVariant> {
    let assign = |favourable: &dyn Fn(usize) -> bool| -> SignVariant {
        permanent
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let role = if favourable(i) {
                    Role::PermanentFavourable
                } else {
                    Role::PermanentUnfavourable
                };
                (*id, role)
            })
            .collect()
    };

    match envelope {
        _ if permanent.is_empty() => vec![Vec::new()],
        _ if permanent.len() > MAX_POWER_SET_PERMANENTS => {
            vec![assign(&|_: usize| false), assign(&|_: usize| true)]
        }
        PermanentEnvelope::Extremes => vec![assign(&|_: usize| false), assign(&|_: usize| true)],
        PermanentEnvelope::PowerSet => (0u64..(1u64 << permanent.len()))
            .map(|mask| assign(&|i: usize| mask & (1u64 << i) != 0))
            .collect(),
    }
}

/// Every maximal set `A ⊆ pool` such that `fixed ∪ A` is compatible.
///
/// `fixed` holds the actions already in the combination (permanent actions,
/// the leading action and its mains). Results are sorted.
pub fn maximal_compatible_sets(
    graph: &RelationshipGraph,
    fixed: &BTreeSet<ActionId>,
    pool: &[ActionId],
) -> Vec<BTreeSet<ActionId>> {
    let candidates: BTreeSet<ActionId> = pool
        .iter()
        .copied()
        .filter(|id| !fixed.contains(id) && graph.exclusions_of(*id).is_disjoint(fixed))
        .collect();

    let mut cliques = Vec::new();
    bron_kerbosch(graph, &mut Vec::new(), candidates, BTreeSet::new(), &mut cliques);

    let mut sets: Vec<BTreeSet<ActionId>> = cliques
        .into_iter()
        .map(|clique| prune_orphans(graph, fixed, clique))
        .collect();
    sets.sort();
    sets.dedup();

    // Pruning can make one set a subset of another; keep only maximal ones.
    sets.iter()
        .filter(|s| !sets.iter().any(|other| other.len() > s.len() && s.is_subset(other)))
        .cloned()
        .collect()
}

/// Maximal cliques of the compatibility graph restricted to `p`.
fn bron_kerbosch(
    graph: &RelationshipGraph,
    r: &mut Vec<ActionId>,
    mut p: BTreeSet<ActionId>,
    mut x: BTreeSet<ActionId>,
    out: &mut Vec<BTreeSet<ActionId>>,
) {
    if p.is_empty() && x.is_empty() {
        out.push(r.iter().copied().collect());
        return;
    }
    let compatible = |a: ActionId, b: ActionId| a != b && !graph.is_excluded(a, b);

    let pivot = p
        .union(&x)
        .copied()
        .max_by_key(|u| p.iter().filter(|v| compatible(*u, **v)).count());
    let branch: Vec<ActionId> = p
        .iter()
        .copied()
        .filter(|v| pivot.map_or(true, |u| !compatible(u, *v)))
        .collect();

    for v in branch {
        let next_p = p.iter().copied().filter(|w| compatible(v, *w)).collect();
        let next_x = x.iter().copied().filter(|w| compatible(v, *w)).collect();
        r.push(v);
        bron_kerbosch(graph, r, next_p, next_x, out);
        r.pop();
        p.remove(&v);
        x.insert(v);
    }
}

/// Drop members whose mains are neither fixed nor in the set, to a fixpoint.
fn prune_orphans(graph: &RelationshipGraph, fixed: &BTreeSet<ActionId>, mut set: BTreeSet<ActionId>) -> BTreeSet<ActionId> {
    loop {
        let orphan = set
            .iter()
            .copied()
            .find(|id| graph.mains_of(*id).iter().any(|m| !fixed.contains(m) && !set.contains(m)));
        match orphan {
            Some(id) => {
                set.remove(&id);
            }
            None => return set,
        }
    }
}

/// Leading/accompanying selections for one limit state.
///
/// `leaders` are the actions allowed to lead (`None` for the quasi-permanent
/// rule, where every compatible variable action is included together);
/// `pool` holds the actions that may accompany.
pub fn candidate_selections(
    graph: &RelationshipGraph,
    permanent: &[ActionId],
    leaders: Option<&[ActionId]>,
    pool: &[ActionId],
) -> Vec<Selection> {
    let base: BTreeSet<ActionId> = permanent.iter().copied().collect();

    let Some(leaders) = leaders else {
        return maximal_compatible_sets(graph, &base, pool)
            .into_iter()
            .map(|accompanying| Selection {
                leading: None,
                accompanying,
            })
            .collect();
    };

    let mut selections = Vec::new();
    for &leading in leaders {
        // The leading action drags its (transitive) mains in as accompanying.
        let required: BTreeSet<ActionId> = graph
            .main_closure(leading)
            .into_iter()
            .filter(|m| !base.contains(m))
            .collect();
        if !required.iter().all(|m| pool.contains(m)) {
            log::debug!("action #{} cannot lead: a main action is not available", leading.0);
            continue;
        }

        let mut fixed = base.clone();
        fixed.insert(leading);
        fixed.extend(required.iter().copied());
        if !graph.is_compatible(&fixed) {
            continue;
        }

        for extra in maximal_compatible_sets(graph, &fixed, pool) {
            let mut accompanying = required.clone();
            accompanying.extend(extra);
            selections.push(Selection {
                leading: Some(leading),
                accompanying,
            });
        }
    }
    selections
}

/// Compatibility filter: permanent actions, leading and accompanying
/// actions must form a compatible set.
pub fn is_admissible(graph: &RelationshipGraph, permanent: &[ActionId], selection: &Selection) -> bool {
    let mut present: BTreeSet<ActionId> = permanent.iter().copied().collect();
    present.extend(selection.leading);
    present.extend(selection.accompanying.iter().copied());
    graph.is_compatible(&present)
}

/// Apply the coefficient policy to one selection.
///
/// Zero coefficients are dropped; an accompanying action whose main ended up
/// with a zero coefficient is dropped as well.
pub fn assign_coefficients(
    catalog: &ActionCatalog,
    limit_state: LimitState,
    signs: &SignVariant,
    selection: &Selection,
) -> Combination {
    let variable_role = match limit_state {
        LimitState::UlsSeismic | LimitState::SlsQuasiPermanent => Role::QuasiPermanentAll,
        _ => Role::Accompanying,
    };

    let roles = signs
        .iter()
        .copied()
        .chain(selection.leading.map(|id| (id, Role::Leading)))
        .chain(selection.accompanying.iter().map(|id| (*id, variable_role)));

    let mut terms: Vec<CombinationTerm> = roles
        .filter_map(|(id, role)| {
            let action = catalog.get(id)?;
            let value = coefficient(action, limit_state, role);
            (value != 0.0).then(|| CombinationTerm {
                action: id,
                name: action.name.clone(),
                role,
                coefficient: value,
            })
        })
        .collect();

    let graph = catalog.graph();
    loop {
        let present: BTreeSet<ActionId> = terms.iter().map(|t| t.action).collect();
        let orphan = terms
            .iter()
            .position(|t| graph.mains_of(t.action).iter().any(|m| !present.contains(m)));
        match orphan {
            Some(index) => {
                let dropped = terms.remove(index);
                log::debug!(
                    "{}: dropping '{}' because a main action has a zero coefficient",
                    limit_state,
                    dropped.name
                );
            }
            None => break,
        }
    }

    Combination::new(limit_state, selection.leading, terms)
}

/// Keep the first combination of each distinct coefficient vector.
pub fn dedup_by_signature(combinations: Vec<Combination>, action_count: usize) -> Vec<Combination> {
    let mut seen = HashSet::new();
    combinations
        .into_iter()
        .filter(|c| seen.insert(c.signature(action_count)))
        .collect()
}

/// Run the full pipeline for every limit state.
pub fn enumerate(catalog: &ActionCatalog, settings: &GeneratorSettings) -> Enumeration {
    let mut diagnostics = Vec::new();
    let partition = partition(catalog, &mut diagnostics);

    let limit = settings.max_power_set_permanents.min(MAX_POWER_SET_PERMANENTS);
    let mut envelope = settings.permanent_envelope;
    if envelope == PermanentEnvelope::PowerSet && partition.permanent.len() > limit {
        let reason = format!(
            "{} permanent actions exceed the power-set limit of {}; using the extreme sign variants",
            partition.permanent.len(),
            limit
        );
        log::warn!("{}", reason);
        diagnostics.push(CombError::consistency("permanent actions", reason));
        envelope = PermanentEnvelope::Extremes;
    }

    let sets = LimitState::ALL
        .iter()
        .map(|&limit_state| {
            let combinations = enumerate_limit_state(catalog, &partition, envelope, limit_state);
            log::debug!("{}: {} combinations", limit_state, combinations.len());
            CombinationSet::new(limit_state, catalog.names(), combinations)
        })
        .collect();

    Enumeration { sets, diagnostics }
}

fn enumerate_limit_state(
    catalog: &ActionCatalog,
    partition: &Partition,
    envelope: PermanentEnvelope,
    limit_state: LimitState,
) -> Vec<Combination> {
    let graph = catalog.graph();
    let permanent = partition.permanent.as_slice();

    let variants = match limit_state {
        // Permanent actions enter the seismic situation at 1.0 either way.
        LimitState::UlsSeismic => sign_variants(permanent, PermanentEnvelope::Extremes)
            .into_iter()
            .take(1)
            .collect(),
        _ => sign_variants(permanent, envelope),
    };

    let leaders = match limit_state {
        LimitState::UlsSeismic => Some(partition.seismic.as_slice()),
        LimitState::SlsQuasiPermanent => None,
        _ => Some(partition.variable.as_slice()),
    };

    let mut selections = candidate_selections(graph, permanent, leaders, &partition.variable);
    if selections.is_empty() && limit_state != LimitState::UlsSeismic {
        // Nothing can lead: the permanent actions alone.
        selections.push(Selection {
            leading: None,
            accompanying: BTreeSet::new(),
        });
    }

    let mut combinations = Vec::new();
    for signs in &variants {
        for selection in &selections {
            if !is_admissible(graph, permanent, selection) {
                log::warn!("{}: skipping incompatible selection {:?}", limit_state, selection);
                continue;
            }
            combinations.push(assign_coefficients(catalog, limit_state, signs, selection));
        }
    }
    dedup_by_signature(combinations, catalog.len())
}

fn action_name(catalog: &ActionCatalog, id: ActionId) -> String {
    catalog
        .get(id)
        .map(|a| a.name.clone())
        .unwrap_or_else(|| format!("#{}", id.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionFactors;

    fn ids(raw: &[usize]) -> BTreeSet<ActionId> {
        raw.iter().map(|i| ActionId(*i)).collect()
    }

    /// G1, G2 permanent; Q1; Q2 (main Q1); W; T1 (⊥ W); T2 (⊥ W, T1); S; E seismic
    fn footbridge() -> ActionCatalog {
        let mut catalog = ActionCatalog::new();
        catalog.new_permanent_action("G1", "Self-weight").unwrap();
        catalog.new_permanent_action("G2", "Dead load").unwrap();
        catalog.new_footbridge_action("Q1", "Live, span 1", &[]).unwrap();
        let q2 = catalog.new_footbridge_action("Q2", "Live, span 2", &[]).unwrap();
        catalog.relationships(q2).unwrap().append_main("Q1").unwrap();
        catalog.new_footbridge_wind_action("W", "Wind", &[]).unwrap();
        catalog.new_thermal_action("T1", "Thermal", &["W"]).unwrap();
        catalog.new_thermal_action("T2", "Thermal", &["W", "T1"]).unwrap();
        catalog.new_snow_action("S", "Snow", &[]).unwrap();
        catalog.new_seismic_action("E", "Seismic", &[]).unwrap();
        catalog
    }

    #[test]
    fn test_partition() {
        let catalog = footbridge();
        let mut diagnostics = Vec::new();
        let p = partition(&catalog, &mut diagnostics);
        assert_eq!(p.permanent, vec![ActionId(0), ActionId(1)]);
        assert_eq!(p.variable.len(), 6);
        assert_eq!(p.seismic, vec![ActionId(8)]);
        assert!(p.excluded.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_sign_variants_power_set() {
        let perms = [ActionId(0), ActionId(1)];
        let variants = sign_variants(&perms, PermanentEnvelope::PowerSet);
        assert_eq!(variants.len(), 4);
        assert_eq!(
            variants[0],
            vec![(ActionId(0), Role::PermanentUnfavourable), (ActionId(1), Role::PermanentUnfavourable)]
        );
        assert_eq!(
            variants[1],
            vec![(ActionId(0), Role::PermanentFavourable), (ActionId(1), Role::PermanentUnfavourable)]
        );
    }

    #[test]
    fn test_sign_variants_extremes() {
        let perms = [ActionId(0), ActionId(1), ActionId(2)];
        let variants = sign_variants(&perms, PermanentEnvelope::Extremes);
        assert_eq!(variants.len(), 2);
        assert!(variants[0].iter().all(|(_, r)| *r == Role::PermanentUnfavourable));
        assert!(variants[1].iter().all(|(_, r)| *r == Role::PermanentFavourable));
    }

    #[test]
    fn test_sign_variants_power_set_is_capped() {
        let perms: Vec<ActionId> = (0..64).map(ActionId).collect();
        let variants = sign_variants(&perms, PermanentEnvelope::PowerSet);
        assert_eq!(variants.len(), 2);
        assert!(variants[0].iter().all(|(_, r)| *r == Role::PermanentUnfavourable));
        assert!(variants[1].iter().all(|(_, r)| *r == Role::PermanentFavourable));

        let perms: Vec<ActionId> = (0..MAX_POWER_SET_PERMANENTS + 1).map(ActionId).collect();
        assert_eq!(sign_variants(&perms, PermanentEnvelope::PowerSet).len(), 2);
    }

    #[test]
    fn test_sign_variants_without_permanents() {
        assert_eq!(sign_variants(&[], PermanentEnvelope::PowerSet), vec![Vec::new()]);
        assert_eq!(sign_variants(&[], PermanentEnvelope::Extremes), vec![Vec::new()]);
    }

    #[test]
    fn test_maximal_sets_split_on_exclusions() {
        let catalog = footbridge();
        let graph = catalog.graph();
        // Q1 leads; pool is every non-seismic variable action.
        let pool: Vec<ActionId> = (2..8).map(ActionId).collect();
        let fixed = ids(&[0, 1, 2]);
        let sets = maximal_compatible_sets(graph, &fixed, &pool);
        assert_eq!(sets, vec![ids(&[3, 4, 7]), ids(&[3, 5, 7]), ids(&[3, 6, 7])]);
    }

    #[test]
    fn test_maximal_sets_prune_missing_mains() {
        let catalog = footbridge();
        let graph = catalog.graph();
        // Q1 is not available, so Q2 can never accompany.
        let pool: Vec<ActionId> = vec![ActionId(3), ActionId(7)];
        let sets = maximal_compatible_sets(graph, &ids(&[0, 1]), &pool);
        assert_eq!(sets, vec![ids(&[7])]);
    }

    #[test]
    fn test_maximal_sets_empty_pool() {
        let catalog = footbridge();
        let sets = maximal_compatible_sets(catalog.graph(), &ids(&[0]), &[]);
        assert_eq!(sets, vec![BTreeSet::new()]);
    }

    #[test]
    fn test_dependent_leader_brings_its_main() {
        let catalog = footbridge();
        let graph = catalog.graph();
        let perms = [ActionId(0), ActionId(1)];
        let pool: Vec<ActionId> = (2..8).map(ActionId).collect();
        let selections = candidate_selections(graph, &perms, Some(&[ActionId(3)]), &pool);
        assert!(!selections.is_empty());
        for s in &selections {
            assert_eq!(s.leading, Some(ActionId(3)));
            assert!(s.accompanying.contains(&ActionId(2)));
            assert!(is_admissible(graph, &perms, s));
        }
    }

    #[test]
    fn test_leader_with_unavailable_main_is_skipped() {
        let catalog = footbridge();
        let graph = catalog.graph();
        let selections = candidate_selections(graph, &[], Some(&[ActionId(3)]), &[ActionId(3)]);
        assert!(selections.is_empty());
    }

    #[test]
    fn test_quasi_permanent_selections_have_no_leader() {
        let catalog = footbridge();
        let pool: Vec<ActionId> = (2..8).map(ActionId).collect();
        let selections = candidate_selections(catalog.graph(), &[ActionId(0), ActionId(1)], None, &pool);
        assert_eq!(selections.len(), 3);
        assert!(selections.iter().all(|s| s.leading.is_none()));
    }

    #[test]
    fn test_admissibility_filter() {
        let catalog = footbridge();
        let graph = catalog.graph();
        let bad = Selection {
            leading: Some(ActionId(4)),
            accompanying: ids(&[5]),
        };
        let orphan = Selection {
            leading: Some(ActionId(4)),
            accompanying: ids(&[3]),
        };
        let good = Selection {
            leading: Some(ActionId(4)),
            accompanying: ids(&[2, 3, 7]),
        };
        assert!(!is_admissible(graph, &[], &bad));
        assert!(!is_admissible(graph, &[], &orphan));
        assert!(is_admissible(graph, &[], &good));
    }

    #[test]
    fn test_assign_uls_coefficients() {
        let catalog = footbridge();
        let signs = vec![(ActionId(0), Role::PermanentUnfavourable), (ActionId(1), Role::PermanentFavourable)];
        let selection = Selection {
            leading: Some(ActionId(4)),
            accompanying: ids(&[2, 3, 7]),
        };
        let combo = assign_coefficients(&catalog, LimitState::UlsPersistent, &signs, &selection);
        assert_eq!(combo.coefficient("G1"), 1.35);
        assert_eq!(combo.coefficient("G2"), 1.0);
        assert_eq!(combo.coefficient("W"), 1.5);
        assert_eq!(combo.coefficient("Q1"), 1.35 * 0.4);
        assert_eq!(combo.coefficient("S"), 1.5 * 0.8);
        assert_eq!(combo.leading(), Some(ActionId(4)));
    }

    #[test]
    fn test_assign_drops_zero_and_orphans() {
        let catalog = footbridge();
        let signs = vec![(ActionId(0), Role::PermanentUnfavourable), (ActionId(1), Role::PermanentUnfavourable)];
        let selection = Selection {
            leading: None,
            accompanying: ids(&[2, 3, 5, 7]),
        };
        // Quasi-permanent: footbridge live and snow have ψ2 = 0, thermal 0.5.
        let combo = assign_coefficients(&catalog, LimitState::SlsQuasiPermanent, &signs, &selection);
        assert_eq!(combo.name(), "1.00*G1+1.00*G2+0.50*T1");
        assert!(combo.check_invariants(&catalog).is_ok());
    }

    #[test]
    fn test_orphan_pruned_when_main_coefficient_zero() {
        let mut catalog = ActionCatalog::new();
        catalog
            .new_variable_action("M", "Main", ActionFactors::variable(1.5, 0.7, 0.5, 0.0), &[])
            .unwrap();
        let dep = catalog
            .new_variable_action("D", "Dependent", ActionFactors::variable(1.5, 0.7, 0.5, 0.3), &[])
            .unwrap();
        catalog.relationships(dep).unwrap().append_main("M").unwrap();

        let selection = Selection {
            leading: None,
            accompanying: ids(&[0, 1]),
        };
        let combo = assign_coefficients(&catalog, LimitState::SlsQuasiPermanent, &Vec::new(), &selection);
        assert!(combo.terms().is_empty());
    }

    #[test]
    fn test_dedup_keeps_first() {
        let catalog = footbridge();
        let signs_a = vec![(ActionId(0), Role::PermanentUnfavourable), (ActionId(1), Role::PermanentUnfavourable)];
        let signs_b = vec![(ActionId(0), Role::PermanentFavourable), (ActionId(1), Role::PermanentFavourable)];
        let selection = Selection {
            leading: Some(ActionId(7)),
            accompanying: BTreeSet::new(),
        };
        // SLS: favourable and unfavourable permanent factors are both 1.0.
        let a = assign_coefficients(&catalog, LimitState::SlsCharacteristic, &signs_a, &selection);
        let b = assign_coefficients(&catalog, LimitState::SlsCharacteristic, &signs_b, &selection);
        let kept = dedup_by_signature(vec![a.clone(), b], catalog.len());
        assert_eq!(kept, vec![a]);
    }

    #[test]
    fn test_enumerate_produces_every_limit_state() {
        let catalog = footbridge();
        let result = enumerate(&catalog, &GeneratorSettings::default());
        let states: Vec<LimitState> = result.sets.iter().map(|s| s.limit_state()).collect();
        assert_eq!(states, LimitState::ALL.to_vec());
        assert!(result.diagnostics.is_empty());
        for set in &result.sets {
            assert!(!set.is_empty(), "{} is empty", set.limit_state());
            for combo in set {
                combo.check_invariants(&catalog).unwrap();
            }
        }
    }

    #[test]
    fn test_seismic_limit_state_empty_without_seismic_actions() {
        let mut catalog = ActionCatalog::new();
        catalog.new_permanent_action("G", "Self-weight").unwrap();
        catalog.new_snow_action("S", "Snow", &[]).unwrap();
        let result = enumerate(&catalog, &GeneratorSettings::default());
        assert!(result.sets[1].is_empty());
        assert!(!result.sets[0].is_empty());
    }

    #[test]
    fn test_permanent_only_catalogue() {
        let mut catalog = ActionCatalog::new();
        catalog.new_permanent_action("G", "Self-weight").unwrap();
        let result = enumerate(&catalog, &GeneratorSettings::default());
        let uls = &result.sets[0];
        assert_eq!(uls.names(), vec!["1.35*G", "1.00*G"]);
        assert_eq!(result.sets[4].names(), vec!["1.00*G"]);
    }

    #[test]
    fn test_power_set_limit_falls_back_to_extremes() {
        let mut catalog = ActionCatalog::new();
        for i in 0..4 {
            catalog.new_permanent_action(&format!("G{}", i), "Self-weight").unwrap();
        }
        let settings = GeneratorSettings {
            max_power_set_permanents: 3,
            ..GeneratorSettings::default()
        };
        let result = enumerate(&catalog, &settings);
        assert_eq!(result.sets[0].len(), 2);
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn test_contradictory_action_is_excluded() {
        let mut catalog = ActionCatalog::new();
        catalog.new_permanent_action("G", "Self-weight").unwrap();
        catalog.new_footbridge_action("Q1", "Live", &[]).unwrap();
        let q2 = catalog.new_footbridge_action("Q2", "Live", &["Q1"]).unwrap();
        catalog.relationships(q2).unwrap().append_main("Q1").unwrap();
        catalog.new_snow_action("S", "Snow", &[]).unwrap();

        let result = enumerate(&catalog, &GeneratorSettings::default());
        assert_eq!(result.diagnostics.len(), 1);
        assert!(matches!(&result.diagnostics[0], CombError::Consistency { action, .. } if action == "Q2"));
        for set in &result.sets {
            assert!(set.iter().all(|c| !c.contains("Q2")));
        }
        // The rest of the catalogue is still combined.
        assert!(result.sets[0].iter().any(|c| c.leading() == Some(ActionId(1))));
        assert!(result.sets[0].iter().any(|c| c.leading() == Some(ActionId(3))));
    }
}
