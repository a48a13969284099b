//! # Derivation Module
//!
//! Pure phase derivation: (status, deployment, override, gates, config) to
//! exactly one [`DerivedPhase`].
//!
//! ## Match Sequence
//!
//! Each step short-circuits:
//!
//! | Step | Condition | Result | `matched_by` |
//! |------|-----------|--------|--------------|
//! | 1 | engine disabled | `disabled` | `disabled` |
//! | 2 | gates supplied, operating model not passed | `unphased` | `unphased` |
//! | 3 | override names a configured phase | that phase | `manual` |
//! | 4-5 | no automatic phase maps the status, gates passed | lowest-order automatic phase | `governance_entry` |
//! | 5 | no automatic phase maps the status | `unmapped` | `unmapped` |
//! | 6 | one phase maps the status | that phase | `status` |
//! | 7 | several match, deployment picks one | first such phase | `deployment` |
//! | 8 | several match | lowest priority | `priority` |
//!
//! The gate check runs before the override check, so an item cannot be
//! forced into any phase, manual-only phases included, while its entry gate
//! is closed.
//!
//! ## Ordering
//!
//! "First" always means first in the configuration's phase list. Ties on
//! `priority` and `order` resolve the same way.

use crate::types::{
    BypassState, DerivedPhase, GovernanceGateInput, MatchedBy, Phase, PhaseSignals, TomConfig,
};

/// Derive the phase an item currently occupies.
///
/// Total: every input combination yields exactly one result. Empty override
/// and deployment strings count as absent.
#[must_use]
pub fn derive_phase(
    status: Option<&str>,
    deployment: Option<&str>,
    phase_override: Option<&str>,
    governance_gates: Option<&GovernanceGateInput>,
    config: &TomConfig,
) -> DerivedPhase {
    if !config.enabled {
        return DerivedPhase::bypass(BypassState::Disabled);
    }

    if governance_gates.is_some_and(|g| !g.operating_model_passed) {
        return DerivedPhase::bypass(BypassState::Unphased);
    }

    let manual = phase_override
        .filter(|id| !id.is_empty())
        .and_then(|id| config.phase(id));
    if let Some(phase) = manual {
        return DerivedPhase::from_phase(phase, MatchedBy::Manual);
    }

    let matching: Vec<&Phase> = match status {
        Some(status) => config
            .phases
            .iter()
            .filter(|p| !p.manual_only && p.maps_status(status))
            .collect(),
        None => Vec::new(),
    };

    match matching.as_slice() {
        [] => match governance_gates.and_then(|_| entry_phase(config)) {
            Some(entry) => DerivedPhase::from_phase(entry, MatchedBy::GovernanceEntry),
            None => DerivedPhase::bypass(BypassState::Unmapped),
        },
        [only] => DerivedPhase::from_phase(only, MatchedBy::Status),
        candidates => {
            let by_deployment = deployment
                .filter(|d| !d.is_empty())
                .and_then(|d| candidates.iter().find(|p| p.maps_deployment(d)));
            if let Some(phase) = by_deployment {
                return DerivedPhase::from_phase(phase, MatchedBy::Deployment);
            }
            match lowest_priority(candidates) {
                Some(phase) => DerivedPhase::from_phase(phase, MatchedBy::Priority),
                None => DerivedPhase::bypass(BypassState::Unmapped),
            }
        }
    }
}

/// Derive from a [`PhaseSignals`] triple.
#[must_use]
pub fn derive_from_signals(
    signals: &PhaseSignals,
    governance_gates: Option<&GovernanceGateInput>,
    config: &TomConfig,
) -> DerivedPhase {
    derive_phase(
        signals.status.as_deref(),
        signals.deployment.as_deref(),
        signals.phase_override.as_deref(),
        governance_gates,
        config,
    )
}

impl PhaseSignals {
    /// Derive the phase these signals imply.
    #[must_use]
    pub fn derive(
        &self,
        governance_gates: Option<&GovernanceGateInput>,
        config: &TomConfig,
    ) -> DerivedPhase {
        derive_from_signals(self, governance_gates, config)
    }
}

/// The default landing phase once the entry gate is cleared: the
/// lowest-order automatic phase, first in list order on ties.
#[must_use]
pub fn entry_phase(config: &TomConfig) -> Option<&Phase> {
    config
        .phases
        .iter()
        .filter(|p| !p.manual_only)
        .fold(None, |best: Option<&Phase>, p| match best {
            Some(b) if b.order <= p.order => Some(b),
            _ => Some(p),
        })
}

/// Lowest `priority` among candidates, first in list order on ties.
fn lowest_priority<'a>(candidates: &[&'a Phase]) -> Option<&'a Phase> {
    candidates
        .iter()
        .copied()
        .fold(None, |best: Option<&Phase>, p| match best {
            Some(b) if b.priority <= p.priority => Some(b),
            _ => Some(p),
        })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DerivationRules;
    use std::collections::BTreeMap;

    fn config(phases: Vec<Phase>) -> TomConfig {
        TomConfig {
            enabled: true,
            active_preset: String::new(),
            presets: BTreeMap::new(),
            preset_profiles: BTreeMap::new(),
            phases,
            governance_bodies: Vec::new(),
            derivation_rules: DerivationRules::default(),
        }
    }

    fn two_stage() -> TomConfig {
        config(vec![
            Phase::new("a", "A", 1, 1).with_statuses(&["Discovery"]),
            Phase::new("b", "B", 2, 2).with_statuses(&["Live"]),
        ])
    }

    fn contested() -> TomConfig {
        config(vec![
            Phase::new("pilot", "Pilot", 2, 5).with_statuses(&["Active"]),
            Phase::new("run", "Run", 3, 1)
                .with_statuses(&["Active"])
                .with_deployments(&["Prod"]),
        ])
    }

    #[test]
    fn disabled_wins_over_everything() {
        let mut cfg = two_stage();
        cfg.enabled = false;
        let gates = GovernanceGateInput::operating_model(false);
        let derived = derive_phase(Some("Discovery"), None, Some("a"), Some(&gates), &cfg);
        assert_eq!(derived.id, "disabled");
        assert_eq!(derived.matched_by, MatchedBy::Disabled);
    }

    #[test]
    fn closed_gate_blocks_manual_override() {
        let cfg = two_stage();
        let gates = GovernanceGateInput::operating_model(false);
        let derived = derive_phase(Some("Discovery"), None, Some("b"), Some(&gates), &cfg);
        assert_eq!(derived.id, "unphased");
        assert_eq!(derived.matched_by, MatchedBy::Unphased);
    }

    #[test]
    fn override_reaches_manual_only_phase() {
        let mut cfg = two_stage();
        cfg.phases
            .push(Phase::new("retired", "Retired", 3, 3).manual_only());
        let derived = derive_phase(Some("Discovery"), None, Some("retired"), None, &cfg);
        assert_eq!(derived.id, "retired");
        assert!(derived.is_override);
        assert_eq!(derived.matched_by, MatchedBy::Manual);
    }

    #[test]
    fn unknown_or_empty_override_falls_through() {
        let cfg = two_stage();
        let unknown = derive_phase(Some("Live"), None, Some("nope"), None, &cfg);
        assert_eq!(unknown.id, "b");
        assert_eq!(unknown.matched_by, MatchedBy::Status);

        let empty = derive_phase(Some("Live"), None, Some(""), None, &cfg);
        assert_eq!(empty.matched_by, MatchedBy::Status);
    }

    #[test]
    fn single_status_match() {
        let derived = derive_phase(Some("Discovery"), None, None, None, &two_stage());
        assert_eq!(derived.id, "a");
        assert_eq!(derived.matched_by, MatchedBy::Status);
        assert!(!derived.is_override);
    }

    #[test]
    fn unknown_status_without_gates_is_unmapped() {
        let derived = derive_phase(Some("Unknown"), None, None, None, &two_stage());
        assert_eq!(derived.id, "unmapped");
        assert_eq!(derived.matched_by, MatchedBy::Unmapped);
    }

    #[test]
    fn missing_status_with_passed_gate_lands_in_entry_phase() {
        let cfg = config(vec![
            Phase::new("later", "Later", 5, 1),
            Phase::new("first", "First", 1, 9).with_statuses(&["X"]),
            Phase::new("manual", "Manual", 0, 0).manual_only(),
        ]);
        let gates = GovernanceGateInput::operating_model(true);
        let derived = derive_phase(None, None, None, Some(&gates), &cfg);
        assert_eq!(derived.id, "first");
        assert_eq!(derived.matched_by, MatchedBy::GovernanceEntry);
    }

    #[test]
    fn passed_gate_without_automatic_phases_is_unmapped() {
        let cfg = config(vec![Phase::new("manual", "Manual", 1, 1).manual_only()]);
        let gates = GovernanceGateInput::operating_model(true);
        let derived = derive_phase(Some("Anything"), None, None, Some(&gates), &cfg);
        assert_eq!(derived.matched_by, MatchedBy::Unmapped);
    }

    #[test]
    fn manual_only_phase_is_never_status_matched() {
        let cfg = config(vec![
            Phase::new("retired", "Retired", 9, 0)
                .with_statuses(&["Retired"])
                .manual_only(),
        ]);
        let derived = derive_phase(Some("Retired"), None, None, None, &cfg);
        assert_eq!(derived.id, "unmapped");
    }

    #[test]
    fn deployment_disambiguates() {
        let derived = derive_phase(Some("Active"), Some("Prod"), None, None, &contested());
        assert_eq!(derived.id, "run");
        assert_eq!(derived.matched_by, MatchedBy::Deployment);
    }

    #[test]
    fn no_deployment_falls_back_to_priority() {
        let derived = derive_phase(Some("Active"), None, None, None, &contested());
        assert_eq!(derived.id, "run");
        assert_eq!(derived.matched_by, MatchedBy::Priority);
    }

    #[test]
    fn unmatched_deployment_falls_back_to_priority() {
        let cfg = config(vec![
            Phase::new("x", "X", 1, 2).with_statuses(&["S"]),
            Phase::new("y", "Y", 2, 1).with_statuses(&["S"]),
        ]);
        let derived = derive_phase(Some("S"), Some("Staging"), None, None, &cfg);
        assert_eq!(derived.id, "y");
        assert_eq!(derived.matched_by, MatchedBy::Priority);
    }

    #[test]
    fn priority_ties_resolve_to_first_in_list() {
        let cfg = config(vec![
            Phase::new("first", "First", 2, 1).with_statuses(&["S"]),
            Phase::new("second", "Second", 1, 1).with_statuses(&["S"]),
        ]);
        let derived = derive_phase(Some("S"), None, None, None, &cfg);
        assert_eq!(derived.id, "first");
    }

    #[test]
    fn signals_method_matches_free_function() {
        let cfg = contested();
        let signals = PhaseSignals::status("Active").with_deployment("Prod");
        assert_eq!(
            signals.derive(None, &cfg),
            derive_phase(Some("Active"), Some("Prod"), None, None, &cfg)
        );
    }
}
