//! # Property-Based Tests
//!
//! Universally quantified invariants of the phase engine, checked with proptest.

use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;
use std::collections::BTreeMap;
use tomgate_core::{
    BypassState, DerivationRules, DerivedPhase, GovernanceGateInput, ItemSnapshot, MatchedBy, Phase,
    PhaseOverride, PhaseSignals, PresetProfile, TomConfig, calculate_phase_readiness,
    calculate_phase_summary, derive_phase, detect_phase_transition, merge_preset_profile,
    should_show_phase_transition_warning,
};

const STATUSES: [&str; 5] = ["Discovery", "Build", "Pilot", "Live", "Retired"];
const DEPLOYMENTS: [&str; 3] = ["Development", "Staging", "Production"];

// =============================================================================
// STRATEGIES
// =============================================================================

fn label(options: &'static [&'static str]) -> impl Strategy<Value = String> {
    prop::sample::select(options).prop_map(str::to_string)
}

fn phase_list() -> impl Strategy<Value = Vec<Phase>> {
    vec(
        (
            0u32..6,
            0u32..6,
            vec(label(&STATUSES), 0..3),
            vec(label(&DEPLOYMENTS), 0..2),
            any::<bool>(),
        ),
        1..7,
    )
    .prop_map(|shapes| {
        shapes
            .into_iter()
            .enumerate()
            .map(|(i, (order, priority, statuses, deployments, manual_only))| {
                let mut phase = Phase::new(format!("p{i}"), format!("Phase {i}"), order, priority);
                phase.mapped_statuses = statuses;
                phase.mapped_deployments = deployments;
                phase.manual_only = manual_only;
                phase
            })
            .collect()
    })
}

fn config() -> impl Strategy<Value = TomConfig> {
    (phase_list(), any::<bool>()).prop_map(|(phases, enabled)| TomConfig {
        enabled,
        active_preset: "preset".to_string(),
        presets: BTreeMap::new(),
        preset_profiles: BTreeMap::new(),
        phases,
        governance_bodies: Vec::new(),
        derivation_rules: DerivationRules::default(),
    })
}

fn signals() -> impl Strategy<Value = PhaseSignals> {
    (
        option::of(label(&STATUSES)),
        option::of(label(&DEPLOYMENTS)),
        option::of((0usize..8).prop_map(|i| format!("p{i}"))),
    )
        .prop_map(|(status, deployment, phase_override)| PhaseSignals {
            status,
            deployment,
            phase_override,
        })
}

fn gates() -> impl Strategy<Value = Option<GovernanceGateInput>> {
    option::of(any::<bool>().prop_map(GovernanceGateInput::operating_model))
}

fn item() -> impl Strategy<Value = ItemSnapshot> {
    (signals(), gates(), option::of(0u8..=100), option::of(0u8..=100)).prop_map(
        |(signals, governance, revenue_impact, data_readiness)| ItemSnapshot {
            use_case_status: signals.status,
            deployment_status: signals.deployment,
            tom_phase_override: signals.phase_override,
            governance,
            revenue_impact,
            data_readiness,
            ..ItemSnapshot::default()
        },
    )
}

fn derive(
    signals: &PhaseSignals,
    gates: Option<&GovernanceGateInput>,
    cfg: &TomConfig,
) -> DerivedPhase {
    derive_phase(
        signals.status.as_deref(),
        signals.deployment.as_deref(),
        signals.phase_override.as_deref(),
        gates,
        cfg,
    )
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// A disabled engine always answers `disabled`.
    #[test]
    fn disabled_config_always_disabled(mut cfg in config(), s in signals(), g in gates()) {
        cfg.enabled = false;
        let derived = derive(&s, g.as_ref(), &cfg);
        prop_assert_eq!(derived.id.as_str(), "disabled");
        prop_assert_eq!(derived.matched_by, MatchedBy::Disabled);
    }

    /// A closed operating-model gate always answers `unphased`, override or not.
    #[test]
    fn closed_gate_always_unphased(mut cfg in config(), s in signals()) {
        cfg.enabled = true;
        let gates = GovernanceGateInput::operating_model(false);
        let derived = derive(&s, Some(&gates), &cfg);
        prop_assert_eq!(derived.id.as_str(), "unphased");
        prop_assert_eq!(derived.matched_by, MatchedBy::Unphased);
    }

    /// Same inputs, same answer.
    #[test]
    fn derivation_is_deterministic(cfg in config(), s in signals(), g in gates()) {
        prop_assert_eq!(derive(&s, g.as_ref(), &cfg), derive(&s, g.as_ref(), &cfg));
    }

    /// Every answer is a configured phase or a bypass state, tagged consistently.
    #[test]
    fn answer_is_phase_or_bypass(cfg in config(), s in signals(), g in gates()) {
        let derived = derive(&s, g.as_ref(), &cfg);
        match derived.bypass_state() {
            Some(state) => prop_assert_eq!(derived.matched_by, state.matched_by()),
            None => {
                let phase = cfg.phase(&derived.id);
                prop_assert!(phase.is_some());
                if let Some(phase) = phase {
                    prop_assert!(!phase.manual_only || derived.matched_by == MatchedBy::Manual);
                }
            }
        }
        prop_assert_eq!(derived.is_override, derived.matched_by == MatchedBy::Manual);
    }

    /// Merging an effective configuration again changes nothing.
    #[test]
    fn merge_is_idempotent(
        mut cfg in config(),
        custom in option::of(phase_list()),
        weeks in option::of(1u32..52),
        gate in option::of(label(&["none", "ai_council"])),
    ) {
        let mut profile = PresetProfile { phases: custom, ..PresetProfile::default() };
        profile.phase_overrides.insert(
            "p0".to_string(),
            PhaseOverride { governance_gate: gate, expected_duration_weeks: weeks },
        );
        cfg.preset_profiles.insert("preset".to_string(), profile);

        let once = merge_preset_profile(&cfg);
        let twice = merge_preset_profile(&once);
        prop_assert_eq!(once.phases, twice.phases);
    }

    /// Summary counts add up to the number of items.
    #[test]
    fn summary_sums_to_item_count(cfg in config(), items in vec(item(), 0..40)) {
        let summary = calculate_phase_summary(&items, &cfg);
        prop_assert_eq!(summary.values().sum::<usize>(), items.len());
        for state in BypassState::ALL {
            prop_assert!(summary.contains_key(state.id()));
        }
    }

    /// Identical before/after signals never produce a transition.
    #[test]
    fn identical_signals_no_transition(cfg in config(), s in signals(), g in gates(), it in item()) {
        let info = detect_phase_transition(&s, &s, &it, g.as_ref(), &cfg);
        prop_assert!(!info.has_transition);
        prop_assert!(!should_show_phase_transition_warning(&info));
    }

    /// Leaving a bypass state never warns.
    #[test]
    fn bypass_exit_never_warns(
        cfg in config(),
        before in signals(),
        after in signals(),
        g in gates(),
        it in item(),
    ) {
        let info = detect_phase_transition(&before, &after, &it, g.as_ref(), &cfg);
        if info.is_exiting_unphased_or_disabled {
            prop_assert!(!should_show_phase_transition_warning(&info));
        }
    }

    /// Readiness stays within 0-100 and a phase without requirements is ready.
    #[test]
    fn readiness_bounds(cfg in config(), it in item(), idx in 0usize..8) {
        let id = format!("p{idx}");
        let readiness = calculate_phase_readiness(&it, &id, &cfg);
        prop_assert!(readiness.readiness_percent <= 100);
        // Generated phases declare no requirements.
        prop_assert_eq!(readiness.readiness_percent, 100);
        prop_assert!(readiness.can_progress);
    }
}
