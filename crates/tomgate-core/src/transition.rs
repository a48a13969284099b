//! # Transition Module
//!
//! Detects whether a proposed change to an item's signals moves it to a
//! different phase, and whether it leaves its current phase with exit data
//! still missing.
//!
//! Also provides the dashboard phase summary.

use crate::derivation::derive_from_signals;
use crate::readiness::partition_requirements;
use crate::types::{
    BypassState, DerivedPhase, GovernanceGateInput, ItemSnapshot, PhaseSignals, TomConfig,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of comparing the derived phase before and after a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseTransitionInfo {
    pub has_transition: bool,
    pub from_phase: DerivedPhase,
    pub to_phase: DerivedPhase,
    pub from_phase_id: String,
    pub to_phase_id: String,
    pub exit_requirements_met: Vec<String>,
    pub exit_requirements_pending: Vec<String>,
    pub can_progress_without_warning: bool,
    /// The item is leaving a bypass state, which has no exit obligations.
    pub is_exiting_unphased_or_disabled: bool,
}

/// Compare the phase derived from `before` with the phase derived from `after`.
///
/// Both derivations use the same configuration and gate input. When the phase
/// changes out of a configured phase, that phase's exit requirements are
/// checked against `item`.
#[must_use]
pub fn detect_phase_transition(
    before: &PhaseSignals,
    after: &PhaseSignals,
    item: &ItemSnapshot,
    governance_gates: Option<&GovernanceGateInput>,
    config: &TomConfig,
) -> PhaseTransitionInfo {
    let from_phase = derive_from_signals(before, governance_gates, config);
    let to_phase = derive_from_signals(after, governance_gates, config);

    let mut info = PhaseTransitionInfo {
        has_transition: from_phase.id != to_phase.id,
        from_phase_id: from_phase.id.clone(),
        to_phase_id: to_phase.id.clone(),
        from_phase,
        to_phase,
        exit_requirements_met: Vec::new(),
        exit_requirements_pending: Vec::new(),
        can_progress_without_warning: true,
        is_exiting_unphased_or_disabled: false,
    };

    if !info.has_transition {
        return info;
    }

    if info.from_phase.bypass_state().is_some() {
        info.is_exiting_unphased_or_disabled = true;
        return info;
    }

    if let Some(departing) = config.phase(&info.from_phase_id) {
        let (met, pending) = partition_requirements(&departing.data_requirements.exit, item);
        info.can_progress_without_warning = pending.is_empty();
        info.exit_requirements_met = met;
        info.exit_requirements_pending = pending;
    }

    info
}

/// Whether the caller should confirm the change before applying it.
#[must_use]
pub fn should_show_phase_transition_warning(info: &PhaseTransitionInfo) -> bool {
    info.has_transition
        && !info.is_exiting_unphased_or_disabled
        && !info.can_progress_without_warning
}

/// Count items per derived phase.
///
/// Every effective phase id and every bypass bucket starts at zero. Each item
/// is derived from its own signals and its recorded gate flags. The counts
/// always sum to `items.len()`.
#[must_use]
pub fn calculate_phase_summary(items: &[ItemSnapshot], config: &TomConfig) -> BTreeMap<String, usize> {
    let mut summary: BTreeMap<String, usize> = config
        .phases
        .iter()
        .map(|p| (p.id.clone(), 0))
        .chain(BypassState::ALL.iter().map(|s| (s.id().to_string(), 0)))
        .collect();

    for item in items {
        let derived = derive_from_signals(&item.signals(), item.governance.as_ref(), config);
        let count = summary.entry(derived.id).or_insert(0);
        *count = count.saturating_add(1);
    }

    summary
}

// =============================================================================
// TESTS
// =============================================================================
