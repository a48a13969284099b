//! # Validation Module
//!
//! Structural checks for a freshly loaded [`TomConfig`].
//!
//! Derivation is total and never needs these checks to produce an answer,
//! but a phase list with duplicate or reserved ids makes the answer
//! ambiguous. Loading collaborators run [`validate_config`] before use and
//! surface [`config_warnings`] to operators.
//!
//! Checked lists: the base phases, every preset's custom taxonomy, and the
//! effective phases of the active preset.

use crate::primitives::{MAX_PHASES, RESERVED_PHASE_IDS};
use crate::readiness::DataRequirement;
use crate::resolver::merge_preset_profile;
use crate::types::{Phase, TomConfig, TomError};
use std::collections::BTreeSet;

/// Reject configurations whose phase lists are structurally ambiguous.
pub fn validate_config(config: &TomConfig) -> Result<(), TomError> {
    validate_phase_list(&config.phases, "base phases")?;

    for (key, profile) in &config.preset_profiles {
        if let Some(custom) = &profile.phases {
            validate_phase_list(custom, &format!("preset '{}'", key))?;
        }
    }

    let effective = merge_preset_profile(config);
    validate_phase_list(&effective.phases, "effective phases")
}

/// Check a single phase list: bounded size, non-blank, unique, unreserved ids.
pub fn validate_phase_list(phases: &[Phase], scope: &str) -> Result<(), TomError> {
    if phases.len() > MAX_PHASES {
        return Err(TomError::TooManyPhases {
            scope: scope.to_string(),
            count: phases.len(),
            max: MAX_PHASES,
        });
    }

    let mut seen = BTreeSet::new();
    for phase in phases {
        if phase.id.trim().is_empty() {
            return Err(TomError::EmptyPhaseId {
                scope: scope.to_string(),
            });
        }
        if RESERVED_PHASE_IDS.contains(&phase.id.as_str()) {
            return Err(TomError::ReservedPhaseId {
                id: phase.id.clone(),
                scope: scope.to_string(),
            });
        }
        if !seen.insert(phase.id.as_str()) {
            return Err(TomError::DuplicatePhaseId {
                id: phase.id.clone(),
                scope: scope.to_string(),
            });
        }
    }

    Ok(())
}

/// Non-fatal findings about the effective configuration.
///
/// Reported:
/// - active preset missing from the preset registry
/// - two phases sharing an `order` value
/// - requirement names outside the predicate table (always unsatisfied)
/// - gates naming an unknown review body
#[must_use]
pub fn config_warnings(config: &TomConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if !config.presets.contains_key(&config.active_preset) {
        warnings.push(format!(
            "active preset '{}' is not a registered preset",
            config.active_preset
        ));
    }

    let effective = merge_preset_profile(config);
    let mut orders = BTreeSet::new();
    for phase in &effective.phases {
        if !orders.insert(phase.order) {
            warnings.push(format!(
                "phase '{}' shares order {} with an earlier phase",
                phase.id, phase.order
            ));
        }

        let requirements = &phase.data_requirements;
        for name in requirements.entry.iter().chain(requirements.exit.iter()) {
            if DataRequirement::parse(name).is_none() {
                warnings.push(format!(
                    "phase '{}' requires unknown data '{}' (never satisfied)",
                    phase.id, name
                ));
            }
        }

        if phase.is_gated()
            && !config
                .governance_bodies
                .iter()
                .any(|b| b.id == phase.governance_gate)
        {
            warnings.push(format!(
                "phase '{}' is gated by unknown body '{}'",
                phase.id, phase.governance_gate
            ));
        }
    }

    warnings
}

// =============================================================================
// TESTS
// =============================================================================
