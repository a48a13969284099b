//! # Resolver Module
//!
//! Preset profile resolution.
//!
//! - Pick the active preset's custom taxonomy, or keep the base phases
//! - Apply the preset's per-phase overrides (gate and duration only)
//! - Copy the preset's staffing ratios onto matching phases
//!
//! The result is the *effective* configuration every other module reads.
//! It is recomputed from the stored configuration on demand and never persisted.

use crate::types::{Phase, PresetProfile, TomConfig};

/// Return the profile registered for the active preset, if any.
#[must_use]
pub fn active_profile(config: &TomConfig) -> Option<&PresetProfile> {
    config.preset_profiles.get(&config.active_preset)
}

/// Return a copy of `config` with a different active preset.
#[must_use]
pub fn with_active_preset(config: &TomConfig, preset: &str) -> TomConfig {
    let mut switched = config.clone();
    switched.active_preset = preset.to_string();
    switched
}

/// Merge the active preset's profile onto the base configuration.
///
/// Pure and total. A preset key with no profile returns the configuration
/// unchanged. Overrides for phase ids absent from the list are ignored.
/// Merging an already-effective configuration again yields the same phases.
#[must_use]
pub fn merge_preset_profile(config: &TomConfig) -> TomConfig {
    let Some(profile) = active_profile(config) else {
        return config.clone();
    };

    let base = match profile.phases.as_deref() {
        Some(custom) if !custom.is_empty() => custom,
        _ => config.phases.as_slice(),
    };

    let phases = base
        .iter()
        .map(|phase| apply_profile(phase, profile))
        .collect();

    TomConfig {
        phases,
        ..config.clone()
    }
}

/// Apply one profile's overrides to a single phase.
fn apply_profile(phase: &Phase, profile: &PresetProfile) -> Phase {
    let mut merged = phase.clone();

    if let Some(overrides) = profile.phase_overrides.get(&phase.id) {
        if let Some(gate) = &overrides.governance_gate {
            merged.governance_gate.clone_from(gate);
        }
        if let Some(weeks) = overrides.expected_duration_weeks {
            merged.expected_duration_weeks = Some(weeks);
        }
    }

    if let Some(ratio) = profile.staffing_ratios.get(&phase.id) {
        merged.staffing_ratio.clone_from(ratio);
    }

    merged
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DerivationRules, PhaseOverride, StaffingRatio};
    use std::collections::BTreeMap;

    fn base_config() -> TomConfig {
        let mut gated = Phase::new("build", "Build", 2, 2).with_statuses(&["In Progress"]);
        gated.governance_gate = "architecture_review".to_string();

        TomConfig {
            enabled: true,
            active_preset: "lean".to_string(),
            presets: BTreeMap::new(),
            preset_profiles: BTreeMap::new(),
            phases: vec![
                Phase::new("discover", "Discover", 1, 1).with_statuses(&["Discovery"]),
                gated,
            ],
            governance_bodies: Vec::new(),
            derivation_rules: DerivationRules::default(),
        }
    }

    #[test]
    fn unknown_preset_is_a_no_op() {
        let config = base_config();
        assert_eq!(merge_preset_profile(&config), config);
    }

    #[test]
    fn overrides_touch_only_gate_and_duration() {
        let mut config = base_config();
        let mut profile = PresetProfile::default();
        profile.phase_overrides.insert(
            "build".to_string(),
            PhaseOverride {
                governance_gate: Some("none".to_string()),
                expected_duration_weeks: Some(6),
            },
        );
        config.preset_profiles.insert("lean".to_string(), profile);

        let effective = merge_preset_profile(&config);
        let build = effective.phase("build").expect("build phase");
        assert_eq!(build.governance_gate, "none");
        assert_eq!(build.expected_duration_weeks, Some(6));
        assert_eq!(build.mapped_statuses, vec!["In Progress".to_string()]);
        assert_eq!(build.priority, 2);
        assert_eq!(effective.phase("discover"), config.phase("discover"));
    }

    #[test]
    fn partial_override_keeps_other_field() {
        let mut config = base_config();
        let mut profile = PresetProfile::default();
        profile.phase_overrides.insert(
            "build".to_string(),
            PhaseOverride {
                governance_gate: None,
                expected_duration_weeks: Some(3),
            },
        );
        config.preset_profiles.insert("lean".to_string(), profile);

        let effective = merge_preset_profile(&config);
        let build = effective.phase("build").expect("build phase");
        assert_eq!(build.governance_gate, "architecture_review");
        assert_eq!(build.expected_duration_weeks, Some(3));
    }

    #[test]
    fn custom_taxonomy_replaces_base_phases() {
        let mut config = base_config();
        let profile = PresetProfile {
            phases: Some(vec![
                Phase::new("ideate", "Ideate", 1, 1),
                Phase::new("scale", "Scale", 2, 2),
            ]),
            ..PresetProfile::default()
        };
        config.preset_profiles.insert("lean".to_string(), profile);

        let effective = merge_preset_profile(&config);
        let ids: Vec<_> = effective.phases.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["ideate", "scale"]);
    }

    #[test]
    fn empty_custom_taxonomy_keeps_base_phases() {
        let mut config = base_config();
        let profile = PresetProfile {
            phases: Some(Vec::new()),
            ..PresetProfile::default()
        };
        config.preset_profiles.insert("lean".to_string(), profile);

        assert_eq!(merge_preset_profile(&config).phases, config.phases);
    }

    #[test]
    fn staffing_ratios_are_copied_and_unknown_ids_ignored() {
        let mut config = base_config();
        let mut profile = PresetProfile::default();
        let ratio: StaffingRatio = [("engineer".to_string(), 3)].into_iter().collect();
        profile.staffing_ratios.insert("discover".to_string(), ratio.clone());
        profile
            .phase_overrides
            .insert("missing".to_string(), PhaseOverride::default());
        config.preset_profiles.insert("lean".to_string(), profile);

        let effective = merge_preset_profile(&config);
        assert_eq!(effective.phases.len(), 2);
        assert_eq!(
            effective.phase("discover").expect("discover").staffing_ratio,
            ratio
        );
    }

    #[test]
    fn with_active_preset_switches_key_only() {
        let config = base_config();
        let switched = with_active_preset(&config, "other");
        assert_eq!(switched.active_preset, "other");
        assert_eq!(switched.phases, config.phases);
    }
}
