//! # Default Configuration
//!
//! The one canonical default [`TomConfig`].
//!
//! Deployments normally load their own configuration; this default seeds a
//! fresh installation (`tomgate init`) and is used when no file exists.
//!
//! | Preset | Taxonomy | Notes |
//! |--------|----------|-------|
//! | `centralized` | base, four stages | every stage reviewed by a central body |
//! | `federated` | base, four stages | build and operate gates relaxed, shorter durations |
//! | `hybrid` | custom, six stages | ideate through sustain |

use crate::primitives::NO_GOVERNANCE_GATE;
use crate::types::{
    DeliveryTrack, DerivationRules, GovernanceBody, Phase, PhaseOverride, Preset, PresetProfile,
    TomConfig,
};
use std::collections::BTreeMap;

/// Preset active in a fresh installation.
pub const DEFAULT_PRESET: &str = "centralized";

/// Build the canonical default configuration.
#[must_use]
pub fn default_config() -> TomConfig {
    TomConfig {
        enabled: true,
        active_preset: DEFAULT_PRESET.to_string(),
        presets: presets(),
        preset_profiles: preset_profiles(),
        phases: base_phases(),
        governance_bodies: governance_bodies(),
        derivation_rules: DerivationRules {
            match_order: ["manual_override", "status", "deployment", "priority"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            fallback: "unmapped".to_string(),
        },
    }
}

fn phase(
    id: &str,
    name: &str,
    order: u32,
    color: &str,
    gate: &str,
    weeks: Option<u32>,
) -> Phase {
    let mut phase = Phase::new(id, name, order, order);
    phase.color = color.to_string();
    phase.governance_gate = gate.to_string();
    phase.expected_duration_weeks = weeks;
    phase
}

fn base_phases() -> Vec<Phase> {
    let mut discover = phase(
        "discover",
        "Discover & Assess",
        1,
        "#3B82F6",
        "ai_council",
        Some(4),
    )
    .with_statuses(&["Discovery", "Backlog", "Assessment"])
    .with_requirements(&["title", "description"], &["scoringComplete", "businessOwner"]);
    discover.description = "Frame the problem, size the value and check feasibility.".to_string();

    let mut build = phase("build", "Design & Build", 2, "#8B5CF6", "architecture_review", Some(12))
        .with_statuses(&["In Progress", "Pilot"])
        .with_deployments(&["Development", "Staging"])
        .with_requirements(
            &["scoringComplete", "processMapping"],
            &["implementationPlan", "raiAssessment"],
        );
    build.description = "Design the solution, map affected processes and build a pilot.".to_string();
    build
        .phase_defaults
        .insert("deploymentStatus".to_string(), "Development".to_string());

    let mut operate = phase("operate", "Deploy & Operate", 3, "#10B981", "rai_committee", Some(26))
        .with_statuses(&["Pilot", "Live", "Deployed"])
        .with_deployments(&["Production"])
        .with_requirements(&["deploymentStatus"], &["successMetrics", "capabilityData"]);
    operate.priority = 1;
    operate.description = "Run in production and track realised value.".to_string();

    let mut retire = phase("retire", "Retire", 4, "#EF4444", NO_GOVERNANCE_GATE, None)
        .with_statuses(&["Retired"])
        .manual_only();
    retire.description = "Decommissioned. Reached only by explicit override.".to_string();

    vec![discover, build, operate, retire]
}

fn hybrid_phases() -> Vec<Phase> {
    vec![
        phase("ideate", "Ideate", 1, "#0EA5E9", NO_GOVERNANCE_GATE, Some(2))
            .with_statuses(&["Discovery", "Backlog"])
            .with_requirements(&["title"], &["description"]),
        phase("validate", "Validate", 2, "#6366F1", "ai_council", Some(4))
            .with_statuses(&["Assessment"])
            .with_requirements(&["description"], &["scoringComplete", "businessOwner"]),
        phase("design", "Design", 3, "#A855F7", "architecture_review", Some(6))
            .with_statuses(&["In Progress"])
            .with_deployments(&["Development"])
            .with_requirements(&["processMapping"], &["implementationPlan"]),
        phase("build", "Build & Pilot", 4, "#F59E0B", "rai_committee", Some(10))
            .with_statuses(&["In Progress", "Pilot"])
            .with_deployments(&["Staging"])
            .with_requirements(&["implementationPlan"], &["raiAssessment"]),
        phase("scale", "Scale", 5, "#10B981", NO_GOVERNANCE_GATE, Some(20))
            .with_statuses(&["Pilot", "Live", "Deployed"])
            .with_deployments(&["Production"])
            .with_requirements(&["deploymentStatus"], &["successMetrics"]),
        phase("sustain", "Sustain", 6, "#64748B", NO_GOVERNANCE_GATE, None)
            .with_statuses(&["Retired"])
            .with_requirements(&["capabilityData"], &[])
            .manual_only(),
    ]
}

fn presets() -> BTreeMap<String, Preset> {
    [
        (
            "centralized",
            "Centralized",
            "A central AI office owns intake, review and delivery.",
        ),
        (
            "federated",
            "Federated",
            "Business units deliver independently under shared guardrails.",
        ),
        (
            "hybrid",
            "Hybrid",
            "A central hub incubates; spokes scale and sustain.",
        ),
    ]
    .into_iter()
    .map(|(key, name, description)| {
        (
            key.to_string(),
            Preset {
                name: name.to_string(),
                description: description.to_string(),
            },
        )
    })
    .collect()
}

fn staffing(pairs: &[(&str, u32)]) -> BTreeMap<String, u32> {
    pairs.iter().map(|(role, n)| ((*role).to_string(), *n)).collect()
}

fn track(id: &str, name: &str, description: &str) -> DeliveryTrack {
    DeliveryTrack {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    }
}

fn preset_profiles() -> BTreeMap<String, PresetProfile> {
    let mut profiles = BTreeMap::new();

    let mut centralized = PresetProfile::default();
    centralized
        .staffing_ratios
        .insert("build".to_string(), staffing(&[("engineer", 3), ("analyst", 1)]));
    centralized.delivery_tracks = vec![track(
        "central",
        "Central delivery",
        "All delivery runs through the AI office.",
    )];
    profiles.insert("centralized".to_string(), centralized);

    let mut federated = PresetProfile::default();
    federated.phase_overrides.insert(
        "build".to_string(),
        PhaseOverride {
            governance_gate: Some(NO_GOVERNANCE_GATE.to_string()),
            expected_duration_weeks: Some(8),
        },
    );
    federated.phase_overrides.insert(
        "operate".to_string(),
        PhaseOverride {
            governance_gate: None,
            expected_duration_weeks: Some(16),
        },
    );
    federated
        .staffing_ratios
        .insert("build".to_string(), staffing(&[("engineer", 2)]));
    federated.delivery_tracks = vec![
        track("business_unit", "Business unit", "Delivered inside the owning unit."),
        track("platform", "Platform", "Shared platform team delivers."),
    ];
    profiles.insert("federated".to_string(), federated);

    let hybrid = PresetProfile {
        phases: Some(hybrid_phases()),
        delivery_tracks: vec![
            track("hub", "Hub", "Incubated by the central hub."),
            track("spoke", "Spoke", "Scaled by the owning business unit."),
        ],
        ..PresetProfile::default()
    };
    profiles.insert("hybrid".to_string(), hybrid);

    profiles
}

fn governance_bodies() -> Vec<GovernanceBody> {
    [
        ("ai_council", "AI Council", "Approves intake and value cases."),
        (
            "architecture_review",
            "Architecture Review Board",
            "Reviews solution design and data flows.",
        ),
        (
            "rai_committee",
            "Responsible AI Committee",
            "Signs off on risk and fairness assessments.",
        ),
    ]
    .into_iter()
    .map(|(id, name, description)| GovernanceBody {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    })
    .collect()
}

// =============================================================================
// TESTS
// =============================================================================
