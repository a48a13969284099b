//! # Core Type Definitions
//!
//! This module contains the data model of the phase engine:
//! - Configuration aggregate (`TomConfig`, `Phase`, `PresetProfile`, ...)
//! - Derivation inputs (`GovernanceGateInput`, `PhaseSignals`, `ItemSnapshot`)
//! - Derivation outputs (`DerivedPhase`, `MatchedBy`, `BypassState`)
//! - Error types (`TomError`)
//!
//! ## Wire Shape
//!
//! Every type serializes with camelCase field names so that the JSON shape
//! of a stored configuration or work item round-trips without loss.
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer values only (no floating-point)
//! - Use `BTreeMap` for keyed data so iteration order is stable

use crate::primitives::{
    DISABLED_PHASE_COLOR, DISABLED_PHASE_ID, DISABLED_PHASE_NAME, NO_GOVERNANCE_GATE,
    UNMAPPED_PHASE_COLOR, UNMAPPED_PHASE_ID, UNMAPPED_PHASE_NAME, UNPHASED_PHASE_COLOR,
    UNPHASED_PHASE_ID, UNPHASED_PHASE_NAME,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Values copied into a work item when it enters a phase (field -> value).
pub type PhaseDefaults = BTreeMap<String, String>;

/// Staffing guidance for a phase (role -> headcount).
pub type StaffingRatio = BTreeMap<String, u32>;

// =============================================================================
// PHASE
// =============================================================================

/// Named data-completeness preconditions attached to a phase.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataRequirements {
    /// Checked before an item enters the phase.
    pub entry: Vec<String>,
    /// Checked before an item leaves the phase.
    pub exit: Vec<String>,
}

impl DataRequirements {
    /// Create requirement lists from string slices.
    #[must_use]
    pub fn new(entry: &[&str], exit: &[&str]) -> Self {
        Self {
            entry: entry.iter().map(|s| (*s).to_string()).collect(),
            exit: exit.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Total number of declared requirements (entry + exit).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entry.len().saturating_add(self.exit.len())
    }

    /// True when the phase declares no requirements at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entry.is_empty() && self.exit.is_empty()
    }
}

/// A named stage in the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    /// Unique key within an effective configuration.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Badge color, copied into the derived result.
    #[serde(default)]
    pub color: String,
    /// Canonical sequence position, used for "next phase" and default entry.
    pub order: u32,
    /// Tie-break key among status-matched phases. Lower wins.
    pub priority: u32,
    #[serde(default)]
    pub mapped_statuses: Vec<String>,
    #[serde(default)]
    pub mapped_deployments: Vec<String>,
    /// Never selected automatically; only reachable by explicit override.
    #[serde(default)]
    pub manual_only: bool,
    /// Review body that owns the gate, or `"none"`.
    #[serde(default = "default_governance_gate")]
    pub governance_gate: String,
    #[serde(default)]
    pub expected_duration_weeks: Option<u32>,
    #[serde(default)]
    pub data_requirements: DataRequirements,
    #[serde(default)]
    pub phase_defaults: PhaseDefaults,
    #[serde(default)]
    pub staffing_ratio: StaffingRatio,
}

fn default_governance_gate() -> String {
    NO_GOVERNANCE_GATE.to_string()
}

impl Phase {
    /// Create a phase with the given identity and position; everything else empty.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, order: u32, priority: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            color: String::new(),
            order,
            priority,
            mapped_statuses: Vec::new(),
            mapped_deployments: Vec::new(),
            manual_only: false,
            governance_gate: default_governance_gate(),
            expected_duration_weeks: None,
            data_requirements: DataRequirements::default(),
            phase_defaults: PhaseDefaults::new(),
            staffing_ratio: StaffingRatio::new(),
        }
    }

    /// Builder: set the statuses that imply this phase.
    #[must_use]
    pub fn with_statuses(mut self, statuses: &[&str]) -> Self {
        self.mapped_statuses = statuses.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Builder: set the deployments that disambiguate this phase.
    #[must_use]
    pub fn with_deployments(mut self, deployments: &[&str]) -> Self {
        self.mapped_deployments = deployments.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Builder: set the entry and exit requirement names.
    #[must_use]
    pub fn with_requirements(mut self, entry: &[&str], exit: &[&str]) -> Self {
        self.data_requirements = DataRequirements::new(entry, exit);
        self
    }

    /// Builder: mark the phase as reachable only by manual override.
    #[must_use]
    pub fn manual_only(mut self) -> Self {
        self.manual_only = true;
        self
    }

    /// Whether this phase maps the given status label.
    #[must_use]
    pub fn maps_status(&self, status: &str) -> bool {
        self.mapped_statuses.iter().any(|s| s == status)
    }

    /// Whether this phase maps the given deployment label.
    #[must_use]
    pub fn maps_deployment(&self, deployment: &str) -> bool {
        self.mapped_deployments.iter().any(|d| d == deployment)
    }

    /// Whether a review body must sign off on this phase.
    #[must_use]
    pub fn is_gated(&self) -> bool {
        self.governance_gate != NO_GOVERNANCE_GATE
    }
}

// =============================================================================
// PRESETS
// =============================================================================

/// Display metadata for a named configuration variant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preset {
    pub name: String,
    pub description: String,
}

/// Partial per-phase override carried by a preset profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhaseOverride {
    pub governance_gate: Option<String>,
    pub expected_duration_weeks: Option<u32>,
}

/// Display metadata for a delivery track. Not used by derivation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliveryTrack {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// The overrides a preset applies on top of the base configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PresetProfile {
    /// Keyed by phase id.
    pub phase_overrides: BTreeMap<String, PhaseOverride>,
    /// Keyed by phase id.
    pub staffing_ratios: BTreeMap<String, StaffingRatio>,
    pub delivery_tracks: Vec<DeliveryTrack>,
    /// Full replacement taxonomy. Replaces the base phases when non-empty.
    pub phases: Option<Vec<Phase>>,
}

// =============================================================================
// TOM CONFIG (root aggregate)
// =============================================================================

/// A review body that can own a governance gate. Display only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GovernanceBody {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Declared match order and fallback policy.
///
/// Informational only: derivation always follows the fixed sequence in
/// [`crate::derivation::derive_phase`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DerivationRules {
    pub match_order: Vec<String>,
    pub fallback: String,
}

/// Root configuration aggregate for the phase engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TomConfig {
    pub enabled: bool,
    pub active_preset: String,
    #[serde(default)]
    pub presets: BTreeMap<String, Preset>,
    #[serde(default)]
    pub preset_profiles: BTreeMap<String, PresetProfile>,
    /// Base phase list. List order is significant: status matches and
    /// tie-breaks resolve to the earliest phase in this list.
    #[serde(default)]
    pub phases: Vec<Phase>,
    #[serde(default)]
    pub governance_bodies: Vec<GovernanceBody>,
    #[serde(default)]
    pub derivation_rules: DerivationRules,
}

impl TomConfig {
    /// Look up a phase by id.
    #[must_use]
    pub fn phase(&self, id: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == id)
    }

    /// Look up a phase by its `order` value. First in list order wins.
    #[must_use]
    pub fn phase_at_order(&self, order: u32) -> Option<&Phase> {
        self.phases.iter().find(|p| p.order == order)
    }

    /// Phases sorted by `order`, ties kept in list order.
    #[must_use]
    pub fn phases_in_order(&self) -> Vec<&Phase> {
        let mut sorted: Vec<&Phase> = self.phases.iter().collect();
        sorted.sort_by_key(|p| p.order);
        sorted
    }
}

// =============================================================================
// DERIVATION INPUTS
// =============================================================================

/// Governance gate flags supplied alongside a derivation request.
///
/// Only `operating_model_passed` gates phase entry; the other flags are
/// carried for callers and ignored by derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceGateInput {
    pub operating_model_passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intake_passed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rai_passed: Option<bool>,
}

impl GovernanceGateInput {
    /// Gate input with only the operating-model flag set.
    #[must_use]
    pub const fn operating_model(passed: bool) -> Self {
        Self {
            operating_model_passed: passed,
            intake_passed: None,
            rai_passed: None,
        }
    }
}

/// The three signals a phase is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhaseSignals {
    pub status: Option<String>,
    pub deployment: Option<String>,
    pub phase_override: Option<String>,
}

impl PhaseSignals {
    /// Signals with only a status.
    #[must_use]
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    /// Builder: set the deployment label.
    #[must_use]
    pub fn with_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = Some(deployment.into());
        self
    }

    /// Builder: set the manual override phase id.
    #[must_use]
    pub fn with_override(mut self, phase_id: impl Into<String>) -> Self {
        self.phase_override = Some(phase_id.into());
        self
    }
}

/// The work-item data the engine reads.
///
/// Scores are 0-100 integers; `None` means "not scored yet".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemSnapshot {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub business_owner: Option<String>,

    pub use_case_status: Option<String>,
    pub deployment_status: Option<String>,
    pub tom_phase_override: Option<String>,

    // Value scores
    pub revenue_impact: Option<u8>,
    pub cost_savings: Option<u8>,
    pub risk_reduction: Option<u8>,
    pub strategic_alignment: Option<u8>,

    // Feasibility scores
    pub data_readiness: Option<u8>,
    pub technical_complexity: Option<u8>,
    pub adoption_readiness: Option<u8>,

    pub processes: Vec<String>,
    pub activities: Vec<String>,

    pub target_independence: Option<u8>,
    pub current_independence: Option<u8>,

    pub rai_assessment_complete: Option<bool>,
    pub implementation_plan: Option<String>,
    pub success_metrics: Vec<String>,

    /// Gate flags recorded on the item, used by the phase summary.
    pub governance: Option<GovernanceGateInput>,
}

impl ItemSnapshot {
    /// Extract the derivation triple from the item's stored fields.
    #[must_use]
    pub fn signals(&self) -> PhaseSignals {
        PhaseSignals {
            status: self.use_case_status.clone(),
            deployment: self.deployment_status.clone(),
            phase_override: self.tom_phase_override.clone(),
        }
    }
}

// =============================================================================
// DERIVATION OUTPUTS
// =============================================================================

/// Why a phase was chosen. Serialized in snake_case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedBy {
    /// Exactly one automatic phase maps the status.
    Status,
    /// Several phases map the status; the deployment picked one.
    Deployment,
    /// Several phases map the status; lowest priority won.
    Priority,
    /// Explicit override.
    Manual,
    /// The engine is switched off.
    Disabled,
    /// Nothing maps the status.
    Unmapped,
    /// No status match, but the entry gate is cleared: entry phase.
    GovernanceEntry,
    /// The entry gate has not been cleared.
    Unphased,
}

impl MatchedBy {
    /// Wire name of the tag.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchedBy::Status => "status",
            MatchedBy::Deployment => "deployment",
            MatchedBy::Priority => "priority",
            MatchedBy::Manual => "manual",
            MatchedBy::Disabled => "disabled",
            MatchedBy::Unmapped => "unmapped",
            MatchedBy::GovernanceEntry => "governance_entry",
            MatchedBy::Unphased => "unphased",
        }
    }
}

impl std::fmt::Display for MatchedBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-substantive derivation outcomes. They carry no exit obligations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BypassState {
    Disabled,
    Unphased,
    Unmapped,
}

impl BypassState {
    /// All bypass states, in summary-bucket order.
    pub const ALL: [BypassState; 3] = [
        BypassState::Unmapped,
        BypassState::Disabled,
        BypassState::Unphased,
    ];

    /// The reserved phase id for this state.
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            BypassState::Disabled => DISABLED_PHASE_ID,
            BypassState::Unphased => UNPHASED_PHASE_ID,
            BypassState::Unmapped => UNMAPPED_PHASE_ID,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            BypassState::Disabled => DISABLED_PHASE_NAME,
            BypassState::Unphased => UNPHASED_PHASE_NAME,
            BypassState::Unmapped => UNMAPPED_PHASE_NAME,
        }
    }

    #[must_use]
    pub fn color(&self) -> &'static str {
        match self {
            BypassState::Disabled => DISABLED_PHASE_COLOR,
            BypassState::Unphased => UNPHASED_PHASE_COLOR,
            BypassState::Unmapped => UNMAPPED_PHASE_COLOR,
        }
    }

    /// The match tag a derivation ending in this state carries.
    #[must_use]
    pub fn matched_by(&self) -> MatchedBy {
        match self {
            BypassState::Disabled => MatchedBy::Disabled,
            BypassState::Unphased => MatchedBy::Unphased,
            BypassState::Unmapped => MatchedBy::Unmapped,
        }
    }

    /// Parse a reserved phase id.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            DISABLED_PHASE_ID => Some(BypassState::Disabled),
            UNPHASED_PHASE_ID => Some(BypassState::Unphased),
            UNMAPPED_PHASE_ID => Some(BypassState::Unmapped),
            _ => None,
        }
    }
}

/// The single answer of a phase derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedPhase {
    pub id: String,
    pub name: String,
    pub color: String,
    pub is_override: bool,
    pub matched_by: MatchedBy,
}

impl DerivedPhase {
    /// Result for a configured phase.
    #[must_use]
    pub fn from_phase(phase: &Phase, matched_by: MatchedBy) -> Self {
        Self {
            id: phase.id.clone(),
            name: phase.name.clone(),
            color: phase.color.clone(),
            is_override: matched_by == MatchedBy::Manual,
            matched_by,
        }
    }

    /// Result for a bypass state.
    #[must_use]
    pub fn bypass(state: BypassState) -> Self {
        Self {
            id: state.id().to_string(),
            name: state.name().to_string(),
            color: state.color().to_string(),
            is_override: false,
            matched_by: state.matched_by(),
        }
    }

    /// The bypass state this result represents, if any.
    #[must_use]
    pub fn bypass_state(&self) -> Option<BypassState> {
        BypassState::from_id(&self.id)
    }
}

// =============================================================================
// FORM SECTIONS
// =============================================================================

/// Item form section where a missing requirement is filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormSection {
    Details,
    Scoring,
    Processes,
    Capability,
    Governance,
    Value,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur at the edges of the phase engine.
///
/// Evaluation itself is total; these come from configuration validation,
/// canonical encoding and the loading collaborator.
#[derive(Debug, Error)]
pub enum TomError {
    /// Two phases in the same list share an id.
    #[error("Duplicate phase id '{id}' in {scope}")]
    DuplicatePhaseId { id: String, scope: String },

    /// A phase id is empty or whitespace.
    #[error("Empty phase id in {scope}")]
    EmptyPhaseId { scope: String },

    /// A phase uses one of the reserved bypass ids.
    #[error("Phase id '{id}' in {scope} is reserved")]
    ReservedPhaseId { id: String, scope: String },

    /// A phase list exceeds `MAX_PHASES`.
    #[error("{scope} has {count} phases (maximum {max})")]
    TooManyPhases {
        scope: String,
        count: usize,
        max: usize,
    },

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
