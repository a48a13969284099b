//! # Readiness Module
//!
//! Data-completeness evaluation for a work item in its current phase.
//!
//! Requirement names in the configuration resolve against a fixed predicate
//! table ([`DataRequirement`]). Names outside the table are never satisfied.
//!
//! ## Predicate Table
//!
//! | Name | Satisfied when | Section |
//! |------|----------------|---------|
//! | `title` | title non-blank | details |
//! | `description` | description non-blank | details |
//! | `businessOwner` | business owner non-blank | details |
//! | `scoringComplete` | one value score AND one feasibility score | scoring |
//! | `processMapping` | processes or activities listed | processes |
//! | `capabilityData` | target and current independence both set | capability |
//! | `raiAssessment` | RAI assessment marked complete | governance |
//! | `implementationPlan` | implementation plan non-blank | details |
//! | `successMetrics` | at least one non-blank metric | value |
//! | `deploymentStatus` | deployment status non-blank | details |

use crate::types::{FormSection, ItemSnapshot, Phase, TomConfig};
use serde::{Deserialize, Serialize};

// =============================================================================
// REQUIREMENT PREDICATES
// =============================================================================

/// A named data requirement the engine knows how to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataRequirement {
    Title,
    Description,
    BusinessOwner,
    ScoringComplete,
    ProcessMapping,
    CapabilityData,
    RaiAssessment,
    ImplementationPlan,
    SuccessMetrics,
    DeploymentStatus,
}

impl DataRequirement {
    /// Every known requirement.
    pub const ALL: [DataRequirement; 10] = [
        DataRequirement::Title,
        DataRequirement::Description,
        DataRequirement::BusinessOwner,
        DataRequirement::ScoringComplete,
        DataRequirement::ProcessMapping,
        DataRequirement::CapabilityData,
        DataRequirement::RaiAssessment,
        DataRequirement::ImplementationPlan,
        DataRequirement::SuccessMetrics,
        DataRequirement::DeploymentStatus,
    ];

    /// Resolve a configured requirement name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }

    /// The name used in configuration.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DataRequirement::Title => "title",
            DataRequirement::Description => "description",
            DataRequirement::BusinessOwner => "businessOwner",
            DataRequirement::ScoringComplete => "scoringComplete",
            DataRequirement::ProcessMapping => "processMapping",
            DataRequirement::CapabilityData => "capabilityData",
            DataRequirement::RaiAssessment => "raiAssessment",
            DataRequirement::ImplementationPlan => "implementationPlan",
            DataRequirement::SuccessMetrics => "successMetrics",
            DataRequirement::DeploymentStatus => "deploymentStatus",
        }
    }

    /// The item form section where this requirement is filled in.
    #[must_use]
    pub fn section(&self) -> FormSection {
        match self {
            DataRequirement::Title
            | DataRequirement::Description
            | DataRequirement::BusinessOwner
            | DataRequirement::ImplementationPlan
            | DataRequirement::DeploymentStatus => FormSection::Details,
            DataRequirement::ScoringComplete => FormSection::Scoring,
            DataRequirement::ProcessMapping => FormSection::Processes,
            DataRequirement::CapabilityData => FormSection::Capability,
            DataRequirement::RaiAssessment => FormSection::Governance,
            DataRequirement::SuccessMetrics => FormSection::Value,
        }
    }

    /// Check the requirement against an item.
    #[must_use]
    pub fn is_met(&self, item: &ItemSnapshot) -> bool {
        match self {
            DataRequirement::Title => is_filled(item.title.as_deref()),
            DataRequirement::Description => is_filled(item.description.as_deref()),
            DataRequirement::BusinessOwner => is_filled(item.business_owner.as_deref()),
            DataRequirement::ScoringComplete => {
                let value = [
                    item.revenue_impact,
                    item.cost_savings,
                    item.risk_reduction,
                    item.strategic_alignment,
                ];
                let feasibility = [
                    item.data_readiness,
                    item.technical_complexity,
                    item.adoption_readiness,
                ];
                value.iter().any(Option::is_some) && feasibility.iter().any(Option::is_some)
            }
            DataRequirement::ProcessMapping => {
                !item.processes.is_empty() || !item.activities.is_empty()
            }
            DataRequirement::CapabilityData => {
                item.target_independence.is_some() && item.current_independence.is_some()
            }
            DataRequirement::RaiAssessment => item.rai_assessment_complete == Some(true),
            DataRequirement::ImplementationPlan => is_filled(item.implementation_plan.as_deref()),
            DataRequirement::SuccessMetrics => {
                item.success_metrics.iter().any(|m| !m.trim().is_empty())
            }
            DataRequirement::DeploymentStatus => is_filled(item.deployment_status.as_deref()),
        }
    }
}

fn is_filled(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Check one named requirement. Unknown names are unsatisfied.
#[must_use]
pub fn check_data_requirement(name: &str, item: &ItemSnapshot) -> bool {
    DataRequirement::parse(name).is_some_and(|r| r.is_met(item))
}

/// Section for a requirement name. Unknown names point at the details form.
#[must_use]
pub fn requirement_section(name: &str) -> FormSection {
    DataRequirement::parse(name)
        .map(|r| r.section())
        .unwrap_or(FormSection::Details)
}

/// Split requirement names into (met, pending), keeping declared order.
#[must_use]
pub fn partition_requirements(names: &[String], item: &ItemSnapshot) -> (Vec<String>, Vec<String>) {
    names
        .iter()
        .cloned()
        .partition(|name| check_data_requirement(name, item))
}

// =============================================================================
// PHASE READINESS
// =============================================================================

/// Readiness of an item in its current phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseReadiness {
    pub current_phase: Option<Phase>,
    /// The phase at `current.order + 1`, if configured.
    pub next_phase: Option<Phase>,
    pub entry_requirements_met: Vec<String>,
    pub entry_requirements_pending: Vec<String>,
    pub exit_requirements_met: Vec<String>,
    pub exit_requirements_pending: Vec<String>,
    /// 0-100, rounded half up. 100 when nothing is declared.
    pub readiness_percent: u8,
    /// True when every exit requirement is met.
    pub can_progress: bool,
    /// Where to send the user to fix the first pending requirement.
    pub recommended_tab: Option<FormSection>,
}

/// Evaluate the item against the entry and exit requirements of `current_phase_id`.
///
/// An id that names no configured phase (including the bypass ids) has no
/// requirements, so it reports 100% and `can_progress`.
#[must_use]
pub fn calculate_phase_readiness(
    item: &ItemSnapshot,
    current_phase_id: &str,
    config: &TomConfig,
) -> PhaseReadiness {
    let current_phase = config.phase(current_phase_id).cloned();
    let next_phase = current_phase
        .as_ref()
        .and_then(|p| p.order.checked_add(1))
        .and_then(|order| config.phase_at_order(order))
        .cloned();

    let none: &[String] = &[];
    let (entry, exit) = match current_phase.as_ref() {
        Some(p) => (
            p.data_requirements.entry.as_slice(),
            p.data_requirements.exit.as_slice(),
        ),
        None => (none, none),
    };

    let (entry_met, entry_pending) = partition_requirements(entry, item);
    let (exit_met, exit_pending) = partition_requirements(exit, item);

    let total = entry.len().saturating_add(exit.len());
    let met = entry_met.len().saturating_add(exit_met.len());
    let readiness_percent = percent_rounded(met, total);

    let recommended_tab = entry_pending
        .iter()
        .chain(exit_pending.iter())
        .next()
        .map(|name| requirement_section(name));

    PhaseReadiness {
        current_phase,
        next_phase,
        can_progress: exit_pending.is_empty(),
        entry_requirements_met: entry_met,
        entry_requirements_pending: entry_pending,
        exit_requirements_met: exit_met,
        exit_requirements_pending: exit_pending,
        readiness_percent,
        recommended_tab,
    }
}

/// `round(100 * met / total)` in integer math, half rounds up.
fn percent_rounded(met: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let met = met.min(total) as u64;
    let total = total as u64;
    let scaled = met.saturating_mul(200).saturating_add(total) / total.saturating_mul(2);
    scaled.min(100) as u8
}

// =============================================================================
// TESTS
// =============================================================================
