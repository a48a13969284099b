//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.
//!
//! Field names are camelCase, matching the core types they wrap.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tomgate_core::{
    DerivedPhase, GovernanceGateInput, ItemSnapshot, Phase, PhaseReadiness, PhaseSignals,
    PhaseTransitionInfo,
};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// PRESET QUERY
// =============================================================================

/// Optional `?preset=<key>` accepted by every evaluation route.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresetQuery {
    pub preset: Option<String>,
}

// =============================================================================
// PHASES RESPONSE
// =============================================================================

/// Effective phases of a preset, sorted by `order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhasesResponse {
    pub enabled: bool,
    pub active_preset: String,
    pub phases: Vec<Phase>,
}

// =============================================================================
// HASH RESPONSE
// =============================================================================

/// Fingerprint of the effective configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashResponse {
    pub success: bool,
    pub active_preset: String,
    /// FNV-1a checksum as 16 hex digits.
    pub checksum: Option<String>,
    /// BLAKE3 hash as 64 hex digits.
    pub hash: Option<String>,
    pub algorithm: String,
    pub error: Option<String>,
}

impl HashResponse {
    pub fn success(active_preset: impl Into<String>, checksum: u64, hash: String) -> Self {
        Self {
            success: true,
            active_preset: active_preset.into(),
            checksum: Some(format!("{:016x}", checksum)),
            hash: Some(hash),
            algorithm: "blake3".to_string(),
            error: None,
        }
    }

    pub fn error(active_preset: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            success: false,
            active_preset: active_preset.into(),
            checksum: None,
            hash: None,
            algorithm: "blake3".to_string(),
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// DERIVE REQUEST
// =============================================================================

/// Phase derivation request. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeriveRequest {
    pub status: Option<String>,
    pub deployment: Option<String>,
    pub phase_override: Option<String>,
    pub governance_gates: Option<GovernanceGateInput>,
}

impl DeriveRequest {
    /// The derivation triple carried by this request.
    #[must_use]
    pub fn signals(&self) -> PhaseSignals {
        PhaseSignals {
            status: self.status.clone(),
            deployment: self.deployment.clone(),
            phase_override: self.phase_override.clone(),
        }
    }
}

// =============================================================================
// READINESS REQUEST/RESPONSE
// =============================================================================

/// Readiness request. Without `phaseId` the item's own derived phase is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessRequest {
    pub item: ItemSnapshot,
    #[serde(default)]
    pub phase_id: Option<String>,
}

/// Readiness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResponse {
    /// The phase that was evaluated.
    pub phase_id: String,
    /// Present when the phase was derived from the item rather than given.
    pub derived_phase: Option<DerivedPhase>,
    pub readiness: PhaseReadiness,
}

// =============================================================================
// TRANSITION REQUEST/RESPONSE
// =============================================================================

/// Transition request: the item as stored, and the signals it would have after
/// the proposed change.
///
/// Gates default to the item's recorded `governance` flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    pub item: ItemSnapshot,
    pub after: PhaseSignals,
    #[serde(default)]
    pub governance_gates: Option<GovernanceGateInput>,
}

/// Transition response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionResponse {
    #[serde(flatten)]
    pub info: PhaseTransitionInfo,
    pub show_warning: bool,
}

// =============================================================================
// SUMMARY REQUEST/RESPONSE
// =============================================================================

/// Portfolio summary request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryRequest {
    pub items: Vec<ItemSnapshot>,
}

/// Portfolio summary response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub success: bool,
    pub total: usize,
    pub counts: BTreeMap<String, usize>,
    pub error: Option<String>,
}

impl SummaryResponse {
    pub fn success(counts: BTreeMap<String, usize>) -> Self {
        Self {
            success: true,
            total: counts.values().sum(),
            counts,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            total: 0,
            counts: BTreeMap::new(),
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
