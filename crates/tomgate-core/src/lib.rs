//! # tomgate-core
//!
//! The deterministic lifecycle-phase engine for tomgate - THE LOGIC.
//!
//! Given a work item's status, deployment state, optional manual override
//! and governance-gate flags, this crate derives the single lifecycle phase
//! the item occupies, evaluates whether the item carries the data that phase
//! requires, and flags state changes that would leave a phase with exit data
//! missing.
//!
//! ## Pipeline
//!
//! ```text
//! TomConfig ──► resolver ──► effective TomConfig
//!                                  │
//!   (status, deployment, override, gates) ──► derivation ──► DerivedPhase
//!                                                               │
//!                        ItemSnapshot ──► readiness ◄───────────┤
//!                                             │                 │
//!                                             └──► transition ◄─┘
//! ```
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Holds no state; every function is pure over its inputs
//! - Never fails during evaluation; bad input falls through to a bypass state
//! - Has NO async, NO network and NO file I/O (pure Rust)
//! - Uses integer arithmetic only

// =============================================================================
// MODULES
// =============================================================================

pub mod defaults;
pub mod derivation;
pub mod fingerprint;
pub mod primitives;
pub mod readiness;
pub mod resolver;
pub mod transition;
pub mod types;
pub mod validation;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    BypassState, DataRequirements, DeliveryTrack, DerivationRules, DerivedPhase, FormSection,
    GovernanceBody, GovernanceGateInput, ItemSnapshot, MatchedBy, Phase, PhaseDefaults,
    PhaseOverride, PhaseSignals, Preset, PresetProfile, StaffingRatio, TomConfig, TomError,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use defaults::default_config;
pub use derivation::{derive_from_signals, derive_phase, entry_phase};
pub use readiness::{
    DataRequirement, PhaseReadiness, calculate_phase_readiness, check_data_requirement,
};
pub use resolver::{active_profile, merge_preset_profile, with_active_preset};
pub use transition::{
    PhaseTransitionInfo, calculate_phase_summary, detect_phase_transition,
    should_show_phase_transition_warning,
};
pub use validation::{config_warnings, validate_config};

// =============================================================================
// RE-EXPORTS: Fingerprints
// =============================================================================

#[cfg(feature = "crypto-hash")]
pub use fingerprint::canonical_crypto_hash;
pub use fingerprint::{canonical_bytes, config_checksum, effective_checksum};
