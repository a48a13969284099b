//! # Engine Primitives
//!
//! Hardcoded constants for the phase engine.
//!
//! The engine starts from externally supplied configuration but fixed logic.
//! These values are compiled into the binary and are immutable at runtime.

// =============================================================================
// BYPASS STATES
// =============================================================================

/// Reserved id returned when the engine is switched off.
pub const DISABLED_PHASE_ID: &str = "disabled";

/// Reserved id returned while the operating-model gate is still closed.
pub const UNPHASED_PHASE_ID: &str = "unphased";

/// Reserved id returned when no phase maps the item's status.
pub const UNMAPPED_PHASE_ID: &str = "unmapped";

pub const DISABLED_PHASE_NAME: &str = "Disabled";
pub const UNPHASED_PHASE_NAME: &str = "Unphased";
pub const UNMAPPED_PHASE_NAME: &str = "Unmapped";

pub const DISABLED_PHASE_COLOR: &str = "#9CA3AF";
pub const UNPHASED_PHASE_COLOR: &str = "#6B7280";
pub const UNMAPPED_PHASE_COLOR: &str = "#D1D5DB";

/// Phase ids a configuration may not use.
pub const RESERVED_PHASE_IDS: [&str; 3] = [DISABLED_PHASE_ID, UNPHASED_PHASE_ID, UNMAPPED_PHASE_ID];

/// Governance gate id meaning "no review body".
pub const NO_GOVERNANCE_GATE: &str = "none";

// =============================================================================
// CANONICAL FORMAT
// =============================================================================

/// Magic bytes prefixed to canonical configuration bytes.
pub const MAGIC_BYTES: &[u8; 4] = b"TOMC";

/// Current canonical format version.
///
/// Increment this when making breaking changes to the canonical encoding.
pub const FORMAT_VERSION: u8 = 1;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum number of items accepted by a single summary request.
///
/// Summaries are O(items * phases); this bounds a single request.
pub const MAX_SUMMARY_ITEMS: usize = 100_000;

/// Maximum number of phases in one phase list.
pub const MAX_PHASES: usize = 256;
