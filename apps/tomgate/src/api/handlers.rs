//! # API Endpoint Handlers
//!
//! Every evaluation handler merges the requested preset onto the loaded base
//! configuration and runs one core operation. Nothing is stored.

use super::{
    AppState,
    types::{
        DeriveRequest, HashResponse, HealthResponse, PhasesResponse, PresetQuery,
        ReadinessRequest, ReadinessResponse, SummaryRequest, SummaryResponse, TransitionRequest,
        TransitionResponse,
    },
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tomgate_core::{
    calculate_phase_readiness, calculate_phase_summary, canonical_crypto_hash,
    config_checksum, derive_from_signals, detect_phase_transition,
    primitives::MAX_SUMMARY_ITEMS, should_show_phase_transition_warning,
};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// CONFIG HANDLERS
// =============================================================================

/// The effective configuration for the requested preset.
pub async fn config_handler(
    State(state): State<AppState>,
    Query(query): Query<PresetQuery>,
) -> impl IntoResponse {
    Json(state.effective(query.preset.as_deref()))
}

/// Effective phases, sorted by `order`.
pub async fn phases_handler(
    State(state): State<AppState>,
    Query(query): Query<PresetQuery>,
) -> impl IntoResponse {
    let effective = state.effective(query.preset.as_deref());
    let phases = effective.phases_in_order().into_iter().cloned().collect();

    Json(PhasesResponse {
        enabled: effective.enabled,
        active_preset: effective.active_preset,
        phases,
    })
}

/// Fingerprint of the effective configuration.
pub async fn hash_handler(
    State(state): State<AppState>,
    Query(query): Query<PresetQuery>,
) -> impl IntoResponse {
    let effective = state.effective(query.preset.as_deref());

    let fingerprint = config_checksum(&effective)
        .and_then(|checksum| canonical_crypto_hash(&effective).map(|hash| (checksum, hash)));

    match fingerprint {
        Ok((checksum, hash)) => (
            StatusCode::OK,
            Json(HashResponse::success(effective.active_preset, checksum, hash)),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HashResponse::error(
                effective.active_preset,
                format!("Fingerprint failed: {}", e),
            )),
        ),
    }
}

// =============================================================================
// DERIVE HANDLER
// =============================================================================

/// Derive the phase for a set of signals.
pub async fn derive_handler(
    State(state): State<AppState>,
    Query(query): Query<PresetQuery>,
    Json(request): Json<DeriveRequest>,
) -> impl IntoResponse {
    let effective = state.effective(query.preset.as_deref());
    let derived = derive_from_signals(
        &request.signals(),
        request.governance_gates.as_ref(),
        &effective,
    );

    tracing::debug!(
        phase = %derived.id,
        matched_by = %derived.matched_by,
        "Derived phase"
    );

    Json(derived)
}

// =============================================================================
// READINESS HANDLER
// =============================================================================

/// Readiness of an item in its derived (or a given) phase.
pub async fn readiness_handler(
    State(state): State<AppState>,
    Query(query): Query<PresetQuery>,
    Json(request): Json<ReadinessRequest>,
) -> impl IntoResponse {
    let effective = state.effective(query.preset.as_deref());

    let (phase_id, derived_phase) = match request.phase_id {
        Some(id) => (id, None),
        None => {
            let derived = derive_from_signals(
                &request.item.signals(),
                request.item.governance.as_ref(),
                &effective,
            );
            (derived.id.clone(), Some(derived))
        }
    };

    let readiness = calculate_phase_readiness(&request.item, &phase_id, &effective);

    Json(ReadinessResponse {
        phase_id,
        derived_phase,
        readiness,
    })
}

// =============================================================================
// TRANSITION HANDLER
// =============================================================================

/// Compare the item's current phase with the phase after a proposed change.
pub async fn transition_handler(
    State(state): State<AppState>,
    Query(query): Query<PresetQuery>,
    Json(request): Json<TransitionRequest>,
) -> impl IntoResponse {
    let effective = state.effective(query.preset.as_deref());
    let gates = request.governance_gates.or(request.item.governance);

    let info = detect_phase_transition(
        &request.item.signals(),
        &request.after,
        &request.item,
        gates.as_ref(),
        &effective,
    );
    let show_warning = should_show_phase_transition_warning(&info);

    if show_warning {
        tracing::info!(
            from = %info.from_phase_id,
            to = %info.to_phase_id,
            pending = info.exit_requirements_pending.len(),
            "Transition leaves exit requirements pending"
        );
    }

    Json(TransitionResponse { info, show_warning })
}

// =============================================================================
// SUMMARY HANDLER
// =============================================================================

/// Count items per derived phase.
pub async fn summary_handler(
    State(state): State<AppState>,
    Query(query): Query<PresetQuery>,
    Json(request): Json<SummaryRequest>,
) -> impl IntoResponse {
    if request.items.len() > MAX_SUMMARY_ITEMS {
        return (
            StatusCode::BAD_REQUEST,
            Json(SummaryResponse::error(format!(
                "Item count {} exceeds maximum {}",
                request.items.len(),
                MAX_SUMMARY_ITEMS
            ))),
        );
    }

    let effective = state.effective(query.preset.as_deref());
    let counts = calculate_phase_summary(&request.items, &effective);

    (StatusCode::OK, Json(SummaryResponse::success(counts)))
}
