//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use std::collections::BTreeMap;
use tomgate::api::{
    DeriveRequest, HashResponse, HealthResponse, PresetQuery, ReadinessRequest, SummaryRequest,
    SummaryResponse, TransitionRequest, TransitionResponse,
};
use tomgate_core::{
    ItemSnapshot, PhaseSignals, calculate_phase_readiness, default_config,
    detect_phase_transition, should_show_phase_transition_warning,
};

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[test]
fn test_health_response_serialization() {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: "0.4.2".to_string(),
    };

    let json = serde_json::to_string(&health).unwrap();
    assert!(json.contains("\"status\":\"ok\""));
    assert!(json.contains("\"version\":\"0.4.2\""));
}

// =============================================================================
// PRESET QUERY TESTS
// =============================================================================

#[test]
fn test_preset_query_optional() {
    let empty: PresetQuery = serde_json::from_str("{}").unwrap();
    assert!(empty.preset.is_none());

    let hybrid: PresetQuery = serde_json::from_str(r#"{"preset":"hybrid"}"#).unwrap();
    assert_eq!(hybrid.preset.as_deref(), Some("hybrid"));
}

// =============================================================================
// DERIVE REQUEST TESTS
// =============================================================================

#[test]
fn test_derive_request_camel_case() {
    let json = r#"{
        "status": "Pilot",
        "deployment": "Production",
        "phaseOverride": "retire",
        "governanceGates": {"operatingModelPassed": true, "raiPassed": false}
    }"#;
    let request: DeriveRequest = serde_json::from_str(json).unwrap();

    let signals = request.signals();
    assert_eq!(signals.status.as_deref(), Some("Pilot"));
    assert_eq!(signals.deployment.as_deref(), Some("Production"));
    assert_eq!(signals.phase_override.as_deref(), Some("retire"));

    let gates = request.governance_gates.unwrap();
    assert!(gates.operating_model_passed);
    assert_eq!(gates.rai_passed, Some(false));
    assert_eq!(gates.intake_passed, None);
}

#[test]
fn test_derive_request_gates_require_operating_model_flag() {
    let json = r#"{"governanceGates": {"raiPassed": true}}"#;
    assert!(serde_json::from_str::<DeriveRequest>(json).is_err());
}

#[test]
fn test_derive_request_serializes_camel_case() {
    let request = DeriveRequest {
        phase_override: Some("build".to_string()),
        ..DeriveRequest::default()
    };

    let json = serde_json::to_string(&request).unwrap();
    assert!(json.contains("\"phaseOverride\":\"build\""));
    assert!(!json.contains("phase_override"));
}

// =============================================================================
// READINESS REQUEST TESTS
// =============================================================================

#[test]
fn test_readiness_request_phase_optional() {
    let json = r#"{"item": {"title": "Forecasting", "useCaseStatus": "Discovery"}}"#;
    let request: ReadinessRequest = serde_json::from_str(json).unwrap();

    assert!(request.phase_id.is_none());
    assert_eq!(request.item.title.as_deref(), Some("Forecasting"));
    assert_eq!(request.item.use_case_status.as_deref(), Some("Discovery"));
}

#[test]
fn test_readiness_serializes_tab_in_snake_case() {
    let item = ItemSnapshot {
        title: Some("Forecasting".to_string()),
        ..ItemSnapshot::default()
    };
    let readiness = calculate_phase_readiness(&item, "discover", &default_config());

    let value = serde_json::to_value(&readiness).unwrap();
    assert_eq!(value["readinessPercent"], 25);
    assert_eq!(value["recommendedTab"], "details");
    assert_eq!(value["entryRequirementsPending"][0], "description");
    assert_eq!(value["nextPhase"]["id"], "build");
}

// =============================================================================
// TRANSITION TYPES TESTS
// =============================================================================

#[test]
fn test_transition_request_deserialization() {
    let json = r#"{
        "item": {"useCaseStatus": "Pilot", "governance": {"operatingModelPassed": true}},
        "after": {"status": "Live", "deployment": "Production"}
    }"#;
    let request: TransitionRequest = serde_json::from_str(json).unwrap();

    assert!(request.governance_gates.is_none());
    assert!(request.item.governance.unwrap().operating_model_passed);
    assert_eq!(
        request.after,
        PhaseSignals::status("Live").with_deployment("Production")
    );
}

#[test]
fn test_transition_response_is_flattened() {
    let config = default_config();
    let item = ItemSnapshot {
        use_case_status: Some("Discovery".to_string()),
        ..ItemSnapshot::default()
    };
    let info = detect_phase_transition(
        &item.signals(),
        &PhaseSignals::status("In Progress"),
        &item,
        None,
        &config,
    );
    let response = TransitionResponse {
        show_warning: should_show_phase_transition_warning(&info),
        info,
    };

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["hasTransition"], true);
    assert_eq!(value["fromPhaseId"], "discover");
    assert_eq!(value["toPhaseId"], "build");
    assert_eq!(value["showWarning"], true);
    assert_eq!(value["exitRequirementsPending"][0], "scoringComplete");
    assert!(value.get("info").is_none());

    let back: TransitionResponse = serde_json::from_value(value).unwrap();
    assert_eq!(back.info.to_phase_id, "build");
    assert!(back.show_warning);
}

// =============================================================================
// SUMMARY TYPES TESTS
// =============================================================================

#[test]
fn test_summary_request_defaults_to_empty() {
    let request: SummaryRequest = serde_json::from_str("{}").unwrap();
    assert!(request.items.is_empty());
}

#[test]
fn test_summary_response_serialization() {
    let counts: BTreeMap<String, usize> = [("build".to_string(), 4), ("unmapped".to_string(), 1)]
        .into_iter()
        .collect();
    let response = SummaryResponse::success(counts);

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"success\":true"));
    assert!(json.contains("\"total\":5"));
    assert!(json.contains("\"counts\":{\"build\":4,\"unmapped\":1}"));
    assert!(json.contains("\"error\":null"));
}

#[test]
fn test_summary_response_error() {
    let response = SummaryResponse::error("Too many items");

    assert!(!response.success);
    assert_eq!(response.total, 0);
    assert!(response.counts.is_empty());
    assert_eq!(response.error.as_deref(), Some("Too many items"));
}

// =============================================================================
// HASH RESPONSE TESTS
// =============================================================================

#[test]
fn test_hash_response_success() {
    let response = HashResponse::success("federated", u64::MAX, "ab".repeat(32));

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"activePreset\":\"federated\""));
    assert!(json.contains("\"checksum\":\"ffffffffffffffff\""));
    assert!(json.contains("\"algorithm\":\"blake3\""));
    assert!(response.error.is_none());
}

#[test]
fn test_hash_response_error() {
    let response = HashResponse::error("hybrid", "Fingerprint failed");

    assert!(!response.success);
    assert!(response.checksum.is_none());
    assert!(response.hash.is_none());
    assert_eq!(response.error.as_deref(), Some("Fingerprint failed"));
}
