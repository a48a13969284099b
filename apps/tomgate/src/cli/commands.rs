//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Every evaluation command runs against the effective configuration (the
//! loaded configuration with its active preset merged in).

use super::proposed_signals;
use crate::api;
use crate::config::{MAX_ITEMS_FILE_SIZE, read_config, read_json_file, write_config};
use serde::Serialize;
use std::path::Path;
use tomgate_core::{
    GovernanceGateInput, ItemSnapshot, PhaseSignals, TomConfig, TomError,
    calculate_phase_readiness, calculate_phase_summary, canonical_crypto_hash, config_checksum,
    config_warnings, default_config, derive_from_signals, detect_phase_transition,
    merge_preset_profile, primitives::MAX_SUMMARY_ITEMS, resolver::with_active_preset,
    should_show_phase_transition_warning, validate_config,
};

/// Pretty-print a value as JSON on stdout.
fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

fn describe_gates(gates: Option<&GovernanceGateInput>) -> &'static str {
    match gates {
        Some(g) if g.operating_model_passed => "passed",
        Some(_) => "failed",
        None => "not supplied",
    }
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_serve(config: TomConfig, host: &str, port: u16) -> Result<(), TomError> {
    let effective = merge_preset_profile(&config);

    println!("tomgate Evaluation Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:    {}", host);
    println!("  Port:    {}", port);
    println!("  Enabled: {}", effective.enabled);
    println!("  Preset:  {}", effective.active_preset);
    println!("  Phases:  {}", effective.phases.len());
    println!();
    println!("Endpoints:");
    println!("  GET  /health     - Health check");
    println!("  GET  /config     - Effective configuration");
    println!("  GET  /phases     - Effective phases");
    println!("  GET  /hash       - Configuration fingerprint");
    println!("  POST /derive     - Derive a phase");
    println!("  POST /readiness  - Phase readiness of an item");
    println!("  POST /transition - Check a proposed change");
    println!("  POST /summary    - Phase counts");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, config).await
}

// =============================================================================
// PHASES COMMAND
// =============================================================================

/// List the effective phases in order.
pub fn cmd_phases(config: &TomConfig, json_mode: bool, verbose: bool) -> Result<(), TomError> {
    let effective = merge_preset_profile(config);
    let phases = effective.phases_in_order();

    if json_mode {
        let output = serde_json::json!({
            "enabled": effective.enabled,
            "activePreset": effective.active_preset,
            "phases": phases,
        });
        print_json(&output);
        return Ok(());
    }

    println!("tomgate Phases");
    println!("==============");
    println!("Preset:  {}", effective.active_preset);
    println!("Enabled: {}", effective.enabled);
    println!();

    for phase in &phases {
        let manual = if phase.manual_only { " (manual only)" } else { "" };
        println!("{}. {} [{}]{}", phase.order, phase.name, phase.id, manual);
        println!("   Gate:     {}", phase.governance_gate);
        println!("   Priority: {}", phase.priority);
        if let Some(weeks) = phase.expected_duration_weeks {
            println!("   Duration: {} weeks", weeks);
        }

        if verbose {
            println!("   Statuses:    {}", phase.mapped_statuses.join(", "));
            println!("   Deployments: {}", phase.mapped_deployments.join(", "));
            println!(
                "   Entry:       {}",
                phase.data_requirements.entry.join(", ")
            );
            println!(
                "   Exit:        {}",
                phase.data_requirements.exit.join(", ")
            );
            for (role, headcount) in &phase.staffing_ratio {
                println!("   Staffing:    {} x{}", role, headcount);
            }
        }
    }

    Ok(())
}

// =============================================================================
// DERIVE COMMAND
// =============================================================================

/// Derive the phase for a set of signals.
pub fn cmd_derive(
    config: &TomConfig,
    json_mode: bool,
    signals: &PhaseSignals,
    gates: Option<GovernanceGateInput>,
) -> Result<(), TomError> {
    let effective = merge_preset_profile(config);
    let derived = derive_from_signals(signals, gates.as_ref(), &effective);

    if json_mode {
        print_json(&derived);
        return Ok(());
    }

    println!("Status:     {}", signals.status.as_deref().unwrap_or("-"));
    println!("Deployment: {}", signals.deployment.as_deref().unwrap_or("-"));
    println!(
        "Override:   {}",
        signals.phase_override.as_deref().unwrap_or("-")
    );
    println!("Gate:       {}", describe_gates(gates.as_ref()));
    println!();
    println!("Phase:      {} [{}]", derived.name, derived.id);
    println!("Matched by: {}", derived.matched_by);
    if derived.is_override {
        println!("(manual override)");
    }

    Ok(())
}

// =============================================================================
// READINESS COMMAND
// =============================================================================

/// Readiness of an item in its derived (or the given) phase.
pub fn cmd_readiness(
    config: &TomConfig,
    json_mode: bool,
    input: &Path,
    phase: Option<&str>,
) -> Result<(), TomError> {
    let item: ItemSnapshot = read_json_file(input, MAX_ITEMS_FILE_SIZE)?;
    let effective = merge_preset_profile(config);

    let phase_id = match phase {
        Some(id) => id.to_string(),
        None => derive_from_signals(&item.signals(), item.governance.as_ref(), &effective).id,
    };

    let readiness = calculate_phase_readiness(&item, &phase_id, &effective);

    if json_mode {
        let output = serde_json::json!({
            "phaseId": phase_id,
            "readiness": readiness,
        });
        print_json(&output);
        return Ok(());
    }

    println!("Phase Readiness");
    println!("===============");
    match &readiness.current_phase {
        Some(current) => println!("Phase:     {} [{}]", current.name, current.id),
        None => println!("Phase:     {} (no requirements)", phase_id),
    }
    if let Some(next) = &readiness.next_phase {
        println!("Next:      {} [{}]", next.name, next.id);
    }
    println!("Readiness: {}%", readiness.readiness_percent);
    println!(
        "Progress:  {}",
        if readiness.can_progress {
            "ready to leave this phase"
        } else {
            "exit requirements pending"
        }
    );
    println!();

    let sections = [
        ("Entry met", &readiness.entry_requirements_met),
        ("Entry pending", &readiness.entry_requirements_pending),
        ("Exit met", &readiness.exit_requirements_met),
        ("Exit pending", &readiness.exit_requirements_pending),
    ];
    for (label, names) in sections {
        if !names.is_empty() {
            println!("{:<14} {}", format!("{}:", label), names.join(", "));
        }
    }

    if let Some(tab) = readiness.recommended_tab {
        println!();
        println!("Next step: fill in the {:?} section", tab);
    }

    Ok(())
}

// =============================================================================
// TRANSITION COMMAND
// =============================================================================

/// Check a proposed change to an item.
pub fn cmd_transition(
    config: &TomConfig,
    json_mode: bool,
    input: &Path,
    status: Option<String>,
    deployment: Option<String>,
    phase_override: Option<String>,
) -> Result<(), TomError> {
    let item: ItemSnapshot = read_json_file(input, MAX_ITEMS_FILE_SIZE)?;
    let effective = merge_preset_profile(config);

    let before = item.signals();
    let after = proposed_signals(&before, status, deployment, phase_override);
    let info = detect_phase_transition(
        &before,
        &after,
        &item,
        item.governance.as_ref(),
        &effective,
    );
    let show_warning = should_show_phase_transition_warning(&info);

    if json_mode {
        let output = serde_json::json!({
            "transition": info,
            "showWarning": show_warning,
        });
        print_json(&output);
        return Ok(());
    }

    if !info.has_transition {
        println!(
            "No phase change: item stays in {} [{}]",
            info.to_phase.name, info.to_phase_id
        );
        return Ok(());
    }

    println!(
        "Transition: {} [{}] -> {} [{}]",
        info.from_phase.name, info.from_phase_id, info.to_phase.name, info.to_phase_id
    );

    if info.is_exiting_unphased_or_disabled {
        println!("Leaving a bypass state; nothing to check.");
    } else if show_warning {
        println!(
            "WARNING: exit requirements still pending: {}",
            info.exit_requirements_pending.join(", ")
        );
    } else {
        println!("All exit requirements met.");
    }

    Ok(())
}

// =============================================================================
// SUMMARY COMMAND
// =============================================================================

/// Count items per derived phase.
pub fn cmd_summary(config: &TomConfig, json_mode: bool, input: &Path) -> Result<(), TomError> {
    let items: Vec<ItemSnapshot> = read_json_file(input, MAX_ITEMS_FILE_SIZE)?;

    if items.len() > MAX_SUMMARY_ITEMS {
        return Err(TomError::DeserializationError(format!(
            "Item count {} exceeds maximum {}",
            items.len(),
            MAX_SUMMARY_ITEMS
        )));
    }

    tracing::info!("Summarizing {} items from {:?}", items.len(), input);

    let effective = merge_preset_profile(config);
    let summary = calculate_phase_summary(&items, &effective);

    if json_mode {
        print_json(&summary);
        return Ok(());
    }

    println!("Phase Summary ({} items)", items.len());
    println!("=============");
    for phase in effective.phases_in_order() {
        let count = summary.get(&phase.id).copied().unwrap_or(0);
        println!("  {:<24} {}", phase.name, count);
    }
    for (id, count) in &summary {
        if effective.phase(id).is_none() {
            println!("  {:<24} {}", id, count);
        }
    }

    Ok(())
}

// =============================================================================
// VALIDATE COMMAND
// =============================================================================

/// Validate the configuration file and report warnings.
pub fn cmd_validate(path: &Path, preset: Option<&str>, json_mode: bool) -> Result<(), TomError> {
    let mut config = read_config(path)?;
    if let Some(preset) = preset {
        config = with_active_preset(&config, preset);
    }

    let result = validate_config(&config);
    let warnings = config_warnings(&config);

    if json_mode {
        let output = serde_json::json!({
            "path": path.to_string_lossy(),
            "valid": result.is_ok(),
            "error": result.as_ref().err().map(ToString::to_string),
            "warnings": warnings,
        });
        print_json(&output);
    } else {
        println!("Config:   {:?}", path);
        println!("Preset:   {}", config.active_preset);
        match &result {
            Ok(()) => println!("Valid:    yes"),
            Err(e) => println!("Valid:    no ({})", e),
        }
        for warning in &warnings {
            println!("Warning:  {}", warning);
        }
    }

    result
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Write the default configuration.
pub fn cmd_init(path: &Path, force: bool) -> Result<(), TomError> {
    let written = write_config(path, &default_config(), force)?;
    println!("Wrote default configuration to {:?}", written);
    Ok(())
}

// =============================================================================
// HASH COMMAND
// =============================================================================

/// Fingerprint the effective configuration.
pub fn cmd_hash(config: &TomConfig, json_mode: bool) -> Result<(), TomError> {
    let effective = merge_preset_profile(config);
    let checksum = config_checksum(&effective)?;
    let hash = canonical_crypto_hash(&effective)?;

    if json_mode {
        let output = serde_json::json!({
            "activePreset": effective.active_preset,
            "checksum": format!("{:016x}", checksum),
            "hash": hash,
            "algorithm": "blake3",
        });
        print_json(&output);
    } else {
        println!("Preset:   {}", effective.active_preset);
        println!("Checksum: {:016x}", checksum);
        println!("BLAKE3:   {}", hash);
    }

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_json(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).expect("write");
        path
    }

    #[test]
    fn init_then_validate() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("tomgate.toml");

        cmd_init(&path, false).expect("init");
        assert!(path.exists());
        assert!(cmd_init(&path, false).is_err());
        assert!(cmd_validate(&path, None, true).is_ok());
        assert!(cmd_validate(&path, Some("hybrid"), true).is_ok());
    }

    #[test]
    fn validate_reports_invalid_config() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_json(
            &dir,
            "bad.json",
            r#"{"enabled":true,"activePreset":"x","phases":[{"id":"unmapped","name":"U","order":1,"priority":1}]}"#,
        );
        assert!(matches!(
            cmd_validate(&path, None, true),
            Err(TomError::ReservedPhaseId { .. })
        ));
    }

    #[test]
    fn evaluation_commands_accept_item_files() {
        let dir = TempDir::new().expect("tempdir");
        let item = write_json(
            &dir,
            "item.json",
            r#"{"title":"Claims triage","useCaseStatus":"Discovery"}"#,
        );
        let items = write_json(
            &dir,
            "items.json",
            r#"[{"useCaseStatus":"Live"},{"useCaseStatus":"Nope"}]"#,
        );
        let config = default_config();

        assert!(cmd_readiness(&config, true, &item, None).is_ok());
        assert!(cmd_readiness(&config, false, &item, Some("build")).is_ok());
        assert!(
            cmd_transition(&config, true, &item, Some("In Progress".to_string()), None, None)
                .is_ok()
        );
        assert!(cmd_summary(&config, false, &items).is_ok());
    }

    #[test]
    fn missing_item_file_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let missing = dir.path().join("nope.json");
        assert!(cmd_readiness(&default_config(), true, &missing, None).is_err());
    }

    #[test]
    fn non_array_summary_input_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_json(&dir, "items.json", r#"{"items":[]}"#);
        assert!(matches!(
            cmd_summary(&default_config(), true, &path),
            Err(TomError::DeserializationError(_))
        ));
    }

    #[test]
    fn derive_and_hash_succeed_on_default() {
        let config = default_config();
        let signals = PhaseSignals::status("Pilot").with_deployment("Production");
        assert!(cmd_derive(&config, true, &signals, None).is_ok());
        assert!(cmd_hash(&config, false).is_ok());
        assert!(cmd_phases(&config, false, true).is_ok());
    }
}
