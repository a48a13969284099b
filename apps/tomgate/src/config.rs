//! # Config Loader
//!
//! Reads a [`TomConfig`] from disk for the CLI and the server.
//!
//! - `.json` files are parsed as JSON, anything else as TOML
//! - A missing file falls back to the canonical default, with a warning
//! - Loaded configurations are validated before use; non-fatal findings are
//!   logged
//!
//! The loader is the only place the binary touches the filesystem for
//! configuration. Work-item files read by the CLI go through the same path
//! and size checks.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tomgate_core::{
    TomConfig, TomError, config_warnings, default_config, resolver::with_active_preset,
    validate_config,
};

/// Default configuration path, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "tomgate.toml";

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum configuration file size (10 MB).
pub const MAX_CONFIG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Maximum work-item file size (100 MB).
///
/// Item files can be large portfolio exports.
pub const MAX_ITEMS_FILE_SIZE: u64 = 100 * 1024 * 1024;

// =============================================================================
// FORMAT
// =============================================================================

/// On-disk configuration format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// `.json` (any case) is JSON; everything else is TOML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

/// Parse configuration text in the given format.
pub fn parse_config(text: &str, format: ConfigFormat) -> Result<TomConfig, TomError> {
    match format {
        ConfigFormat::Toml => {
            toml::from_str(text).map_err(|e| TomError::DeserializationError(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(text).map_err(|e| TomError::DeserializationError(e.to_string()))
        }
    }
}

/// Render a configuration in the given format.
pub fn render_config(config: &TomConfig, format: ConfigFormat) -> Result<String, TomError> {
    match format {
        ConfigFormat::Toml => toml::to_string_pretty(config)
            .map_err(|e| TomError::SerializationError(e.to_string())),
        ConfigFormat::Json => serde_json::to_string_pretty(config)
            .map_err(|e| TomError::SerializationError(e.to_string())),
    }
}

// =============================================================================
// PATH VALIDATION
// =============================================================================

/// Reject files larger than `max_size` before reading them.
pub fn validate_file_size(path: &Path, max_size: u64) -> Result<(), TomError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| TomError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(TomError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Canonicalize an input path and ensure it names a regular file.
pub fn validate_file_path(path: &Path) -> Result<PathBuf, TomError> {
    let canonical = path.canonicalize().map_err(|e| {
        TomError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(TomError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Canonicalize the parent of an output path and ensure it is a directory.
pub fn validate_output_path(path: &Path) -> Result<PathBuf, TomError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        TomError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(TomError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| TomError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// LOADING
// =============================================================================

/// Read and parse a configuration file without validating it.
///
/// A path that does not exist yields [`default_config`].
pub fn read_config(path: &Path) -> Result<TomConfig, TomError> {
    if !path.exists() {
        tracing::warn!(
            "Config file {:?} not found, using the built-in default configuration",
            path
        );
        return Ok(default_config());
    }

    let validated = validate_file_path(path)?;
    validate_file_size(&validated, MAX_CONFIG_FILE_SIZE)?;

    let text = std::fs::read_to_string(&validated)
        .map_err(|e| TomError::IoError(format!("Read config: {}", e)))?;

    let config = parse_config(&text, ConfigFormat::from_path(&validated))?;
    tracing::debug!(
        "Loaded config from {:?} ({} base phases, preset '{}')",
        validated,
        config.phases.len(),
        config.active_preset
    );
    Ok(config)
}

/// Read, switch preset if asked, validate, and log warnings.
///
/// The returned configuration is the stored (base) one; callers merge the
/// preset profile on demand.
pub fn load_config(path: &Path, preset: Option<&str>) -> Result<TomConfig, TomError> {
    let mut config = read_config(path)?;

    if let Some(preset) = preset {
        config = with_active_preset(&config, preset);
    }

    validate_config(&config)?;

    for warning in config_warnings(&config) {
        tracing::warn!("Config: {}", warning);
    }

    Ok(config)
}

/// Write a configuration, refusing to overwrite unless `force` is set.
pub fn write_config(path: &Path, config: &TomConfig, force: bool) -> Result<PathBuf, TomError> {
    if path.exists() && !force {
        return Err(TomError::IoError(format!(
            "Config file {:?} already exists. Use --force to overwrite.",
            path
        )));
    }

    let output = validate_output_path(path)?;
    let text = render_config(config, ConfigFormat::from_path(&output))?;
    std::fs::write(&output, text).map_err(|e| TomError::IoError(format!("Write config: {}", e)))?;
    Ok(output)
}

/// Read a JSON document (a work item or a list of them) from disk.
pub fn read_json_file<T: DeserializeOwned>(path: &Path, max_size: u64) -> Result<T, TomError> {
    let validated = validate_file_path(path)?;
    validate_file_size(&validated, max_size)?;

    let contents = std::fs::read(&validated)
        .map_err(|e| TomError::IoError(format!("Read file: {}", e)))?;

    serde_json::from_slice(&contents).map_err(|e| {
        TomError::DeserializationError(format!("{}: {}", validated.display(), e))
    })
}

// =============================================================================
// TESTS
// =============================================================================
