//! Configuration validation rules.
//!
//! Names must be non-empty (they end up in argv and registry paths),
//! timeouts must be positive and the runtime major version pinned.

use crate::config::schema::WslstrapConfig;
use crate::error::{Result, WslstrapError};

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

/// Validate a configuration and return all errors.
///
/// Collects every problem rather than stopping at the first one.
pub fn validate_config(config: &WslstrapConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let required = [
        ("distro", config.distro.as_str()),
        ("runtime.package", config.runtime.package.as_str()),
        ("runtime.package_manager", config.runtime.package_manager.as_str()),
        ("runtime.setup_url", config.runtime.setup_url.as_str()),
        ("application.binary", config.application.binary.as_str()),
        ("application.package", config.application.package.as_str()),
        ("integration.key", config.integration.key.as_str()),
        ("integration.launcher_file", config.integration.launcher_file.as_str()),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(ValidationError {
                field: field.to_string(),
                message: format!("'{}' must not be empty", field),
            });
        }
    }

    if config.distro.contains(char::is_whitespace) {
        errors.push(ValidationError {
            field: "distro".to_string(),
            message: format!("distro name '{}' must not contain whitespace", config.distro),
        });
    }

    if config.integration.key.contains('\\') {
        errors.push(ValidationError {
            field: "integration.key".to_string(),
            message: "'integration.key' must be a single key name".to_string(),
        });
    }

    if config.runtime.major_version == 0 {
        errors.push(ValidationError {
            field: "runtime.major_version".to_string(),
            message: "'runtime.major_version' must be greater than 0".to_string(),
        });
    }

    for (field, secs) in [
        ("timeouts.command_secs", config.timeouts.command_secs),
        ("timeouts.probe_secs", config.timeouts.probe_secs),
    ] {
        if secs == 0 {
            errors.push(ValidationError {
                field: field.to_string(),
                message: format!("'{}' must be greater than 0", field),
            });
        }
    }

    errors
}

/// Validate, joining every error into one message.
pub fn validate(config: &WslstrapConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }

    let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
    Err(WslstrapError::ConfigValidationError {
        message: messages.join("; "),
    })
}
