//! Full configuration validation.
//!
//! Validates numeric ranges, URL schemes, and that every selector in the
//! widget mapping table is present.

mod helpers;
mod sections;


use crate::schema::EaselConfig;
use easel_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &EaselConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sections::validate_editor(&mut errors, config);
    sections::validate_host(&mut errors, config);
    sections::validate_widgets(&mut errors, config);
    sections::validate_window(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
