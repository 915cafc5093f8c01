//! Configuration validation.

use crate::schema::{Config, Tier2Mode};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Whether any error concerns the given path.
    pub fn has_error_at(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path == path)
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_audit(config, &mut result);
        Self::validate_weights(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_fetch(config, &mut result);
        Self::validate_tier2(config, &mut result);

        result
    }

    fn validate_audit(config: &Config, result: &mut ValidationResult) {
        let audit = &config.audit;

        if audit.min_timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "audit.min_timeout_seconds",
                "min_timeout_seconds must be greater than 0",
            ));
        }

        if audit.min_timeout_seconds > audit.max_timeout_seconds {
            result.add_error(ValidationError::new(
                "audit.min_timeout_seconds",
                "min_timeout_seconds cannot exceed max_timeout_seconds",
            ));
        }

        if audit.default_timeout_seconds < audit.min_timeout_seconds
            || audit.default_timeout_seconds > audit.max_timeout_seconds
        {
            result.add_warning(ValidationWarning::new(
                "audit.default_timeout_seconds",
                "default_timeout_seconds lies outside [min, max] and will be clamped",
            ));
        }

        if audit.max_timeout_seconds > 1800 {
            result.add_warning(ValidationWarning::new(
                "audit.max_timeout_seconds",
                "max_timeout_seconds is very high (>1800), audits may hold browser sessions for a long time",
            ));
        }

        for (path, share) in [
            ("audit.capture_share", audit.capture_share),
            ("audit.interaction_share", audit.interaction_share),
        ] {
            if !(share > 0.0 && share < 1.0) {
                result.add_error(ValidationError::new(path, "share must lie strictly between 0 and 1"));
            }
        }

        if audit.capture_share + 2.0 * audit.interaction_share >= 1.0 {
            result.add_error(ValidationError::new(
                "audit.interaction_share",
                "capture_share + 2 * interaction_share must leave budget for Tier-2",
            ));
        }

        if !audit.agent_permission_path.starts_with('/') {
            result.add_error(ValidationError::new(
                "audit.agent_permission_path",
                "agent_permission_path must start with '/'",
            ));
        }
    }

    fn validate_weights(config: &Config, result: &mut ValidationResult) {
        for (name, weight) in config.weights.entries() {
            if weight == 0 || weight > 100 {
                result.add_error(ValidationError::new(
                    format!("weights.{}", name),
                    "weight must lie in 1..=100",
                ));
            }
        }

        let total = config.weights.total();
        if total != 100 {
            result.add_error(ValidationError::new(
                "weights",
                format!("weights sum to {}, expected exactly 100", total),
            ));
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if config.browser.debug_port == 0 {
            result.add_error(ValidationError::new("browser.debug_port", "Port cannot be 0"));
        }

        if config.browser.viewport_width == 0 || config.browser.viewport_height == 0 {
            result.add_error(ValidationError::new(
                "browser.viewport",
                "viewport dimensions must be positive",
            ));
        }
    }

    fn validate_fetch(config: &Config, result: &mut ValidationResult) {
        if config.fetch.timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "fetch.timeout_seconds",
                "timeout_seconds must be greater than 0",
            ));
        }
    }

    fn validate_tier2(config: &Config, result: &mut ValidationResult) {
        let tier2 = &config.tier2;

        match tier2.mode {
            Tier2Mode::Disabled => {
                if tier2.api_key.is_some() {
                    result.add_warning(ValidationWarning::new(
                        "tier2.api_key",
                        "api_key is set but tier2 is disabled",
                    ));
                }
            }
            Tier2Mode::Local | Tier2Mode::Remote => {
                if tier2.endpoint.is_empty() {
                    result.add_error(ValidationError::new(
                        "tier2.endpoint",
                        "endpoint is required when tier2 is enabled",
                    ));
                } else if !tier2.endpoint.starts_with("http://")
                    && !tier2.endpoint.starts_with("https://")
                {
                    result.add_error(ValidationError::new(
                        "tier2.endpoint",
                        "endpoint must be an http(s) URL",
                    ));
                }

                if tier2.health_timeout_seconds == 0 {
                    result.add_error(ValidationError::new(
                        "tier2.health_timeout_seconds",
                        "health_timeout_seconds must be greater than 0",
                    ));
                }
            }
        }

        if tier2.mode == Tier2Mode::Remote
            && tier2.api_key.as_deref().is_none_or(|k| k.is_empty())
        {
            result.add_error(ValidationError::new(
                "tier2.api_key",
                "api_key is required in remote mode",
            ));
        }

        if tier2.mode == Tier2Mode::Remote && tier2.endpoint.starts_with("http://") {
            result.add_warning(ValidationWarning::new(
                "tier2.endpoint",
                "remote endpoint uses plain http; the api key travels unencrypted",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
