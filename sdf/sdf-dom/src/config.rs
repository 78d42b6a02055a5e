//! Parser configuration.
//!
//! Controls how recoverable problems found while loading are surfaced:
//! promoted to errors, logged as warnings, or logged at debug level.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorCode, Errors};

/// How a recoverable condition is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EnforcementPolicy {
    /// Append an error to the result.
    Err,
    /// Emit a `tracing` warning.
    #[default]
    Warn,
    /// Emit a `tracing` debug message.
    Log,
}

/// Configuration for [`Root::load_sdf_string_with_config`](crate::Root::load_sdf_string_with_config).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParserConfig {
    /// Policy for recoverable warnings (e.g. non-positive shape dimensions).
    pub warnings_policy: EnforcementPolicy,
    /// Policy for elements the loader does not recognize.
    pub unrecognized_elements_policy: EnforcementPolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            warnings_policy: EnforcementPolicy::Warn,
            unrecognized_elements_policy: EnforcementPolicy::Log,
        }
    }
}

impl ParserConfig {
    /// Create a config with default policies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat every recoverable condition as an error.
    #[must_use]
    pub fn pedantic() -> Self {
        Self {
            warnings_policy: EnforcementPolicy::Err,
            unrecognized_elements_policy: EnforcementPolicy::Err,
        }
    }

    /// Set the warnings policy.
    #[must_use]
    pub fn with_warnings_policy(mut self, policy: EnforcementPolicy) -> Self {
        self.warnings_policy = policy;
        self
    }

    /// Set the unrecognized elements policy.
    #[must_use]
    pub fn with_unrecognized_elements_policy(mut self, policy: EnforcementPolicy) -> Self {
        self.unrecognized_elements_policy = policy;
        self
    }

    /// Report a recoverable warning according to the warnings policy.
    pub(crate) fn warn(&self, message: &str, errors: &mut Errors) {
        report(
            self.warnings_policy,
            ErrorCode::ElementInvalid,
            message,
            errors,
        );
    }

    /// Report an unrecognized element according to its policy.
    pub(crate) fn unrecognized(&self, message: &str, errors: &mut Errors) {
        report(
            self.unrecognized_elements_policy,
            ErrorCode::ElementIncorrectType,
            message,
            errors,
        );
    }
}

fn report(policy: EnforcementPolicy, code: ErrorCode, message: &str, errors: &mut Errors) {
    match policy {
        EnforcementPolicy::Err => errors.push(Error::new(code, message)),
        EnforcementPolicy::Warn => tracing::warn!("{}", message),
        EnforcementPolicy::Log => tracing::debug!("{}", message),
    }
}
