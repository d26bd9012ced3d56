//! Translator configuration
//!
//! The two policies decide how function declarations whose parameters have
//! no static counterpart are handled.

use pyplus_common::PyPlusError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// What to do with unannotated (duck-typed) parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenericParamPolicy {
    /// Emit a template type parameter per unannotated parameter
    #[default]
    Template,
    /// Leave the whole declaration for manual porting
    Skip,
}

/// What to do with default parameter values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultParamPolicy {
    /// Keep defaults on the emitted declaration and fill gaps at call sites
    #[default]
    Keep,
    /// Drop defaults; calls relying on one are left for manual porting
    Skip,
}

impl FromStr for GenericParamPolicy {
    type Err = PyPlusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "template" => Ok(GenericParamPolicy::Template),
            "skip" => Ok(GenericParamPolicy::Skip),
            other => Err(PyPlusError::config_error(format!(
                "unknown generic parameter policy '{}' (expected template or skip)",
                other
            ))),
        }
    }
}

impl FromStr for DefaultParamPolicy {
    type Err = PyPlusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(DefaultParamPolicy::Keep),
            "skip" => Ok(DefaultParamPolicy::Skip),
            other => Err(PyPlusError::config_error(format!(
                "unknown default parameter policy '{}' (expected keep or skip)",
                other
            ))),
        }
    }
}

/// Translator configuration loaded from JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslatorConfig {
    pub generic_params: GenericParamPolicy,
    pub default_params: DefaultParamPolicy,
}

impl TranslatorConfig {
    pub fn from_json(json: &str) -> Result<Self, PyPlusError> {
        serde_json::from_str(json).map_err(|e| PyPlusError::config_error(e.to_string()))
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, PyPlusError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn with_generic_params(mut self, policy: GenericParamPolicy) -> Self {
        self.generic_params = policy;
        self
    }

    pub fn with_default_params(mut self, policy: DefaultParamPolicy) -> Self {
        self.default_params = policy;
        self
    }
}
