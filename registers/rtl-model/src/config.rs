// Licensed under the Apache-2.0 license

//! Configuration for the model builder.
//!
//! [`BuildConfig`] controls how unnamed blocks are named, how malformed input
//! is treated, and how generated artifacts are named. It can be assembled in
//! code or read from a TOML table:
//!
//! ```toml
//! default_interface_name = "regs"
//! malformed = "warn"
//! package_file_suffix = "_reg_pkg.sv"
//! top_file_suffix = "_reg_top.sv"
//! ```

use serde::Deserialize;

/// What to do with input that breaks a layout invariant, such as a register
/// array with a zero stride or a field wider than its register.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Abort the build with [`crate::BuildError::Malformed`].
    #[default]
    Reject,
    /// Log a warning, record it, and keep the data as given.
    Warn,
}

/// Configuration for a model build.
///
/// # Example
///
/// ```
/// use registers_rtl_model::config::{BuildConfig, MalformedPolicy};
///
/// let config = BuildConfig::with_defaults()
///     .with_default_interface_name("core")
///     .with_malformed_policy(MalformedPolicy::Warn);
/// assert_eq!(config.default_interface_name, "core");
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Interface name used for a child block instantiated without a name.
    pub default_interface_name: String,

    /// Handling of malformed input.
    pub malformed: MalformedPolicy,

    /// Appended to the block name for the package-level artifact.
    pub package_file_suffix: String,

    /// Appended to the block (and interface) name for each interface artifact.
    pub top_file_suffix: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl BuildConfig {
    pub fn with_defaults() -> Self {
        Self {
            default_interface_name: "regs".to_string(),
            malformed: MalformedPolicy::Reject,
            package_file_suffix: "_reg_pkg.sv".to_string(),
            top_file_suffix: "_reg_top.sv".to_string(),
        }
    }

    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(src)?)
    }

    pub fn with_default_interface_name(mut self, name: &str) -> Self {
        self.default_interface_name = name.to_string();
        self
    }

    pub fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.malformed = policy;
        self
    }

    pub fn with_file_suffixes(mut self, package: &str, top: &str) -> Self {
        self.package_file_suffix = package.to_string();
        self.top_file_suffix = top.to_string();
        self
    }
}
