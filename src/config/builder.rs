//! Fluent builder for `ConverterConfig`

use anyhow::{Result, bail};

use super::types::ConverterConfig;

/// Builder for [`ConverterConfig`]
///
/// Every field has a default, so `ConverterConfig::builder().build()` is
/// equivalent to `ConverterConfig::default()`.
#[derive(Debug, Clone, Default)]
pub struct ConverterConfigBuilder {
    config: ConverterConfig,
}

impl ConverterConfig {
    /// Create a builder for configuring a `ConverterConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ConverterConfigBuilder {
        ConverterConfigBuilder::default()
    }
}

impl ConverterConfigBuilder {
    #[must_use]
    pub fn task_list_label(mut self, enabled: bool) -> Self {
        self.config.task_list_label = enabled;
        self
    }

    #[must_use]
    pub fn hard_breaks(mut self, enabled: bool) -> Self {
        self.config.hard_breaks = enabled;
        self
    }

    /// Set the input size ceiling; `None` disables it.
    #[must_use]
    pub fn max_input_bytes(mut self, limit: Option<usize>) -> Self {
        self.config.max_input_bytes = limit;
        self
    }

    #[must_use]
    pub fn max_nesting_depth(mut self, depth: usize) -> Self {
        self.config.max_nesting_depth = depth;
        self
    }

    #[must_use]
    pub fn preview_length(mut self, length: usize) -> Self {
        self.config.preview_length = length;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the nesting depth is zero, since no document
    /// could then be parsed at all.
    pub fn build(self) -> Result<ConverterConfig> {
        if self.config.max_nesting_depth == 0 {
            bail!("max_nesting_depth must be at least 1");
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_default() {
        let built = ConverterConfig::builder().build().expect("default config is valid");
        assert_eq!(built, ConverterConfig::default());
    }

    #[test]
    fn builder_rejects_zero_depth() {
        assert!(ConverterConfig::builder().max_nesting_depth(0).build().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ConverterConfig =
            serde_json::from_str(r#"{"task_list_label": true}"#).expect("valid json");
        assert!(config.task_list_label());
        assert_eq!(config.preview_length(), crate::utils::DEFAULT_PREVIEW_LENGTH);
    }
}
