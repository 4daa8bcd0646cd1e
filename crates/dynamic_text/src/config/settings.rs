//! # Dynamic Text Configuration
//!
//! Settings for the parser, the region resolver and the pooled inline
//! elements. Every section has defaults matching the behaviour labels expect
//! out of the box, so a config file only needs to name what it overrides.
//!
//! ## Configuration Categories
//!
//! - **Logging**: default log filter used by the demo and tools
//! - **Resolver**: same-line tolerance and minimum bound size
//! - **Elements**: underline thickness and the neutral holder node name
//! - **Markup**: whether rich-text markup is interpreted at all

use serde::{Serialize, Deserialize};

use super::{Config, ConfigError};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Region resolver tolerances
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Maximum vertical distance between two glyph baselines that are
    /// still considered to be on the same line
    pub line_tolerance: f32,
    /// Minimum diagonal length of an accepted bound
    pub min_bound_size: f32,
}

impl ResolverConfig {
    /// Set the same-line tolerance
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance;
        self
    }

    /// Set the minimum bound size
    pub fn with_min_bound_size(mut self, size: f32) -> Self {
        self.min_bound_size = size;
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            line_tolerance: 0.1,
            min_bound_size: 1.0,
        }
    }
}

/// Pooled element settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementConfig {
    /// Thickness of underline bars in pixels
    pub underline_thickness: f32,
    /// Name of the node released elements are parented to
    pub pool_root_name: String,
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self {
            underline_thickness: 4.0,
            pool_root_name: "ElementPoolRoot".to_string(),
        }
    }
}

/// Markup interpretation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Default rich-text flag for new labels
    pub rich_text: bool,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self { rich_text: true }
    }
}

/// # Complete Dynamic Text Configuration
///
/// Top-level configuration that encompasses all subsystems.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicTextConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Region resolver configuration
    pub resolver: ResolverConfig,
    /// Pooled element configuration
    pub elements: ElementConfig,
    /// Markup configuration
    pub markup: MarkupConfig,
}

impl DynamicTextConfig {
    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }

    /// Set resolver configuration
    pub fn with_resolver(mut self, resolver: ResolverConfig) -> Self {
        self.resolver = resolver;
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.resolver.line_tolerance.is_finite() || self.resolver.line_tolerance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "line tolerance must be a non-negative number, got {}",
                self.resolver.line_tolerance
            )));
        }

        if !self.resolver.min_bound_size.is_finite() || self.resolver.min_bound_size < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "minimum bound size must be a non-negative number, got {}",
                self.resolver.min_bound_size
            )));
        }

        if self.elements.underline_thickness <= 0.0 {
            return Err(ConfigError::Invalid(
                "underline thickness must be positive".to_string(),
            ));
        }

        if self.elements.pool_root_name.is_empty() {
            return Err(ConfigError::Invalid(
                "pool root name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl Config for DynamicTextConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DynamicTextConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.resolver.line_tolerance, 0.1);
        assert_eq!(config.resolver.min_bound_size, 1.0);
        assert_eq!(config.elements.underline_thickness, 4.0);
        assert!(config.markup.rich_text);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = DynamicTextConfig::load_from_str(
            "text.toml",
            "[elements]\nunderline_thickness = 2.5\n",
        )
        .unwrap();

        assert_eq!(config.elements.underline_thickness, 2.5);
        assert_eq!(config.elements.pool_root_name, "ElementPoolRoot");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_ron_config() {
        let config = DynamicTextConfig::load_from_str(
            "text.ron",
            "(resolver: (line_tolerance: 0.5), markup: (rich_text: false))",
        )
        .unwrap();

        assert_eq!(config.resolver.line_tolerance, 0.5);
        assert_eq!(config.resolver.min_bound_size, 1.0);
        assert!(!config.markup.rich_text);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = DynamicTextConfig::load_from_str("text.json", "{}");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_validation_rejects_negative_tolerance() {
        let config = DynamicTextConfig::default()
            .with_resolver(ResolverConfig::default().with_line_tolerance(-1.0));

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
