//! Pipeline configuration.

use serde::{Deserialize, Serialize};

/// Immutable per-pipeline configuration.
///
/// Built once via the consuming `with_*` methods and held for the lifetime of
/// a pipeline instance; every flag defaults to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Emit verbose per-stage `debug!` events.
    pub debug_logging: bool,
    /// Accepted for forward compatibility; currently has no effect. The
    /// image-quality scoring stage it once gated was removed.
    pub skip_quality_check: bool,
    /// Bypass the occlusion stage entirely and go straight to liveness.
    pub skip_occlusion_check: bool,
}

impl DetectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    pub fn with_skip_quality_check(mut self, skip: bool) -> Self {
        self.skip_quality_check = skip;
        self
    }

    pub fn with_skip_occlusion_check(mut self, skip: bool) -> Self {
        self.skip_occlusion_check = skip;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_all_false() {
        let config = DetectionConfig::new();
        assert!(!config.debug_logging);
        assert!(!config.skip_quality_check);
        assert!(!config.skip_occlusion_check);
    }

    #[test]
    fn test_builder_sets_each_flag() {
        let config = DetectionConfig::new()
            .with_debug_logging(true)
            .with_skip_occlusion_check(true);
        assert!(config.debug_logging);
        assert!(!config.skip_quality_check);
        assert!(config.skip_occlusion_check);
    }

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let config: DetectionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DetectionConfig::default());
    }
}
