//! Classifier configuration.

/// Tolerance settings for lattice classification and layout guessing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierConfig {
    /// Relative tolerance for lengths and absolute tolerance for angle
    /// cosines.
    pub tolerance: f64,
}

impl ClassifierConfig {
    /// Single precision resolution, the default tolerance.
    pub const SINGLE_PRECISION: f64 = f32::EPSILON as f64;

    /// Create a configuration with an explicit tolerance.
    #[inline]
    pub const fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Builder-style tolerance setter.
    #[inline]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err("tolerance must be positive and finite".to_string());
        }
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::new(Self::SINGLE_PRECISION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_single_precision() {
        let config = ClassifierConfig::default();
        assert_eq!(config.tolerance, f32::EPSILON as f64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(ClassifierConfig::new(0.0).validate().is_err());
        assert!(ClassifierConfig::new(-1e-3).validate().is_err());
        assert!(ClassifierConfig::new(f64::NAN).validate().is_err());
        assert!(ClassifierConfig::default()
            .with_tolerance(1e-6)
            .validate()
            .is_ok());
    }
}
