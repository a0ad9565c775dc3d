use crate::error::{Result, ShamirError};

/// How the highest-order coefficient of a sharing polynomial is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoefficientPolicy {
    /// Resample the leading coefficient until it is nonzero, so the
    /// polynomial has degree exactly `threshold - 1`
    NonZeroLeading,
    /// Draw every coefficient uniformly; the realized degree may be lower
    /// than `threshold - 1` with probability about `1/p`
    Unrestricted,
}

impl Default for CoefficientPolicy {
    fn default() -> Self {
        Self::NonZeroLeading
    }
}

/// Configuration options for splitting and reconstruction
#[derive(Debug, Clone)]
pub struct Config {
    /// Policy for the leading polynomial coefficient
    pub coefficient_policy: CoefficientPolicy,
    /// Smallest number of shares `reconstruct_with_config` accepts
    pub min_points: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            coefficient_policy: CoefficientPolicy::default(),
            min_points: 1,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the leading coefficient policy
    pub fn with_coefficient_policy(mut self, policy: CoefficientPolicy) -> Self {
        self.coefficient_policy = policy;
        self
    }

    /// Sets the minimum number of shares required at reconstruction
    pub fn with_min_points(mut self, min_points: usize) -> Result<Self> {
        if min_points == 0 {
            return Err(ShamirError::InvalidConfig(
                "Minimum point count cannot be zero".into(),
            ));
        }
        self.min_points = min_points;
        Ok(self)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.min_points == 0 {
            return Err(ShamirError::InvalidConfig(
                "Minimum point count cannot be zero".into(),
            ));
        }

        Ok(())
    }
}
