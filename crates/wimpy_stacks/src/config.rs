//! Stack configuration.

use serde::{Deserialize, Serialize};

use crate::error::{StackError, StackResult};
use crate::network::{NetworkLayout, ZONE_COUNT};

/// Zones the environment template spreads its subnets over by default.
pub const DEFAULT_AVAILABILITY_ZONES: [&str; ZONE_COUNT] = ["eu-west-1a", "eu-west-1b", "eu-west-1c"];

/// Settings for one environment stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Second octet of the environment's `/16`.
    pub index: u8,
    pub availability_zones: Vec<String>,
}

impl EnvironmentConfig {
    pub fn new(index: u8) -> Self {
        Self {
            index,
            availability_zones: DEFAULT_AVAILABILITY_ZONES
                .iter()
                .map(|zone| zone.to_string())
                .collect(),
        }
    }

    pub fn with_availability_zones<I, S>(mut self, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.availability_zones = zones.into_iter().map(Into::into).collect();
        self
    }

    pub fn layout(&self) -> NetworkLayout {
        NetworkLayout::new(self.index)
    }

    pub fn validate(&self) -> StackResult<()> {
        if self.availability_zones.len() != ZONE_COUNT {
            return Err(StackError::AvailabilityZones {
                expected: ZONE_COUNT,
                actual: self.availability_zones.len(),
            });
        }
        Ok(())
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_zones() {
        let config = EnvironmentConfig::new(3);
        assert_eq!(config.availability_zones, DEFAULT_AVAILABILITY_ZONES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_zones() {
        let config = EnvironmentConfig::new(3)
            .with_availability_zones(["us-east-1a", "us-east-1b", "us-east-1d"]);
        assert_eq!(config.availability_zones[2], "us-east-1d");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_wrong_zone_count() {
        let config = EnvironmentConfig::new(3).with_availability_zones(["eu-west-1a"]);
        assert!(matches!(
            config.validate(),
            Err(StackError::AvailabilityZones { expected: 3, actual: 1 })
        ));
    }
}
