//! Address plan for environment VPCs.
//!
//! Every environment gets `10.<index>.0.0/16`. Each availability zone owns
//! a 64-wide slice of third octets; inside it the app tier takes the first
//! `/19`, followed by the ELB `/20` and the DB `/20`.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::error::{StackError, StackResult};

/// Number of availability zones an environment spans.
pub const ZONE_COUNT: usize = 3;

const ZONE_STRIDE: usize = 64;

/// Subnet tiers of an environment VPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubnetTier {
    Elb,
    App,
    Db,
}

impl SubnetTier {
    pub fn all() -> [Self; 3] {
        [SubnetTier::Elb, SubnetTier::App, SubnetTier::Db]
    }

    /// Prefix of logical names, e.g. `ELB` in `ELBSubnet1`.
    pub fn logical_prefix(&self) -> &'static str {
        match self {
            SubnetTier::Elb => "ELB",
            SubnetTier::App => "App",
            SubnetTier::Db => "DB",
        }
    }

    /// Short name used in `Name` tags.
    pub fn tag(&self) -> &'static str {
        match self {
            SubnetTier::Elb => "elb",
            SubnetTier::App => "app",
            SubnetTier::Db => "db",
        }
    }

    pub fn prefix_len(&self) -> u8 {
        match self {
            SubnetTier::Elb => 20,
            SubnetTier::App => 19,
            SubnetTier::Db => 20,
        }
    }

    /// Whether route tables in this tier get a default route to the internet gateway.
    pub fn is_public(&self) -> bool {
        matches!(self, SubnetTier::Elb | SubnetTier::App)
    }

    fn zone_offset(&self) -> usize {
        match self {
            SubnetTier::App => 0,
            SubnetTier::Elb => 32,
            SubnetTier::Db => 48,
        }
    }
}

impl std::fmt::Display for SubnetTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// CIDR blocks for one environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkLayout {
    index: u8,
}

impl NetworkLayout {
    pub fn new(index: u8) -> Self {
        Self { index }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn vpc_cidr(&self) -> String {
        format!("{}/16", Ipv4Addr::new(10, self.index, 0, 0))
    }

    /// CIDR of a tier's subnet in the zone at `zone` (0-based).
    pub fn subnet_cidr(&self, tier: SubnetTier, zone: usize) -> StackResult<String> {
        if zone >= ZONE_COUNT {
            return Err(StackError::ZoneOutOfRange(zone));
        }
        let octet = u8::try_from(zone * ZONE_STRIDE + tier.zone_offset())
            .map_err(|_| StackError::ZoneOutOfRange(zone))?;
        Ok(format!(
            "{}/{}",
            Ipv4Addr::new(10, self.index, octet, 0),
            tier.prefix_len()
        ))
    }
}
