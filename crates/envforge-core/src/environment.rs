//! Deployment environments and their capacity profiles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigResult, ConfigurationError};

/// A deployment environment. The set is closed: anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub const ALL: [Environment; 3] = [Environment::Dev, Environment::Staging, Environment::Prod];

    /// Label used in resource names and tags.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Staging => "staging",
            Environment::Prod => "prod",
        }
    }

    /// Look up the static profile for this environment.
    pub fn profile(&self) -> EnvironmentProfile {
        match self {
            Environment::Dev => EnvironmentProfile {
                environment: Environment::Dev,
                cosmos_throughput: 400,
                cosmos_free_tier: true,
                compute_sku: ComputeSku::B1,
                compute_capacity: 1,
                search_sku: SearchSku::Basic,
                search_replicas: 1,
                search_partitions: 1,
                public_network_access: true,
                log_retention_days: 30,
            },
            Environment::Staging => EnvironmentProfile {
                environment: Environment::Staging,
                cosmos_throughput: 1000,
                cosmos_free_tier: false,
                compute_sku: ComputeSku::S1,
                compute_capacity: 1,
                search_sku: SearchSku::Standard,
                search_replicas: 1,
                search_partitions: 1,
                public_network_access: true,
                log_retention_days: 30,
            },
            Environment::Prod => EnvironmentProfile {
                environment: Environment::Prod,
                cosmos_throughput: 4000,
                cosmos_free_tier: false,
                compute_sku: ComputeSku::P1v3,
                compute_capacity: 2,
                search_sku: SearchSku::Standard,
                search_replicas: 2,
                search_partitions: 1,
                public_network_access: false,
                log_retention_days: 90,
            },
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigurationError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label {
            "dev" => Ok(Environment::Dev),
            "staging" => Ok(Environment::Staging),
            "prod" => Ok(Environment::Prod),
            other => Err(ConfigurationError::UnknownEnvironment(other.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// App Service plan tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComputeSku {
    B1,
    S1,
    #[serde(rename = "P1v3")]
    P1v3,
}

impl ComputeSku {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComputeSku::B1 => "B1",
            ComputeSku::S1 => "S1",
            ComputeSku::P1v3 => "P1v3",
        }
    }
}

impl fmt::Display for ComputeSku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AI Search service tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSku {
    Free,
    Basic,
    Standard,
}

impl SearchSku {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchSku::Free => "free",
            SearchSku::Basic => "basic",
            SearchSku::Standard => "standard",
        }
    }
}

impl fmt::Display for SearchSku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capacity and SKU settings for one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentProfile {
    pub environment: Environment,
    /// Provisioned Cosmos DB throughput in RU/s.
    pub cosmos_throughput: u32,
    pub cosmos_free_tier: bool,
    pub compute_sku: ComputeSku,
    /// App Service plan instance count.
    pub compute_capacity: u32,
    pub search_sku: SearchSku,
    pub search_replicas: u32,
    pub search_partitions: u32,
    /// Whether data-plane endpoints accept traffic from the public internet.
    pub public_network_access: bool,
    pub log_retention_days: u32,
}

impl EnvironmentProfile {
    /// Resolve a profile from a raw label. Unknown labels are an error, never a default.
    pub fn for_label(label: &str) -> ConfigResult<Self> {
        let env: Environment = label.parse()?;
        Ok(env.profile())
    }

    /// Every profile, in environment order.
    pub fn all() -> Vec<Self> {
        Environment::ALL.iter().map(Environment::profile).collect()
    }
}
