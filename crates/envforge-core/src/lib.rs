//! envforge core — deterministic resource names, per-environment capacity
//! profiles, and tag sets for a deployment.
//!
//! Everything here is a pure function of its inputs. Nothing talks to a
//! cloud API; callers hand the results to their provisioning tool.

pub mod config;
pub mod environment;
pub mod error;
pub mod naming;
pub mod outputs;
pub mod plan;
pub mod tags;
pub mod token;

pub use config::{EnvforgeConfig, ProjectConfig};
pub use environment::{ComputeSku, Environment, EnvironmentProfile, SearchSku};
pub use error::{ConfigResult, ConfigurationError};
pub use naming::{ProjectPrefix, ResourceNameSet, ResourceRole, resolve_name, resolve_names};
pub use outputs::DeploymentOutputs;
pub use plan::DeploymentPlan;
pub use tags::TagSet;
pub use token::UniqueToken;
