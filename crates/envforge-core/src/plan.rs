//! A fully resolved deployment: names, capacity profile, and tags.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::config::EnvforgeConfig;
use crate::environment::{Environment, EnvironmentProfile};
use crate::error::ConfigResult;
use crate::naming::ResourceNameSet;
use crate::outputs::DeploymentOutputs;
use crate::tags::TagSet;
use crate::token::UniqueToken;

/// Everything the provisioning tool needs for one deployment run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentPlan {
    pub environment: Environment,
    pub token: UniqueToken,
    pub names: ResourceNameSet,
    pub profile: EnvironmentProfile,
    pub tags: TagSet,
}

impl DeploymentPlan {
    /// Resolve a plan from a raw environment label.
    pub fn resolve(
        config: &EnvforgeConfig,
        env_label: &str,
        token: UniqueToken,
        created: NaiveDate,
    ) -> ConfigResult<Self> {
        let env: Environment = env_label.parse()?;
        Self::for_environment(config, env, token, created)
    }

    pub fn for_environment(
        config: &EnvforgeConfig,
        env: Environment,
        token: UniqueToken,
        created: NaiveDate,
    ) -> ConfigResult<Self> {
        let names = ResourceNameSet::resolve(env, &token, &config.project.prefix)?;
        let profile = env.profile();
        let tags = TagSet::build(env, &config.project, created, &config.tags)?;

        info!(
            env = %env,
            token = %token,
            resources = names.len(),
            tags = tags.len(),
            "resolved deployment plan"
        );

        Ok(DeploymentPlan {
            environment: env,
            token,
            names,
            profile,
            tags,
        })
    }

    pub fn outputs(&self) -> DeploymentOutputs {
        DeploymentOutputs::from_names(&self.names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;
    use crate::naming::ResourceRole;

    fn created() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 2).unwrap()
    }

    #[test]
    fn test_resolve_dev() {
        let token = UniqueToken::parse("abc123").unwrap();
        let plan = DeploymentPlan::resolve(&EnvforgeConfig::default(), "dev", token, created()).unwrap();
        assert_eq!(plan.names.get(ResourceRole::StorageAccount), "stabc123dev");
        assert_eq!(plan.profile.cosmos_throughput, 400);
        assert_eq!(plan.tags.get("environment"), Some("dev"));
    }

    #[test]
    fn test_resolve_unknown_env() {
        let token = UniqueToken::parse("abc123").unwrap();
        let err = DeploymentPlan::resolve(&EnvforgeConfig::default(), "qa", token, created()).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownEnvironment(_)));
    }

    #[test]
    fn test_plan_serializes_to_toml() {
        let token = UniqueToken::parse("xy9").unwrap();
        let plan = DeploymentPlan::resolve(&EnvforgeConfig::default(), "prod", token, created()).unwrap();
        let rendered = toml::to_string_pretty(&plan).unwrap();
        assert!(rendered.contains("compute_sku = \"P1v3\""));
        assert!(rendered.contains("storage_account = \"stxy9prod\""));
    }
}
