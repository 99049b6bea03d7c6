//! End-to-end resolution tests.
//!
//! Exercises the public API the way a provisioning wrapper would: load a
//! config file, pick a token, resolve a plan, and check the invariants that
//! keep redeploys idempotent.

use chrono::NaiveDate;
use envforge_core::*;

fn created() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

#[test]
fn resolution_is_deterministic() {
    let prefix = ProjectPrefix::default();
    for env in Environment::ALL {
        let token = UniqueToken::parse("abc123").unwrap();
        let first = ResourceNameSet::resolve(env, &token, &prefix).unwrap();
        let second = ResourceNameSet::resolve(env, &token, &prefix).unwrap();
        assert_eq!(first, second, "names differ for {env}");
    }
}

#[test]
fn derived_tokens_give_stable_names() {
    let scope = ["4f1b0b9e-0000-4000-8000-000000000001", "rg-agents-workshop"];
    let a = resolve_names("staging", &UniqueToken::derive(&scope), &ProjectPrefix::default()).unwrap();
    let b = resolve_names("staging", &UniqueToken::derive(&scope), &ProjectPrefix::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn names_never_exceed_role_limits() {
    let prefix = ProjectPrefix::parse("a-much-longer-prefix").unwrap();
    for len in 1..=24 {
        let token = UniqueToken::parse(&"q7".repeat(12)[..len]).unwrap();
        for env in Environment::ALL {
            let names = ResourceNameSet::resolve(env, &token, &prefix).unwrap();
            for (role, name) in names.iter() {
                let rule = role.rule();
                assert!(
                    name.len() <= rule.max_len,
                    "{role} name {name:?} exceeds {} for token length {len}",
                    rule.max_len
                );
                assert!(name.len() >= rule.min_len);
                assert!(rule.charset.accepts(name), "{role} name {name:?} has bad characters");
            }
        }
    }
}

#[test]
fn unknown_environment_rejected_by_both_resolvers() {
    let token = UniqueToken::parse("abc123").unwrap();
    let names_err = resolve_names("qa", &token, &ProjectPrefix::default()).unwrap_err();
    let profile_err = EnvironmentProfile::for_label("qa").unwrap_err();
    assert_eq!(names_err, ConfigurationError::UnknownEnvironment("qa".to_string()));
    assert_eq!(profile_err, names_err);
}

#[test]
fn dev_example() {
    let token = UniqueToken::parse("abc123").unwrap();
    let plan = DeploymentPlan::resolve(&EnvforgeConfig::default(), "dev", token, created()).unwrap();
    assert_eq!(plan.names.get(ResourceRole::StorageAccount), "stabc123dev");
    assert_eq!(plan.names.get(ResourceRole::DatabaseAccount), "abc123-dev-cosmosdb");
    assert_eq!(plan.profile.cosmos_throughput, 400);
    assert!(plan.profile.cosmos_free_tier);
}

#[test]
fn prod_example() {
    let token = UniqueToken::parse("xy9").unwrap();
    let plan = DeploymentPlan::resolve(&EnvforgeConfig::default(), "prod", token, created()).unwrap();
    assert_eq!(plan.profile.compute_sku, ComputeSku::P1v3);
    assert_eq!(plan.profile.compute_capacity, 2);
}

#[test]
fn config_file_drives_tags_and_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("envforge.toml");
    std::fs::write(
        &path,
        r#"
[project]
prefix = "contoso"
repository = "contoso/agents"
owner = "workshop"

[tags]
cost-center = "cc-42"
"#,
    )
    .unwrap();

    let config = EnvforgeConfig::from_file(&path).unwrap();
    let token = UniqueToken::parse("abc123").unwrap();
    let plan = DeploymentPlan::resolve(&config, "staging", token, created()).unwrap();

    assert_eq!(plan.names.get(ResourceRole::Database), "contosodb");
    assert_eq!(plan.names.get(ResourceRole::SearchIndex), "contoso-index");
    assert_eq!(plan.tags.get("project"), Some("contoso"));
    assert_eq!(plan.tags.get("cost-center"), Some("cc-42"));
    assert_eq!(plan.tags.get("created"), Some("2026-10-16"));
    assert_eq!(plan.tags.len(), 6);
}

#[test]
fn config_tag_overriding_fixed_tag_is_rejected() {
    let config = EnvforgeConfig::from_toml_str(
        r#"
[tags]
environment = "prod"
"#,
    )
    .unwrap();
    let token = UniqueToken::parse("abc123").unwrap();
    let err = DeploymentPlan::resolve(&config, "dev", token, created()).unwrap_err();
    assert!(matches!(err, ConfigurationError::TagConflict { ref key, .. } if key == "environment"));
}

#[test]
fn missing_config_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let err = EnvforgeConfig::from_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("absent.toml"));
}
