//! `envforge resolve` — print the full deployment plan for one environment.

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use envforge_core::config::CONFIG_FILE_NAME;
use envforge_core::{DeploymentPlan, EnvforgeConfig, UniqueToken};
use tracing::{debug, info};

pub struct ResolveArgs<'a> {
    pub env: &'a str,
    pub token: Option<&'a str>,
    pub scope: &'a [String],
    pub config: Option<&'a str>,
    pub created: Option<NaiveDate>,
    pub format: &'a str,
}

pub fn resolve(args: ResolveArgs<'_>) -> Result<()> {
    let config = load_config(args.config)?;
    let token = pick_token(args.token, args.scope)?;
    let created = args.created.unwrap_or_else(|| chrono::Utc::now().date_naive());

    let plan = DeploymentPlan::resolve(&config, args.env, token, created)
        .with_context(|| format!("resolving environment {:?}", args.env))?;

    println!("{}", render(&plan, args.format)?);
    Ok(())
}

/// Render a plan. `env` emits only the derived output variables.
pub fn render(plan: &DeploymentPlan, format: &str) -> Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(plan)?),
        "toml" => Ok(toml::to_string_pretty(plan)?),
        "env" => Ok(plan.outputs().to_dotenv().trim_end().to_string()),
        other => bail!("unsupported output format: {other} (expected json, toml, or env)"),
    }
}

fn pick_token(token: Option<&str>, scope: &[String]) -> Result<UniqueToken> {
    if let Some(token) = token {
        return Ok(UniqueToken::parse(token)?);
    }
    if scope.is_empty() {
        bail!("either --token or --scope is required");
    }
    let parts: Vec<&str> = scope.iter().map(String::as_str).collect();
    let token = UniqueToken::derive(&parts);
    info!(token = %token, "derived token from scope");
    Ok(token)
}

/// An explicit path must exist; the default path is optional.
fn load_config(path: Option<&str>) -> Result<EnvforgeConfig> {
    match path {
        Some(path) => EnvforgeConfig::from_file(Path::new(path)),
        None => {
            let default = Path::new(CONFIG_FILE_NAME);
            if default.is_file() {
                EnvforgeConfig::from_file(default)
            } else {
                debug!("no {CONFIG_FILE_NAME} found, using defaults");
                Ok(EnvforgeConfig::default())
            }
        }
    }
}
