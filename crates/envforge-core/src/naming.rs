//! Resource name resolution.
//!
//! Every logical resource role has a pattern with `{prefix}`, `{token}` and
//! `{env}` placeholders plus the target platform's length and character
//! rules. Resolution is pure: the same inputs always give the same names,
//! which is what lets a redeploy find the resources it created last time.
//!
//! When a composed name is too long, roles that embed the token shorten
//! the token until the name fits. Roles without a token reject instead.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

use crate::environment::Environment;
use crate::error::{ConfigResult, ConfigurationError};
use crate::token::UniqueToken;

pub const DEFAULT_PREFIX: &str = "zava";

/// Logical role a provisioned resource plays in the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceRole {
    StorageAccount,
    DatabaseAccount,
    Database,
    Container,
    Registry,
    ComputePlan,
    PrimaryApp,
    SecondaryApp,
    SearchService,
    SearchIndex,
    AiHub,
    AiProject,
    AiServices,
    AppInsights,
    LogAnalytics,
}

impl ResourceRole {
    pub const COUNT: usize = 15;

    pub const ALL: [ResourceRole; Self::COUNT] = [
        ResourceRole::StorageAccount,
        ResourceRole::DatabaseAccount,
        ResourceRole::Database,
        ResourceRole::Container,
        ResourceRole::Registry,
        ResourceRole::ComputePlan,
        ResourceRole::PrimaryApp,
        ResourceRole::SecondaryApp,
        ResourceRole::SearchService,
        ResourceRole::SearchIndex,
        ResourceRole::AiHub,
        ResourceRole::AiProject,
        ResourceRole::AiServices,
        ResourceRole::AppInsights,
        ResourceRole::LogAnalytics,
    ];

    /// Position of this role in [`ResourceRole::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceRole::StorageAccount => "storage_account",
            ResourceRole::DatabaseAccount => "database_account",
            ResourceRole::Database => "database",
            ResourceRole::Container => "container",
            ResourceRole::Registry => "registry",
            ResourceRole::ComputePlan => "compute_plan",
            ResourceRole::PrimaryApp => "primary_app",
            ResourceRole::SecondaryApp => "secondary_app",
            ResourceRole::SearchService => "search_service",
            ResourceRole::SearchIndex => "search_index",
            ResourceRole::AiHub => "ai_hub",
            ResourceRole::AiProject => "ai_project",
            ResourceRole::AiServices => "ai_services",
            ResourceRole::AppInsights => "app_insights",
            ResourceRole::LogAnalytics => "log_analytics",
        }
    }

    /// Naming rule for this role. The patterns must stay stable: changing
    /// one renames already-deployed resources.
    pub fn rule(&self) -> NameRule {
        use Charset::*;
        use Overflow::*;

        let (pattern, min_len, max_len, charset, overflow) = match self {
            ResourceRole::StorageAccount => ("st{token}{env}", 3, 24, LowerAlnum, TruncateToken),
            ResourceRole::DatabaseAccount => {
                ("{token}-{env}-cosmosdb", 3, 44, LowerAlnumHyphen, TruncateToken)
            }
            ResourceRole::Database => ("{prefix}db", 1, 255, AlnumHyphenUnderscore, Reject),
            ResourceRole::Container => ("{prefix}-products", 1, 255, AlnumHyphenUnderscore, Reject),
            ResourceRole::Registry => ("cr{token}{env}", 5, 50, Alnum, TruncateToken),
            ResourceRole::ComputePlan => ("{token}-{env}-asp", 1, 40, AlnumHyphen, TruncateToken),
            ResourceRole::PrimaryApp => ("{token}-{env}-app", 2, 60, LowerAlnumHyphen, TruncateToken),
            ResourceRole::SecondaryApp => ("{token}-{env}-a2a", 2, 60, LowerAlnumHyphen, TruncateToken),
            ResourceRole::SearchService => {
                ("{token}-{env}-search", 2, 60, LowerAlnumHyphen, TruncateToken)
            }
            ResourceRole::SearchIndex => ("{prefix}-index", 2, 128, LowerAlnumHyphen, Reject),
            ResourceRole::AiHub => ("{token}-{env}-aihub", 2, 32, AlnumHyphen, TruncateToken),
            ResourceRole::AiProject => ("{token}-{env}-aiproject", 2, 32, AlnumHyphen, TruncateToken),
            ResourceRole::AiServices => ("{token}-{env}-aiservices", 2, 64, AlnumHyphen, TruncateToken),
            ResourceRole::AppInsights => ("{token}-{env}-appi", 1, 260, AlnumHyphen, TruncateToken),
            ResourceRole::LogAnalytics => ("{token}-{env}-log", 4, 63, AlnumHyphen, TruncateToken),
        };

        NameRule { pattern, min_len, max_len, charset, overflow }
    }
}

impl FromStr for ResourceRole {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceRole::ALL
            .iter()
            .find(|role| role.as_str() == s)
            .copied()
            .ok_or_else(|| ConfigurationError::UnknownRole(s.to_string()))
    }
}

impl fmt::Display for ResourceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Characters a platform accepts in a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    LowerAlnum,
    Alnum,
    LowerAlnumHyphen,
    AlnumHyphen,
    AlnumHyphenUnderscore,
}

static LOWER_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+$").expect("static regex"));
static ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("static regex"));
static LOWER_ALNUM_HYPHEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$").expect("static regex"));
static ALNUM_HYPHEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?$").expect("static regex"));
static ALNUM_HYPHEN_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_]([a-zA-Z0-9_-]*[a-zA-Z0-9_])?$").expect("static regex")
});
static PREFIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]*[a-z0-9]$").expect("static regex"));

impl Charset {
    fn regex(&self) -> &'static Regex {
        match self {
            Charset::LowerAlnum => &LOWER_ALNUM,
            Charset::Alnum => &ALNUM,
            Charset::LowerAlnumHyphen => &LOWER_ALNUM_HYPHEN,
            Charset::AlnumHyphen => &ALNUM_HYPHEN,
            Charset::AlnumHyphenUnderscore => &ALNUM_HYPHEN_UNDERSCORE,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Charset::LowerAlnum => "lowercase letters and digits only",
            Charset::Alnum => "letters and digits only",
            Charset::LowerAlnumHyphen => {
                "lowercase letters, digits, and hyphens, not starting or ending with a hyphen"
            }
            Charset::AlnumHyphen => "letters, digits, and hyphens, not starting or ending with a hyphen",
            Charset::AlnumHyphenUnderscore => {
                "letters, digits, hyphens, and underscores, not starting or ending with a hyphen"
            }
        }
    }

    pub fn accepts(&self, name: &str) -> bool {
        self.regex().is_match(name)
    }
}

/// What to do when a composed name is longer than the platform allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    /// Drop trailing token characters until the name fits.
    TruncateToken,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameRule {
    pub pattern: &'static str,
    pub min_len: usize,
    pub max_len: usize,
    pub charset: Charset,
    pub overflow: Overflow,
}

impl NameRule {
    fn render(&self, prefix: &str, token: &str, env: &str) -> String {
        self.pattern
            .replace("{prefix}", prefix)
            .replace("{token}", token)
            .replace("{env}", env)
    }

    fn uses_token(&self) -> bool {
        self.pattern.contains("{token}")
    }
}

/// Project prefix used by roles that are scoped inside another resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectPrefix(String);

impl ProjectPrefix {
    pub const MIN_LEN: usize = 2;
    pub const MAX_LEN: usize = 20;

    pub fn parse(prefix: &str) -> ConfigResult<Self> {
        let invalid = |reason: String| ConfigurationError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason,
        };

        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&prefix.len()) {
            return Err(invalid(format!(
                "must be {} to {} characters",
                Self::MIN_LEN,
                Self::MAX_LEN
            )));
        }
        if !PREFIX_PATTERN.is_match(prefix) {
            return Err(invalid(
                "must start with a lowercase letter and contain only lowercase letters, digits, and interior hyphens"
                    .to_string(),
            ));
        }
        Ok(ProjectPrefix(prefix.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProjectPrefix {
    fn default() -> Self {
        ProjectPrefix(DEFAULT_PREFIX.to_string())
    }
}

impl fmt::Display for ProjectPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ProjectPrefix {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ProjectPrefix::parse(&value)
    }
}

impl From<ProjectPrefix> for String {
    fn from(prefix: ProjectPrefix) -> Self {
        prefix.0
    }
}

/// Resolve the name for a single role.
pub fn resolve_name(
    role: ResourceRole,
    env: Environment,
    token: &UniqueToken,
    prefix: &ProjectPrefix,
) -> ConfigResult<String> {
    let rule = role.rule();
    let env_label = env.as_str();

    let mut name = rule.render(prefix.as_str(), token.as_str(), env_label);

    if name.len() > rule.max_len {
        let fixed_len = rule.render(prefix.as_str(), "", env_label).len();
        let room = rule.max_len.saturating_sub(fixed_len);

        if rule.overflow == Overflow::Reject || !rule.uses_token() || room == 0 {
            return Err(ConfigurationError::NameTooLong {
                role: role.to_string(),
                len: name.len(),
                name,
                max: rule.max_len,
            });
        }

        // Tokens are ASCII, so byte slicing is safe.
        let shortened = &token.as_str()[..room.min(token.len())];
        warn!(
            role = %role,
            token = %token,
            kept = shortened.len(),
            max = rule.max_len,
            "shortening token to fit name length limit"
        );
        name = rule.render(prefix.as_str(), shortened, env_label);
    }

    if name.len() < rule.min_len {
        return Err(ConfigurationError::InvalidName {
            role: role.to_string(),
            reason: format!("must be at least {} characters", rule.min_len),
            name,
        });
    }
    if !rule.charset.accepts(&name) {
        return Err(ConfigurationError::InvalidName {
            role: role.to_string(),
            reason: rule.charset.describe().to_string(),
            name,
        });
    }

    debug!(role = %role, name = %name, "resolved resource name");
    Ok(name)
}

/// Resolve names for every role from a raw environment label.
pub fn resolve_names(
    env_label: &str,
    token: &UniqueToken,
    prefix: &ProjectPrefix,
) -> ConfigResult<ResourceNameSet> {
    let env: Environment = env_label.parse()?;
    ResourceNameSet::resolve(env, token, prefix)
}

/// Concrete names for every resource role in one deployment.
///
/// Names are stored in [`ResourceRole::ALL`] order, one per role, so every
/// role always has a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNameSet {
    names: [String; ResourceRole::COUNT],
}

impl ResourceNameSet {
    pub fn resolve(
        env: Environment,
        token: &UniqueToken,
        prefix: &ProjectPrefix,
    ) -> ConfigResult<Self> {
        let mut names: [String; ResourceRole::COUNT] = Default::default();
        for role in ResourceRole::ALL {
            names[role.index()] = resolve_name(role, env, token, prefix)?;
        }
        Ok(ResourceNameSet { names })
    }

    pub fn get(&self, role: ResourceRole) -> &str {
        &self.names[role.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceRole, &str)> {
        ResourceRole::ALL
            .into_iter()
            .zip(self.names.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Serialize for ResourceNameSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.names.len()))?;
        for (role, name) in self.iter() {
            map.serialize_entry(role.as_str(), name)?;
        }
        map.end()
    }
}
