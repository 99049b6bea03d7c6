//! Resource tags for cost tracking and lifecycle identification.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ProjectConfig;
use crate::environment::Environment;
use crate::error::{ConfigResult, ConfigurationError};

pub const TAG_ENVIRONMENT: &str = "environment";
pub const TAG_PROJECT: &str = "project";
pub const TAG_REPOSITORY: &str = "repository";
pub const TAG_OWNER: &str = "owner";
pub const TAG_CREATED: &str = "created";

const MAX_KEY_LEN: usize = 512;
const MAX_VALUE_LEN: usize = 256;
const FORBIDDEN_KEY_CHARS: &[char] = &['<', '>', '%', '&', '\\', '?', '/'];

/// Flat tag map applied uniformly to every provisioned resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct TagSet(BTreeMap<String, String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed project tags plus `extra`, for one environment.
    ///
    /// `created` is injected so the result stays reproducible in tests.
    pub fn build(
        env: Environment,
        project: &ProjectConfig,
        created: NaiveDate,
        extra: &TagSet,
    ) -> ConfigResult<Self> {
        let mut tags = TagSet::new();
        tags.insert(TAG_ENVIRONMENT, env.as_str())?;
        tags.insert(TAG_PROJECT, project.prefix.as_str())?;
        if let Some(repository) = &project.repository {
            tags.insert(TAG_REPOSITORY, repository)?;
        }
        if let Some(owner) = &project.owner {
            tags.insert(TAG_OWNER, owner)?;
        }
        tags.insert(TAG_CREATED, &created.format("%Y-%m-%d").to_string())?;

        let merged = tags.merge(extra)?;
        debug!(count = merged.len(), env = %env, "built tag set");
        Ok(merged)
    }

    /// Add a tag. Re-inserting the same value is a no-op; a different value
    /// for an existing key is a [`ConfigurationError::TagConflict`].
    pub fn insert(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        validate_tag(key, value)?;

        match self.0.get(key) {
            Some(existing) if existing == value => Ok(()),
            Some(existing) => Err(ConfigurationError::TagConflict {
                key: key.to_string(),
                existing: existing.clone(),
                incoming: value.to_string(),
            }),
            None => {
                self.0.insert(key.to_string(), value.to_string());
                Ok(())
            }
        }
    }

    /// Union of two tag sets. Fails on any key whose values disagree.
    pub fn merge(&self, other: &TagSet) -> ConfigResult<TagSet> {
        let mut merged = self.clone();
        for (key, value) in &other.0 {
            merged.insert(key, value)?;
        }
        Ok(merged)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<BTreeMap<String, String>> for TagSet {
    type Error = ConfigurationError;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut tags = TagSet::new();
        for (key, value) in &map {
            tags.insert(key, value)?;
        }
        Ok(tags)
    }
}

impl From<TagSet> for BTreeMap<String, String> {
    fn from(tags: TagSet) -> Self {
        tags.0
    }
}

fn validate_tag(key: &str, value: &str) -> ConfigResult<()> {
    let invalid = |reason: String| ConfigurationError::InvalidTag {
        key: key.to_string(),
        reason,
    };

    if key.is_empty() {
        return Err(invalid("key must not be empty".to_string()));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(invalid(format!("key exceeds {MAX_KEY_LEN} characters")));
    }
    if let Some(c) = key.chars().find(|c| FORBIDDEN_KEY_CHARS.contains(c)) {
        return Err(invalid(format!("key contains forbidden character {c:?}")));
    }
    if value.len() > MAX_VALUE_LEN {
        return Err(invalid(format!("value exceeds {MAX_VALUE_LEN} characters")));
    }
    Ok(())
}
