//! Variables published after provisioning for downstream automation.
//!
//! Only values derivable from names are produced here. Keys and connection
//! strings come from the provisioned resources themselves.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::naming::{ResourceNameSet, ResourceRole};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeploymentOutputs(BTreeMap<&'static str, String>);

impl DeploymentOutputs {
    pub fn from_names(names: &ResourceNameSet) -> Self {
        let name = |role| names.get(role);
        let mut vars = BTreeMap::new();

        vars.insert(
            "COSMOS_ENDPOINT",
            format!("https://{}.documents.azure.com:443/", name(ResourceRole::DatabaseAccount)),
        );
        vars.insert("DATABASE_NAME", name(ResourceRole::Database).to_string());
        vars.insert("CONTAINER_NAME", name(ResourceRole::Container).to_string());
        vars.insert(
            "SEARCH_ENDPOINT",
            format!("https://{}.search.windows.net", name(ResourceRole::SearchService)),
        );
        vars.insert("INDEX_NAME", name(ResourceRole::SearchIndex).to_string());
        vars.insert(
            "ACR_LOGIN_SERVER",
            format!("{}.azurecr.io", name(ResourceRole::Registry)),
        );
        vars.insert(
            "WEB_APP_URL",
            format!("https://{}.azurewebsites.net", name(ResourceRole::PrimaryApp)),
        );
        vars.insert(
            "A2A_APP_URL",
            format!("https://{}.azurewebsites.net", name(ResourceRole::SecondaryApp)),
        );
        vars.insert(
            "STORAGE_ACCOUNT_NAME",
            name(ResourceRole::StorageAccount).to_string(),
        );
        vars.insert(
            "AZURE_AI_SERVICES_ENDPOINT",
            format!("https://{}.cognitiveservices.azure.com/", name(ResourceRole::AiServices)),
        );

        DeploymentOutputs(vars)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// `KEY=value` lines, sorted by key.
    pub fn to_dotenv(&self) -> String {
        self.0
            .iter()
            .map(|(key, value)| format!("{key}={value}\n"))
            .collect()
    }
}
