use serde::{Deserialize, Serialize};

/// Registry group every executor agent announces itself under.
pub const REGISTRY_GROUP_EXECUTOR: &str = "EXECUTOR";

/// Registry announcement (and deregistration) payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryParam {
    /// Group tag, always [`REGISTRY_GROUP_EXECUTOR`] for agents.
    pub registry_group: String,
    /// Application name the scheduler routes by.
    pub registry_key: String,
    /// Reachable address of this agent, e.g. `http://10.0.0.7:9999`.
    pub registry_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl RegistryParam {
    pub fn executor(key: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            registry_group: REGISTRY_GROUP_EXECUTOR.to_string(),
            registry_key: key.into(),
            registry_value: address.into(),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token.filter(|t| !t.is_empty());
        self
    }
}
