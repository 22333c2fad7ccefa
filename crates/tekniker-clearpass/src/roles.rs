//! Guest role listing.
//!
//! ClearPass returns a role mapping as `{"rules": [...]}` or a bare array of
//! rules. Each rule names a role and carries its id either directly or as
//! the value of its first condition.

use std::collections::HashSet;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use tekniker_core::messages;
use tekniker_core::result::AppResult;

use crate::client::ClearPassClient;

/// A role a device can be assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRole {
    /// Role display name.
    pub name: String,
    /// Role id as a string.
    pub role_id: String,
}

impl ClearPassClient {
    /// Fetch the configured role mapping and reshape its rules.
    pub async fn list_roles(&self) -> AppResult<Vec<DeviceRole>> {
        let url = self.endpoint(&["api", "role-mapping", "name", self.role_mapping_name()])?;
        let body = self
            .send_json(Method::GET, url, None, messages::ROLES_FETCH_FAILED)
            .await?;
        let roles = extract_roles(&body);
        debug!(count = roles.len(), "Role mapping fetched");
        Ok(roles)
    }
}

/// Reshape a role-mapping body into roles, dropping rules without a name
/// or id.
pub fn extract_roles(body: &Value) -> Vec<DeviceRole> {
    let rules = match body {
        Value::Object(map) => map.get("rules").and_then(Value::as_array),
        Value::Array(rules) => Some(rules),
        _ => None,
    };

    rules
        .into_iter()
        .flatten()
        .filter_map(|rule| {
            let rule = rule.as_object()?;
            let name = ["role_name", "name"]
                .iter()
                .filter_map(|k| rule.get(*k).and_then(Value::as_str))
                .find(|n| !n.is_empty())?;

            let role_id = match rule.get("role_id") {
                Some(id) => scalar_to_string(id),
                None => rule
                    .get("condition")
                    .and_then(Value::as_array)
                    .and_then(|conds| {
                        conds
                            .iter()
                            .find_map(|c| c.as_object().and_then(|c| c.get("value")))
                    })
                    .and_then(scalar_to_string),
            }?;

            Some(DeviceRole {
                name: name.to_string(),
                role_id,
            })
        })
        .collect()
}

/// Keep roles whose id is in `allowed`. An empty set keeps everything.
pub fn filter_roles(roles: Vec<DeviceRole>, allowed: &HashSet<String>) -> Vec<DeviceRole> {
    if allowed.is_empty() {
        return roles;
    }
    roles
        .into_iter()
        .filter(|r| allowed.contains(&r.role_id))
        .collect()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
