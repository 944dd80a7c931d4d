use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, Serialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default)]
    pub perm_policies: Vec<PermPolicy>,
}

#[derive(Debug, Default, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct PermPolicy {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl PermPolicy {
    /// Text shown for the policy in a select: the alias when there is one.
    pub fn label(&self) -> &str {
        match self.alias.as_deref() {
            Some(alias) if !alias.is_empty() => alias,
            _ => &self.name,
        }
    }
}

/// Body of the create and update role requests.
#[derive(Debug, Default, Deserialize, Serialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RoleParam {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub perm_policies: Vec<String>,
}

impl RoleParam {
    /// The role as stored from this request, policies known by name only.
    pub fn to_role(&self) -> Role {
        Role {
            name: self.name.clone(),
            alias: self.alias.clone(),
            perm_policies: self
                .perm_policies
                .iter()
                .map(|name| PermPolicy {
                    name: name.clone(),
                    alias: None,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RoleList {
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub total: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct PermPolicyList {
    #[serde(default, alias = "permPolicies")]
    pub policies: Vec<PermPolicy>,
}
