use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Organization the signed-in user works for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationInfo {
    pub id: String,
    pub name: String,
    /// Inventory is kept in an external system; closing an order must not
    /// post consumption movements from the dashboard.
    #[serde(default)]
    pub external_inventory_sync: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub organization: Option<OrganizationInfo>,
}

impl UserInfo {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// What the current session is allowed and expected to do.
///
/// Built once from the user profile and handed to the view models that need
/// it instead of each of them reading the auth store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionCapabilities {
    pub organization_id: Option<String>,
    pub organization_name: Option<String>,
    pub external_inventory_sync: bool,
    pub is_admin: bool,
}

impl SessionCapabilities {
    /// Whether the dashboard itself posts material consumption on order close
    pub fn posts_consumption(&self) -> bool {
        !self.external_inventory_sync
    }
}

impl From<&UserInfo> for SessionCapabilities {
    fn from(user: &UserInfo) -> Self {
        let org = user.organization.as_ref();
        Self {
            organization_id: org.map(|o| o.id.clone()),
            organization_name: org.map(|o| o.name.clone()),
            external_inventory_sync: org.is_some_and(|o| o.external_inventory_sync),
            is_admin: user.is_admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_from_profile() {
        let user: UserInfo = serde_json::from_str(
            r#"{
                "id": "u1",
                "username": "dispatch",
                "full_name": null,
                "email": null,
                "organization": {"id": "o1", "name": "Acme", "external_inventory_sync": true}
            }"#,
        )
        .unwrap();
        let caps = SessionCapabilities::from(&user);
        assert_eq!(caps.organization_name.as_deref(), Some("Acme"));
        assert!(!caps.posts_consumption());
        assert!(!caps.is_admin);
        assert_eq!(user.display_name(), "dispatch");
    }

    #[test]
    fn test_no_organization_posts_consumption() {
        let user = UserInfo {
            id: "u2".into(),
            username: "admin".into(),
            full_name: Some("Site Admin".into()),
            email: None,
            is_admin: true,
            organization: None,
        };
        let caps = SessionCapabilities::from(&user);
        assert!(caps.posts_consumption());
        assert_eq!(caps.organization_id, None);
        assert_eq!(user.display_name(), "Site Admin");
    }
}
