//! Employee model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Numeric tag of the Employee role, present on every account
pub const ROLE_EMPLOYEE: i32 = 3001;
/// Numeric tag of the Admin role, granted selectively
pub const ROLE_ADMIN: i32 = 5150;

/// Role set of an employee, stored as a JSONB map from role name to
/// numeric tag. The Employee entry is always present; Admin is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoleSet {
    #[serde(rename = "Employee")]
    pub employee: i32,
    #[serde(rename = "Admin", default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<i32>,
}

impl RoleSet {
    /// Build a role set, optionally with the Admin role
    pub fn new(is_admin: bool) -> Self {
        Self {
            employee: ROLE_EMPLOYEE,
            admin: is_admin.then_some(ROLE_ADMIN),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.admin == Some(ROLE_ADMIN)
    }

    /// Numeric tags carried in access-token claims
    pub fn values(&self) -> Vec<i32> {
        let mut tags = vec![self.employee];
        if let Some(admin) = self.admin {
            tags.push(admin);
        }
        tags
    }
}

impl Default for RoleSet {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Employee entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub color: String,
    pub password_hash: String,
    pub refresh_token: Option<String>,
    pub roles: RoleSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New employee creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub color: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Employee update payload; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub color: Option<String>,
    pub password: Option<String>,
}

/// Employee as returned to clients: never includes the password hash or
/// the refresh credential.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub color: String,
    pub roles: RoleSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        EmployeeResponse {
            id: employee.id,
            name: employee.name,
            email: employee.email,
            phone: employee.phone,
            color: employee.color,
            roles: employee.roles,
            created_at: employee.created_at,
            updated_at: employee.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_set_tags() {
        assert_eq!(RoleSet::new(false).values(), vec![ROLE_EMPLOYEE]);
        assert_eq!(RoleSet::new(true).values(), vec![ROLE_EMPLOYEE, ROLE_ADMIN]);
        assert!(RoleSet::new(true).is_admin());
        assert!(!RoleSet::default().is_admin());
    }

    #[test]
    fn role_set_json_shape() {
        let json = serde_json::to_value(RoleSet::new(true)).unwrap();
        assert_eq!(json, serde_json::json!({"Employee": 3001, "Admin": 5150}));

        let json = serde_json::to_value(RoleSet::new(false)).unwrap();
        assert_eq!(json, serde_json::json!({"Employee": 3001}));

        let parsed: RoleSet = serde_json::from_value(serde_json::json!({"Employee": 3001})).unwrap();
        assert!(!parsed.is_admin());
    }
}
