//! Account + related schema for database and url parameter validation

use crate::shared::util::config::AuthConfig;

use serde::{Serialize, Deserialize};

pub type UserId = str;

/// What a logged in user may do
/// - **requester:** Register exams and read their own notifications
/// - **staff:** Also see the print calendar and move exams through the non-admin statuses
/// - **admin:** Every status, deleting exams, exporting any status
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[derive(PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Requester = 0,
    Staff = 1,
    Admin = 2
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub id: String,
    pub email: String,
    pub groups: Vec<String>
}

impl AccessLevel {
    pub fn from_groups(groups: &[String], auth: &AuthConfig) -> AccessLevel {
        if groups.iter().any(|g| g == &auth.admin_group) {
            AccessLevel::Admin
        } else if groups.iter().any(|g| g == &auth.access_group) {
            AccessLevel::Staff
        } else {
            AccessLevel::Requester
        }
    }

    pub fn is_admin(&self) -> bool { *self == AccessLevel::Admin }
    pub fn is_staff(&self) -> bool { *self >= AccessLevel::Staff }
}

impl Account {
    pub fn access_level(&self, auth: &AuthConfig) -> AccessLevel {
        AccessLevel::from_groups(&self.groups, auth)
    }
}
