#[cfg(test)]
mod tests {
    use crep_server::shared::types::account::{Account, AccessLevel};
    use crep_server::shared::util::config::AuthConfig;

    fn auth() -> AuthConfig {
        AuthConfig { access_group: "crep-staff".to_string(), admin_group: "crep-admin".to_string() }
    }

    fn account(groups: &[&str]) -> Account {
        Account {
            name: "Ada Lovelace".to_string(),
            id: "123456".to_string(),
            email: "ada@example.org".to_string(),
            groups: groups.iter().map(|g| g.to_string()).collect()
        }
    }

    #[test]
    fn access_level_from_groups() {
        assert_eq!(account(&[]).access_level(&auth()), AccessLevel::Requester, "no group");
        assert_eq!(account(&["students"]).access_level(&auth()), AccessLevel::Requester, "unrelated group");
        assert_eq!(account(&["crep-staff"]).access_level(&auth()), AccessLevel::Staff, "staff group");
        assert_eq!(account(&["crep-staff", "crep-admin"]).access_level(&auth()), AccessLevel::Admin, "admin wins");
        assert_eq!(account(&["crep-admin"]).access_level(&auth()), AccessLevel::Admin, "admin alone");
    }

    #[test]
    fn access_level_checks() {
        assert!(AccessLevel::Admin.is_staff(), "admins are staff");
        assert!(!AccessLevel::Staff.is_admin());
        assert!(!AccessLevel::Requester.is_staff());
        assert_eq!(serde_json::to_value(AccessLevel::Staff).unwrap(), "staff");
    }
}
