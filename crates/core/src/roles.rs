//! Well-known role name constants.
//!
//! These must match the `chk_users_role` constraint in the users migration.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Resolve the role requested at signup.
///
/// Only the exact literal `"admin"` promotes; anything else (including a
/// missing role) yields an ordinary user.
pub fn resolve_signup_role(requested: Option<&str>) -> &'static str {
    match requested {
        Some(ROLE_ADMIN) => ROLE_ADMIN,
        _ => ROLE_USER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_admin_literal_promotes() {
        assert_eq!(resolve_signup_role(Some("admin")), ROLE_ADMIN);
        assert_eq!(resolve_signup_role(Some("Admin")), ROLE_USER);
        assert_eq!(resolve_signup_role(Some("superuser")), ROLE_USER);
        assert_eq!(resolve_signup_role(None), ROLE_USER);
    }
}
