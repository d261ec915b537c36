//! Administrator accounts and role-tier ordering.
//!
//! Role names in the database are free-form text. Two spellings of the
//! sub-admin role coexist (`subadmin` and `sub_admin`); listings treat them
//! as a single tier rather than guessing which spelling is canonical.

use serde::Serialize;
use sqlx::FromRow;

/// Well-known role names.
pub mod roles {
    pub const MAIN_ADMIN: &str = "main_admin";
    pub const ADMIN: &str = "admin";
    pub const SUBADMIN: &str = "subadmin";
    pub const SUB_ADMIN: &str = "sub_admin";
}

/// Identity of the administrator seeded on first bootstrap.
pub mod default_admin {
    pub const USERNAME: &str = "admin";
    pub const EMAIL: &str = "admin@college.edu";
}

/// An administrator account row from the `users` table.
#[derive(Serialize, FromRow, Debug, Clone)]
pub struct AdminUser {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: String,
    pub status: Option<String>,
    pub is_active: bool,
}

/// Sort rank of a role: main admin, then admins, then sub-admins (both
/// spellings), then everything else.
pub fn role_tier(role: &str) -> u8 {
    match role {
        roles::MAIN_ADMIN => 0,
        roles::ADMIN => 1,
        roles::SUBADMIN | roles::SUB_ADMIN => 2,
        _ => 3,
    }
}

/// Orders administrators by tier, then by username within a tier.
pub fn sort_by_tier(users: &mut [AdminUser]) {
    users.sort_by(|a, b| {
        role_tier(&a.role)
            .cmp(&role_tier(&b.role))
            .then_with(|| a.username.cmp(&b.username))
    });
}
