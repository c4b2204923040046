/// Default admin seed
///
/// On startup the server makes sure one admin account exists, so a fresh
/// deployment can be logged into immediately. The credentials come from
/// configuration and default to admin@rental.com / admin123 — change them
/// anywhere near production.

use sqlx::PgPool;
use tracing::info;

use crate::auth::password;
use crate::models::user::{CreateUser, User, UserRole};

/// Credentials for the seeded admin account
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminSeed {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            email: "admin@rental.com".to_string(),
            password: "admin123".to_string(),
        }
    }
}

/// Creates the admin account if no user with the seed email exists
///
/// Returns the seeded user, or None when the account was already there.
pub async fn ensure_admin(pool: &PgPool, seed: &AdminSeed) -> anyhow::Result<Option<User>> {
    if User::find_by_email(pool, &seed.email).await?.is_some() {
        return Ok(None);
    }

    let password_hash = password::hash_password(&seed.password)?;

    let admin = User::create(
        pool,
        CreateUser {
            username: seed.username.clone(),
            email: seed.email.clone(),
            password_hash,
            role: UserRole::Admin,
            phone: None,
        },
    )
    .await?;

    info!(email = %admin.email, "Default admin account created");
    Ok(Some(admin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_seed_credentials() {
        let seed = AdminSeed::default();
        assert_eq!(seed.email, "admin@rental.com");
        assert_eq!(seed.username, "admin");
        assert_eq!(seed.password, "admin123");
    }
}
