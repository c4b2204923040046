/// User model and database operations
///
/// This module provides the User model and CRUD operations for managing user
/// accounts. A user is the login identity for the whole system: admins see
/// everything, owners see their own properties and everything under them,
/// and tenant users are the identities behind tenant profiles.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(80) NOT NULL UNIQUE,
///     email VARCHAR(120) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'owner',
///     phone VARCHAR(20),
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use rentora_shared::models::user::{User, CreateUser, UserRole};
/// use rentora_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "landlord".to_string(),
///     email: "owner@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::Owner,
///     phone: Some("555-0100".to_string()),
/// }).await?;
///
/// let found = User::find_by_email(&pool, "owner@example.com").await?;
/// assert_eq!(found.unwrap().id, user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Role assigned to a user account
///
/// Governs default visibility scope, not a capability system: admin bypasses
/// all ownership checks, owner is scoped to their own properties, tenant is
/// the identity behind a tenant profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Sees and mutates everything, regardless of ownership
    Admin,

    /// Scoped to own properties and everything transitively under them
    Owner,

    /// Identity behind a tenant profile
    Tenant,
}

impl UserRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Owner => "owner",
            UserRole::Tenant => "tenant",
        }
    }

    /// Whether this role bypasses ownership checks
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// User model representing a login account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Display/login name, unique across all users
    pub username: String,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash
    ///
    /// Never store plaintext passwords!
    pub password_hash: String,

    /// Role governing visibility scope
    pub role: UserRole,

    /// Optional contact phone number
    pub phone: Option<String>,

    /// Whether the account may log in
    ///
    /// Deactivated accounts fail login with the same generic message as bad
    /// credentials.
    pub is_active: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Login name (must be unique)
    pub username: String,

    /// Email address (must be unique)
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password!)
    pub password_hash: String,

    /// Account role
    pub role: UserRole,

    /// Optional contact phone
    pub phone: Option<String>,
}

/// Input for updating an existing user
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New username
    pub username: Option<String>,

    /// New email address
    pub email: Option<String>,

    /// New password hash
    pub password_hash: Option<String>,

    /// New phone number (use Some(None) to clear)
    pub phone: Option<Option<String>>,

    /// Activate or deactivate the account
    pub is_active: Option<bool>,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email or username already exists (unique
    /// constraint violation) or the database is unreachable.
    pub async fn create(db: impl PgExecutor<'_>, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, role, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, password_hash, role, phone, is_active, created_at
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role)
        .bind(data.phone)
        .fetch_one(db)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID, returning None if absent
    pub async fn find_by_id(
        db: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, phone, is_active, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// Used by login and by the tenant-add flow, which reuses an existing
    /// account matched by email.
    pub async fn find_by_email(
        db: impl PgExecutor<'_>,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, phone, is_active, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    /// Finds a user by username
    pub async fn find_by_username(
        db: impl PgExecutor<'_>,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, phone, is_active, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    /// Updates an existing user
    ///
    /// Only non-None fields in `data` are written. Returns the updated user,
    /// or None if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the new email or username collides with another
    /// user, or the database is unreachable.
    pub async fn update(
        db: impl PgExecutor<'_>,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut sets: Vec<String> = Vec::new();
        let mut bind_count = 1;

        if data.username.is_some() {
            bind_count += 1;
            sets.push(format!("username = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            sets.push(format!("email = ${}", bind_count));
        }
        if data.password_hash.is_some() {
            bind_count += 1;
            sets.push(format!("password_hash = ${}", bind_count));
        }
        if data.phone.is_some() {
            bind_count += 1;
            sets.push(format!("phone = ${}", bind_count));
        }
        if data.is_active.is_some() {
            bind_count += 1;
            sets.push(format!("is_active = ${}", bind_count));
        }

        if sets.is_empty() {
            return Self::find_by_id(db, id).await;
        }

        let query = format!(
            "UPDATE users SET {} WHERE id = $1 RETURNING id, username, email, password_hash, role, phone, is_active, created_at",
            sets.join(", "),
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(username) = data.username {
            q = q.bind(username);
        }
        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }
        if let Some(phone_opt) = data.phone {
            q = q.bind(phone_opt);
        }
        if let Some(active) = data.is_active {
            q = q.bind(active);
        }

        let user = q.fetch_optional(db).await?;

        Ok(user)
    }

    /// Deletes a user by ID
    ///
    /// Cascades to the user's properties and notifications at the database
    /// level. Returns true if a row was deleted.
    pub async fn delete(db: impl PgExecutor<'_>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all users, newest first
    pub async fn list(db: impl PgExecutor<'_>) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, phone, is_active, created_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(UserRole::Admin.as_str(), "admin");
        assert_eq!(UserRole::Owner.as_str(), "owner");
        assert_eq!(UserRole::Tenant.as_str(), "tenant");
    }

    #[test]
    fn test_role_is_admin() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Owner.is_admin());
        assert!(!UserRole::Tenant.is_admin());
    }

    #[test]
    fn test_update_user_default_is_noop() {
        let update = UpdateUser::default();
        assert!(update.username.is_none());
        assert!(update.email.is_none());
        assert!(update.password_hash.is_none());
        assert!(update.phone.is_none());
        assert!(update.is_active.is_none());
    }

    // Integration tests for database operations live in rentora-api/tests.
}
