/// Database models for Rentora
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and authentication
/// - `property`: Rental properties with availability tracking
/// - `tenant`: Tenant profiles (1:1 with a user)
/// - `lease`: Lease agreements linking properties and tenants
/// - `payment`: Rent payments recorded against a lease
/// - `maintenance`: Maintenance requests per property
/// - `notification`: Per-user notifications
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
/// let new_user = CreateUser {
///     username: "landlord".to_string(),
///     email: "owner@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::Owner,
///     phone: None,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod lease;
pub mod maintenance;
pub mod notification;
pub mod payment;
pub mod property;
pub mod tenant;
pub mod user;
