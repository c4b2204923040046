/// Database utilities
///
/// - `pool`: PostgreSQL connection pool construction and health check
/// - `migrations`: sqlx migration runner
/// - `seed`: default admin account created at startup

pub mod migrations;
pub mod pool;
pub mod seed;
