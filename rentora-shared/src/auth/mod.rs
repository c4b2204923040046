/// Authentication and authorization utilities
///
/// # Modules
///
/// - `password`: Argon2id password hashing and verification
/// - `jwt`: Signed-token session identity (access + refresh tokens)
/// - `middleware`: The authenticated identity attached to each request
/// - `authorization`: The single ownership predicate gating every handler

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
