/// API route handlers
///
/// One module per resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `properties`, `tenants`, `leases`, `payments`, `maintenance`: entity CRUD
/// - `dashboard`: scoped aggregation
/// - `profile`: the authenticated user's own account
/// - `notifications`: the authenticated user's notifications

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod leases;
pub mod maintenance;
pub mod notifications;
pub mod payments;
pub mod profile;
pub mod properties;
pub mod tenants;

use serde::{Deserialize, Deserializer};

/// Deserializes an optional form field, treating an empty string as absent
///
/// Browser forms submit every field; an untouched date/number/select arrives
/// as `""` rather than being omitted.
pub(crate) fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<T>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[derive(Debug, serde::Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        staff: Option<Uuid>,
    }

    #[test]
    fn test_empty_string_is_none() {
        let form: Form = serde_urlencoded::from_str("staff=").unwrap();
        assert!(form.staff.is_none());

        let form: Form = serde_urlencoded::from_str("").unwrap();
        assert!(form.staff.is_none());
    }

    #[test]
    fn test_value_is_parsed() {
        let id = Uuid::new_v4();
        let form: Form = serde_urlencoded::from_str(&format!("staff={}", id)).unwrap();
        assert_eq!(form.staff, Some(id));
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(serde_urlencoded::from_str::<Form>("staff=not-a-uuid").is_err());
    }
}
