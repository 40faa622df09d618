use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
pub enum Role {
    Customer,
    Provider,
}

/// The acting user for a core operation, carried explicitly through every
/// call instead of living in ambient session state.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

/// Provider-only profile data. `available` is the availability gate that
/// controls whether the provider shows up in the customer-facing listing.
#[derive(Serialize, Debug, Clone, JsonSchema)]
pub struct ProviderInfo {
    pub service_types: Vec<String>,
    pub location: String,
    pub hourly_rate: f64,
    pub description: String,
    pub available: bool,
}

#[derive(Serialize, Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub location: String,
    pub provider_info: Option<ProviderInfo>,
    pub created_at: DateTime<Utc>,
}

/// Service types as they arrive over the wire: historically either a literal
/// JSON array or a single encoded string (JSON-array text, or a plain
/// comma-separated list). `normalize` is the only place that looks at the
/// shape; everything downstream works with the canonical `Vec<String>`.
#[derive(Deserialize, Debug, Clone, JsonSchema)]
#[serde(untagged)]
pub enum ServiceTypesInput {
    List(Vec<String>),
    Encoded(String),
}

impl ServiceTypesInput {
    pub fn normalize(&self) -> Vec<String> {
        fn clean(items: impl IntoIterator<Item = String>) -> Vec<String> {
            items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        }

        match self {
            ServiceTypesInput::List(items) => clean(items.iter().cloned()),
            ServiceTypesInput::Encoded(raw) => match serde_json::from_str::<Vec<String>>(raw) {
                Ok(items) => clean(items),
                Err(_) => clean(raw.split(',').map(str::to_string)),
            },
        }
    }
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub role: Role,
}

#[derive(Deserialize, Debug, JsonSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct ProviderInfoRequest {
    pub service_types: ServiceTypesInput,
    pub location: String,
    #[validate(range(min = 0.01))]
    pub hourly_rate: f64,
    #[serde(default)]
    pub description: String,
    pub available: bool,
}

/// Profile update. An empty or omitted password means "leave it unchanged";
/// the stored credential is never echoed back.
#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub location: String,
    #[validate(nested)]
    pub provider_info: Option<ProviderInfoRequest>,
}

impl UpdateUserRequest {
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub location: String,
    pub provider_info: Option<ProviderInfo>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            location: user.location.clone(),
            provider_info: user.provider_info.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_literal_list() {
        let input = ServiceTypesInput::List(vec![" laundry ".into(), "window".into(), "".into()]);
        assert_eq!(input.normalize(), vec!["laundry", "window"]);
    }

    #[test]
    fn normalize_json_encoded_string() {
        let input = ServiceTypesInput::Encoded(r#"["deep clean","laundry"]"#.into());
        assert_eq!(input.normalize(), vec!["deep clean", "laundry"]);
    }

    #[test]
    fn normalize_comma_separated_string() {
        let input = ServiceTypesInput::Encoded("laundry, window , ,carpet".into());
        assert_eq!(input.normalize(), vec!["laundry", "window", "carpet"]);
    }

    #[test]
    fn all_shapes_produce_the_same_canonical_sequence() {
        let list = ServiceTypesInput::List(vec!["laundry".into(), "window".into()]);
        let json = ServiceTypesInput::Encoded(r#"["laundry","window"]"#.into());
        let csv = ServiceTypesInput::Encoded("laundry,window".into());
        assert_eq!(list.normalize(), json.normalize());
        assert_eq!(json.normalize(), csv.normalize());
    }

    #[test]
    fn empty_password_counts_as_unchanged() {
        let request = UpdateUserRequest {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: Some(String::new()),
            location: "12 Main St".into(),
            provider_info: None,
        };
        assert!(request.new_password().is_none());
    }
}
