use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::user::{ProviderInfo, Role, User};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, Salt, SaltString};
use std::sync::LazyLock;
use uuid::Uuid;

/// A real Argon2 hash generated once at startup, used as a timing decoy so
/// that login requests for non-existent accounts take the same time as
/// requests for existing ones.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(b"dummy-never-matches", Salt::from(&salt))
        .expect("failed to generate dummy hash")
        .to_string()
});

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    location: String,
    service_types: Option<Vec<String>>,
    service_location: Option<String>,
    hourly_rate: Option<f64>,
    description: Option<String>,
    available: Option<bool>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let role = role_from_db(&row.role);
        let provider_info = match (role, row.hourly_rate) {
            (Role::Provider, Some(hourly_rate)) => Some(ProviderInfo {
                service_types: row.service_types.unwrap_or_default(),
                location: row.service_location.unwrap_or_default(),
                hourly_rate,
                description: row.description.unwrap_or_default(),
                available: row.available.unwrap_or(false),
            }),
            _ => None,
        };

        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role,
            location: row.location,
            provider_info,
            created_at: row.created_at,
        }
    }
}

pub fn role_from_db<T: AsRef<str>>(value: T) -> Role {
    match value.as_ref() {
        "Customer" => Role::Customer,
        "Provider" => Role::Provider,
        other => panic!("Unknown role: {}", other),
    }
}

pub fn role_to_db(role: Role) -> &'static str {
    match role {
        Role::Customer => "Customer",
        Role::Provider => "Provider",
    }
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), Salt::from(&salt))?;
    Ok(hash.to_string())
}

const USER_SELECT_FIELDS: &str = r#"
    id,
    username,
    email,
    password_hash,
    role,
    location,
    service_types,
    service_location,
    hourly_rate,
    description,
    available,
    created_at
"#;

/// Canonical profile update: service types are already normalized, the
/// password is already decided (None = unchanged). A `None` provider_info
/// leaves the stored provider columns untouched.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub username: String,
    pub email: String,
    pub new_password: Option<String>,
    pub location: String,
    pub provider_info: Option<ProviderInfo>,
}

#[async_trait::async_trait]
pub trait UserRepository {
    async fn create_user(&self, username: &str, email: &str, password: &str, role: Role) -> Result<User, AppError>;

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn list_users(&self) -> Result<Vec<User>, AppError>;

    /// Customer-facing provider listing: the availability gate is applied
    /// here, before any search or sort happens downstream.
    async fn list_available_providers(&self) -> Result<Vec<User>, AppError>;

    async fn update_user(&self, id: &Uuid, update: &UserUpdate) -> Result<User, AppError>;

    async fn verify_password(&self, user: &User, password: &str) -> Result<(), AppError>;
}

#[async_trait::async_trait]
impl UserRepository for PostgresRepository {
    async fn create_user(&self, username: &str, email: &str, password: &str, role: Role) -> Result<User, AppError> {
        let password_hash = hash_password(password)?;

        let query = format!(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            USER_SELECT_FIELDS
        );

        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(username)
            .bind(email)
            .bind(&password_hash)
            .bind(role_to_db(role))
            .fetch_one(&self.pool)
            .await?;

        Ok(User::from(row))
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_SELECT_FIELDS);
        let row = sqlx::query_as::<_, UserRow>(&query).bind(id).fetch_optional(&self.pool).await?;

        Ok(row.map(User::from))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_SELECT_FIELDS);
        let row = sqlx::query_as::<_, UserRow>(&query).bind(email).fetch_optional(&self.pool).await?;

        Ok(row.map(User::from))
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let query = format!("SELECT {} FROM users ORDER BY created_at", USER_SELECT_FIELDS);
        let rows = sqlx::query_as::<_, UserRow>(&query).fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn list_available_providers(&self) -> Result<Vec<User>, AppError> {
        let query = format!(
            "SELECT {} FROM users WHERE role = 'Provider' AND available = TRUE ORDER BY created_at",
            USER_SELECT_FIELDS
        );
        let rows = sqlx::query_as::<_, UserRow>(&query).fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn update_user(&self, id: &Uuid, update: &UserUpdate) -> Result<User, AppError> {
        let password_hash = match update.new_password.as_deref() {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let query = format!(
            r#"
            UPDATE users
            SET username = $1,
                email = $2,
                password_hash = COALESCE($3, password_hash),
                location = $4,
                service_types = COALESCE($5, service_types),
                service_location = COALESCE($6, service_location),
                hourly_rate = COALESCE($7, hourly_rate),
                description = COALESCE($8, description),
                available = COALESCE($9, available)
            WHERE id = $10
            RETURNING {}
            "#,
            USER_SELECT_FIELDS
        );

        let provider = update.provider_info.as_ref();
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(&update.username)
            .bind(&update.email)
            .bind(password_hash)
            .bind(&update.location)
            .bind(provider.map(|p| p.service_types.clone()))
            .bind(provider.map(|p| p.location.as_str()))
            .bind(provider.map(|p| p.hourly_rate))
            .bind(provider.map(|p| p.description.as_str()))
            .bind(provider.map(|p| p.available))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::from).ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn verify_password(&self, user: &User, password: &str) -> Result<(), AppError> {
        let password_hash = PasswordHash::new(&user.password_hash).map_err(|e| AppError::password_hash("Failed to parse stored password hash", e))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &password_hash)
            .map_err(|_| AppError::InvalidCredentials)?;

        Ok(())
    }
}

/// Perform a throwaway Argon2 verification so response timing does not
/// reveal whether the target account exists.
pub fn dummy_verify(password: &str) {
    let hash = PasswordHash::new(&DUMMY_HASH).expect("invalid dummy hash");
    let _ = Argon2::default().verify_password(password.as_bytes(), &hash);
}
