//! User accounts and JWT authentication.
//!
//! Passwords are hashed with Argon2id. Access and refresh tokens are HS256
//! JWTs signed with separate secrets; claims carry the user id, email and
//! role.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::{ApiConfig, REFRESH_TOKEN_TTL_SECS};
use crate::error::{ApiError, ApiResult};
use crate::pagination::DataEnvelope;
use crate::state::SharedState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// A registered account. The hash never leaves this struct; responses use
/// [`UserPublic`].
#[derive(Clone, Debug)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: i64,
}

/// The representation sent over the wire.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: u64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub created_at: i64,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// In-memory account store.
#[derive(Debug, Default)]
pub struct UserStore {
    users: Vec<User>,
    next_id: u64,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            next_id: 1,
        }
    }

    pub fn by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    pub fn by_id(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn email_or_username_taken(&self, email: &str, username: &str) -> bool {
        self.users
            .iter()
            .any(|u| u.email == email || u.username == username)
    }

    pub fn create(
        &mut self,
        email: String,
        username: String,
        password_hash: String,
        first_name: String,
        last_name: String,
    ) -> &User {
        let id = self.next_id;
        self.next_id += 1;
        self.users.push(User {
            id,
            email,
            username,
            password_hash,
            first_name,
            last_name,
            role: Role::User,
            is_active: true,
            created_at: Utc::now().timestamp_millis(),
        });
        self.users.last().expect("just pushed")
    }
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub exp: i64,
}

/// Signing and verification keys for both token kinds.
pub struct AuthKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    token_ttl_secs: i64,
}

impl AuthKeys {
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.jwt_refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.jwt_refresh_secret.as_bytes()),
            token_ttl_secs: config.token_ttl_secs,
        }
    }

    fn claims_for(&self, user: &User, ttl_secs: i64) -> Claims {
        Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            exp: Utc::now().timestamp() + ttl_secs,
        }
    }

    pub fn issue_access(&self, user: &User) -> ApiResult<String> {
        encode(
            &Header::default(),
            &self.claims_for(user, self.token_ttl_secs),
            &self.access_encoding,
        )
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("token signing failed: {e}")))
    }

    pub fn issue_refresh(&self, user: &User) -> ApiResult<String> {
        encode(
            &Header::default(),
            &self.claims_for(user, REFRESH_TOKEN_TTL_SECS),
            &self.refresh_encoding,
        )
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("token signing failed: {e}")))
    }

    pub fn verify_access(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.access_decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ApiError::Unauthorized("Invalid token".to_string()))
    }

    pub fn verify_refresh(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.refresh_decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ApiError::Unauthorized("Invalid refresh token".to_string()))
    }
}

fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("password hashing failed: {e}")))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Pull the bearer token out of the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub user: UserPublic,
    pub token: String,
    pub refresh_token: String,
}

pub async fn register(
    State(state): State<SharedState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Response> {
    let (Some(email), Some(username), Some(password), Some(first_name), Some(last_name)) = (
        request.email,
        request.username,
        request.password,
        request.first_name,
        request.last_name,
    ) else {
        return Err(ApiError::Validation("All fields are required".to_string()));
    };

    let mut users = state.users.write().await;
    if users.email_or_username_taken(&email, &username) {
        return Err(ApiError::Duplicate(
            "User with this email or username already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&password)?;
    let user = users.create(email, username, password_hash, first_name, last_name);
    let token = state.auth.issue_access(user)?;
    let refresh_token = state.auth.issue_refresh(user)?;
    tracing::info!(user = user.id, "account registered");

    let body = DataEnvelope::with_message(
        SessionData {
            user: user.into(),
            token,
            refresh_token,
        },
        "User registered successfully",
    );
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn login(
    State(state): State<SharedState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<DataEnvelope<SessionData>>> {
    let (Some(email), Some(password)) = (request.email, request.password) else {
        return Err(ApiError::Validation(
            "Email and password are required".to_string(),
        ));
    };

    let users = state.users.read().await;
    let user = users
        .by_email(&email)
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if !user.is_active {
        return Err(ApiError::Unauthorized("Account is deactivated".to_string()));
    }
    if !verify_password(&password, &user.password_hash) {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = state.auth.issue_access(user)?;
    let refresh_token = state.auth.issue_refresh(user)?;
    Ok(Json(DataEnvelope::with_message(
        SessionData {
            user: user.into(),
            token,
            refresh_token,
        },
        "Login successful",
    )))
}

pub async fn me(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Json<DataEnvelope<UserPublic>>> {
    let claims = state.auth.verify_access(bearer_token(&headers)?)?;
    let id: u64 = claims
        .sub
        .parse()
        .map_err(|_| ApiError::Unauthorized("Invalid token".to_string()))?;

    let users = state.users.read().await;
    let user = users
        .by_id(id)
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;
    Ok(Json(DataEnvelope::new(user.into())))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefreshData {
    pub token: String,
}

pub async fn refresh(
    State(state): State<SharedState>,
    Json(request): Json<RefreshRequest>,
) -> ApiResult<Json<DataEnvelope<RefreshData>>> {
    let token = request
        .refresh_token
        .ok_or_else(|| ApiError::Unauthorized("Refresh token is required".to_string()))?;

    let claims = state.auth.verify_refresh(&token)?;
    let id: u64 = claims
        .sub
        .parse()
        .map_err(|_| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

    let users = state.users.read().await;
    let user = users
        .by_id(id)
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

    let token = state.auth.issue_access(user)?;
    Ok(Json(DataEnvelope::new(RefreshData { token })))
}
