use axum::{
    extract::{FromRef, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, ChangePasswordRequest, LoginRequest, PublicUser, RefreshRequest,
            RegisterRequest,
        },
        repo::User,
        services::{
            hash_password, is_valid_email, verify_password, AuthUser, JwtKeys,
            ACCESS_TOKEN_COOKIE,
        },
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me/password", axum::routing::patch(change_password))
}

fn token_pair(keys: &JwtKeys, user_id: uuid::Uuid) -> Result<(String, String), ApiError> {
    let access = keys.sign_access(user_id).map_err(ApiError::internal)?;
    let refresh = keys.sign_refresh(user_id).map_err(ApiError::internal)?;
    Ok((access, refresh))
}

fn access_cookie_headers(access_token: &str) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    let cookie = format!("{ACCESS_TOKEN_COOKIE}={access_token}; Path=/; HttpOnly; SameSite=Lax");
    headers.insert(
        header::SET_COOKIE,
        cookie
            .parse()
            .map_err(|e: header::InvalidHeaderValue| ApiError::internal(anyhow::Error::new(e)))?,
    );
    Ok(headers)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.nickname = payload.nickname.trim().to_string();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::BadRequest("invalid email".into()));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::BadRequest("password too short".into()));
    }
    if payload.nickname.is_empty() {
        return Err(ApiError::BadRequest("nickname is required".into()));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("email already registered".into()));
    }
    if User::find_by_nickname(&state.db, &payload.nickname)
        .await?
        .is_some()
    {
        warn!(nickname = %payload.nickname, "nickname already taken");
        return Err(ApiError::Conflict("nickname already taken".into()));
    }

    // Hash on the write path so a plaintext password never reaches the DB.
    let hash = hash_password(&payload.password).map_err(ApiError::internal)?;
    let user = User::create(
        &state.db,
        &payload.email,
        &hash,
        &payload.nickname,
        payload.image_url.as_deref(),
    )
    .await?;

    let keys = JwtKeys::from_ref(&state);
    let (access_token, refresh_token) = token_pair(&keys, user.id)?;
    let headers = access_cookie_headers(&access_token)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        headers,
        Json(AuthResponse {
            access_token,
            refresh_token,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::BadRequest("invalid email".into()));
    }

    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::Unauthorized("invalid credentials".into()));
        }
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(ApiError::internal)?;
    if !ok {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("invalid credentials".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let (access_token, refresh_token) = token_pair(&keys, user.id)?;
    let headers = access_cookie_headers(&access_token)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((
        headers,
        Json(AuthResponse {
            access_token,
            refresh_token,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("user not found".into()))?;

    let (access_token, refresh_token) = token_pair(&keys, user.id)?;
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    }))
}

/// PATCH /me/password
///
/// The only write path that touches the password column: verify the
/// current password, hash the new one, store the hash. Plaintext never
/// reaches the repo layer.
#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    if payload.new_password.len() < 8 {
        return Err(ApiError::BadRequest("password too short".into()));
    }

    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("user not found".into()))?;

    let ok = verify_password(&payload.current_password, &user.password_hash)
        .map_err(ApiError::internal)?;
    if !ok {
        warn!(%user_id, "password change with wrong current password");
        return Err(ApiError::Unauthorized("invalid credentials".into()));
    }

    let hash = hash_password(&payload.new_password).map_err(ApiError::internal)?;
    let user = User::set_password_hash(&state.db, user_id, &hash).await?;

    info!(%user_id, "password changed");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("user not found".into()))?;
    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn sample_user() -> User {
        User {
            id: uuid::Uuid::new_v4(),
            role: "user".into(),
            email: "cook@example.com".into(),
            password_hash: "$argon2id$fake".into(),
            nickname: "chef_kim".into(),
            image_url: None,
            subscription_id: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn public_user_never_serializes_password_hash() {
        let user = sample_user();
        let public: PublicUser = user.into();
        let json = serde_json::to_string(&public).unwrap();
        assert!(json.contains("chef_kim"));
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn access_cookie_header_shape() {
        let headers = access_cookie_headers("abc.def.ghi").unwrap();
        let value = headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(value.starts_with("accessToken=abc.def.ghi"));
        assert!(value.contains("HttpOnly"));
    }
}
