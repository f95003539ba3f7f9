use axum::{extract::State, http::HeaderMap, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::auth::{ProviderSession, SessionResponse, SessionUser};
use crate::error::ApiError;
use crate::middleware::auth::{clear_session_cookie, extract_access_token, session_cookie};
use crate::middleware::{JsonBody, Message};
use crate::services::user_service::mirror_user;
use crate::services::validation::{self, FieldErrors};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

fn credentials(email: Option<&str>, password: Option<&str>) -> Result<(String, String), ApiError> {
    let mut errors = FieldErrors::default();
    let email = errors.check("email", validation::required(email, "Email"));
    let password = errors.check(
        "password",
        password
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .ok_or_else(|| "Password is required".to_string()),
    );
    errors.into_result("Email and password are required")?;
    Ok((email.unwrap_or_default(), password.unwrap_or_default()))
}

/// Session body plus the session cookie when the provider issued a token
fn session_response(
    state: &AppState,
    jar: CookieJar,
    session: ProviderSession,
    name: Option<String>,
    message: Option<String>,
) -> (CookieJar, Json<SessionResponse>) {
    let jar = match &session.token {
        Some(token) => jar.add(session_cookie(&state.session, &token.access_token, token.expires_in)),
        None => jar,
    };

    let body = SessionResponse {
        message,
        user: SessionUser {
            id: session.user.id,
            email: session.user.email,
            name,
        },
        session: session.token,
    };

    (jar, Json(body))
}

/// POST /api/auth/signup - create an account with the identity provider
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(payload): JsonBody<SignupRequest>,
) -> Result<(CookieJar, Json<SessionResponse>), ApiError> {
    let (email, password) = credentials(payload.email.as_deref(), payload.password.as_deref())?;

    let session = state.identity.sign_up(&email, &password).await?;
    let mirrored = mirror_user(state.store.as_ref(), &session.user, payload.name).await;

    tracing::info!("Signed up user {}", session.user.id);
    Ok(session_response(
        &state,
        jar,
        session,
        mirrored.map(|u| u.name),
        Some("Check your email to verify".to_string()),
    ))
}

/// POST /api/auth/login - exchange credentials for a session
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>), ApiError> {
    let (email, password) = credentials(payload.email.as_deref(), payload.password.as_deref())?;

    let session = state.identity.sign_in(&email, &password).await?;
    let mirrored = mirror_user(state.store.as_ref(), &session.user, None).await;

    tracing::info!("Signed in user {}", session.user.id);
    Ok(session_response(&state, jar, session, mirrored.map(|u| u.name), None))
}

/// POST /api/auth/logout - end the session and clear the cookie
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(CookieJar, Json<Message>), ApiError> {
    if let Some(token) = extract_access_token(&headers, &state.session.cookie_name) {
        state.identity.sign_out(&token).await?;
    }

    Ok((jar.add(clear_session_cookie(&state.session)), Json(Message::new("Signed out"))))
}
