use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::error::ApiError;
use crate::services::user_service::mirror_user;
use crate::state::{AppState, SessionSettings};

/// Authenticated caller, resolved through the identity provider and injected into request extensions
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub access_token: String,
}

/// Session middleware for every protected route.
///
/// Resolves the caller from the bearer token or the session cookie; anything
/// short of a live provider session is a 401 before the handler runs.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_access_token(request.headers(), &state.session.cookie_name)
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    let user = state
        .identity
        .current_user(&token)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    tracing::debug!("Session resolved for user {}", user.id);

    // Rows that failed to mirror at sign-in are recreated before any owned write
    if state.store.find_user(&user.id).await?.is_none() {
        mirror_user(state.store.as_ref(), &user, None).await;
    }

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        email: user.email,
        access_token: token,
    });

    Ok(next.run(request).await)
}

/// Bearer token first, then the session cookie
pub fn extract_access_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    bearer_token(headers).or_else(|| cookie_token(&CookieJar::from_headers(headers), cookie_name))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn cookie_token(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|cookie| unquote(cookie.value()).to_string())
        .filter(|value| !value.is_empty())
}

/// Cookie values may be wrapped in one pair of double quotes
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}

/// Session cookie carrying a fresh access token
pub fn session_cookie(settings: &SessionSettings, token: &str, max_age: i64) -> Cookie<'static> {
    Cookie::build(Cookie::new(settings.cookie_name.clone(), token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.secure)
        .max_age(Duration::seconds(max_age))
        .build()
}

/// Expired session cookie, sent on sign-out
pub fn clear_session_cookie(settings: &SessionSettings) -> Cookie<'static> {
    session_cookie(settings, "", 0)
}
