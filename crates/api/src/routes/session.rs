use axum::{
    extract::{rejection::JsonRejection, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::cookie::{build_clear_cookie, build_session_cookie, extract_session_token};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct RedirectUrlResponse {
    pub redirect_url: String,
}

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    pub code: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

fn with_cookie(mut response: Response, cookie: String) -> Result<Response, AppError> {
    response.headers_mut().insert(
        SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| AppError::Internal("Failed to build cookie header".to_string()))?,
    );
    Ok(response)
}

pub async fn google_redirect_url(
    State(state): State<AppState>,
) -> Result<Json<RedirectUrlResponse>, AppError> {
    let redirect_url = state.session_client().google_redirect_url().await?;
    Ok(Json(RedirectUrlResponse { redirect_url }))
}

pub async fn create_session(
    State(state): State<AppState>,
    body: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let code = req.code.trim();
    if code.is_empty() {
        return Err(AppError::BadRequest("No authorization code provided".to_string()));
    }

    let session_token = state.session_client().create_session(code).await?;

    let auth_config = state.auth_config();
    let cookie = build_session_cookie(
        &auth_config.cookie_name,
        &session_token,
        auth_config.cookie_max_age_secs,
        &auth_config.cookie_domain,
    );
    with_cookie(Json(SuccessResponse { success: true }).into_response(), cookie)
}

pub async fn current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let session_token = headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|header| extract_session_token(header, &state.auth_config().cookie_name))
        .ok_or(AppError::Unauthorized)?;

    let user = state.session_client().current_user(&session_token).await?;
    Ok(Json(user))
}

pub async fn logout(State(state): State<AppState>) -> Result<Response, AppError> {
    let auth_config = state.auth_config();
    let cookie = build_clear_cookie(&auth_config.cookie_name, &auth_config.cookie_domain);
    with_cookie(Json(SuccessResponse { success: true }).into_response(), cookie)
}
