use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::chat::Principal;
use crate::error::ApiError;

/// Resolve the caller and inject a `Principal` into request extensions.
///
/// No Authorization header means guest. A header that is present but
/// malformed, or a token that fails verification, is rejected with 401.
pub async fn principal_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    let principal = match resolve_principal(&state, &headers) {
        Ok(principal) => principal,
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(principal);
    next.run(request).await
}

fn resolve_principal(state: &AppState, headers: &HeaderMap) -> Result<Principal, ApiError> {
    match extract_jwt_from_headers(headers)? {
        Some(token) => Ok(state.jwt.verify(&token)?),
        None => Ok(Principal::guest()),
    }
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<Option<String>, ApiError> {
    let Some(auth_header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err(ApiError::unauthorized("Empty JWT token"));
        }
        Ok(Some(token.trim().to_string()))
    } else {
        Err(ApiError::unauthorized("Authorization header must use Bearer token format"))
    }
}
