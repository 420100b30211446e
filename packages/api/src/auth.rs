// ABOUTME: Authentication context for API requests
// ABOUTME: Resolves the acting user from identity headers set by the auth proxy

use axum::{extract::FromRequestParts, http::request::Parts};

use aquaflow_core::{Actor, Role};

use crate::response::ApiError;

/// Current authenticated user. Identity is established upstream (hosted auth
/// provider behind a reverse proxy); this layer trusts the forwarded headers
/// and rejects requests that carry none.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header(parts, "x-user-id")
            .ok_or_else(|| ApiError::Unauthorized("missing x-user-id header".to_string()))?
            .to_string();

        let role = header(parts, "x-user-role")
            .ok_or_else(|| ApiError::Unauthorized("missing x-user-role header".to_string()))?
            .parse::<Role>()
            .map_err(|e| ApiError::Unauthorized(format!("invalid role: {e}")))?;

        let name = header(parts, "x-user-name").unwrap_or(&id).to_string();

        Ok(Self { id, name, role })
    }
}
