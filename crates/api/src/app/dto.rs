use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warbler_auth::{IssuedToken, Principal, Role};
use warbler_core::{PostId, UserId};
use warbler_infra::Post;

// -------------------------
// Request DTOs
// -------------------------

// No `Debug` on credential-bearing requests.

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username_or_email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PostContentRequest {
    pub content: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl From<&Principal> for PrincipalResponse {
    fn from(p: &Principal) -> Self {
        Self {
            id: p.id,
            username: p.username.clone(),
            email: p.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub roles: Vec<Role>,
}

impl From<&Principal> for MeResponse {
    fn from(p: &Principal) -> Self {
        Self {
            id: p.id,
            username: p.username.clone(),
            email: p.email.clone(),
            roles: p.roles.iter().copied().collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl JwtResponse {
    pub fn new(issued: IssuedToken, principal: &Principal) -> Self {
        Self {
            expires_at: issued.claims.exp,
            token: issued.token,
            token_type: "Bearer",
            id: principal.id,
            username: principal.username.clone(),
            email: principal.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: PostId,
    pub owner_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            owner_id: p.owner_id,
            content: p.content,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
