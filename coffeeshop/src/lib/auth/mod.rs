pub mod jwks;

use rocket::http::Status;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use jwks::TokenVerifier;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No Authorization!")]
    NoAuthorization,

    #[error("Malformed header!")]
    MalformedHeader,

    #[error("Invalid header!")]
    MissingKeyId,

    #[error("Invalid header! Unable to find appropriate key.")]
    KeyNotFound,

    #[error("Token expired!")]
    TokenExpired,

    #[error("Invalid header! Unable to parse auth token: {source}")]
    TokenInvalid {
        #[source]
        source: jsonwebtoken::errors::Error,
    },

    #[error("fetch JWKS: {source}")]
    JwksFetch {
        #[from]
        source: reqwest::Error,
    },

    #[error("Permissions not in JWT!")]
    PermissionsMissing,

    #[error("Permission not found!")]
    PermissionNotFound,
}

impl AuthError {
    /// Bad tokens are 401, valid tokens lacking a permission are 405.
    pub fn status(&self) -> Status {
        match self {
            AuthError::PermissionsMissing | AuthError::PermissionNotFound => Status::MethodNotAllowed,
            _ => Status::Unauthorized,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Permission {
    GetDrinksDetail,
    PostDrinks,
    PatchDrinks,
    DeleteDrinks,
}

impl Permission {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Permission::GetDrinksDetail => "get:drinks-detail",
            Permission::PostDrinks => "post:drinks",
            Permission::PatchDrinks => "patch:drinks",
            Permission::DeleteDrinks => "delete:drinks",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The claims we read from a verified access token. `aud`, `iss` and `exp`
/// are checked during decoding and not kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,

    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn get_token_auth_header(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::NoAuthorization)?;
    let parts: Vec<&str> = header.split(' ').collect();

    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => Ok(*token),
        _ => Err(AuthError::MalformedHeader),
    }
}

pub fn check_permissions(permission: Permission, claims: &Claims) -> Result<(), AuthError> {
    let permissions = claims
        .permissions
        .as_ref()
        .ok_or(AuthError::PermissionsMissing)?;

    if !permissions.iter().any(|p| p == permission.as_str()) {
        return Err(AuthError::PermissionNotFound);
    }

    Ok(())
}
