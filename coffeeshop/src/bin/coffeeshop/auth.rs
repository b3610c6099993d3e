use std::marker::PhantomData;

use coffeeshoplib::auth::{
    check_permissions, get_token_auth_header, AuthError, Claims, Permission, TokenVerifier,
};
use log::warn;
use rocket::http::Status;
use rocket::{request, State};

/// Marker for the permission a route needs.
pub trait RequiredPermission: Send + Sync + 'static {
    const PERMISSION: Permission;
}

pub mod permission {
    use super::RequiredPermission;
    use coffeeshoplib::auth::Permission;

    pub struct GetDrinksDetail;
    pub struct PostDrinks;
    pub struct PatchDrinks;
    pub struct DeleteDrinks;

    impl RequiredPermission for GetDrinksDetail {
        const PERMISSION: Permission = Permission::GetDrinksDetail;
    }

    impl RequiredPermission for PostDrinks {
        const PERMISSION: Permission = Permission::PostDrinks;
    }

    impl RequiredPermission for PatchDrinks {
        const PERMISSION: Permission = Permission::PatchDrinks;
    }

    impl RequiredPermission for DeleteDrinks {
        const PERMISSION: Permission = Permission::DeleteDrinks;
    }
}

/// Request guard: a verified bearer token carrying permission `P`.
pub struct Authorized<P: RequiredPermission> {
    pub claims: Claims,
    _permission: PhantomData<P>,
}

async fn authorize(
    verifier: &TokenVerifier,
    header: Option<&str>,
    permission: Permission,
) -> Result<Claims, AuthError> {
    let token = get_token_auth_header(header)?;
    let claims = verifier.verify(token).await?;
    check_permissions(permission, &claims)?;
    Ok(claims)
}

#[rocket::async_trait]
impl<'r, P: RequiredPermission> request::FromRequest<'r> for Authorized<P> {
    type Error = ();

    async fn from_request(request: &'r request::Request<'_>) -> request::Outcome<Self, ()> {
        let verifier: &State<TokenVerifier> = match request.guard::<&State<TokenVerifier>>().await
        {
            request::Outcome::Success(v) => v,
            _ => return request::Outcome::Error((Status::InternalServerError, ())),
        };

        let header = request.headers().get_one("Authorization");

        match authorize(verifier, header, P::PERMISSION).await {
            Ok(claims) => request::Outcome::Success(Authorized {
                claims,
                _permission: PhantomData,
            }),
            Err(err) => {
                warn!("Request for {} denied: {}", P::PERMISSION, err);
                request::Outcome::Error((err.status(), ()))
            }
        }
    }
}
