use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use tokio::sync::RwLock;

use crate::auth::{AuthError, Claims};
use crate::environment::{Auth0Config, EnvironmentError};

pub const DEFAULT_JWKS_CACHE: Duration = Duration::from_secs(300);

enum JwksSource {
    Remote {
        url: String,
        client: reqwest::Client,
        cache_duration: Duration,
        cache: RwLock<Option<(Instant, Arc<JwkSet>)>>,
    },
    Static(Arc<JwkSet>),
}

/// Verifies RS256 access tokens against the tenant's published key set.
pub struct TokenVerifier {
    audience: String,
    issuer: String,
    source: JwksSource,
}

impl TokenVerifier {
    pub fn remote(auth0: &Auth0Config, cache_duration: Duration) -> Result<Self, EnvironmentError> {
        Self::remote_at(auth0, auth0.jwks_url()?, cache_duration)
    }

    /// Like [`TokenVerifier::remote`], fetching the key set from `jwks_url`.
    pub fn remote_at(
        auth0: &Auth0Config,
        jwks_url: String,
        cache_duration: Duration,
    ) -> Result<Self, EnvironmentError> {
        Ok(TokenVerifier {
            audience: auth0.audience.clone(),
            issuer: auth0.issuer()?,
            source: JwksSource::Remote {
                url: jwks_url,
                client: reqwest::Client::new(),
                cache_duration,
                cache: RwLock::new(None),
            },
        })
    }

    /// A verifier with a fixed key set, nothing is fetched.
    pub fn with_jwks(auth0: &Auth0Config, jwks: JwkSet) -> Result<Self, EnvironmentError> {
        Ok(TokenVerifier {
            audience: auth0.audience.clone(),
            issuer: auth0.issuer()?,
            source: JwksSource::Static(Arc::new(jwks)),
        })
    }

    async fn jwks(&self) -> Result<Arc<JwkSet>, AuthError> {
        match &self.source {
            JwksSource::Static(jwks) => Ok(jwks.clone()),
            JwksSource::Remote {
                url,
                client,
                cache_duration,
                cache,
            } => {
                if let Some((fetched_at, jwks)) = cache.read().await.as_ref() {
                    if fetched_at.elapsed() < *cache_duration {
                        return Ok(jwks.clone());
                    }
                }

                log::debug!("fetching JWKS from {url}");
                let jwks: JwkSet = client
                    .get(url)
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;

                let jwks = Arc::new(jwks);
                *cache.write().await = Some((Instant::now(), jwks.clone()));
                Ok(jwks)
            }
        }
    }

    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|source| AuthError::TokenInvalid { source })?;
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;

        let jwks = self.jwks().await?;
        let jwk = jwks.find(&kid).ok_or(AuthError::KeyNotFound)?;
        let key = DecodingKey::from_jwk(jwk).map_err(|source| AuthError::TokenInvalid { source })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        match decode::<Claims>(token, &key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(err) if matches!(err.kind(), ErrorKind::ExpiredSignature) => {
                Err(AuthError::TokenExpired)
            }
            Err(source) => Err(AuthError::TokenInvalid { source }),
        }
    }
}
