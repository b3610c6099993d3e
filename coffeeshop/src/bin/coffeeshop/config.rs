use std::time::Duration;

use coffeeshoplib::auth::jwks::DEFAULT_JWKS_CACHE;
use coffeeshoplib::auth::TokenVerifier;
use coffeeshoplib::environment::{string_env, EnvironmentConfig, EnvironmentError};
use rocket::figment::providers::{Env, Format, Serialized, Toml};
use rocket::figment::{Figment, Profile};
use rocket::serde::Deserialize;

fn default_jwks_cache_secs() -> u64 {
    DEFAULT_JWKS_CACHE.as_secs()
}

#[derive(Deserialize)]
pub struct Config {
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default = "default_jwks_cache_secs")]
    pub jwks_cache_secs: u64,
}

pub fn build_rocket_config() -> Figment {
    // Taken from rocket source code and added .split("__") to be able to add keys in nested structures.
    Figment::from(rocket::Config::default())
        .merge(Toml::file(Env::var_or("ROCKET_CONFIG", "config.toml")).nested())
        .merge(
            Env::prefixed("ROCKET_")
                .ignore(&["PROFILE"])
                .split("__")
                .global(),
        )
        // environment strings are taken verbatim, `ROCKET_ENVIRONMENT__AUTH0__AUDIENCE=007` stays "007"
        .merge(Serialized::global(
            "environment",
            string_env("ROCKET_ENVIRONMENT__", &[]),
        ))
        .select(Profile::from_env_or(
            "ROCKET_PROFILE",
            rocket::Config::DEFAULT_PROFILE,
        ))
}

impl Config {
    pub fn token_verifier(&self) -> Result<TokenVerifier, EnvironmentError> {
        log::info!(
            "verifying tokens against {} (audience {})",
            self.environment.auth0.jwks_url()?,
            self.environment.auth0.audience
        );

        TokenVerifier::remote(
            &self.environment.auth0,
            Duration::from_secs(self.jwks_cache_secs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{build_rocket_config, Config};
    use rocket::figment::Jail;

    #[test]
    fn environment_overrides_keep_their_text() {
        Jail::expect_with(|jail| {
            jail.set_env("ROCKET_ENVIRONMENT__AUTH0__AUDIENCE", "007");
            jail.set_env("ROCKET_ENVIRONMENT__PRODUCTION", "true");
            jail.set_env("ROCKET_JWKS_CACHE_SECS", "60");

            let config: Config = build_rocket_config().extract()?;
            assert_eq!(config.environment.auth0.audience, "007");
            assert!(config.environment.production);
            assert_eq!(config.environment.auth0.client_id, "OsshjOxmDrndSfTB0w3Dm7ZCmHpedacd");
            assert_eq!(config.jwks_cache_secs, 60);
            Ok(())
        });
    }

    #[test]
    fn defaults_without_config_file() {
        Jail::expect_with(|_| {
            let config: Config = build_rocket_config().extract()?;
            assert!(!config.environment.production);
            assert_eq!(config.jwks_cache_secs, 300);
            Ok(())
        });
    }
}
