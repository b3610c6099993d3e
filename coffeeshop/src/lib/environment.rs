use figment::providers::{Env, Format, Serialized, Toml};
use figment::{Figment, Profile};
use reqwest::Url;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const ENV_PREFIX: &str = "COFFEESHOP_";

pub const DEVELOPMENT_PROFILE: &str = "development";
pub const PRODUCTION_PROFILE: &str = "production";

pub const DEVELOPMENT_API_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const DEVELOPMENT_AUTH0_URL: &str = "https://myfsnd.auth0.com";
pub const DEVELOPMENT_AUTH0_AUDIENCE: &str = "coffee";
pub const DEVELOPMENT_AUTH0_CLIENT_ID: &str = "OsshjOxmDrndSfTB0w3Dm7ZCmHpedacd";
pub const DEVELOPMENT_AUTH0_CALLBACK_URL: &str = "http://localhost:8100";

#[derive(Error, Debug)]
pub enum EnvironmentError {
    #[error("load environment: {source}")]
    Load {
        #[from]
        source: Box<figment::Error>,
    },

    #[error("{field} is not a valid url: {value:?}")]
    InvalidUrl { field: &'static str, value: String },
}

/// Serialized with the frontend's field names, deserialization also accepts snake_case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    #[serde(deserialize_with = "flag")]
    pub production: bool,

    #[serde(rename(serialize = "apiServerUrl"), alias = "apiServerUrl")]
    pub api_server_url: String,

    pub auth0: Auth0Config,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Auth0Config {
    /// Tenant base url, e.g. `https://myfsnd.auth0.com`.
    pub url: String,
    pub audience: String,

    #[serde(rename(serialize = "clientId"), alias = "clientId")]
    pub client_id: String,

    /// Where Auth0 sends the browser back to after login.
    #[serde(rename(serialize = "callbackURL"), alias = "callbackURL")]
    pub callback_url: String,
}

/// Accepts `true` as well as `"true"`, environment overrides arrive as strings.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Text(text) => text
            .trim()
            .to_ascii_lowercase()
            .parse()
            .map_err(|_| D::Error::custom(format!("expected true or false, found {text:?}"))),
    }
}

/// Reads `<prefix>A__B=value` variables as `{"a": {"b": "value"}}`.
///
/// Unlike figment's `Env` provider the values are never parsed, so `007`
/// stays the string `"007"`.
pub fn string_env(prefix: &str, ignore: &[&str]) -> Value {
    let vars = std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
    nest_string_vars(prefix, ignore, vars)
}

fn nest_string_vars<I>(prefix: &str, ignore: &[&str], vars: I) -> Value
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut root = Map::new();

    for (key, value) in vars {
        let Some(key) = key.strip_prefix(prefix) else {
            continue;
        };
        if ignore.iter().any(|ignored| ignored.eq_ignore_ascii_case(key)) {
            continue;
        }

        let path: Vec<String> = key.split("__").map(str::to_ascii_lowercase).collect();
        if path.iter().any(String::is_empty) {
            continue;
        }
        insert_path(&mut root, &path, value);
    }

    Value::Object(root)
}

fn insert_path(map: &mut Map<String, Value>, path: &[String], value: String) {
    match path {
        [] => {}
        [key] => {
            map.insert(key.clone(), Value::String(value));
        }
        [key, rest @ ..] => {
            let entry = map
                .entry(key.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(inner) = entry {
                insert_path(inner, rest, value);
            }
        }
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl Default for Auth0Config {
    fn default() -> Self {
        Auth0Config {
            url: DEVELOPMENT_AUTH0_URL.to_string(),
            audience: DEVELOPMENT_AUTH0_AUDIENCE.to_string(),
            client_id: DEVELOPMENT_AUTH0_CLIENT_ID.to_string(),
            callback_url: DEVELOPMENT_AUTH0_CALLBACK_URL.to_string(),
        }
    }
}

impl EnvironmentConfig {
    pub fn development() -> Self {
        EnvironmentConfig {
            production: false,
            api_server_url: DEVELOPMENT_API_SERVER_URL.to_string(),
            auth0: Auth0Config::default(),
        }
    }

    /// `Environment.toml` nested by profile, then `COFFEESHOP_*` overrides with
    /// `__` separating nested keys (`COFFEESHOP_AUTH0__CLIENT_ID`).
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file(Env::var_or("COFFEESHOP_ENVIRONMENT", "Environment.toml")).nested())
            .merge(Serialized::globals(string_env(
                ENV_PREFIX,
                &["PROFILE", "ENVIRONMENT"],
            )))
            .select(Profile::from_env_or("COFFEESHOP_PROFILE", DEVELOPMENT_PROFILE))
    }

    pub fn load() -> Result<Self, EnvironmentError> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, EnvironmentError> {
        let environment: EnvironmentConfig = figment.extract().map_err(Box::new)?;
        log::debug!(
            "loaded environment (production: {}, api server: {})",
            environment.production,
            environment.api_server_url
        );
        Ok(environment)
    }
}

impl Auth0Config {
    fn tenant_url(&self) -> Result<Url, EnvironmentError> {
        // Plain tenant domains are accepted as well as full urls.
        let raw = if self.url.contains("://") {
            self.url.clone()
        } else {
            format!("https://{}", self.url)
        };

        Url::parse(&raw).map_err(|_| EnvironmentError::InvalidUrl {
            field: "auth0.url",
            value: self.url.clone(),
        })
    }

    pub fn domain(&self) -> Result<String, EnvironmentError> {
        self.tenant_url()?
            .host_str()
            .map(str::to_string)
            .ok_or_else(|| EnvironmentError::InvalidUrl {
                field: "auth0.url",
                value: self.url.clone(),
            })
    }

    /// Issuer Auth0 writes into the `iss` claim of access tokens.
    pub fn issuer(&self) -> Result<String, EnvironmentError> {
        Ok(format!("https://{}/", self.domain()?))
    }

    pub fn jwks_url(&self) -> Result<String, EnvironmentError> {
        Ok(format!("https://{}/.well-known/jwks.json", self.domain()?))
    }

    /// Builds the implicit-grant `/authorize` link a frontend sends users to.
    pub fn login_link(&self, callback_path: &str) -> Result<Url, EnvironmentError> {
        let mut link = self.tenant_url()?;
        link.set_path("/authorize");
        link.query_pairs_mut()
            .clear()
            .append_pair("audience", &self.audience)
            .append_pair("response_type", "token")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &format!("{}{}", self.callback_url, callback_path));
        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        nest_string_vars, Auth0Config, EnvironmentConfig, DEVELOPMENT_PROFILE, PRODUCTION_PROFILE,
    };
    use figment::providers::{Format, Serialized, Toml};
    use figment::{Figment, Jail};
    use serde_json::json;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn development_variant_matches_literals() {
        let environment = EnvironmentConfig::development();

        assert!(!environment.production);
        assert_eq!(environment.api_server_url, "http://127.0.0.1:5000");
        assert_eq!(environment.auth0.url, "https://myfsnd.auth0.com");
        assert_eq!(environment.auth0.audience, "coffee");
        assert_eq!(environment.auth0.client_id, "OsshjOxmDrndSfTB0w3Dm7ZCmHpedacd");
        assert_eq!(environment.auth0.callback_url, "http://localhost:8100");
    }

    #[test]
    fn serializes_with_frontend_field_names() {
        let value = serde_json::to_value(EnvironmentConfig::development()).unwrap();

        let should_be = json!({
            "production": false,
            "apiServerUrl": "http://127.0.0.1:5000",
            "auth0": {
                "url": "https://myfsnd.auth0.com",
                "audience": "coffee",
                "clientId": "OsshjOxmDrndSfTB0w3Dm7ZCmHpedacd",
                "callbackURL": "http://localhost:8100"
            }
        });

        assert_eq!(value, should_be);
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert!(object["production"].is_boolean());
        assert!(object["apiServerUrl"].is_string());
        assert!(object["auth0"]
            .as_object()
            .unwrap()
            .values()
            .all(|v| v.is_string()));
    }

    #[test]
    fn json_values_survive_a_round_trip() {
        let mut environment = EnvironmentConfig::development();
        environment.api_server_url = "https://api.example.org:8443/v1?x=1".to_string();
        environment.auth0.callback_url = "http://localhost:8100/tabs/user-page".to_string();

        let text = serde_json::to_string(&environment).unwrap();
        let back: EnvironmentConfig = serde_json::from_str(&text).unwrap();

        assert_eq!(back, environment);
    }

    #[test]
    fn empty_figment_yields_development_variant() {
        let environment = EnvironmentConfig::from_figment(Figment::new()).unwrap();
        assert_eq!(environment, EnvironmentConfig::development());
    }

    #[test]
    fn profile_sections_select_the_variant() {
        let toml = r#"
            [default]
            api_server_url = "http://127.0.0.1:5000"

            [production]
            production = true
            api_server_url = "https://coffee.example.org"

            [production.auth0]
            clientId = "prod-client"
        "#;

        let development = EnvironmentConfig::from_figment(
            Figment::new()
                .merge(Toml::string(toml).nested())
                .select(DEVELOPMENT_PROFILE),
        )
        .unwrap();
        assert!(!development.production);
        assert_eq!(development.api_server_url, "http://127.0.0.1:5000");

        let production = EnvironmentConfig::from_figment(
            Figment::new()
                .merge(Toml::string(toml).nested())
                .select(PRODUCTION_PROFILE),
        )
        .unwrap();
        assert!(production.production);
        assert_eq!(production.api_server_url, "https://coffee.example.org");
        assert_eq!(production.auth0.client_id, "prod-client");
        // untouched keys keep their defaults
        assert_eq!(production.auth0.audience, "coffee");
    }

    #[test]
    fn snake_case_keys_load_unchanged() {
        let figment = Figment::new().merge(Serialized::defaults(json!({
            "api_server_url": "http://10.0.0.2:5000/",
            "auth0": {
                "client_id": "  spaced  ",
                "callback_url": "http://localhost:8100"
            }
        })));

        let environment = EnvironmentConfig::from_figment(figment).unwrap();
        assert_eq!(environment.api_server_url, "http://10.0.0.2:5000/");
        assert_eq!(environment.auth0.client_id, "  spaced  ");
    }

    #[test]
    fn derives_auth0_endpoints() {
        let auth0 = Auth0Config::default();

        assert_eq!(auth0.domain().unwrap(), "myfsnd.auth0.com");
        assert_eq!(auth0.issuer().unwrap(), "https://myfsnd.auth0.com/");
        assert_eq!(
            auth0.jwks_url().unwrap(),
            "https://myfsnd.auth0.com/.well-known/jwks.json"
        );

        let bare = Auth0Config {
            url: "tenant.eu.auth0.com".to_string(),
            ..Auth0Config::default()
        };
        assert_eq!(bare.issuer().unwrap(), "https://tenant.eu.auth0.com/");
    }

    #[test]
    fn rejects_garbage_tenant_url() {
        let auth0 = Auth0Config {
            url: "https://".to_string(),
            ..Auth0Config::default()
        };
        assert!(auth0.domain().is_err());
    }

    #[test]
    fn login_link_carries_client_settings() {
        let link = Auth0Config::default()
            .login_link("/tabs/user-page")
            .unwrap();

        assert_eq!(
            link.as_str(),
            "https://myfsnd.auth0.com/authorize?audience=coffee&response_type=token\
             &client_id=OsshjOxmDrndSfTB0w3Dm7ZCmHpedacd\
             &redirect_uri=http%3A%2F%2Flocalhost%3A8100%2Ftabs%2Fuser-page"
        );
    }

    #[test]
    fn nests_prefixed_vars_as_strings() {
        let nested = nest_string_vars(
            "COFFEESHOP_",
            &["PROFILE"],
            vars(&[
                ("COFFEESHOP_AUTH0__CLIENT_ID", "007"),
                ("COFFEESHOP_API_SERVER_URL", "true"),
                ("COFFEESHOP_PROFILE", "production"),
                ("COFFEESHOP_AUTH0____URL", "ignored"),
                ("PATH", "/usr/bin"),
            ]),
        );

        assert_eq!(
            nested,
            json!({
                "api_server_url": "true",
                "auth0": { "client_id": "007" }
            })
        );
    }

    #[test]
    fn load_reads_profile_file_and_env_overrides() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "Environment.toml",
                r#"
                [default]
                api_server_url = "http://127.0.0.1:5000"

                [production]
                production = true
                api_server_url = "https://coffee.example.org"
                "#,
            )?;

            let development = EnvironmentConfig::load().unwrap();
            assert_eq!(development, EnvironmentConfig::development());

            jail.set_env("COFFEESHOP_PROFILE", "production");
            jail.set_env("COFFEESHOP_AUTH0__CLIENT_ID", "prod-client");

            let production = EnvironmentConfig::load().unwrap();
            assert!(production.production);
            assert_eq!(production.api_server_url, "https://coffee.example.org");
            assert_eq!(production.auth0.client_id, "prod-client");
            assert_eq!(production.auth0.audience, "coffee");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_keep_strings_unchanged() {
        Jail::expect_with(|jail| {
            jail.set_env("COFFEESHOP_AUTH0__AUDIENCE", "007");
            jail.set_env("COFFEESHOP_API_SERVER_URL", "true");
            jail.set_env("COFFEESHOP_AUTH0__CALLBACK_URL", " http://localhost:8100 ");
            jail.set_env("COFFEESHOP_PRODUCTION", "true");

            let environment = EnvironmentConfig::load().unwrap();
            assert_eq!(environment.auth0.audience, "007");
            assert_eq!(environment.api_server_url, "true");
            assert_eq!(environment.auth0.callback_url, " http://localhost:8100 ");
            assert!(environment.production);
            Ok(())
        });
    }

    #[test]
    fn environment_file_path_can_be_overridden() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "Environment.toml",
                "[default]\napi_server_url = \"http://wrong\"\n",
            )?;
            jail.create_file(
                "staging.toml",
                "[default]\napi_server_url = \"http://staging:5000\"\n",
            )?;
            jail.set_env("COFFEESHOP_ENVIRONMENT", "staging.toml");

            let environment = EnvironmentConfig::load().unwrap();
            assert_eq!(environment.api_server_url, "http://staging:5000");
            Ok(())
        });
    }

    #[test]
    fn production_flag_rejects_garbage() {
        Jail::expect_with(|jail| {
            jail.set_env("COFFEESHOP_PRODUCTION", "maybe");
            assert!(EnvironmentConfig::load().is_err());
            Ok(())
        });
    }
}
