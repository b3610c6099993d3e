use crate::error::Error;
use crate::AppContext;
use coffeeshoplib::environment::EnvironmentConfig;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

pub fn prepare_client(ctx: &AppContext) -> Result<Client, Error> {
    let mut default_headers = HeaderMap::new();
    if let Some(token) = &ctx.token {
        let value =
            HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| Error::InvalidToken)?;
        default_headers.insert(AUTHORIZATION, value);
    }

    let client = Client::builder()
        .default_headers(default_headers)
        .user_agent(format!("coffeectl/{}", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

pub fn api_url(ctx: &AppContext, environment: &EnvironmentConfig) -> String {
    ctx.api_url
        .as_deref()
        .unwrap_or(&environment.api_server_url)
        .trim_end_matches('/')
        .to_string()
}

/// Turns the API's `{success: false, error, message}` bodies into errors.
pub fn check_response(response: Response) -> Result<Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<serde_json::Value>()
        .ok()
        .and_then(|body| body.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    Err(Error::Api(status.as_u16(), message))
}

#[cfg(test)]
mod tests {
    use super::{api_url, check_response};
    use crate::error::Error;
    use crate::AppContext;
    use coffeeshoplib::environment::EnvironmentConfig;
    use reqwest::blocking::Response;

    fn response(status: u16, body: &str) -> Response {
        http::Response::builder()
            .status(status)
            .body(body.to_string())
            .unwrap()
            .into()
    }

    #[test]
    fn api_url_prefers_explicit_option() {
        let environment = EnvironmentConfig::development();
        let mut ctx = AppContext {
            api_url: None,
            token: None,
            humanize: false,
        };

        assert_eq!(api_url(&ctx, &environment), "http://127.0.0.1:5000");

        ctx.api_url = Some("https://coffee.example.org/".to_string());
        assert_eq!(api_url(&ctx, &environment), "https://coffee.example.org");
    }

    #[test]
    fn successful_responses_pass_through() {
        let response = check_response(response(200, r#"{"success": true}"#)).unwrap();
        assert_eq!(response.text().unwrap(), r#"{"success": true}"#);
    }

    #[test]
    fn error_bodies_become_api_errors() {
        let err = check_response(response(
            405,
            r#"{"success": false, "error": 405, "message": "Permission not found!"}"#,
        ))
        .unwrap_err();

        assert!(
            matches!(err, Error::Api(405, ref message) if message == "Permission not found!"),
            "{err:?}"
        );
    }

    #[test]
    fn error_without_json_body_uses_reason() {
        let err = check_response(response(502, "<html>bad gateway</html>")).unwrap_err();

        assert!(
            matches!(err, Error::Api(502, ref message) if message == "Bad Gateway"),
            "{err:?}"
        );
    }
}
