use coffeeshoplib::environment::EnvironmentConfig;

use crate::cli::LoginLinkArgs;
use crate::error::Error;
use crate::http_client::{api_url, check_response, prepare_client};
use crate::{humanize, AppContext};

pub fn show_environment(
    remote: bool,
    ctx: &AppContext,
    environment: &EnvironmentConfig,
) -> Result<(), Error> {
    if ctx.humanize {
        humanize::ensure_jless("environment")?;
    }

    let text = if remote {
        let client = prepare_client(ctx)?;
        let response = client
            .get(format!("{}/environment", api_url(ctx, environment)))
            .send()?;
        let remote_environment: EnvironmentConfig = check_response(response)?.json()?;
        serde_json::to_string(&remote_environment)?
    } else {
        serde_json::to_string(environment)?
    };

    humanize::handle_user_response(ctx, &text)
}

pub fn show_login_link(args: &LoginLinkArgs, environment: &EnvironmentConfig) -> Result<(), Error> {
    let link = environment.auth0.login_link(&args.callback_path)?;
    println!("{link}");
    Ok(())
}
