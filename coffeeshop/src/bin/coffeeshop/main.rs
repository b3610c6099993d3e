use coffeeshoplib::auth::TokenVerifier;
use coffeeshoplib::database::entities::Database;
use coffeeshoplib::environment::EnvironmentConfig;
use log::info;
use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket::{catchers, routes, Build, Rocket};
use snafu::ResultExt;

use crate::config::{build_rocket_config, Config};
use crate::cors::{preflight, Cors};
use crate::drinks::{drinks_add, drinks_delete, drinks_get, drinks_get_detail, drinks_update};
use crate::errors::{
    bad_request, default_catcher, invalid_header, not_found, permission_error,
    unprocessable_entity,
};
use crate::startup::{run_migrations, ConfigErr, EnvironmentErr, LaunchErr};
use crate::webconfig::get_environment;

mod auth;
mod config;
mod cors;
mod drinks;
mod errors;
mod startup;
mod webconfig;

fn assemble(
    rocket: Rocket<Build>,
    environment: EnvironmentConfig,
    token_verifier: TokenVerifier,
) -> Rocket<Build> {
    rocket
        .manage(environment)
        .manage(token_verifier)
        .attach(Database::fairing())
        .attach(AdHoc::try_on_ignite("Run database migrations", run_migrations))
        .attach(Cors)
        .register(
            "/",
            catchers![
                bad_request,
                invalid_header,
                not_found,
                permission_error,
                unprocessable_entity,
                default_catcher
            ],
        )
        .mount(
            "/",
            routes![
                drinks_get,
                drinks_get_detail,
                drinks_add,
                drinks_update,
                drinks_delete,
                get_environment,
                preflight
            ],
        )
}

fn build_rocket(figment: Figment) -> startup::Result<Rocket<Build>> {
    let rocket = rocket::custom(figment);
    let app_config = rocket.figment().extract::<Config>().context(ConfigErr)?;

    info!(
        "serving {} environment, api at {}",
        if app_config.environment.production {
            "production"
        } else {
            "development"
        },
        app_config.environment.api_server_url
    );

    let token_verifier = app_config.token_verifier().context(EnvironmentErr)?;

    Ok(assemble(rocket, app_config.environment, token_verifier))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_module("coffeeshop", log::LevelFilter::Debug)
        .init();

    build_rocket(build_rocket_config())?
        .launch()
        .await
        .context(LaunchErr)?;

    Ok(())
}
