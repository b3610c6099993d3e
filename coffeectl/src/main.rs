mod cli;
mod drinks;
mod environment;
mod error;
mod http_client;
mod humanize;

use crate::cli::{AppContext, Cli, DrinkCommands, EnvironmentCommands};
use crate::error::Error;
use clap::Parser;
use coffeeshoplib::environment::EnvironmentConfig;

fn run(cli: Cli) -> Result<(), Error> {
    let environment = EnvironmentConfig::load()?;

    match cli {
        Cli::Drinks(drinks_args) => match drinks_args.commands {
            DrinkCommands::List { detail } => {
                drinks::show_drinks(detail, &drinks_args.ctx, &environment)
            }
            DrinkCommands::Create(drink) => {
                drinks::create_drink(&drink, &drinks_args.ctx, &environment)
            }
            DrinkCommands::Update(update) => {
                drinks::update_drink(&update, &drinks_args.ctx, &environment)
            }
            DrinkCommands::Delete { id } => {
                drinks::delete_drink(id, &drinks_args.ctx, &environment)
            }
        },
        Cli::Environment(environment_args) => match environment_args.commands {
            EnvironmentCommands::Show { remote } => {
                environment::show_environment(remote, &environment_args.ctx, &environment)
            }
        },
        Cli::LoginLink(login_args) => environment::show_login_link(&login_args, &environment),
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
