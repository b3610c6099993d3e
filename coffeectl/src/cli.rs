use clap::{Args, Parser, Subcommand};
use coffeeshoplib::database::entities::drink::Ingredient;

#[derive(Parser, Debug, Clone)]
pub struct AppContext {
    /// Base url of the coffee shop API, defaults to the environment's apiServerUrl
    #[clap(long, env = "COFFEE_API_URL")]
    pub api_url: Option<String>,

    /// Auth0 access token, sent as a bearer token
    #[clap(long, env = "COFFEE_TOKEN")]
    pub token: Option<String>,

    #[clap(long)]
    pub humanize: bool,
}

/// Parses `name:color:parts`, e.g. `milk:white:2`.
pub fn parse_ingredient(raw: &str) -> Result<Ingredient, String> {
    let mut fields = raw.splitn(3, ':');
    match (fields.next(), fields.next(), fields.next()) {
        (Some(name), Some(color), Some(parts)) => Ok(Ingredient {
            name: name.to_string(),
            color: color.to_string(),
            parts: parts
                .parse()
                .map_err(|_| format!("parts must be a number, got {parts:?}"))?,
        }),
        _ => Err(format!("expected name:color:parts, got {raw:?}")),
    }
}

#[derive(Parser, Debug, Clone)]
pub struct DrinkData {
    #[clap(short, long)]
    pub title: String,
    /// Repeatable, formatted as name:color:parts
    #[clap(long = "ingredient", value_parser = parse_ingredient)]
    pub ingredients: Vec<Ingredient>,
}

#[derive(Parser, Debug, Clone)]
pub struct DrinkUpdate {
    pub id: i32,
    #[clap(short, long)]
    pub title: Option<String>,
    /// Replaces the whole recipe when given
    #[clap(long = "ingredient", value_parser = parse_ingredient)]
    pub ingredients: Vec<Ingredient>,
}

#[derive(Subcommand, Debug)]
pub enum DrinkCommands {
    List {
        /// Include ingredient names, needs get:drinks-detail
        #[clap(long)]
        detail: bool,
    },
    Create(DrinkData),
    Update(DrinkUpdate),
    Delete { id: i32 },
}

#[derive(Args, Debug)]
#[command(version, about = "Manage the drinks on the menu", long_about = None)]
pub struct DrinksArgs {
    #[command(subcommand)]
    pub commands: DrinkCommands,

    #[command(flatten)]
    pub ctx: AppContext,
}

#[derive(Subcommand, Debug)]
pub enum EnvironmentCommands {
    Show {
        /// Ask the API server for its environment instead of loading it locally
        #[clap(long)]
        remote: bool,
    },
}

#[derive(Args, Debug)]
#[command(version, about = "Inspect the environment configuration", long_about = None)]
pub struct EnvironmentArgs {
    #[command(subcommand)]
    pub commands: EnvironmentCommands,

    #[command(flatten)]
    pub ctx: AppContext,
}

#[derive(Args, Debug)]
#[command(version, about = "Print the Auth0 login link", long_about = None)]
pub struct LoginLinkArgs {
    /// Appended to the environment's callback url
    #[clap(long, default_value = "/tabs/user-page")]
    pub callback_path: String,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub enum Cli {
    Drinks(DrinksArgs),
    Environment(EnvironmentArgs),
    LoginLink(LoginLinkArgs),
}
