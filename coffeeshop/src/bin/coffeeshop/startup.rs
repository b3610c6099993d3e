use coffeeshoplib::database::entities::Database;
use coffeeshoplib::database::run_pending_migrations;
use coffeeshoplib::environment::EnvironmentError;
use rocket::{fairing, figment, Build, Rocket};
use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), context(suffix(Err)))]
pub enum Error {
    #[snafu(display("load config: {source}"))]
    Config {
        #[snafu(source(from(figment::Error, Box::new)))]
        source: Box<figment::Error>,
    },

    #[snafu(display("prepare token verification: {source}"))]
    Environment { source: EnvironmentError },

    #[snafu(display("connection to database failed"))]
    DatabaseConnect,

    #[snafu(display("launch server: {source}"))]
    Launch {
        #[snafu(source(from(rocket::Error, Box::new)))]
        source: Box<rocket::Error>,
    },
}

pub async fn run_migrations(rocket: Rocket<Build>) -> fairing::Result {
    let Some(db) = Database::get_one(&rocket).await else {
        log::error!("{}", Error::DatabaseConnect);
        return Err(rocket);
    };

    match db.run(run_pending_migrations).await {
        Ok(()) => {
            log::info!("database schema is up to date");
            Ok(rocket)
        }
        Err(err) => {
            log::error!("running migrations failed: {err}");
            Err(rocket)
        }
    }
}
