use coffeeshoplib::environment::EnvironmentConfig;
use rocket::State;
use rocket::{get, serde::json::Json};

#[get("/environment")]
pub fn get_environment(cfg: &State<EnvironmentConfig>) -> Json<EnvironmentConfig> {
    Json(cfg.inner().clone())
}
