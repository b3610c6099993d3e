pub mod auth;
pub mod database;
pub mod environment;
pub mod errors;
