use coffeeshoplib::errors::CoffeeError;
use log::{error, warn};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{catch, response::Responder, Request};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Coffee Error {source:?}")]
    CoffeeError {
        #[from]
        source: CoffeeError,
    },

    #[error("HTTP Error {0:?}")]
    HttpError(Status),
}

impl<'r, 'o: 'r> Responder<'r, 'o> for AppError {
    fn respond_to(self, req: &'r Request<'_>) -> rocket::response::Result<'o> {
        error!("Error: {}", self);

        match self {
            Self::HttpError(x) => x.respond_to(req),
            Self::CoffeeError {
                source: CoffeeError::InvalidDrink { .. },
            } => Status::UnprocessableEntity.respond_to(req),
            _ => Status::InternalServerError.respond_to(req),
        }
    }
}

/// Writes the database refused (constraint violations and the like) are the
/// client's fault as far as the API is concerned.
pub fn unprocessable(err: CoffeeError) -> AppError {
    warn!("drink rejected by database: {err}");
    AppError::HttpError(Status::UnprocessableEntity)
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

impl ErrorBody {
    fn new(status: Status) -> Json<ErrorBody> {
        let message = match status.code {
            400 => "bad request",
            401 => "Invalid header!",
            404 => "resource not found",
            405 => "Permission not found!",
            422 => "unprocessable",
            500 => "internal server error",
            _ => status.reason().unwrap_or("unknown error"),
        };

        Json(ErrorBody {
            success: false,
            error: status.code,
            message: message.to_string(),
        })
    }
}

#[catch(400)]
pub fn bad_request() -> Json<ErrorBody> {
    ErrorBody::new(Status::BadRequest)
}

#[catch(401)]
pub fn invalid_header() -> Json<ErrorBody> {
    ErrorBody::new(Status::Unauthorized)
}

#[catch(404)]
pub fn not_found() -> Json<ErrorBody> {
    ErrorBody::new(Status::NotFound)
}

#[catch(405)]
pub fn permission_error() -> Json<ErrorBody> {
    ErrorBody::new(Status::MethodNotAllowed)
}

#[catch(422)]
pub fn unprocessable_entity() -> Json<ErrorBody> {
    ErrorBody::new(Status::UnprocessableEntity)
}

#[catch(default)]
pub fn default_catcher(status: Status, _req: &Request<'_>) -> Json<ErrorBody> {
    ErrorBody::new(status)
}
