use coffeeshoplib::environment::EnvironmentError;
use std::fmt::{Debug, Display, Formatter};
use yansi::Paint;

#[derive(Debug)]
pub enum Error {
    Dependency(String, String),
    Environment(EnvironmentError),
    Reqwest(reqwest::Error),
    Api(u16, String),
    Json(serde_json::Error),
    Io(std::io::Error),
    InvalidToken,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Dependency(ref prog, ref dependent) => {
                write!(
                    f,
                    "{} {} {} {}",
                    "Dependency Error:".bright_red(),
                    prog.bold(),
                    "is not installed as a dependency on this system, but needs to be for"
                        .bright_red(),
                    dependent.bright_red()
                )
            }
            Error::Environment(e) => write!(f, "{} {}", "Environment Error:".bright_red(), e),
            Error::Reqwest(e) => write!(f, "{} {}", "HTTP Error:".bright_red(), e),
            Error::Api(status, message) => write!(
                f,
                "{} {} {}",
                "API Error:".bright_red(),
                status.bold(),
                message
            ),
            Error::Json(e) => write!(f, "{} {}", "JSON Error:".bright_red(), e),
            Error::Io(e) => write!(f, "{} {}", "IO Error:".bright_red(), e),
            Error::InvalidToken => write!(
                f,
                "{} token contains characters not allowed in a header",
                "Token Error:".bright_red()
            ),
        }
    }
}

impl std::error::Error for Error {}

impl From<EnvironmentError> for Error {
    fn from(e: EnvironmentError) -> Self {
        Error::Environment(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Reqwest(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
