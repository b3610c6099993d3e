use thiserror::Error;

use crate::database::entities::drink::DrinkValidationError;

#[derive(Error, Debug)]
pub enum CoffeeError {
    #[error("serde_json Error {source:?}")]
    SerdeJson {
        #[from]
        source: serde_json::Error,
    },

    #[error("diesel Error {source:?}")]
    Diesel {
        #[from]
        source: diesel::result::Error,
    },

    #[error("Migration Error {0}")]
    Migration(String),

    #[error("Invalid Drink {source}")]
    InvalidDrink {
        #[from]
        source: DrinkValidationError,
    },
}
