use coffeeshoplib::database::entities::drink::{DrinkLong, DrinkShort};
use coffeeshoplib::database::entities::{Database, Drink, DrinkPatch, NewDrink};
use coffeeshoplib::errors::CoffeeError;
use log::info;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{delete, get, patch, post};
use serde::{Deserialize, Serialize};

use crate::auth::permission::{DeleteDrinks, GetDrinksDetail, PatchDrinks, PostDrinks};
use crate::auth::Authorized;
use crate::errors::{unprocessable, AppError};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct RoDrinks<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct RoSuccess {
    pub success: bool,
}

impl<T> From<Vec<T>> for RoDrinks<T> {
    fn from(drinks: Vec<T>) -> Self {
        RoDrinks {
            success: true,
            drinks,
        }
    }
}

fn success() -> Json<RoSuccess> {
    Json(RoSuccess { success: true })
}

#[get("/drinks")]
pub async fn drinks_get(db: Database) -> Result<Json<RoDrinks<DrinkShort>>, AppError> {
    let drinks = db.get_all_drinks().await?;
    Ok(Json(drinks.iter().map(Drink::short).collect::<Vec<_>>().into()))
}

#[get("/drinks-detail")]
pub async fn drinks_get_detail(
    db: Database,
    _auth: Authorized<GetDrinksDetail>,
) -> Result<Json<RoDrinks<DrinkLong>>, AppError> {
    let drinks = db.get_all_drinks().await?;
    Ok(Json(drinks.iter().map(Drink::long).collect::<Vec<_>>().into()))
}

#[post("/drinks", data = "<drink>")]
pub async fn drinks_add(
    drink: Json<NewDrink>,
    db: Database,
    auth: Authorized<PostDrinks>,
) -> Result<Json<RoDrinks<DrinkShort>>, AppError> {
    let drink = drink.into_inner();
    drink.validate().map_err(CoffeeError::from)?;

    let drink = db.insert_drink(drink).await.map_err(unprocessable)?;
    info!("drink {} ({}) added by {:?}", drink.id, drink.title, auth.claims.sub);

    let drinks = db.get_all_drinks().await?;
    Ok(Json(drinks.iter().map(Drink::short).collect::<Vec<_>>().into()))
}

#[patch("/drinks/<id>", data = "<patch>")]
pub async fn drinks_update(
    id: Option<i32>,
    patch: Json<DrinkPatch>,
    db: Database,
    auth: Authorized<PatchDrinks>,
) -> Result<Json<RoSuccess>, AppError> {
    let id = id.ok_or(AppError::HttpError(Status::NotFound))?;
    let mut drink = db
        .get_drink(id)
        .await?
        .ok_or(AppError::HttpError(Status::NotFound))?;

    if !drink.apply(patch.into_inner()) {
        return Ok(success());
    }

    drink.validate().map_err(CoffeeError::from)?;
    db.update_drink(drink).await.map_err(unprocessable)?;
    info!("drink {id} updated by {:?}", auth.claims.sub);

    Ok(success())
}

#[delete("/drinks/<id>")]
pub async fn drinks_delete(
    id: Option<i32>,
    db: Database,
    auth: Authorized<DeleteDrinks>,
) -> Result<Json<RoSuccess>, AppError> {
    let id = id.ok_or(AppError::HttpError(Status::NotFound))?;
    if db.get_drink(id).await?.is_none() {
        return Err(AppError::HttpError(Status::NotFound));
    }

    db.delete_drink(id).await.map_err(unprocessable)?;
    info!("drink {id} deleted by {:?}", auth.claims.sub);

    Ok(success())
}
