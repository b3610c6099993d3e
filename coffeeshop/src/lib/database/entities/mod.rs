pub mod drink;

use crate::database::entities::drink::db_impl::DrinkDatabase;
use crate::errors::CoffeeError;
use delegate::delegate;
pub use drink::{Drink, DrinkPatch, NewDrink};
use rocket_sync_db_pools::database;

#[database("coffee_db")]
pub struct Database(diesel::SqliteConnection);

impl Database {
    delegate! {
        #[await(false)]
        #[expr(self.run(move |conn| $).await)]
        #[through(DrinkDatabase)]
        to conn {
            pub async fn get_all_drinks(&self) -> Result<Vec<Drink>, CoffeeError>;
            pub async fn get_drink(&self, drink_id: i32) -> Result<Option<Drink>, CoffeeError>;
            pub async fn insert_drink(&self, drink: NewDrink) -> Result<Drink, CoffeeError>;
            pub async fn update_drink(&self, #[as_ref] drink: Drink) -> Result<usize, CoffeeError>;
            pub async fn delete_drink(&self, drink_id: i32) -> Result<usize, CoffeeError>;
        }
    }
}
