use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database::entities::drink::db_impl::DbDrink;
use crate::errors::CoffeeError;

pub const MAX_TITLE_LEN: usize = 80;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: i32,
}

/// Ingredient as shown to anonymous visitors: no names, only the look.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientShort {
    pub color: String,
    pub parts: i32,
}

/// Clients send either one ingredient or a list of them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkShort {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<IngredientShort>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkLong {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDrink {
    pub title: String,
    pub recipe: RecipeInput,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<RecipeInput>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DrinkValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("title is longer than {MAX_TITLE_LEN} characters")]
    TitleTooLong,

    #[error("recipe must contain at least one ingredient")]
    EmptyRecipe,

    #[error("ingredient #{0} needs a name and a color")]
    IncompleteIngredient(usize),

    #[error("ingredient #{0} needs at least one part")]
    InvalidParts(usize),
}

impl From<RecipeInput> for Vec<Ingredient> {
    fn from(value: RecipeInput) -> Self {
        match value {
            RecipeInput::Many(ingredients) => ingredients,
            RecipeInput::One(ingredient) => vec![ingredient],
        }
    }
}

impl From<&Ingredient> for IngredientShort {
    fn from(value: &Ingredient) -> Self {
        IngredientShort {
            color: value.color.clone(),
            parts: value.parts,
        }
    }
}

fn validate(title: &str, recipe: &[Ingredient]) -> Result<(), DrinkValidationError> {
    if title.trim().is_empty() {
        return Err(DrinkValidationError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DrinkValidationError::TitleTooLong);
    }
    if recipe.is_empty() {
        return Err(DrinkValidationError::EmptyRecipe);
    }

    for (idx, ingredient) in recipe.iter().enumerate() {
        if ingredient.name.trim().is_empty() || ingredient.color.trim().is_empty() {
            return Err(DrinkValidationError::IncompleteIngredient(idx));
        }
        if ingredient.parts < 1 {
            return Err(DrinkValidationError::InvalidParts(idx));
        }
    }

    Ok(())
}

impl Drink {
    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.iter().map(IngredientShort::from).collect(),
        }
    }

    pub fn long(&self) -> DrinkLong {
        DrinkLong {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), DrinkValidationError> {
        validate(&self.title, &self.recipe)
    }

    /// Applies the fields present in `patch`, returns whether anything changed.
    pub fn apply(&mut self, patch: DrinkPatch) -> bool {
        let mut changed = false;

        if let Some(title) = patch.title {
            if title != self.title {
                self.title = title;
                changed = true;
            }
        }

        if let Some(recipe) = patch.recipe {
            let recipe: Vec<Ingredient> = recipe.into();
            if recipe != self.recipe {
                self.recipe = recipe;
                changed = true;
            }
        }

        changed
    }
}

impl AsRef<Drink> for Drink {
    fn as_ref(&self) -> &Drink {
        self
    }
}

impl NewDrink {
    pub fn ingredients(&self) -> Vec<Ingredient> {
        self.recipe.clone().into()
    }

    pub fn validate(&self) -> Result<(), DrinkValidationError> {
        validate(&self.title, &self.ingredients())
    }
}

impl TryFrom<DbDrink> for Drink {
    type Error = CoffeeError;

    fn try_from(value: DbDrink) -> Result<Self, Self::Error> {
        Ok(Drink {
            id: value.id,
            title: value.title,
            recipe: serde_json::from_str(&value.recipe)?,
        })
    }
}

// diesel's generated table types have to stay scoped in here
pub mod db_impl {
    use crate::database::entities::drink::{Drink, NewDrink};
    use crate::database::schema::drinks;
    use crate::errors::CoffeeError;
    use diesel::{
        Connection, ExpressionMethods, Insertable, OptionalExtension, QueryDsl, Queryable,
        RunQueryDsl, Selectable, SqliteConnection,
    };

    #[derive(Queryable, Selectable, Debug, Clone)]
    #[diesel(table_name = drinks)]
    pub struct DbDrink {
        pub id: i32,
        pub title: String,
        pub recipe: String,
    }

    #[derive(Insertable, Debug)]
    #[diesel(table_name = drinks)]
    pub struct NewDbDrink {
        pub title: String,
        pub recipe: String,
    }

    impl TryFrom<&NewDrink> for NewDbDrink {
        type Error = CoffeeError;

        fn try_from(value: &NewDrink) -> Result<Self, Self::Error> {
            Ok(NewDbDrink {
                title: value.title.clone(),
                recipe: serde_json::to_string(&value.ingredients())?,
            })
        }
    }

    pub trait DrinkDatabase {
        fn get_all_drinks(&mut self) -> Result<Vec<Drink>, CoffeeError>;
        fn get_drink(&mut self, drink_id: i32) -> Result<Option<Drink>, CoffeeError>;
        fn insert_drink(&mut self, drink: NewDrink) -> Result<Drink, CoffeeError>;
        fn update_drink(&mut self, drink: &Drink) -> Result<usize, CoffeeError>;
        fn delete_drink(&mut self, drink_id: i32) -> Result<usize, CoffeeError>;
    }

    impl DrinkDatabase for SqliteConnection {
        fn get_all_drinks(&mut self) -> Result<Vec<Drink>, CoffeeError> {
            drinks::table
                .order(drinks::id.asc())
                .load::<DbDrink>(self)?
                .into_iter()
                .map(Drink::try_from)
                .collect()
        }

        fn get_drink(&mut self, drink_id: i32) -> Result<Option<Drink>, CoffeeError> {
            let db_drink = drinks::table
                .find(drink_id)
                .first::<DbDrink>(self)
                .optional()?;

            db_drink.map(Drink::try_from).transpose()
        }

        fn insert_drink(&mut self, drink: NewDrink) -> Result<Drink, CoffeeError> {
            let new_db_drink = NewDbDrink::try_from(&drink)?;

            self.transaction(|conn| {
                diesel::insert_into(drinks::table)
                    .values(&new_db_drink)
                    .execute(conn)?;

                // titles are unique, so this finds exactly the row we just wrote
                let db_drink = drinks::table
                    .filter(drinks::title.eq(new_db_drink.title.as_str()))
                    .first::<DbDrink>(conn)?;

                Drink::try_from(db_drink)
            })
        }

        fn update_drink(&mut self, drink: &Drink) -> Result<usize, CoffeeError> {
            let recipe = serde_json::to_string(&drink.recipe)?;

            let affected = diesel::update(drinks::table.find(drink.id))
                .set((drinks::title.eq(drink.title.as_str()), drinks::recipe.eq(recipe)))
                .execute(self)?;

            Ok(affected)
        }

        fn delete_drink(&mut self, drink_id: i32) -> Result<usize, CoffeeError> {
            let affected = diesel::delete(drinks::table.find(drink_id)).execute(self)?;
            Ok(affected)
        }
    }
}
