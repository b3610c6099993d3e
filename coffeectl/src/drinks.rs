use coffeeshoplib::environment::EnvironmentConfig;
use log::debug;
use serde_json::json;
use yansi::Paint;

use crate::cli::{DrinkData, DrinkUpdate};
use crate::error::Error;
use crate::http_client::{api_url, check_response, prepare_client};
use crate::{humanize, AppContext};

impl DrinkData {
    fn to_json(&self) -> serde_json::Value {
        json!({
            "title": self.title,
            "recipe": self.ingredients,
        })
    }
}

impl DrinkUpdate {
    fn to_json(&self) -> serde_json::Value {
        let mut patch = serde_json::Map::new();
        if let Some(title) = &self.title {
            patch.insert("title".to_string(), json!(title));
        }
        if !self.ingredients.is_empty() {
            patch.insert("recipe".to_string(), json!(self.ingredients));
        }
        serde_json::Value::Object(patch)
    }
}

pub fn show_drinks(detail: bool, ctx: &AppContext, environment: &EnvironmentConfig) -> Result<(), Error> {
    if ctx.humanize {
        humanize::ensure_jless("drinks")?;
    }

    let path = if detail { "drinks-detail" } else { "drinks" };
    let client = prepare_client(ctx)?;
    let response = client
        .get(format!("{}/{}", api_url(ctx, environment), path))
        .send()?;
    let text = check_response(response)?.text()?;

    debug!("got response from server, presenting output");
    humanize::handle_user_response(ctx, &text)?;
    Ok(())
}

pub fn create_drink(
    drink: &DrinkData,
    ctx: &AppContext,
    environment: &EnvironmentConfig,
) -> Result<(), Error> {
    let client = prepare_client(ctx)?;
    let response = client
        .post(format!("{}/drinks", api_url(ctx, environment)))
        .json(&drink.to_json())
        .send()?;
    let response = check_response(response)?;

    let status = response.status();
    let text = response.text()?;
    if ctx.humanize {
        humanize::print_http(
            status,
            &format!("Drink {} is on the menu.", drink.title.bright_blue()),
        );
    } else {
        println!("{text}");
    }
    Ok(())
}

pub fn update_drink(
    update: &DrinkUpdate,
    ctx: &AppContext,
    environment: &EnvironmentConfig,
) -> Result<(), Error> {
    let client = prepare_client(ctx)?;
    let response = client
        .patch(format!("{}/drinks/{}", api_url(ctx, environment), update.id))
        .json(&update.to_json())
        .send()?;
    let response = check_response(response)?;

    let status = response.status();
    let text = response.text()?;
    if ctx.humanize {
        humanize::print_http(
            status,
            &format!("Drink {} was updated.", update.id.bright_blue()),
        );
    } else {
        println!("{text}");
    }
    Ok(())
}

pub fn delete_drink(id: i32, ctx: &AppContext, environment: &EnvironmentConfig) -> Result<(), Error> {
    let client = prepare_client(ctx)?;
    let response = client
        .delete(format!("{}/drinks/{}", api_url(ctx, environment), id))
        .send()?;
    let response = check_response(response)?;

    let status = response.status();
    let text = response.text()?;
    if ctx.humanize {
        humanize::print_http(
            status,
            &format!("Drink {} was taken off the menu.", id.bright_blue()),
        );
    } else {
        println!("{text}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use coffeeshoplib::database::entities::drink::Ingredient;
    use serde_json::json;

    use crate::cli::{DrinkData, DrinkUpdate};

    fn ingredient(name: &str, color: &str, parts: i32) -> Ingredient {
        Ingredient {
            name: name.to_string(),
            color: color.to_string(),
            parts,
        }
    }

    #[test]
    fn test_drink_data_to_json() {
        let data = DrinkData {
            title: "Flat White".to_string(),
            ingredients: vec![ingredient("milk", "grey", 1), ingredient("coffee", "brown", 3)],
        };

        let should_be = json!({
            "title": "Flat White",
            "recipe": [
                { "name": "milk", "color": "grey", "parts": 1 },
                { "name": "coffee", "color": "brown", "parts": 3 }
            ]
        });

        assert_eq!(data.to_json(), should_be);
    }

    #[test]
    fn test_empty_drink_update_to_json() {
        let update = DrinkUpdate {
            id: 3,
            title: None,
            ingredients: vec![],
        };

        assert_eq!(update.to_json(), json!({}));
    }

    #[test]
    fn test_full_drink_update_to_json() {
        let update = DrinkUpdate {
            id: 3,
            title: Some("Cortado".to_string()),
            ingredients: vec![ingredient("espresso", "brown", 1)],
        };

        let should_be = json!({
            "title": "Cortado",
            "recipe": [ { "name": "espresso", "color": "brown", "parts": 1 } ]
        });

        assert_eq!(update.to_json(), should_be);
    }
}
