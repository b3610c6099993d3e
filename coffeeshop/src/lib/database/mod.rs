pub mod entities;
pub mod schema;

use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::errors::CoffeeError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub fn run_pending_migrations(conn: &mut SqliteConnection) -> Result<(), CoffeeError> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| CoffeeError::Migration(e.to_string()))?;

    for migration in applied {
        log::info!("applied migration {migration}");
    }
    Ok(())
}
