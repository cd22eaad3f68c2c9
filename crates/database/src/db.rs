use log::info;
use sea_orm::{Database, DatabaseConnection, DbErr};

const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Creates a database connection from `DATABASE_URL`, reading `.env` when present
pub async fn create_connection() -> Result<DatabaseConnection, DbErr> {
    let url = dotenvy::var(DATABASE_URL_VAR)
        .map_err(|_| DbErr::Custom(format!("{DATABASE_URL_VAR} is not set")))?;

    let db = Database::connect(url).await?;
    info!("Connected to database");
    Ok(db)
}
