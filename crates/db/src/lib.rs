pub mod indexes;
pub mod models;

use mongodb::{Client, Database};
use pawcare_config::MongoSettings;
use tracing::info;

/// Opens a client and pings the server so a bad URI fails at startup
/// instead of on the first request.
pub async fn connect(settings: &MongoSettings) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_uri_str(&settings.uri).await?;
    let db = client.database(&settings.database);
    db.run_command(bson::doc! { "ping": 1 }).await?;
    info!(database = %settings.database, "Connected to MongoDB");
    Ok(db)
}
