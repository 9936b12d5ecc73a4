use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Users
    create_indexes(db, "users", vec![index_unique(bson::doc! { "email": 1 })]).await?;

    // Providers
    create_indexes(
        db,
        "providers",
        vec![
            index_unique(bson::doc! { "email": 1 }),
            index(bson::doc! { "status": 1 }),
        ],
    )
    .await?;

    // Bookings
    create_indexes(
        db,
        "bookings",
        vec![
            index(bson::doc! { "user_id": 1, "start_time": -1 }),
            index(bson::doc! { "provider_id": 1, "start_time": -1 }),
        ],
    )
    .await?;

    // Chat messages: one index per thread direction. The compound index
    // covers the $or thread query from the sender side; the receiver-side
    // index covers the other arm and the conversation aggregation match.
    create_indexes(
        db,
        "chat_messages",
        vec![
            index(
                bson::doc! { "sender_id": 1, "sender_role": 1, "receiver_id": 1, "receiver_role": 1, "created_at": -1 },
            ),
            index(bson::doc! { "receiver_id": 1, "receiver_role": 1, "created_at": -1 }),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    let coll = db.collection::<bson::Document>(collection);
    coll.create_indexes(indexes).await?;
    info!(collection, "Indexes created");
    Ok(())
}
