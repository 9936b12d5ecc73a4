use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Booking record, read-only to chat: the contact list is derived from the
/// distinct counterparties found here. Either side may be null on legacy
/// documents, so distinct queries must filter nulls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub user_id: Option<ObjectId>,
    #[serde(default)]
    pub provider_id: Option<ObjectId>,
    #[serde(default)]
    pub service_id: Option<ObjectId>,
    #[serde(default)]
    pub pet_id: Option<ObjectId>,
    pub start_time: DateTime,
    pub end_time: DateTime,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Booking {
    pub const COLLECTION: &'static str = "bookings";
}
