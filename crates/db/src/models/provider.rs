use std::fmt;

use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Shop,
    Vet,
    Babysitter,
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProviderType::Shop => "shop",
            ProviderType::Vet => "vet",
            ProviderType::Babysitter => "babysitter",
        };
        f.write_str(s)
    }
}

/// Verification is an admin workflow outside this service; chat never
/// changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    Pending,
    Approved,
    Rejected,
}

/// Service-provider business account, read-only to chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub business_name: String,
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub provider_type: Option<ProviderType>,
    pub status: ProviderStatus,
    #[serde(default)]
    pub rating: f64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Provider {
    pub const COLLECTION: &'static str = "providers";
}
