use std::collections::HashMap;

use bson::{doc, oid::ObjectId, Bson, DateTime, Document};
use futures::TryStreamExt;
use mongodb::Database;
use serde::Deserialize;

use pawcare_db::models::{Booking, ChatMessage, ChatRole, Provider, User};

use super::base::{total_pages, BaseDao, DaoResult, PaginatedResult};

/// One conversation thread as seen by the requesting actor: the counterparty
/// plus a snapshot of the most recent message exchanged with them.
#[derive(Debug, Clone)]
pub struct ConversationSummary {
    pub participant_id: ObjectId,
    pub participant_role: ChatRole,
    pub participant_name: String,
    pub participant_image: Option<String>,
    pub participant_subtitle: Option<String>,
    pub last_message: String,
    pub last_message_at: DateTime,
    pub last_message_sender_id: ObjectId,
    pub last_message_sender_role: ChatRole,
}

/// A counterparty the actor is allowed to chat with (derived from bookings,
/// independent of whether any messages exist yet).
#[derive(Debug, Clone)]
pub struct ChatContact {
    pub participant_id: ObjectId,
    pub participant_role: ChatRole,
    pub name: String,
    pub image_url: Option<String>,
    pub subtitle: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ParticipantProfile {
    pub name: String,
    pub image: Option<String>,
    pub subtitle: Option<String>,
}

/// Display profile for a pet owner: "First Last", falling back to the email,
/// falling back to a literal "User".
pub fn user_profile(user: &User) -> ParticipantProfile {
    let full_name = format!("{} {}", user.first_name, user.last_name)
        .trim()
        .to_string();
    let name = if full_name.is_empty() {
        user.email.clone()
    } else {
        full_name
    };
    let name = if name.is_empty() {
        "User".to_string()
    } else {
        name
    };
    ParticipantProfile {
        name,
        image: user.image_url.clone().filter(|url| !url.is_empty()),
        subtitle: non_empty(&user.email),
    }
}

/// Display profile for a provider: business name, falling back to the email,
/// falling back to a literal "Provider". The subtitle describes the provider
/// type when one is set.
pub fn provider_profile(provider: &Provider) -> ParticipantProfile {
    let name = if provider.business_name.is_empty() {
        provider.email.clone()
    } else {
        provider.business_name.clone()
    };
    let name = if name.is_empty() {
        "Provider".to_string()
    } else {
        name
    };
    let subtitle = match provider.provider_type {
        Some(kind) => Some(format!("{kind} provider")),
        None => non_empty(&provider.email),
    };
    ParticipantProfile {
        name,
        image: None,
        subtitle,
    }
}

/// Used when a participant surfaced from the message log no longer has a
/// profile document.
pub fn fallback_profile(role: ChatRole) -> ParticipantProfile {
    let name = match role {
        ChatRole::User => "User",
        ChatRole::Provider => "Provider",
    };
    ParticipantProfile {
        name: name.to_string(),
        image: None,
        subtitle: None,
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// Shape of one `$group` row out of the conversation pipeline.
#[derive(Debug, Deserialize)]
struct ConversationKey {
    participant_id: ObjectId,
    participant_role: ChatRole,
}

#[derive(Debug, Deserialize)]
struct ConversationRow {
    #[serde(rename = "_id")]
    key: ConversationKey,
    last_message: String,
    last_message_at: DateTime,
    last_message_sender_id: ObjectId,
    last_message_sender_role: ChatRole,
}

pub struct ChatDao {
    pub messages: BaseDao<ChatMessage>,
    pub users: BaseDao<User>,
    pub providers: BaseDao<Provider>,
    pub bookings: BaseDao<Booking>,
}

impl ChatDao {
    pub fn new(db: &Database) -> Self {
        Self {
            messages: BaseDao::new(db, ChatMessage::COLLECTION),
            users: BaseDao::new(db, User::COLLECTION),
            providers: BaseDao::new(db, Provider::COLLECTION),
            bookings: BaseDao::new(db, Booking::COLLECTION),
        }
    }

    // ── Message store ───────────────────────────────────────────────

    pub async fn create_message(
        &self,
        content: String,
        sender_id: ObjectId,
        sender_role: ChatRole,
        receiver_id: ObjectId,
        receiver_role: ChatRole,
    ) -> DaoResult<ChatMessage> {
        let now = DateTime::now();
        let message = ChatMessage {
            id: None,
            content,
            sender_id,
            sender_role,
            receiver_id,
            receiver_role,
            created_at: now,
            updated_at: now,
        };

        let id = self.messages.insert_one(&message).await?;
        self.messages.find_by_id(id).await
    }

    /// One pairwise thread, oldest message first (conversational reading
    /// order). Both directions of the pair interleave in a single timeline;
    /// `_id` breaks creation-time ties so pages stay stable.
    pub async fn find_conversation_messages(
        &self,
        current_id: ObjectId,
        current_role: ChatRole,
        participant_id: ObjectId,
        participant_role: ChatRole,
        page: u64,
        limit: u64,
    ) -> DaoResult<PaginatedResult<ChatMessage>> {
        let current = current_role.as_str();
        let participant = participant_role.as_str();
        let filter = doc! {
            "$or": [
                {
                    "sender_id": current_id,
                    "sender_role": current,
                    "receiver_id": participant_id,
                    "receiver_role": participant,
                },
                {
                    "sender_id": participant_id,
                    "sender_role": participant,
                    "receiver_id": current_id,
                    "receiver_role": current,
                },
            ]
        };

        self.messages
            .find_paginated(filter, Some(doc! { "created_at": 1, "_id": 1 }), page, limit)
            .await
    }

    // ── Conversation aggregation ────────────────────────────────────

    /// Rolls the actor's message log up into one row per counterparty,
    /// newest-activity first, in a single server-side pipeline, then joins
    /// display profiles in with one batched lookup per entity kind.
    pub async fn find_conversations(
        &self,
        current_id: ObjectId,
        current_role: ChatRole,
        page: u64,
        limit: u64,
    ) -> DaoResult<PaginatedResult<ConversationSummary>> {
        let page = page.max(1);
        let limit = limit.max(1);
        let skip = ((page - 1) * limit) as i64;
        let role = current_role.as_str();

        let pipeline = vec![
            doc! { "$match": {
                "$or": [
                    { "sender_id": current_id, "sender_role": role },
                    { "receiver_id": current_id, "receiver_role": role },
                ]
            }},
            other_party_stage(current_id, role),
            // Newest first so $group's $first picks each thread's latest
            // message; _id breaks same-instant ties deterministically.
            doc! { "$sort": { "created_at": -1, "_id": -1 } },
            doc! { "$group": {
                "_id": {
                    "participant_id": "$participant_id",
                    "participant_role": "$participant_role",
                },
                "last_message": { "$first": "$content" },
                "last_message_at": { "$first": "$created_at" },
                "last_message_sender_id": { "$first": "$sender_id" },
                "last_message_sender_role": { "$first": "$sender_role" },
            }},
            doc! { "$sort": {
                "last_message_at": -1,
                "_id.participant_id": 1,
                "_id.participant_role": 1,
            }},
            doc! { "$facet": {
                "items": [ { "$skip": skip }, { "$limit": limit as i64 } ],
                "total": [ { "$count": "count" } ],
            }},
        ];

        let mut cursor = self.messages.collection().aggregate(pipeline).await?;
        // $facet always emits exactly one document, even over an empty log.
        let facet = cursor.try_next().await?.unwrap_or_default();

        let rows: Vec<ConversationRow> = facet
            .get_array("items")
            .ok()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(bson::from_bson)
            .collect::<Result<_, _>>()?;

        let total = facet_total(&facet);

        let pairs: Vec<(ObjectId, ChatRole)> = rows
            .iter()
            .map(|row| (row.key.participant_id, row.key.participant_role))
            .collect();
        let profiles = self.resolve_profiles(&pairs).await?;

        let items = rows
            .into_iter()
            .map(|row| {
                let participant_id = row.key.participant_id;
                let participant_role = row.key.participant_role;
                let profile = profiles
                    .get(&(participant_id, participant_role))
                    .cloned()
                    .unwrap_or_else(|| fallback_profile(participant_role));
                ConversationSummary {
                    participant_id,
                    participant_role,
                    participant_name: profile.name,
                    participant_image: profile.image,
                    participant_subtitle: profile.subtitle,
                    last_message: row.last_message,
                    last_message_at: row.last_message_at,
                    last_message_sender_id: row.last_message_sender_id,
                    last_message_sender_role: row.last_message_sender_role,
                }
            })
            .collect();

        Ok(PaginatedResult {
            items,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        })
    }

    /// One `$in` query per entity kind, keyed by the full `(id, role)`
    /// identity so an incidental id collision across collections cannot
    /// cross-contaminate profiles.
    async fn resolve_profiles(
        &self,
        participants: &[(ObjectId, ChatRole)],
    ) -> DaoResult<HashMap<(ObjectId, ChatRole), ParticipantProfile>> {
        let mut profiles = HashMap::new();

        let user_ids: Vec<ObjectId> = participants
            .iter()
            .filter(|(_, role)| *role == ChatRole::User)
            .map(|(id, _)| *id)
            .collect();
        let provider_ids: Vec<ObjectId> = participants
            .iter()
            .filter(|(_, role)| *role == ChatRole::Provider)
            .map(|(id, _)| *id)
            .collect();

        if !user_ids.is_empty() {
            let users = self
                .users
                .find_many(doc! { "_id": { "$in": user_ids } }, None)
                .await?;
            for user in &users {
                if let Some(id) = user.id {
                    profiles.insert((id, ChatRole::User), user_profile(user));
                }
            }
        }

        if !provider_ids.is_empty() {
            let providers = self
                .providers
                .find_many(doc! { "_id": { "$in": provider_ids } }, None)
                .await?;
            for provider in &providers {
                if let Some(id) = provider.id {
                    profiles.insert((id, ChatRole::Provider), provider_profile(provider));
                }
            }
        }

        Ok(profiles)
    }

    // ── Contact resolution ──────────────────────────────────────────

    /// Who the actor may start a chat with: the distinct counterparties on
    /// their bookings, name-sorted. No bookings is a normal empty list.
    pub async fn find_contacts(
        &self,
        current_id: ObjectId,
        current_role: ChatRole,
    ) -> DaoResult<Vec<ChatContact>> {
        match current_role {
            ChatRole::Provider => {
                let raw = self
                    .bookings
                    .collection()
                    .distinct(
                        "user_id",
                        doc! { "provider_id": current_id, "user_id": { "$ne": null } },
                    )
                    .await?;
                let ids: Vec<ObjectId> = raw.iter().filter_map(Bson::as_object_id).collect();
                if ids.is_empty() {
                    return Ok(Vec::new());
                }

                let users = self
                    .users
                    .find_many(
                        doc! { "_id": { "$in": ids } },
                        Some(doc! { "first_name": 1, "last_name": 1 }),
                    )
                    .await?;
                Ok(users
                    .iter()
                    .filter_map(|user| {
                        user.id.map(|id| {
                            let profile = user_profile(user);
                            ChatContact {
                                participant_id: id,
                                participant_role: ChatRole::User,
                                name: profile.name,
                                image_url: profile.image,
                                subtitle: profile.subtitle,
                            }
                        })
                    })
                    .collect())
            }
            ChatRole::User => {
                let raw = self
                    .bookings
                    .collection()
                    .distinct(
                        "provider_id",
                        doc! { "user_id": current_id, "provider_id": { "$ne": null } },
                    )
                    .await?;
                let ids: Vec<ObjectId> = raw.iter().filter_map(Bson::as_object_id).collect();
                if ids.is_empty() {
                    return Ok(Vec::new());
                }

                let providers = self
                    .providers
                    .find_many(
                        doc! { "_id": { "$in": ids } },
                        Some(doc! { "business_name": 1 }),
                    )
                    .await?;
                Ok(providers
                    .iter()
                    .filter_map(|provider| {
                        provider.id.map(|id| {
                            let profile = provider_profile(provider);
                            ChatContact {
                                participant_id: id,
                                participant_role: ChatRole::Provider,
                                name: profile.name,
                                image_url: profile.image,
                                subtitle: profile.subtitle,
                            }
                        })
                    })
                    .collect())
            }
        }
    }
}

/// Projects the directed message edge into the undirected "other party"
/// view: whichever end is not the actor becomes `(participant_id,
/// participant_role)`, so grouping sees one key per counterparty regardless
/// of who wrote each message.
fn other_party_stage(current_id: ObjectId, current_role: &str) -> Document {
    let is_current_sender = doc! {
        "$and": [
            { "$eq": ["$sender_id", current_id] },
            { "$eq": ["$sender_role", current_role] },
        ]
    };
    doc! { "$addFields": {
        "participant_id": {
            "$cond": [is_current_sender.clone(), "$receiver_id", "$sender_id"]
        },
        "participant_role": {
            "$cond": [is_current_sender, "$receiver_role", "$sender_role"]
        },
    }}
}

fn facet_total(facet: &Document) -> u64 {
    facet
        .get_array("total")
        .ok()
        .and_then(|counts| counts.first())
        .and_then(Bson::as_document)
        .and_then(|count| count.get("count"))
        .and_then(|count| match count {
            Bson::Int32(v) => Some(*v as u64),
            Bson::Int64(v) => Some(*v as u64),
            _ => None,
        })
        .unwrap_or(0)
}
