use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaoError {
    #[error("Not found")]
    NotFound,
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
    #[error(transparent)]
    BsonSer(#[from] bson::ser::Error),
    #[error(transparent)]
    BsonDe(#[from] bson::de::Error),
}

pub type DaoResult<T> = Result<T, DaoError>;

/// Optional `?page=&limit=` query parameters. Defaults differ per endpoint,
/// so they are applied by the caller, not here.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

/// `ceil(total / limit)`, never less than 1: an empty result set is still
/// one (empty) page.
pub fn total_pages(total: u64, limit: u64) -> u64 {
    total.div_ceil(limit.max(1)).max(1)
}

pub struct BaseDao<T: Send + Sync> {
    collection: Collection<T>,
}

impl<T> BaseDao<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<T>(collection_name),
        }
    }

    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    pub async fn insert_one(&self, document: &T) -> DaoResult<ObjectId> {
        match self.collection.insert_one(document).await {
            Ok(result) => result
                .inserted_id
                .as_object_id()
                .ok_or(DaoError::NotFound),
            Err(e) => {
                if let mongodb::error::ErrorKind::Write(
                    mongodb::error::WriteFailure::WriteError(ref we),
                ) = *e.kind
                    && we.code == 11000
                {
                    return Err(DaoError::DuplicateKey(we.message.clone()));
                }
                Err(e.into())
            }
        }
    }

    pub async fn find_by_id(&self, id: ObjectId) -> DaoResult<T> {
        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn find_many(&self, filter: Document, sort: Option<Document>) -> DaoResult<Vec<T>> {
        let mut find = self.collection.find(filter);
        if let Some(sort) = sort {
            find = find.sort(sort);
        }
        Ok(find.await?.try_collect().await?)
    }

    pub async fn count(&self, filter: Document) -> DaoResult<u64> {
        Ok(self.collection.count_documents(filter).await?)
    }

    /// Skip/limit pagination with a total count for the metadata envelope.
    /// `page` is 1-indexed; 0 is treated as 1.
    pub async fn find_paginated(
        &self,
        filter: Document,
        sort: Option<Document>,
        page: u64,
        limit: u64,
    ) -> DaoResult<PaginatedResult<T>> {
        let page = page.max(1);
        let limit = limit.max(1);

        let total = self.count(filter.clone()).await?;

        let mut find = self
            .collection
            .find(filter)
            .skip((page - 1) * limit)
            .limit(limit as i64);
        if let Some(sort) = sort {
            find = find.sort(sort);
        }
        let items: Vec<T> = find.await?.try_collect().await?;

        Ok(PaginatedResult {
            items,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        })
    }
}
