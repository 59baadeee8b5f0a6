//! Repositories for document-store operations

use futures::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::results::UpdateResult;
use mongodb::{Collection, Database};
use tracing::info;

use common::error::{DatabaseError, DatabaseResult};

pub mod booking;
pub mod listing;

/// User directory keyed by email
///
/// Profiles have no fixed schema beyond the presence of `email`, so records
/// are handled as raw documents.
#[derive(Clone)]
pub struct UserRepository {
    collection: Collection<Document>,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection::<Document>("users"),
        }
    }

    /// Insert or replace the profile stored under the given email
    pub async fn upsert(&self, email: &str, profile: Document) -> DatabaseResult<UpdateResult> {
        info!("Upserting user profile for {}", email);

        self.collection
            .update_one(doc! { "email": email }, doc! { "$set": profile })
            .upsert(true)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<Document>> {
        self.collection
            .find_one(doc! { "email": email })
            .await
            .map_err(DatabaseError::Query)
    }

    /// Get all users
    pub async fn find_all(&self) -> DatabaseResult<Vec<Document>> {
        let cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(DatabaseError::Query)?;

        cursor.try_collect().await.map_err(DatabaseError::Query)
    }
}
