//! Listing repository for document-store operations

use futures::TryStreamExt;
use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::results::{DeleteResult, InsertOneResult, UpdateResult};
use mongodb::{Collection, Database};
use tracing::info;

use common::error::{DatabaseError, DatabaseResult};

/// Listing repository over the `homes` collection
///
/// Listings are stored and read back as raw documents so client-supplied
/// fields survive verbatim.
#[derive(Clone)]
pub struct ListingRepository {
    collection: Collection<Document>,
}

impl ListingRepository {
    /// Create a new listing repository
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection::<Document>("homes"),
        }
    }

    /// Insert a new listing
    pub async fn create(&self, listing: &Document) -> DatabaseResult<InsertOneResult> {
        info!("Creating listing");

        self.collection
            .insert_one(listing)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Get all listings, optionally restricted to a host's email
    pub async fn find_all(&self, host_email: Option<&str>) -> DatabaseResult<Vec<Document>> {
        let filter = match host_email {
            Some(email) => doc! { "host.email": email },
            None => doc! {},
        };

        let cursor = self
            .collection
            .find(filter)
            .await
            .map_err(DatabaseError::Query)?;

        cursor.try_collect().await.map_err(DatabaseError::Query)
    }

    /// Find listings whose location equals the given value
    pub async fn search_by_location(&self, location: &str) -> DatabaseResult<Vec<Document>> {
        let cursor = self
            .collection
            .find(doc! { "location": location })
            .await
            .map_err(DatabaseError::Query)?;

        cursor.try_collect().await.map_err(DatabaseError::Query)
    }

    /// Find a listing by identifier
    pub async fn find_by_id(&self, id: ObjectId) -> DatabaseResult<Option<Document>> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(DatabaseError::Query)
    }

    /// Replace the fields of the listing with the given identifier
    pub async fn update(&self, id: ObjectId, fields: Document) -> DatabaseResult<UpdateResult> {
        info!("Updating listing {}", id);

        self.collection
            .update_one(doc! { "_id": id }, doc! { "$set": fields })
            .await
            .map_err(DatabaseError::Query)
    }

    /// Delete a listing by identifier
    pub async fn delete_by_id(&self, id: ObjectId) -> DatabaseResult<DeleteResult> {
        info!("Deleting listing {}", id);

        self.collection
            .delete_one(doc! { "_id": id })
            .await
            .map_err(DatabaseError::Query)
    }
}
