//! Booking repository for document-store operations

use futures::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::results::InsertOneResult;
use mongodb::{Collection, Database};
use tracing::info;

use common::error::{DatabaseError, DatabaseResult};

/// Booking repository over the `bookings` collection
///
/// Bookings are immutable once created; there is no update or delete path.
#[derive(Clone)]
pub struct BookingRepository {
    collection: Collection<Document>,
}

impl BookingRepository {
    /// Create a new booking repository
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection::<Document>("bookings"),
        }
    }

    /// Insert a new booking
    pub async fn create(&self, booking: &Document) -> DatabaseResult<InsertOneResult> {
        info!(
            "Creating booking for {}",
            booking.get_str("guestEmail").unwrap_or("")
        );

        self.collection
            .insert_one(booking)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Get bookings, optionally restricted to a guest's email
    pub async fn find_by_guest_email(&self, email: Option<&str>) -> DatabaseResult<Vec<Document>> {
        let filter = match email {
            Some(email) => doc! { "guestEmail": email },
            None => doc! {},
        };

        let cursor = self
            .collection
            .find(filter)
            .await
            .map_err(DatabaseError::Query)?;

        cursor.try_collect().await.map_err(DatabaseError::Query)
    }
}
