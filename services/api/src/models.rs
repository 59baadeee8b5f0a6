//! Domain models and request/response payloads
//!
//! Listings, bookings, and user profiles are handled as raw documents so
//! the store keeps client-supplied fields verbatim and identifiers never
//! pass through an intermediate struct. Handlers validate the fields they
//! rely on through the accessors below before any store call.

use mongodb::bson::{Bson, Document};
use mongodb::results::{DeleteResult, InsertOneResult, UpdateResult};
use serde::{Deserialize, Serialize};

/// Request for replacing a listing; the identifier is required and the
/// remaining fields become the replacement document
#[derive(Debug, Deserialize)]
pub struct UpdateListingRequest {
    pub id: String,
    #[serde(flatten)]
    pub fields: Document,
}

/// Query parameters for listing collections by host
#[derive(Debug, Deserialize)]
pub struct ListingsQuery {
    pub email: Option<String>,
}

/// Query parameters for location search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub location: Option<String>,
}

/// Query parameters for listing bookings by guest
#[derive(Debug, Deserialize)]
pub struct BookingsQuery {
    pub email: Option<String>,
}

/// Request for creating a payment intent
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub price: f64,
}

/// Response carrying the gateway's client secret
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentResponse {
    pub client_secret: String,
}

/// Response for insert operations
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResponse {
    pub inserted_id: String,
}

/// Response for update operations
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub matched_count: u64,
    pub modified_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upserted_id: Option<String>,
}

/// Response for delete operations
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub deleted_count: u64,
}

/// Response for the user upsert, carrying the write result and a fresh token
#[derive(Debug, Serialize)]
pub struct UpsertUserResponse {
    pub result: UpdateResponse,
    pub token: String,
}

/// Read a numeric document field across the integer and double encodings
pub fn number_field(doc: &Document, key: &str) -> Option<f64> {
    match doc.get(key) {
        Some(Bson::Double(v)) => Some(*v),
        Some(Bson::Int32(v)) => Some(f64::from(*v)),
        Some(Bson::Int64(v)) => Some(*v as f64),
        _ => None,
    }
}

/// Read a string document field, ignoring missing or non-string values
pub fn string_field(doc: &Document, key: &str) -> Option<String> {
    doc.get_str(key).ok().map(String::from)
}

fn id_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        other => other.to_string(),
    }
}

impl From<InsertOneResult> for InsertResponse {
    fn from(result: InsertOneResult) -> Self {
        Self {
            inserted_id: id_string(&result.inserted_id),
        }
    }
}

impl From<UpdateResult> for UpdateResponse {
    fn from(result: UpdateResult) -> Self {
        Self {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id: result.upserted_id.as_ref().map(id_string),
        }
    }
}

impl From<DeleteResult> for DeleteResponse {
    fn from(result: DeleteResult) -> Self {
        Self {
            deleted_count: result.deleted_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use serde_json::json;

    #[test]
    fn test_booking_document_from_json_keeps_fields_verbatim() {
        let payload = json!({
            "guestEmail": "guest@example.com",
            "transactionId": "tx_123",
            "home": { "location": "Paris", "wifi": true },
            "notes": "late arrival"
        });

        let booking: Document = serde_json::from_value(payload).unwrap();
        assert_eq!(booking.get_str("guestEmail").unwrap(), "guest@example.com");
        assert_eq!(booking.get_str("transactionId").unwrap(), "tx_123");
        assert!(booking.contains_key("notes"));

        let home = booking.get_document("home").unwrap();
        assert_eq!(home.get_str("location").unwrap(), "Paris");
        assert!(home.get_bool("wifi").unwrap());
    }

    #[test]
    fn test_number_field_reads_all_numeric_encodings() {
        let doc = doc! { "double": 19.99, "int": 100, "long": 2_i64, "text": "x" };

        assert_eq!(number_field(&doc, "double"), Some(19.99));
        assert_eq!(number_field(&doc, "int"), Some(100.0));
        assert_eq!(number_field(&doc, "long"), Some(2.0));
        assert_eq!(number_field(&doc, "text"), None);
        assert_eq!(number_field(&doc, "missing"), None);
    }

    #[test]
    fn test_string_field_ignores_non_strings() {
        let doc = doc! { "name": "Guest", "count": 3 };

        assert_eq!(string_field(&doc, "name").as_deref(), Some("Guest"));
        assert_eq!(string_field(&doc, "count"), None);
        assert_eq!(string_field(&doc, "missing"), None);
    }

    #[test]
    fn test_update_listing_request_requires_id() {
        let payload = json!({ "location": "Berlin" });
        assert!(serde_json::from_value::<UpdateListingRequest>(payload).is_err());

        let payload = json!({ "id": "66b3f0a4c2a4f0a1d3e4f5a6", "location": "Berlin" });
        let request: UpdateListingRequest = serde_json::from_value(payload).unwrap();
        assert_eq!(request.id, "66b3f0a4c2a4f0a1d3e4f5a6");
        assert!(request.fields.contains_key("location"));
    }

    #[test]
    fn test_response_wire_names_are_camel_case() {
        let insert = InsertResponse {
            inserted_id: "66b3f0a4c2a4f0a1d3e4f5a6".to_string(),
        };
        let value = serde_json::to_value(&insert).unwrap();
        assert!(value.get("insertedId").is_some());

        let update = UpdateResponse {
            matched_count: 1,
            modified_count: 1,
            upserted_id: None,
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["matchedCount"], 1);
        assert!(value.get("upsertedId").is_none());

        let delete = DeleteResponse { deleted_count: 1 };
        let value = serde_json::to_value(&delete).unwrap();
        assert_eq!(value["deletedCount"], 1);
    }
}
