//! API service routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use mongodb::bson::Document;
use serde_json::json;
use tracing::error;

use crate::{
    error::ApiError,
    mail::BookingConfirmation,
    middleware::auth_middleware,
    models::{
        BookingsQuery, CreatePaymentRequest, CreatePaymentResponse, DeleteResponse, InsertResponse,
        ListingsQuery, SearchQuery, UpdateListingRequest, UpdateResponse, UpsertUserResponse,
    },
    state::AppState,
    validation,
};

/// Create the router for the booking service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/user/:email", put(upsert_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(liveness))
        .route("/user/:email", get(get_user))
        .route("/users", get(list_users))
        .route("/services", post(create_listing))
        .route("/services", get(list_listings))
        .route("/service", put(update_listing))
        .route("/service/:id", get(get_listing))
        .route("/services/:id", delete(delete_listing))
        .route("/search-result", get(search_listings))
        .route("/bookings", post(create_booking))
        .route("/bookings", get(list_bookings))
        .route("/create-payment", post(create_payment))
        .merge(protected_routes)
        .with_state(state)
}

/// Liveness endpoint
pub async fn liveness() -> &'static str {
    "Server is running..."
}

/// Store a user profile under the path email and issue a fresh token
pub async fn upsert_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(mut profile): Json<Document>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_email(&email)?;

    // The path parameter is authoritative for the record key
    profile.insert("email", email.as_str());

    let result = state
        .user_repository
        .upsert(&email, profile.clone())
        .await?;

    let token = state.jwt_service.issue(&profile).map_err(|e| {
        error!("Failed to issue token: {}", e);
        ApiError::Internal
    })?;

    Ok(Json(UpsertUserResponse {
        result: UpdateResponse::from(result),
        token,
    }))
}

/// Get a user by email
pub async fn get_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_email(&email)?;

    let user = state
        .user_repository
        .find_by_email(&email)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(user))
}

/// Get all users
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state.user_repository.find_all().await?;

    Ok(Json(users))
}

/// Create a new listing
pub async fn create_listing(
    State(state): State<AppState>,
    Json(listing): Json<Document>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_price_field(&listing, "price")?;

    let result = state.listing_repository.create(&listing).await?;

    Ok(Json(InsertResponse::from(result)))
}

/// Get all listings, optionally restricted to a host's email
pub async fn list_listings(
    State(state): State<AppState>,
    Query(query): Query<ListingsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let listings = state
        .listing_repository
        .find_all(query.email.as_deref())
        .await?;

    Ok(Json(listings))
}

/// Replace the listing identified by the request's `id` field
pub async fn update_listing(
    State(state): State<AppState>,
    Json(request): Json<UpdateListingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = validation::parse_object_id(&request.id)?;

    let mut fields = request.fields;
    // The identifier is immutable; only the remaining fields are replaced
    fields.remove("_id");

    if fields.is_empty() {
        return Err(ApiError::Validation("No fields to update".to_string()));
    }

    let result = state.listing_repository.update(id, fields).await?;

    if result.matched_count == 0 {
        return Err(ApiError::NotFound);
    }

    Ok(Json(UpdateResponse::from(result)))
}

/// Get a listing by identifier
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = validation::parse_object_id(&id)?;

    let listing = state
        .listing_repository
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(listing))
}

/// Delete a listing by identifier
pub async fn delete_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = validation::parse_object_id(&id)?;

    let result = state.listing_repository.delete_by_id(id).await?;

    Ok(Json(DeleteResponse::from(result)))
}

/// Search listings by location
pub async fn search_listings(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    let Some(location) = query.location else {
        return Ok(Json(json!({ "message": "No location supplied" })).into_response());
    };

    let listings = state
        .listing_repository
        .search_by_location(&location)
        .await?;

    Ok(Json(listings).into_response())
}

/// Create a booking and dispatch the confirmation email
pub async fn create_booking(
    State(state): State<AppState>,
    Json(booking): Json<Document>,
) -> Result<impl IntoResponse, ApiError> {
    let guest_email = booking
        .get_str("guestEmail")
        .map_err(|_| ApiError::Validation("guestEmail is required".to_string()))?
        .to_string();
    validation::validate_email(&guest_email)?;

    let result = state.booking_repository.create(&booking).await?;
    let response = InsertResponse::from(result);

    // Fire-and-forget: the response does not wait on the mail outcome
    let confirmation = BookingConfirmation::new(&booking, response.inserted_id.clone());
    let mailer = state.mailer.clone();
    tokio::spawn(async move {
        if let Err(e) = mailer
            .send_booking_confirmation(&confirmation, &guest_email)
            .await
        {
            error!("Failed to send booking confirmation: {}", e);
        }
    });

    Ok(Json(response))
}

/// Get bookings, optionally restricted to a guest's email
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let bookings = state
        .booking_repository
        .find_by_guest_email(query.email.as_deref())
        .await?;

    Ok(Json(bookings))
}

/// Create a payment intent and return its client secret
pub async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_price(request.price)?;

    let client_secret = state.payments_client.create_intent(request.price).await?;

    Ok(Json(CreatePaymentResponse { client_secret }))
}
