//! Application state shared across handlers

use crate::{
    jwt::JwtService,
    mail::Mailer,
    payments::PaymentsClient,
    repositories::{UserRepository, booking::BookingRepository, listing::ListingRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_repository: UserRepository,
    pub listing_repository: ListingRepository,
    pub booking_repository: BookingRepository,
    pub jwt_service: JwtService,
    pub mailer: Mailer,
    pub payments_client: PaymentsClient,
}
