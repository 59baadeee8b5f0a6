use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod error;
mod jwt;
mod mail;
mod middleware;
mod models;
mod payments;
mod repositories;
mod routes;
mod state;
mod validation;

use common::database::{DatabaseConfig, health_check, init_client};

use crate::{
    jwt::{JwtConfig, JwtService},
    mail::{MailConfig, Mailer},
    payments::{PaymentsClient, PaymentsConfig},
    repositories::{UserRepository, booking::BookingRepository, listing::ListingRepository},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting booking service");

    // Initialize the document-store client
    let db_config = DatabaseConfig::from_env()?;
    let client = init_client(&db_config).await?;
    let database = client.database(&db_config.database_name);

    // Check database connectivity
    if health_check(&database).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Initialize services
    let jwt_service = JwtService::new(&JwtConfig::from_env()?);
    let mailer = Mailer::new(&MailConfig::from_env()?)?;
    let payments_client = PaymentsClient::new(PaymentsConfig::from_env()?);

    // Initialize repositories
    let user_repository = UserRepository::new(&database);
    let listing_repository = ListingRepository::new(&database);
    let booking_repository = BookingRepository::new(&database);

    info!("Booking service initialized successfully");

    let app_state = AppState {
        user_repository,
        listing_repository,
        booking_repository,
        jwt_service,
        mailer,
        payments_client,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Booking service listening on 0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
