//! Notification dispatcher for booking confirmations
//!
//! Sends a fixed-template transactional email over async SMTP. The caller
//! spawns the send as a detached task; failures are logged and never reach
//! the HTTP response path.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use mongodb::bson::Document;
use thiserror::Error;
use tracing::info;

use crate::models::{number_field, string_field};

/// Mail transport configuration
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP relay hostname
    pub smtp_host: String,
    /// SMTP authentication username
    pub smtp_username: String,
    /// SMTP authentication password
    pub smtp_password: String,
    /// Sender address (From header)
    pub from_address: String,
}

impl MailConfig {
    /// Create a new MailConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SMTP_HOST`: relay hostname (default: smtp.gmail.com)
    /// - `SMTP_USERNAME`: relay username
    /// - `SMTP_PASSWORD`: relay password
    /// - `MAIL_FROM`: sender address (default: the username)
    pub fn from_env() -> anyhow::Result<Self> {
        let smtp_host =
            std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());

        let smtp_username = std::env::var("SMTP_USERNAME")
            .map_err(|_| anyhow::anyhow!("SMTP_USERNAME environment variable not set"))?;

        let smtp_password = std::env::var("SMTP_PASSWORD")
            .map_err(|_| anyhow::anyhow!("SMTP_PASSWORD environment variable not set"))?;

        let from_address = std::env::var("MAIL_FROM").unwrap_or_else(|_| smtp_username.clone());

        Ok(MailConfig {
            smtp_host,
            smtp_username,
            smtp_password,
            from_address,
        })
    }
}

/// Errors that can occur when sending email
#[derive(Error, Debug)]
pub enum MailError {
    /// SMTP transport error
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Template fields for the booking confirmation email
#[derive(Debug, Clone)]
pub struct BookingConfirmation {
    pub booking_id: String,
    pub price: Option<f64>,
    pub transaction_id: Option<String>,
    pub location: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub host_email: Option<String>,
    pub image: Option<String>,
}

impl BookingConfirmation {
    /// Build the template fields from a booking document and its generated
    /// identifier
    pub fn new(booking: &Document, booking_id: String) -> Self {
        let home = booking.get_document("home").ok();

        Self {
            booking_id,
            price: number_field(booking, "price"),
            transaction_id: string_field(booking, "transactionId"),
            location: home.and_then(|h| string_field(h, "location")),
            from_date: home.and_then(|h| string_field(h, "from")),
            to_date: home.and_then(|h| string_field(h, "to")),
            host_email: string_field(booking, "hostEmail"),
            image: home.and_then(|h| string_field(h, "image")),
        }
    }

    /// Render the fixed HTML template
    fn render_html(&self) -> String {
        format!(
            "<p>Booking id: {}</p>\n\
             <p>Price: {}</p>\n\
             <p>TransactionId: {}</p>\n\
             <p>Location: {}</p>\n\
             <p>From: {}</p>\n\
             <p>To: {}</p>\n\
             <p>Host Email: {}</p>\n\
             <img src=\"{}\"/>",
            self.booking_id,
            self.price.map(|p| p.to_string()).unwrap_or_default(),
            self.transaction_id.as_deref().unwrap_or(""),
            self.location.as_deref().unwrap_or(""),
            self.from_date.as_deref().unwrap_or(""),
            self.to_date.as_deref().unwrap_or(""),
            self.host_email.as_deref().unwrap_or(""),
            self.image.as_deref().unwrap_or(""),
        )
    }
}

/// Mail service for sending transactional emails
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl Mailer {
    /// Create a new mailer from configuration
    pub fn new(config: &MailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }

    /// Send a booking confirmation to the guest
    pub async fn send_booking_confirmation(
        &self,
        confirmation: &BookingConfirmation,
        to: &str,
    ) -> Result<(), MailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| MailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| MailError::InvalidAddress(to.to_string()))?)
            .subject("Booking successful")
            .header(ContentType::TEXT_HTML)
            .body(confirmation.render_html())?;

        self.transport.send(email).await?;

        info!(to = %to, booking_id = %confirmation.booking_id, "Booking confirmation sent");
        Ok(())
    }
}
