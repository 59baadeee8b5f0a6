//! Database module for handling MongoDB connections and operations
//!
//! This module provides client construction, configuration, and health
//! checks for the MongoDB document store.

use crate::error::{DatabaseError, DatabaseResult};
use mongodb::{Client, Database, bson::doc};
use std::env;
use tracing::info;

/// Database configuration struct
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// MongoDB connection URI
    pub connection_uri: String,
    /// Name of the database holding the application collections
    pub database_name: String,
}

impl DatabaseConfig {
    /// Create a new DatabaseConfig from environment variables
    ///
    /// # Environment Variables
    /// - `MONGODB_URI`: MongoDB connection URI (default: local instance)
    /// - `MONGODB_DATABASE`: database name (default: "roombooking")
    pub fn from_env() -> DatabaseResult<Self> {
        let connection_uri =
            env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let database_name =
            env::var("MONGODB_DATABASE").unwrap_or_else(|_| "roombooking".to_string());

        Ok(Self {
            connection_uri,
            database_name,
        })
    }
}

/// Initialize a MongoDB client
///
/// The client maintains its own internal connection pool and is cheap to
/// clone; one client is created at startup and shared for the process
/// lifetime.
pub async fn init_client(config: &DatabaseConfig) -> DatabaseResult<Client> {
    info!("Initializing MongoDB client");

    let client = Client::with_uri_str(config.connection_uri.as_str())
        .await
        .map_err(DatabaseError::Connection)?;

    Ok(client)
}

/// Check database connectivity
///
/// Issues a `ping` command against the application database.
pub async fn health_check(database: &Database) -> DatabaseResult<bool> {
    database
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(DatabaseError::Query)?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_database_config_from_env_defaults() {
        unsafe {
            std::env::remove_var("MONGODB_URI");
            std::env::remove_var("MONGODB_DATABASE");
        }

        let config = DatabaseConfig::from_env().unwrap();
        assert_eq!(config.connection_uri, "mongodb://localhost:27017");
        assert_eq!(config.database_name, "roombooking");
    }

    #[test]
    #[serial]
    fn test_database_config_from_env_with_custom_values() {
        unsafe {
            std::env::set_var("MONGODB_URI", "mongodb://db.example.com:27017");
            std::env::set_var("MONGODB_DATABASE", "roombooking_test");
        }

        let config = DatabaseConfig::from_env().unwrap();
        assert_eq!(config.connection_uri, "mongodb://db.example.com:27017");
        assert_eq!(config.database_name, "roombooking_test");

        unsafe {
            std::env::remove_var("MONGODB_URI");
            std::env::remove_var("MONGODB_DATABASE");
        }
    }
}
