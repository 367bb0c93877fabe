//! Configuration module
//!
//! Environment-driven configuration for the gateway server and for the clients
//! that talk to it. `.env` files are honoured through `dotenvy`.

use std::env;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
const DEFAULT_GATEWAY_URL: &str = "http://localhost:3000";
const DEFAULT_ADVISOR_NAME: &str = "Current Advisor";
const DEFAULT_SERVICE_NAME: &str = "cpl-gateway";
const MAX_REQUEST_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Gateway server configuration
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub server_port: u16,
    /// Base URL of the backend service fronting the document, search and tabular stores
    pub backend_url: String,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub max_request_body_bytes: usize,
    pub service_name: String,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_port = match lookup("SERVER_PORT").or_else(|| lookup("PORT")) {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("SERVER_PORT must be a valid number"))?,
            None => DEFAULT_SERVER_PORT,
        };

        let backend_url = lookup("BACKEND_SERVICE_URL")
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let max_request_body_bytes = lookup("MAX_REQUEST_BODY_BYTES")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(MAX_REQUEST_BODY_BYTES);

        let service_name =
            lookup("SERVICE_NAME").unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());

        Ok(Self {
            server_port,
            backend_url,
            cors_origins,
            environment,
            max_request_body_bytes,
            service_name,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("SERVER_PORT must be greater than zero"));
        }

        if !(self.backend_url.starts_with("http://") || self.backend_url.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "BACKEND_SERVICE_URL must be an http:// or https:// URL, got '{}'",
                self.backend_url
            ));
        }

        if self.max_request_body_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_REQUEST_BODY_BYTES must be greater than zero"
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        matches!(
            self.environment.to_lowercase().as_str(),
            "production" | "prod"
        )
    }
}

/// Configuration for clients of the gateway (tracker, CLI).
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub gateway_url: String,
    /// Recorded as `updatedBy` on status updates
    pub advisor_name: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let gateway_url = lookup("CPL_GATEWAY_URL")
            .or_else(|| lookup("API_URL"))
            .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let advisor_name = lookup("CPL_ADVISOR_NAME")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADVISOR_NAME.to_string());

        Self {
            gateway_url,
            advisor_name,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
