/// Configuration management for the clinic server
use crate::error::{ClinicError, ClinicResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub email: Option<EmailConfig>,
    pub uploads: UploadConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

/// Email configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_url: String,
    pub from_address: String,
    /// Marketing image inlined into patient-facing mails (cid:offerImage)
    pub offer_image: Option<PathBuf>,
}

/// Upload storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub directory: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ClinicResult<Self> {
        dotenv::dotenv().ok();

        let host = env::var("CLINIC_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("CLINIC_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .map_err(|_| ClinicError::Validation("Invalid port number".to_string()))?;

        let database_path: PathBuf = env::var("CLINIC_DB_PATH")
            .unwrap_or_else(|_| "./data/clinic.sqlite".to_string())
            .into();

        let uploads_directory: PathBuf = env::var("CLINIC_UPLOAD_DIR")
            .unwrap_or_else(|_| "./data/uploads".to_string())
            .into();

        let email = if let Ok(smtp_url) = env::var("CLINIC_SMTP_URL") {
            Some(EmailConfig {
                smtp_url,
                from_address: env::var("CLINIC_EMAIL_FROM")
                    .unwrap_or_else(|_| "noreply@dentalexperts.com".to_string()),
                offer_image: env::var("CLINIC_OFFER_IMAGE").ok().map(PathBuf::from),
            })
        } else {
            None
        };

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(ServerConfig {
            service: ServiceConfig { host, port },
            database: DatabaseConfig {
                path: database_path,
            },
            email,
            uploads: UploadConfig {
                directory: uploads_directory,
            },
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ClinicResult<()> {
        if self.service.host.is_empty() {
            return Err(ClinicError::Validation("Host cannot be empty".to_string()));
        }

        if let Some(ref email) = self.email {
            if !email.smtp_url.starts_with("smtp://") {
                return Err(ClinicError::Validation(
                    "SMTP URL must start with smtp://".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> ServerConfig {
        ServerConfig {
            service: ServiceConfig {
                host: "localhost".into(),
                port: 8000,
            },
            database: DatabaseConfig {
                path: "./data/clinic.sqlite".into(),
            },
            email: None,
            uploads: UploadConfig {
                directory: "./data/uploads".into(),
            },
            logging: LoggingConfig {
                level: "info".into(),
            },
        }
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_host() {
        let mut config = base_config();
        config.service.host = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_smtp_scheme() {
        let mut config = base_config();
        config.email = Some(EmailConfig {
            smtp_url: "http://mail.example.com".into(),
            from_address: "noreply@example.com".into(),
            offer_image: None,
        });
        assert!(config.validate().is_err());
    }
}
