//! Error types and handling for the UV radiation service

use thiserror::Error;

/// Main error type for the UV radiation service
#[derive(Error, Debug)]
pub enum UvError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream provider failures (malformed payload, missing data)
    #[error("Provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// No data source can answer and no fallback exists
    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    /// Transport errors from the HTTP client (timeouts included)
    #[error("HTTP error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Unexpected failures while assembling a response
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl UvError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new provider error
    pub fn provider<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            UvError::Config { .. } => {
                "Error de configuración. Revise el archivo de configuración.".to_string()
            }
            UvError::Provider { .. } | UvError::Http { .. } => {
                "No se pudo conectar con los servicios externos de datos UV.".to_string()
            }
            UvError::Validation { message } => message.clone(),
            UvError::ServiceUnavailable { .. } => {
                "El servicio de pronóstico no está disponible en este momento".to_string()
            }
            UvError::Io { .. } | UvError::Internal { .. } => {
                "No se pudo procesar la solicitud".to_string()
            }
        }
    }
}
