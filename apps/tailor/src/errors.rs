use thiserror::Error;

use crate::profiles::ProfileError;

/// Whole-operation error type.
///
/// Stage-level failures, including every `LlmError`, never reach this type: they are
/// absorbed into per-field fallbacks. Only collaborators outside the tailoring core
/// fail a request.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code for callers.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Profile(ProfileError::NotFound(_)) => "NOT_FOUND",
            AppError::Profile(_) => "PROFILE_ERROR",
            AppError::Cancelled => "CANCELLED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Caller-facing message. Internal details are logged here and not exposed.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Profile(ProfileError::NotFound(_)) => "Profile not found".to_string(),
            AppError::Profile(e) => {
                tracing::error!("Profile error: {e}");
                "The applicant profile could not be loaded".to_string()
            }
            AppError::Cancelled => "The request was cancelled".to_string(),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal error occurred".to_string()
            }
        }
    }
}
