use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use super::helpers::{OutcomeBody, error_chain_fmt};
use crate::dispatcher::DispatchError;
use crate::domain::ValidationError;

/// Everything that can stop a form submission. Only validation and bot
/// verification failures reach the client in detail.
#[derive(thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    ValidationError(#[from] ValidationError),
    #[error("Bot verification failed. Please try again.")]
    VerificationError,
    #[error("Failed to send email. Please try again later.")]
    UpstreamError(#[source] DispatchError),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl SubmissionError {
    fn client_message(&self) -> String {
        match self {
            SubmissionError::UnexpectedError(_) => "Internal server error".into(),
            other => other.to_string(),
        }
    }
}

impl std::fmt::Debug for SubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubmissionError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubmissionError::ValidationError(_) | SubmissionError::VerificationError => {
                StatusCode::BAD_REQUEST
            }
            SubmissionError::UpstreamError(_) | SubmissionError::UnexpectedError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(OutcomeBody::failure(&self.client_message()))
    }
}
