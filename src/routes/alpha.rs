use actix_web::{HttpRequest, HttpResponse, web};

use super::{SubmissionError, client_ip, dispatch_submission};
use crate::bot_verifier::BotVerifier;
use crate::dispatcher::Dispatcher;
use crate::domain::{AlphaPayload, AlphaRequest, SubmissionRequest};
use crate::notifications::NotificationComposer;

#[tracing::instrument(
    name = "Requesting alpha access",
    skip(request, payload, bot_verifier, composer, dispatcher),
    fields(
        submitter_email = tracing::field::Empty,
        github = tracing::field::Empty
    )
)]
pub async fn request_alpha_access(
    request: HttpRequest,
    payload: web::Json<AlphaPayload>,
    bot_verifier: web::Data<BotVerifier>,
    composer: web::Data<NotificationComposer>,
    dispatcher: web::Data<Dispatcher>,
) -> Result<HttpResponse, SubmissionError> {
    let alpha: AlphaRequest = payload.into_inner().try_into()?;
    tracing::Span::current()
        .record("submitter_email", tracing::field::display(&alpha.email))
        .record("github", tracing::field::display(&alpha.github_handle));

    let remote_ip = client_ip(&request);
    if !bot_verifier
        .verify(alpha.bot_token.as_deref(), remote_ip.as_deref())
        .await
    {
        return Err(SubmissionError::VerificationError);
    }

    dispatch_submission(SubmissionRequest::Alpha(alpha), &composer, &dispatcher).await
}
