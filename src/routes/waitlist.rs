use actix_web::{HttpResponse, web};

use super::{SubmissionError, dispatch_submission};
use crate::dispatcher::Dispatcher;
use crate::domain::{SubmissionRequest, WaitlistPayload, WaitlistSignup};
use crate::notifications::NotificationComposer;

#[tracing::instrument(
    name = "Joining the waitlist",
    skip(payload, composer, dispatcher),
    fields(
        submitter_email = tracing::field::Empty,
        signup_type = tracing::field::Empty
    )
)]
pub async fn join_waitlist(
    payload: web::Json<WaitlistPayload>,
    composer: web::Data<NotificationComposer>,
    dispatcher: web::Data<Dispatcher>,
) -> Result<HttpResponse, SubmissionError> {
    let signup: WaitlistSignup = payload.into_inner().try_into()?;
    tracing::Span::current()
        .record("submitter_email", tracing::field::display(&signup.email))
        .record("signup_type", signup.signup_type.as_str());

    dispatch_submission(SubmissionRequest::Waitlist(signup), &composer, &dispatcher).await
}
