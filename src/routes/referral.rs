use actix_web::{HttpResponse, web};

use super::{SubmissionError, dispatch_submission};
use crate::dispatcher::Dispatcher;
use crate::domain::{ReferralInvite, ReferralPayload, SubmissionRequest};
use crate::notifications::NotificationComposer;

#[tracing::instrument(
    name = "Sending a referral invite",
    skip(payload, composer, dispatcher),
    fields(
        referrer_email = tracing::field::Empty,
        friend_email = tracing::field::Empty,
        referral_code = tracing::field::Empty
    )
)]
pub async fn send_referral(
    payload: web::Json<ReferralPayload>,
    composer: web::Data<NotificationComposer>,
    dispatcher: web::Data<Dispatcher>,
) -> Result<HttpResponse, SubmissionError> {
    let invite: ReferralInvite = payload.into_inner().try_into()?;
    tracing::Span::current()
        .record("referrer_email", tracing::field::display(&invite.referrer_email))
        .record("friend_email", tracing::field::display(&invite.friend_email))
        .record("referral_code", tracing::field::display(invite.referral_code()));

    dispatch_submission(SubmissionRequest::Referral(invite), &composer, &dispatcher).await
}
