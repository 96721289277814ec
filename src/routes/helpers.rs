use std::error::Error;
use std::net::{IpAddr, SocketAddr};

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use anyhow::Context;

use super::errors::SubmissionError;
use crate::dispatcher::Dispatcher;
use crate::domain::SubmissionRequest;
use crate::notifications::NotificationComposer;

pub fn error_chain_fmt(e: &impl Error, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    writeln!(f, "{e}\n")?;
    let mut current = e.source();

    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{cause}")?;
        current = cause.source();
    }

    Ok(())
}

/// JSON body shared by every form endpoint.
#[derive(serde::Serialize, Debug)]
pub struct OutcomeBody<'a> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

impl<'a> OutcomeBody<'a> {
    pub fn success(message: &'a str) -> Self {
        Self {
            success: true,
            message: Some(message),
            error: None,
        }
    }

    pub fn failure(error: &'a str) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error),
        }
    }
}

/// Composes and sends everything a validated submission triggers, then
/// builds the success response.
pub async fn dispatch_submission(
    submission: SubmissionRequest,
    composer: &NotificationComposer,
    dispatcher: &Dispatcher,
) -> Result<HttpResponse, SubmissionError> {
    let plan = composer
        .compose(&submission)
        .context("Failed to compose notifications.")?;

    let report = dispatcher
        .dispatch(plan)
        .await
        .map_err(SubmissionError::UpstreamError)?;

    tracing::info!(
        kind = submission.kind(),
        delivered = report.delivered,
        best_effort_failures = report.best_effort_failures,
        contacts_upserted = report.contacts_upserted,
        skipped = report.skipped,
        "Submission processed."
    );

    Ok(HttpResponse::Ok().json(OutcomeBody::success(submission.success_message())))
}

pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed()
        .insert_header((header::ALLOW, "POST, OPTIONS"))
        .json(OutcomeBody::failure("Method not allowed"))
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::info!(error.message = %err, "Rejected an unparseable request body.");
    let response = HttpResponse::BadRequest().json(OutcomeBody::failure("Invalid request body"));
    InternalError::from_response(err, response).into()
}

/// The visitor's IP without a port, if one can be determined. Cloudflare's
/// `CF-Connecting-IP` wins over `Forwarded` / `X-Forwarded-For`, which win
/// over the peer address.
pub fn client_ip(req: &HttpRequest) -> Option<String> {
    let cf_connecting_ip = req
        .headers()
        .get("CF-Connecting-IP")
        .and_then(|v| v.to_str().ok())
        .and_then(parse_ip);
    if cf_connecting_ip.is_some() {
        return cf_connecting_ip;
    }

    let info = req.connection_info();
    info.realip_remote_addr().and_then(parse_ip)
}

fn parse_ip(addr: &str) -> Option<String> {
    let addr = addr.trim();
    addr.parse::<SocketAddr>()
        .map(|s| s.ip())
        .or_else(|_| addr.parse::<IpAddr>())
        .ok()
        .map(|ip| ip.to_string())
}
