use std::net::TcpListener;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::http::header;
use actix_web::{App, FromRequest, Handler, HttpServer, Resource, Responder, web};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use crate::bot_verifier::BotVerifier;
use crate::configuration::Settings;
use crate::dispatcher::Dispatcher;
use crate::notifications::NotificationComposer;
use crate::routes::{
    health_check, join_waitlist, json_error_handler, method_not_allowed, request_alpha_access,
    send_referral,
};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let email_client = config.email_client.client()?;
        if email_client.is_none() {
            tracing::error!("Email API key is not configured. Submissions will not send email.");
        }

        let bot_verifier = config.bot_verifier.verifier()?;
        if !bot_verifier.is_configured() {
            tracing::warn!("Bot verification secret is not configured. Every token will pass.");
        }

        let composer = NotificationComposer::new(config.notifications)
            .context("Failed to load email templates.")?;

        let address = format!("{}:{}", config.app.host, config.app.port);
        let listener =
            TcpListener::bind(&address).with_context(|| format!("Failed to bind {address}."))?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            Dispatcher::new(email_client),
            bot_verifier,
            composer,
        )?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    dispatcher: Dispatcher,
    bot_verifier: BotVerifier,
    composer: NotificationComposer,
) -> Result<Server, anyhow::Error> {
    let dispatcher = web::Data::new(dispatcher);
    let bot_verifier = web::Data::new(bot_verifier);
    let composer = web::Data::new(composer);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route("/health_check", web::get().to(health_check))
            .service(form_endpoint("/api/waitlist", join_waitlist))
            .service(form_endpoint("/api/referral", send_referral))
            .service(form_endpoint("/api/alpha-signup", request_alpha_access))
            .app_data(dispatcher.clone())
            .app_data(bot_verifier.clone())
            .app_data(composer.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

/// Any origin may post to the forms. Preflight requests are answered here
/// and never reach a resource.
fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allowed_methods(["POST", "OPTIONS"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(86400)
}

/// `POST` runs the handler, anything else is a 405.
fn form_endpoint<F, Args>(path: &str, handler: F) -> Resource
where
    F: Handler<Args>,
    Args: FromRequest + 'static,
    F::Output: Responder + 'static,
{
    web::resource(path)
        .route(web::post().to(handler))
        .default_service(web::to(method_not_allowed))
}
