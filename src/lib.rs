pub mod bot_verifier;
pub mod configuration;
pub mod dispatcher;
pub mod domain;
pub mod email_client;
pub mod notifications;
pub mod routes;
pub mod startup;
pub mod telemetry;
