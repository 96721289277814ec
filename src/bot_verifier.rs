use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Checks bot-challenge tokens (Cloudflare Turnstile) against the
/// provider's `siteverify` endpoint.
///
/// Without a secret every token passes, so local environments work without
/// a Turnstile account. With a secret, anything short of an explicit
/// `success: true` from the provider is a failure.
#[derive(Clone)]
pub struct BotVerifier {
    http_client: Client,
    verify_url: Url,
    secret_key: Option<SecretString>,
}

#[derive(Serialize)]
struct SiteVerifyForm<'a> {
    secret: &'a str,
    response: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    remoteip: Option<&'a str>,
}

#[derive(Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(rename = "error-codes", default)]
    error_codes: Vec<String>,
}

impl BotVerifier {
    pub fn new(
        verify_url: String,
        secret_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let verify_url = Url::parse(&verify_url)
            .with_context(|| format!("Failed parsing bot verification url {verify_url}."))?;
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed building the bot verification http client.")?;

        Ok(Self {
            http_client,
            verify_url,
            secret_key,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }

    #[tracing::instrument(name = "Verifying bot challenge token", skip(self, token))]
    pub async fn verify(&self, token: Option<&str>, remote_ip: Option<&str>) -> bool {
        let Some(secret_key) = &self.secret_key else {
            tracing::warn!("Bot verification secret is not configured, letting request pass.");
            return true;
        };

        let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
            tracing::info!("No bot challenge token supplied.");
            return false;
        };

        let form = SiteVerifyForm {
            secret: secret_key.expose_secret(),
            response: token,
            remoteip: remote_ip,
        };

        match self.site_verify(&form).await {
            Ok(outcome) if outcome.success => true,
            Ok(outcome) => {
                tracing::info!(
                    error_codes = ?outcome.error_codes,
                    "Bot challenge token was rejected."
                );
                false
            }
            Err(e) => {
                tracing::warn!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Failed to verify bot challenge token."
                );
                false
            }
        }
    }

    async fn site_verify(
        &self,
        form: &SiteVerifyForm<'_>,
    ) -> Result<SiteVerifyResponse, reqwest::Error> {
        self.http_client
            .post(self.verify_url.clone())
            .form(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}
