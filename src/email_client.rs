use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

const SEND_EMAIL_PATH: &str = "v3/mail/send";
const UPSERT_CONTACTS_PATH: &str = "v3/marketing/contacts";

/// Client for the transactional email provider: mail sending plus the
/// marketing contact list.
#[derive(Clone, Debug)]
pub struct EmailClient {
    http_client: Client,
    send_url: Url,
    contacts_url: Url,
    api_key: SecretString,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Mailbox {
    pub fn new(email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            email: email.into(),
            name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: Mailbox,
    pub from: Mailbox,
    pub reply_to: Option<Mailbox>,
    pub subject: String,
    pub html: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    pub custom_fields: BTreeMap<&'static str, String>,
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: [&'a Mailbox; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    personalizations: [Personalization<'a>; 1],
    from: &'a Mailbox,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a Mailbox>,
    subject: &'a str,
    content: [Content<'a>; 1],
}

#[derive(Serialize)]
struct UpsertContactsRequest<'a> {
    contacts: &'a [ContactRecord],
}

impl EmailClient {
    pub fn new(
        base_url: String,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let base_url = Url::parse(&base_url)
            .with_context(|| format!("Failed parsing base email api url {base_url}."))?;
        let send_url = base_url
            .join(SEND_EMAIL_PATH)
            .context("Failed joining route to email api url.")?;
        let contacts_url = base_url
            .join(UPSERT_CONTACTS_PATH)
            .context("Failed joining route to email api url.")?;
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed building the email api http client.")?;

        Ok(Self {
            http_client,
            send_url,
            contacts_url,
            api_key,
        })
    }

    #[tracing::instrument(
        name = "Sending an email",
        skip(self, email),
        fields(recipient = %email.to.email, subject = %email.subject)
    )]
    pub async fn send_email(&self, email: &OutgoingEmail) -> Result<(), reqwest::Error> {
        let body = SendEmailRequest {
            personalizations: [Personalization { to: [&email.to] }],
            from: &email.from,
            reply_to: email.reply_to.as_ref(),
            subject: &email.subject,
            content: [Content {
                content_type: "text/html",
                value: &email.html,
            }],
        };

        self.http_client
            .post(self.send_url.clone())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    #[tracing::instrument(
        name = "Upserting marketing contacts",
        skip(self, contacts),
        fields(contacts = contacts.len())
    )]
    pub async fn upsert_contacts(&self, contacts: &[ContactRecord]) -> Result<(), reqwest::Error> {
        self.http_client
            .put(self.contacts_url.clone())
            .bearer_auth(self.api_key.expose_secret())
            .json(&UpsertContactsRequest { contacts })
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
