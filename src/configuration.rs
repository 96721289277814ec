use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::bot_verifier::BotVerifier;
use crate::email_client::{EmailClient, Mailbox};

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Settings {
    pub app: ApplicationSettings,
    pub email_client: EmailClientSettings,
    pub bot_verifier: BotVerifierSettings,
    pub notifications: NotificationSettings,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub api_key: Option<SecretString>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_ms: u64,
}

impl EmailClientSettings {
    /// `None` when no API key is configured.
    pub fn client(self) -> Result<Option<EmailClient>, anyhow::Error> {
        let timeout = self.timeout();
        match configured(self.api_key) {
            Some(api_key) => EmailClient::new(self.base_url, api_key, timeout).map(Some),
            None => Ok(None),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct BotVerifierSettings {
    pub verify_url: String,
    pub secret_key: Option<SecretString>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_ms: u64,
}

impl BotVerifierSettings {
    pub fn verifier(self) -> Result<BotVerifier, anyhow::Error> {
        let timeout = Duration::from_millis(self.timeout_ms);
        BotVerifier::new(self.verify_url, configured(self.secret_key), timeout)
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct NotificationSettings {
    pub site_name: String,
    pub site_url: String,
    pub admin_email: String,
    pub waitlist_sender: SenderSettings,
    pub referral_sender: SenderSettings,
    pub alpha_sender: SenderSettings,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct SenderSettings {
    pub email: String,
    pub name: String,
}

impl SenderSettings {
    pub fn mailbox(&self) -> Mailbox {
        Mailbox::new(self.email.clone(), Some(self.name.clone()))
    }
}

/// An empty secret (e.g. `APP_BOT_VERIFIER__SECRET_KEY=`) counts as unset.
fn configured(secret: Option<SecretString>) -> Option<SecretString> {
    secret.filter(|s| !s.expose_secret().trim().is_empty())
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "production" => Ok(Environment::Production),
            other => Err(format!(
                "{other} is not supported environment. Try to use `local` or `production`",
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine current directory: {e}"))
    })?;
    let conf_dir = base_path.join("configuration");
    let env: Environment = std::env::var("APP_ENV")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    let settings = config::Config::builder()
        .add_source(config::File::from(conf_dir.join("base")).required(true))
        .add_source(config::File::from(conf_dir.join(env.as_str())).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .prefix_separator("_"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
